// ABOUTME: Centralized resource container for dependency injection into route handlers
// ABOUTME: Holds the database, auth manager, image store and configuration behind Arcs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Server Resources
//!
//! Built once at startup and shared by every router. Handlers receive
//! `State<Arc<ServerResources>>` and never construct these objects themselves.

use std::sync::Arc;

use anyhow::Result;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::images::{ImageStore, LocalImageStore};

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Storage
    pub database: Arc<Database>,
    /// Caller identification
    pub auth_manager: Arc<AuthManager>,
    /// Uploaded image storage
    pub images: Arc<dyn ImageStore>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources from already-built parts
    #[must_use]
    pub fn new(
        database: Database,
        auth_manager: AuthManager,
        images: Arc<dyn ImageStore>,
        config: Arc<ServerConfig>,
    ) -> Self {
        Self {
            database: Arc::new(database),
            auth_manager: Arc::new(auth_manager),
            images,
            config,
        }
    }

    /// Open the database and build every resource from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened
    pub async fn from_config(config: ServerConfig) -> Result<Self> {
        let database = Database::new(&config.database.to_connection_string()).await?;
        let auth_manager =
            AuthManager::new(config.auth.jwt_secret.as_bytes(), config.auth.jwt_expiry_hours);
        let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(
            config.media.root.clone(),
            config.media.url_prefix.clone(),
        ));

        Ok(Self::new(database, auth_manager, images, Arc::new(config)))
    }
}
