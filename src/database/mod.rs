// ABOUTME: SQLite storage for users, reference data, recipes and their join tables
// ABOUTME: Opens the pool, bootstraps the schema and hands out per-table managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Database Management
//!
//! Storage is a single `SQLite` database. Uniqueness and positivity invariants are enforced
//! by table constraints, so a racing writer that slips past a service-level pre-check still
//! gets a constraint violation, which [`AppError`](crate::errors::AppError) maps to a conflict.
//!
//! The schema is bootstrapped with idempotent `CREATE TABLE IF NOT EXISTS` statements on
//! every start.

/// Follow relationships between users
pub mod follows;
/// Ingredient reference data
pub mod ingredients;
/// Favorite and shopping-cart memberships
pub mod memberships;
/// The (recipe, ingredient, amount) ledger and its aggregation query
pub mod recipe_ingredients;
/// Recipe rows and their tag links
pub mod recipes;
/// Tag reference data
pub mod tags;
/// RAII transaction guard
pub mod transactions;
/// User accounts
pub mod users;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::fs;
use tracing::{debug, info};

pub use follows::FollowsManager;
pub use ingredients::IngredientsManager;
pub use memberships::MembershipsManager;
pub use recipe_ingredients::RecipeIngredientsManager;
pub use recipes::RecipesManager;
pub use tags::TagsManager;
pub use transactions::{SqliteTransactionGuard, TransactionGuard};
pub use users::UsersManager;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Connections kept for a file-backed database
const FILE_POOL_SIZE: u32 = 5;
/// How long a writer waits for the database lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database handle shared by every request
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `database_url` and bootstrap the schema
    ///
    /// In-memory databases use one long-lived connection; otherwise every pooled
    /// connection would see its own empty database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the file cannot be created or opened, or the
    /// schema bootstrap fails
    pub async fn new(database_url: &str) -> Result<Self> {
        let url = DatabaseUrl::parse_url(database_url);

        if let DatabaseUrl::SQLite { path } = &url {
            ensure_parent_dir(path).await?;
        }

        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .with_context(|| format!("Invalid database URL: {database_url}"))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(FILE_POOL_SIZE)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {url}"))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(database = %url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bootstrap every table and index
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> Result<()> {
        // Parents before children so foreign keys resolve
        self.migrate_users().await?;
        self.migrate_tags().await?;
        self.migrate_ingredients().await?;
        self.migrate_recipes().await?;
        self.migrate_recipe_ingredients().await?;
        self.migrate_memberships().await?;
        self.migrate_follows().await?;

        debug!("Schema bootstrap complete");
        Ok(())
    }

    /// Start a transaction wrapped in a rollback-on-drop guard
    ///
    /// Every statement of a multi-statement write must go through the guard's executor,
    /// not the pool: an in-memory database has a single connection, which the
    /// transaction holds until it ends.
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be acquired
    pub async fn begin(&self) -> AppResult<SqliteTransactionGuard> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        Ok(TransactionGuard::new(tx))
    }

    /// Round-trip a trivial query
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database health check failed: {e}")))?;
        Ok(())
    }

    /// User accounts
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Tags
    #[must_use]
    pub fn tags(&self) -> TagsManager {
        TagsManager::new(self.pool.clone())
    }

    /// Ingredients
    #[must_use]
    pub fn ingredients(&self) -> IngredientsManager {
        IngredientsManager::new(self.pool.clone())
    }

    /// Recipes and their tag links
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// The ingredient quantity ledger
    #[must_use]
    pub fn recipe_ingredients(&self) -> RecipeIngredientsManager {
        RecipeIngredientsManager::new(self.pool.clone())
    }

    /// Favorites and shopping carts
    #[must_use]
    pub fn memberships(&self) -> MembershipsManager {
        MembershipsManager::new(self.pool.clone())
    }

    /// Follows
    #[must_use]
    pub fn follows(&self) -> FollowsManager {
        FollowsManager::new(self.pool.clone())
    }
}

async fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create database directory {}", parent.display())),
        _ => Ok(()),
    }
}

/// Parse an RFC 3339 timestamp column
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid timestamp in database: {e}")))
}
