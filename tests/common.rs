// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, server resources, seeded fixtures and payload builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `foodgram_server`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::env;
use std::sync::{Arc, Once};

use anyhow::Result;
use foodgram_server::auth::{AuthManager, AuthResult};
use foodgram_server::config::{
    AuthConfig, DatabaseUrl, Environment, HttpConfig, MediaConfig, ServerConfig,
};
use foodgram_server::database::Database;
use foodgram_server::images::{ImageStore, LocalImageStore};
use foodgram_server::models::{
    Ingredient, IngredientSpec, NewIngredient, NewTag, NewUser, RecipePayload, Tag, User,
};
use foodgram_server::resources::ServerResources;
use serde_json::{json, Value};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Signing secret used by every test
pub const TEST_JWT_SECRET: &str = "foodgram-test-secret";

/// Base URL short links are built from in tests
pub const TEST_PUBLIC_BASE_URL: &str = "https://foodgram.test";

/// 1x1 transparent PNG as a data URL
pub const TEST_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; quiet by default
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Database::new("sqlite::memory:").await
}

/// Configuration pointing at an in-memory database and a temporary media root
pub fn create_test_config(media_root: &TempDir) -> ServerConfig {
    ServerConfig {
        environment: Environment::Testing,
        http: HttpConfig {
            port: 0,
            public_base_url: TEST_PUBLIC_BASE_URL.to_owned(),
            request_timeout_secs: 30,
            cors_origins: Vec::new(),
        },
        database: DatabaseUrl::Memory,
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_owned(),
            jwt_expiry_hours: 1,
        },
        media: MediaConfig {
            root: media_root.path().to_path_buf(),
            url_prefix: "/media/".to_owned(),
            max_upload_bytes: 1024 * 1024,
        },
    }
}

/// A test environment: server resources plus the media directory they write to
///
/// The directory is deleted when the context is dropped.
pub struct TestContext {
    pub resources: Arc<ServerResources>,
    pub media_root: TempDir,
}

impl TestContext {
    pub fn db(&self) -> &Database {
        &self.resources.database
    }

    pub fn images(&self) -> &dyn ImageStore {
        self.resources.images.as_ref()
    }

    pub fn token_for(&self, user: &User) -> String {
        self.resources.auth_manager.generate_token(user.id).unwrap()
    }
}

/// Full server resources over an in-memory database
pub async fn create_test_context() -> Result<TestContext> {
    let media_root = tempfile::tempdir()?;
    let config = create_test_config(&media_root);

    let database = create_test_database().await?;
    let auth_manager = AuthManager::new(TEST_JWT_SECRET.as_bytes(), config.auth.jwt_expiry_hours);
    let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(
        config.media.root.clone(),
        config.media.url_prefix.clone(),
    ));

    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        images,
        Arc::new(config),
    ));

    Ok(TestContext {
        resources,
        media_root,
    })
}

/// Create a user with a unique email derived from the username
pub async fn create_test_user(db: &Database, username: &str) -> Result<User> {
    Ok(db
        .users()
        .create(&NewUser {
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            first_name: username.to_owned(),
            last_name: "Tester".to_owned(),
        })
        .await?)
}

pub async fn create_test_tag(db: &Database, name: &str, slug: &str) -> Result<Tag> {
    Ok(db
        .tags()
        .create(&NewTag {
            name: name.to_owned(),
            slug: slug.to_owned(),
        })
        .await?)
}

pub async fn create_test_ingredient(db: &Database, name: &str, unit: &str) -> Result<Ingredient> {
    Ok(db
        .ingredients()
        .create(&NewIngredient {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        })
        .await?)
}

/// Reference data most tests need
pub struct Fixtures {
    pub author: User,
    pub reader: User,
    pub breakfast: Tag,
    pub dinner: Tag,
    pub flour: Ingredient,
    pub sugar: Ingredient,
    pub milk: Ingredient,
}

impl Fixtures {
    pub const fn author_auth(&self) -> AuthResult {
        AuthResult {
            user_id: self.author.id,
        }
    }

    pub const fn reader_auth(&self) -> AuthResult {
        AuthResult {
            user_id: self.reader.id,
        }
    }
}

pub async fn seed_fixtures(db: &Database) -> Result<Fixtures> {
    Ok(Fixtures {
        author: create_test_user(db, "author").await?,
        reader: create_test_user(db, "reader").await?,
        breakfast: create_test_tag(db, "Breakfast", "breakfast").await?,
        dinner: create_test_tag(db, "Dinner", "dinner").await?,
        flour: create_test_ingredient(db, "flour", "g").await?,
        sugar: create_test_ingredient(db, "sugar", "g").await?,
        milk: create_test_ingredient(db, "milk", "ml").await?,
    })
}

/// A complete, valid create payload
pub fn recipe_payload(name: &str, tags: &[i64], ingredients: &[(i64, i64)]) -> RecipePayload {
    RecipePayload {
        name: Some(name.to_owned()),
        text: Some(format!("How to make {name}")),
        cooking_time: Some(15),
        image: Some(TEST_IMAGE.to_owned()),
        tags: Some(tags.to_vec()),
        ingredients: Some(
            ingredients
                .iter()
                .map(|&(id, amount)| IngredientSpec { id, amount })
                .collect(),
        ),
    }
}

/// The same payload as JSON, for HTTP tests
pub fn recipe_json(name: &str, tags: &[i64], ingredients: &[(i64, i64)]) -> Value {
    json!({
        "name": name,
        "text": format!("How to make {name}"),
        "cooking_time": 15,
        "image": TEST_IMAGE,
        "tags": tags,
        "ingredients": ingredients
            .iter()
            .map(|&(id, amount)| json!({"id": id, "amount": amount}))
            .collect::<Vec<_>>(),
    })
}
