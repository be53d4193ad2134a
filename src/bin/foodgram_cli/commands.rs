// ABOUTME: Command implementations for foodgram-cli
// ABOUTME: Each command delegates to the service layer and prints a short report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::path::Path;

use anyhow::{Context, Result};
use foodgram_server::auth::AuthManager;
use foodgram_server::config::ServerConfig;
use foodgram_server::database::Database;
use foodgram_server::models::{NewTag, NewUser};
use foodgram_server::services::{catalog, users};
use tokio::fs;
use tracing::info;

/// Arguments of `create-user`
pub struct NewUserArgs {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Import ingredients from a JSON file
pub async fn import_ingredients(database: &Database, file: &Path) -> Result<()> {
    let contents = fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let ingredients = catalog::parse_ingredient_file(&contents)?;
    info!("Importing {} ingredients from {}", ingredients.len(), file.display());

    let summary = catalog::import_ingredients(database, &ingredients).await?;

    println!("Ingredient import finished");
    println!("   Inserted: {}", summary.inserted);
    println!("   Skipped (already present): {}", summary.skipped);
    println!("   Invalid: {}", summary.invalid);
    Ok(())
}

/// Create a tag
pub async fn create_tag(database: &Database, name: String, slug: String) -> Result<()> {
    let tag = catalog::create_tag(database, &NewTag { name, slug }).await?;
    println!("Created tag {} ({}) with id {}", tag.name, tag.slug, tag.id);
    Ok(())
}

/// Create a user, optionally printing an access token
pub async fn create_user(database: &Database, args: NewUserArgs, issue_token: bool) -> Result<()> {
    let user = users::create_user(
        database,
        &NewUser {
            email: args.email,
            username: args.username,
            first_name: args.first_name,
            last_name: args.last_name,
        },
    )
    .await?;

    println!("Created user {} <{}> with id {}", user.username, user.email, user.id);

    if issue_token {
        let config = ServerConfig::from_env()?;
        let auth_manager =
            AuthManager::new(config.auth.jwt_secret.as_bytes(), config.auth.jwt_expiry_hours);
        let token = auth_manager.generate_token(user.id)?;

        println!("\nAccess token (valid for {} hours):", config.auth.jwt_expiry_hours);
        println!("{token}");
        println!("\nUse it as: Authorization: Bearer <token>");
    }

    Ok(())
}
