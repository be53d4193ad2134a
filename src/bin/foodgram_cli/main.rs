// ABOUTME: Foodgram CLI - command-line tool for seeding reference data and accounts
// ABOUTME: Imports ingredients, creates tags and creates users directly in the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
//!
//! Usage:
//! ```bash
//! # Import ingredients from a JSON array of {name, measurement_unit}
//! foodgram-cli import-ingredients data/ingredients.json
//!
//! # Create a tag
//! foodgram-cli create-tag --name Breakfast --slug breakfast
//!
//! # Create a user and print an access token
//! foodgram-cli create-user --email cook@example.com --username cook \
//!     --first-name Ada --last-name Lovelace --issue-token
//! ```

mod commands;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use foodgram_server::constants::env_config::DEFAULT_DATABASE_URL;
use foodgram_server::database::Database;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "foodgram-cli",
    about = "Foodgram management CLI",
    long_about = "Command-line tool for seeding Foodgram reference data and user accounts."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Import ingredients from a JSON file; existing (name, unit) pairs are skipped
    ImportIngredients {
        /// Path to a JSON array of `{name, measurement_unit}`
        file: PathBuf,
    },

    /// Create a tag
    CreateTag {
        /// Display name
        #[arg(long)]
        name: String,

        /// URL-safe slug
        #[arg(long)]
        slug: String,
    },

    /// Create a user account
    CreateUser {
        /// Email address
        #[arg(long)]
        email: String,

        /// Public handle
        #[arg(long)]
        username: String,

        /// Given name
        #[arg(long, default_value = "")]
        first_name: String,

        /// Family name
        #[arg(long, default_value = "")]
        last_name: String,

        /// Print a signed access token for the new user
        #[arg(long)]
        issue_token: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let database_url = cli
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

    info!("Connecting to database: {database_url}");
    let database = Database::new(&database_url).await?;

    match cli.command {
        Command::ImportIngredients { file } => {
            commands::import_ingredients(&database, &file).await?;
        }
        Command::CreateTag { name, slug } => {
            commands::create_tag(&database, name, slug).await?;
        }
        Command::CreateUser {
            email,
            username,
            first_name,
            last_name,
            issue_token,
        } => {
            commands::create_user(
                &database,
                commands::NewUserArgs {
                    email,
                    username,
                    first_name,
                    last_name,
                },
                issue_token,
            )
            .await?;
        }
    }

    Ok(())
}
