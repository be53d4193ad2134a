// ABOUTME: Server binary for the Foodgram recipe-sharing API
// ABOUTME: Loads configuration, opens the database and serves HTTP until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Foodgram Server Binary
//!
//! Configuration comes from the environment; `--http-port` and `--database-url` override it.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use foodgram_server::config::{DatabaseUrl, ServerConfig};
use foodgram_server::logging;
use foodgram_server::resources::ServerResources;
use foodgram_server::server;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram - recipe-sharing REST API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http.port = http_port;
    }
    if let Some(database_url) = args.database_url.as_deref() {
        config.database = DatabaseUrl::parse_url(database_url);
    }

    logging::init_from_env()?;

    info!("Starting Foodgram API");
    info!("{}", config.summary());

    let port = config.http.port;
    let resources = Arc::new(ServerResources::from_config(config).await?);
    info!("Database ready");

    if let Err(e) = server::run(resources, port).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
