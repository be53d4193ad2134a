// ABOUTME: Main library entry point for the Foodgram recipe-sharing API
// ABOUTME: Recipes with tags and ingredient quantities, favorites, shopping lists and follows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Foodgram Server
//!
//! A recipe-sharing backend. Authors publish recipes with tags and per-ingredient
//! quantities; readers favorite them, put them in a shopping cart, download the aggregated
//! shopping list and follow authors.
//!
//! ## Architecture
//!
//! - **Routes**: thin axum handlers that identify the caller and delegate
//! - **Services**: the business rules, including the atomic recipe composite writer
//! - **Database**: `SQLite` storage whose constraints back every uniqueness invariant
//! - **Capabilities**: JWT caller identification, author checks, image storage, pagination
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use foodgram_server::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Foodgram configured on port {}", config.http.port);
//!     Ok(())
//! }
//! ```

/// Caller identification from JWT bearer tokens
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` storage and per-table managers
pub mod database;

/// Unified error handling
pub mod errors;

/// Uploaded image storage
pub mod images;

/// Structured logging setup
pub mod logging;

/// HTTP middleware layers
pub mod middleware;

/// Domain models
pub mod models;

/// Page-number pagination
pub mod pagination;

/// Author-only authorization
pub mod permissions;

/// Shared resources for handlers
pub mod resources;

/// HTTP routes
pub mod routes;

/// HTTP server lifecycle
pub mod server;

/// Business logic
pub mod services;

/// Short-code generation and short-link URLs
pub mod short_links;

