// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-driven server, database, auth and media configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Configuration module for the Foodgram server

/// Environment and server configuration
pub mod environment;

pub use environment::{AuthConfig, DatabaseUrl, Environment, HttpConfig, MediaConfig, ServerConfig};
