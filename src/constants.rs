// ABOUTME: Server-side constants layered on top of the shared core constants
// ABOUTME: Adds environment configuration defaults used by the config loader
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Constants Module
//!
//! Re-exports the domain constants from `foodgram_core` and adds the defaults the
//! environment configuration falls back to.

pub use foodgram_core::constants::*;

/// Defaults for environment-based configuration
pub mod env_config {
    /// Default database location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/foodgram.db";
    /// Default base URL for short links
    pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8000";
    /// Default image directory
    pub const DEFAULT_MEDIA_ROOT: &str = "./media";
    /// Default image URL prefix
    pub const DEFAULT_MEDIA_URL: &str = "/media/";
    /// Default request body limit (10 MiB)
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
    /// Default per-request timeout
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Default token lifetime
    pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
}

/// Paths of uploaded media below the media root
pub mod media {
    /// Directory recipe images are written to, relative to the media root
    pub const RECIPE_IMAGES_DIR: &str = "recipes/images";
    /// Directory user avatars are written to, relative to the media root
    pub const AVATARS_DIR: &str = "users/avatars";
}
