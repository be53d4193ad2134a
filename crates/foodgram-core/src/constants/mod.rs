// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Field limits, pagination defaults, user-facing messages and shopping-list layout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Constants module
//!
//! Constants are grouped by domain rather than kept in one flat list.

/// User-facing error messages
pub mod messages;

pub use messages::*;

/// API endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// API base path
    pub const API_BASE: &str = "/api";
    /// Short link prefix
    pub const SHORT_LINK_PREFIX: &str = "/s";
    /// Frontend path a short link redirects to (recipe id appended)
    pub const RECIPE_PAGE_PREFIX: &str = "/recipes";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;
}

/// Field length and value limits
pub mod limits {
    /// Maximum tag name length
    pub const MAX_TAG_NAME_LENGTH: usize = 32;
    /// Maximum tag slug length
    pub const MAX_TAG_SLUG_LENGTH: usize = 32;
    /// Allowed characters of a tag slug
    pub const TAG_SLUG_PATTERN: &str = r"^[-a-zA-Z0-9_]+$";
    /// Maximum ingredient name length
    pub const MAX_INGREDIENT_NAME_LENGTH: usize = 128;
    /// Maximum measurement unit length
    pub const MAX_MEASUREMENT_UNIT_LENGTH: usize = 64;
    /// Maximum recipe name length
    pub const MAX_RECIPE_NAME_LENGTH: usize = 256;
    /// Minimum cooking time in minutes
    pub const MIN_COOKING_TIME_MINUTES: i64 = 1;
    /// Minimum amount of an ingredient in a recipe
    pub const MIN_INGREDIENT_AMOUNT: i64 = 1;
    /// Maximum username length
    pub const MAX_USERNAME_LENGTH: usize = 150;
    /// Maximum email length
    pub const MAX_EMAIL_LENGTH: usize = 254;
    /// Allowed characters of a username
    pub const USERNAME_PATTERN: &str = r"^[\w.@+-]+$";
    /// Username reserved for the `/api/users/me/` routes
    pub const FORBIDDEN_USERNAME: &str = "me";
    /// Maximum decoded avatar size (5 MiB)
    pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;
}

/// Pagination defaults
pub mod pagination {
    /// Items per page when `limit` is not given
    pub const DEFAULT_PAGE_SIZE: u32 = 6;
    /// Upper bound for `limit`
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// Short-code generation
pub mod short_code {
    /// Characters a short code is drawn from
    pub const ALPHABET: &[u8] = b"abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    /// Length of a generated short code
    ///
    /// 57^8 is about 1.1e14 codes; at a million recipes the chance that a single fresh code
    /// collides is below 1e-8, so a handful of attempts is plenty.
    pub const LENGTH: usize = 8;
    /// Attempts before code generation is reported as a failure
    pub const MAX_ATTEMPTS: u32 = 5;
}

/// Shopping list document layout
pub mod shopping_list {
    /// Attachment file name
    pub const FILENAME: &str = "shopping_list.txt";
    /// Attachment content type
    pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";
    /// First line of the document
    pub const HEADER: &str = "Ingredients for all recipes in your shopping cart:";
    /// Last line of the document
    pub const SEPARATOR: &str = "==============================";
}

/// Service identifiers for structured logging
pub mod service_names {
    /// Server service name
    pub const FOODGRAM_SERVER: &str = "foodgram-server";
}
