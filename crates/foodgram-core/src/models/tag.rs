// ABOUTME: Tag reference data used to classify recipes
// ABOUTME: Name and slug are unique ignoring case
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

/// Recipe tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Primary key
    pub id: i64,
    /// Display name
    pub name: String,
    /// URL-safe identifier used by the recipe filter
    pub slug: String,
}

/// Fields needed to insert a tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTag {
    /// Display name
    pub name: String,
    /// URL-safe identifier
    pub slug: String,
}
