// ABOUTME: User account model and its per-viewer read representation
// ABOUTME: Account creation is owned by the identity service; the avatar is managed here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Primary key
    pub id: i64,
    /// Unique email address
    pub email: String,
    /// Unique public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Public reference of the avatar image
    pub avatar: Option<String>,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Unique email address
    pub email: String,
    /// Unique public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

/// User as rendered to a specific viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    /// Email address
    pub email: String,
    /// Primary key
    pub id: i64,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the viewer follows this user
    pub is_subscribed: bool,
    /// Avatar reference, `null` when none was uploaded
    pub avatar: Option<String>,
}

impl UserView {
    /// Render `user` for a viewer whose follow status is already known
    #[must_use]
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            avatar: user.avatar,
        }
    }
}
