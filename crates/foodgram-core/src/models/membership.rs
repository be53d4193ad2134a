// ABOUTME: Discriminant for user-recipe memberships (favorites and shopping cart)
// ABOUTME: Both kinds share one table, one uniqueness constraint and one toggle code path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of user-recipe membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipKind {
    /// Recipe is in the user's favorites
    Favorite,
    /// Recipe is in the user's shopping cart
    ShoppingCart,
}

impl MembershipKind {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "favorite" => Some(Self::Favorite),
            "shopping_cart" => Some(Self::ShoppingCart),
            _ => None,
        }
    }
}

impl fmt::Display for MembershipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
