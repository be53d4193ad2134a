// ABOUTME: Read representation of a followed author
// ABOUTME: Embeds a (possibly truncated) list of the author's recipes and their total count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

use super::{RecipeSummary, UserView};

/// Followed author with their recipes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowView {
    /// Author fields, flattened
    #[serde(flatten)]
    pub user: UserView,
    /// Author's recipes, newest first
    pub recipes: Vec<RecipeSummary>,
    /// Total number of the author's recipes
    pub recipes_count: i64,
}
