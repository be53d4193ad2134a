// ABOUTME: Favorite and shopping-cart toggles over the single membership table
// ABOUTME: The existence pre-check gives a friendly message; the UNIQUE constraint decides races
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use tracing::{debug, info};

use crate::constants::messages::{RECIPE_ALREADY_ADDED, RECIPE_NOT_ADDED};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{MembershipKind, RecipeSummary};

/// Add a recipe to the user's favorites or cart
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown recipe and a conflict when the recipe is
/// already present, including when a concurrent request added it first
pub async fn add(
    db: &Database,
    user_id: i64,
    recipe_id: i64,
    kind: MembershipKind,
) -> AppResult<RecipeSummary> {
    let recipe = db.recipes().require(recipe_id).await?;
    let memberships = db.memberships();

    if memberships.exists(user_id, recipe_id, kind).await? {
        return Err(AppError::conflict(RECIPE_ALREADY_ADDED));
    }

    memberships
        .add(user_id, recipe_id, kind)
        .await
        .map_err(|e| {
            if e.is_conflict() {
                debug!(user.id = user_id, recipe.id = recipe_id, %kind, "Lost membership race");
                AppError::conflict(RECIPE_ALREADY_ADDED)
            } else {
                e
            }
        })?;

    info!(user.id = user_id, recipe.id = recipe_id, %kind, "Recipe added");
    Ok(RecipeSummary::from(&recipe))
}

/// Remove a recipe from the user's favorites or cart
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown recipe and a validation error when the recipe
/// was not present
pub async fn remove(
    db: &Database,
    user_id: i64,
    recipe_id: i64,
    kind: MembershipKind,
) -> AppResult<()> {
    db.recipes().require(recipe_id).await?;

    if !db.memberships().remove(user_id, recipe_id, kind).await? {
        return Err(AppError::invalid_input(RECIPE_NOT_ADDED));
    }

    info!(user.id = user_id, recipe.id = recipe_id, %kind, "Recipe removed");
    Ok(())
}
