// ABOUTME: Follow and unfollow between users, plus the paginated subscriptions listing
// ABOUTME: Follow-views embed the followed author's recipes, optionally truncated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use tracing::{debug, info};

use crate::constants::messages::{ALREADY_FOLLOWING, NOT_FOLLOWING, SELF_FOLLOW};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{FollowView, RecipeSummary, User, UserView};
use crate::pagination::{Page, PageParams};

/// Interpret the `recipes_limit` query parameter
///
/// Missing, zero, negative or non-numeric values mean "no truncation".
#[must_use]
pub fn parse_recipes_limit(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|limit| *limit > 0)
}

/// Build the follow-view of `user` for a viewer with known follow status
///
/// # Errors
///
/// Returns an error if the recipe lookups fail
pub async fn follow_view(
    db: &Database,
    user: User,
    is_subscribed: bool,
    recipes_limit: Option<i64>,
) -> AppResult<FollowView> {
    let recipes = db.recipes().by_author(user.id, recipes_limit).await?;
    let recipes_count = db.recipes().count_by_author(user.id).await?;

    Ok(FollowView {
        user: UserView::new(user, is_subscribed),
        recipes: recipes.iter().map(RecipeSummary::from).collect(),
        recipes_count,
    })
}

/// Follow another user
///
/// # Errors
///
/// Returns a validation error for a self-follow, `ResourceNotFound` for an unknown target
/// and a conflict for an existing follow
pub async fn follow(
    db: &Database,
    follower_id: i64,
    target_id: i64,
    recipes_limit: Option<i64>,
) -> AppResult<FollowView> {
    if follower_id == target_id {
        return Err(AppError::invalid_input(SELF_FOLLOW));
    }

    let target = db.users().require(target_id).await?;
    let follows = db.follows();

    if follows.exists(follower_id, target_id).await? {
        return Err(AppError::conflict(ALREADY_FOLLOWING));
    }

    follows.add(follower_id, target_id).await.map_err(|e| {
        if e.is_conflict() {
            debug!(user.id = follower_id, followed.id = target_id, "Lost follow race");
            AppError::conflict(ALREADY_FOLLOWING)
        } else {
            e
        }
    })?;

    info!(user.id = follower_id, followed.id = target_id, "User followed");
    follow_view(db, target, true, recipes_limit).await
}

/// Stop following a user
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown target and a validation error when no follow
/// exists
pub async fn unfollow(db: &Database, follower_id: i64, target_id: i64) -> AppResult<()> {
    db.users().require(target_id).await?;

    if !db.follows().remove(follower_id, target_id).await? {
        return Err(AppError::invalid_input(NOT_FOLLOWING));
    }

    info!(user.id = follower_id, followed.id = target_id, "User unfollowed");
    Ok(())
}

/// One page of follow-views of everyone `user_id` follows
///
/// # Errors
///
/// Returns an error if the listing or a recipe lookup fails
pub async fn subscriptions(
    db: &Database,
    user_id: i64,
    params: &PageParams,
    recipes_limit: Option<i64>,
    base: &str,
) -> AppResult<Page<FollowView>> {
    let (users, count) = db.follows().following(user_id, params).await?;

    let mut views = Vec::with_capacity(users.len());
    for user in users {
        views.push(follow_view(db, user, true, recipes_limit).await?);
    }

    Ok(Page::new(views, count, params, base))
}
