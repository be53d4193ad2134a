// ABOUTME: User account creation, avatars and viewer-relative user views
// ABOUTME: is_subscribed is computed per viewer and false for anonymous callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::auth::AuthResult;
use crate::constants::limits::{
    FORBIDDEN_USERNAME, MAX_EMAIL_LENGTH, MAX_USERNAME_LENGTH, USERNAME_PATTERN,
};
use crate::constants::messages::{
    AVATAR_REQUIRED, NO_AVATAR, USERNAME_FORBIDDEN, USERNAME_INVALID, USER_EXISTS,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::images::{discard_image, ImageKind, ImageStore};
use crate::models::{NewUser, User, UserView};
use crate::pagination::{Page, PageParams};

fn username_regex() -> AppResult<&'static Regex> {
    static USERNAME: OnceLock<Regex> = OnceLock::new();
    if let Some(regex) = USERNAME.get() {
        return Ok(regex);
    }
    let regex = Regex::new(USERNAME_PATTERN)
        .map_err(|e| AppError::internal(format!("Invalid username pattern: {e}")))?;
    Ok(USERNAME.get_or_init(|| regex))
}

/// Load the authenticated caller's account
///
/// # Errors
///
/// Returns `AuthInvalid` when the token refers to a user that no longer exists
pub async fn require_caller(db: &Database, caller: &AuthResult) -> AppResult<User> {
    db.users()
        .get(caller.user_id)
        .await?
        .ok_or_else(|| AppError::auth_invalid("Token refers to an unknown user"))
}

/// Render a user for a viewer
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown user
pub async fn user_view(db: &Database, user_id: i64, viewer: Option<i64>) -> AppResult<UserView> {
    let user = db.users().require(user_id).await?;
    let is_subscribed = match viewer {
        Some(viewer_id) => db.follows().exists(viewer_id, user_id).await?,
        None => false,
    };

    Ok(UserView::new(user, is_subscribed))
}

/// One page of users, newest first, rendered for a viewer
///
/// # Errors
///
/// Returns an error if the listing or a follow lookup fails
pub async fn list_users(
    db: &Database,
    params: &PageParams,
    viewer: Option<i64>,
    base: &str,
) -> AppResult<Page<UserView>> {
    let (users, count) = db.users().list(params).await?;

    let mut views = Vec::with_capacity(users.len());
    for user in users {
        let is_subscribed = match viewer {
            Some(viewer_id) => db.follows().exists(viewer_id, user.id).await?,
            None => false,
        };
        views.push(UserView::new(user, is_subscribed));
    }

    Ok(Page::new(views, count, params, base))
}

/// Replace the caller's avatar and return its public reference
///
/// The previous avatar file is removed once the new reference is saved.
///
/// # Errors
///
/// Returns a validation error on field `avatar` for a missing, malformed, oversized or
/// non-PNG/JPEG image
pub async fn set_avatar(
    db: &Database,
    images: &dyn ImageStore,
    caller: &AuthResult,
    payload: Option<&str>,
) -> AppResult<String> {
    let user = require_caller(db, caller).await?;
    let payload = payload
        .map(str::trim)
        .filter(|payload| !payload.is_empty())
        .ok_or_else(|| AppError::missing_field(ImageKind::Avatar.field(), AVATAR_REQUIRED))?;

    let reference = images.store(ImageKind::Avatar, payload).await?;
    if let Err(e) = db.users().set_avatar(user.id, Some(&reference)).await {
        discard_image(images, &reference).await;
        return Err(e);
    }
    if let Some(previous) = &user.avatar {
        discard_image(images, previous).await;
    }

    info!(user.id = user.id, "Avatar updated");
    Ok(reference)
}

/// Remove the caller's avatar
///
/// # Errors
///
/// Returns `InvalidInput` when the caller has no avatar
pub async fn remove_avatar(
    db: &Database,
    images: &dyn ImageStore,
    caller: &AuthResult,
) -> AppResult<()> {
    let user = require_caller(db, caller).await?;
    let Some(avatar) = user.avatar else {
        return Err(AppError::invalid_input(NO_AVATAR));
    };

    db.users().set_avatar(user.id, None).await?;
    discard_image(images, &avatar).await;

    info!(user.id = user.id, "Avatar removed");
    Ok(())
}

fn validate_new_user(user: &NewUser) -> AppResult<()> {
    let mut errors = ValidationErrors::new();

    let email = user.email.trim();
    if email.is_empty() || !email.contains('@') {
        errors.add("email", "enter a valid email address");
    } else if email.chars().count() > MAX_EMAIL_LENGTH {
        errors.add("email", "email is too long");
    }

    let username = user.username.trim();
    if username.is_empty() {
        errors.add("username", "username required");
    } else if username.chars().count() > MAX_USERNAME_LENGTH {
        errors.add("username", "username is too long");
    } else if username.eq_ignore_ascii_case(FORBIDDEN_USERNAME) {
        errors.add("username", USERNAME_FORBIDDEN);
    } else if !username_regex()?.is_match(username) {
        errors.add("username", USERNAME_INVALID);
    }

    errors.into_result()
}

/// Create a user account
///
/// # Errors
///
/// Returns a validation error for a malformed email or username, or a conflict if either is
/// already taken
pub async fn create_user(db: &Database, user: &NewUser) -> AppResult<User> {
    validate_new_user(user)?;

    let normalized = NewUser {
        email: user.email.trim().to_owned(),
        username: user.username.trim().to_owned(),
        first_name: user.first_name.trim().to_owned(),
        last_name: user.last_name.trim().to_owned(),
    };

    let created = db.users().create(&normalized).await.map_err(|e| {
        if e.is_conflict() {
            AppError::conflict(USER_EXISTS)
        } else {
            e
        }
    })?;

    info!(user.id = created.id, username = %created.username, "User created");
    Ok(created)
}
