// ABOUTME: Authorization checks for recipe mutations
// ABOUTME: Only a recipe's author may update or delete it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::auth::AuthResult;
use crate::errors::{AppError, AppResult};
use crate::models::Recipe;

/// Fail with 403 unless `caller` wrote `recipe`
///
/// # Errors
///
/// Returns `PermissionDenied` for anyone but the author
pub fn ensure_author(caller: &AuthResult, recipe: &Recipe) -> AppResult<()> {
    if caller.user_id == recipe.author_id {
        Ok(())
    } else {
        Err(AppError::permission_denied(format!(
            "Only the author may modify recipe {}",
            recipe.id
        )))
    }
}
