// ABOUTME: Favorite and shopping-cart memberships stored in one table keyed by kind
// ABOUTME: UNIQUE(user, recipe, kind) is the backstop against racing duplicate adds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::MembershipKind;

impl Database {
    pub(super) async fn migrate_memberships(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_memberships (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                kind TEXT NOT NULL CHECK (kind IN ('favorite', 'shopping_cart')),
                created_at TEXT NOT NULL,
                UNIQUE (user_id, recipe_id, kind)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_recipe_memberships_recipe ON recipe_memberships(recipe_id)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

/// Per-viewer membership flags of one recipe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MembershipFlags {
    /// In the viewer's favorites
    pub is_favorited: bool,
    /// In the viewer's shopping cart
    pub is_in_shopping_cart: bool,
}

/// Membership queries
pub struct MembershipsManager {
    pool: SqlitePool,
}

impl MembershipsManager {
    /// Create a new manager over `pool`
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a membership
    ///
    /// # Errors
    ///
    /// Returns a conflict if the membership already exists
    pub async fn add(&self, user_id: i64, recipe_id: i64, kind: MembershipKind) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO recipe_memberships (user_id, recipe_id, kind, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(kind.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a membership, returning whether one existed
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn remove(
        &self,
        user_id: i64,
        recipe_id: i64,
        kind: MembershipKind,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM recipe_memberships WHERE user_id = $1 AND recipe_id = $2 AND kind = $3",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to remove {kind}: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the membership exists
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn exists(&self, user_id: i64, recipe_id: i64, kind: MembershipKind) -> AppResult<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM recipe_memberships WHERE user_id = $1 AND recipe_id = $2 AND kind = $3",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check {kind}: {e}")))?;

        Ok(row.is_some())
    }

    /// Both flags of a recipe for one viewer in a single query
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn flags(&self, user_id: i64, recipe_id: i64) -> AppResult<MembershipFlags> {
        let rows = sqlx::query(
            "SELECT kind FROM recipe_memberships WHERE user_id = $1 AND recipe_id = $2",
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load membership flags: {e}")))?;

        let mut flags = MembershipFlags::default();
        for row in &rows {
            let kind: String = row.get("kind");
            match MembershipKind::parse(&kind) {
                Some(MembershipKind::Favorite) => flags.is_favorited = true,
                Some(MembershipKind::ShoppingCart) => flags.is_in_shopping_cart = true,
                None => {}
            }
        }
        Ok(flags)
    }

    /// Number of memberships of one kind for a (user, recipe) pair
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count(&self, user_id: i64, recipe_id: i64, kind: MembershipKind) -> AppResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total FROM recipe_memberships WHERE user_id = $1 AND recipe_id = $2 AND kind = $3",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count {kind}: {e}")))?;

        Ok(row.get("total"))
    }
}
