// ABOUTME: Follow relationships between users
// ABOUTME: UNIQUE(user, following) and CHECK(user <> following) guard duplicates and self-follows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::users::row_to_user;
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::pagination::PageParams;

impl Database {
    pub(super) async fn migrate_follows(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS follows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                following_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                UNIQUE (user_id, following_id),
                CHECK (user_id <> following_id)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_follows_following ON follows(following_id)")
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

/// Follow queries
pub struct FollowsManager {
    pool: SqlitePool,
}

impl FollowsManager {
    /// Create a new manager over `pool`
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record that `user_id` follows `following_id`
    ///
    /// # Errors
    ///
    /// Returns a conflict for an existing follow and `ValueOutOfRange` for a self-follow
    pub async fn add(&self, user_id: i64, following_id: i64) -> AppResult<()> {
        sqlx::query("INSERT INTO follows (user_id, following_id, created_at) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(following_id)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove a follow, returning whether one existed
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn remove(&self, user_id: i64, following_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND following_id = $2")
            .bind(user_id)
            .bind(following_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to remove follow: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether `user_id` follows `following_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn exists(&self, user_id: i64, following_id: i64) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM follows WHERE user_id = $1 AND following_id = $2")
            .bind(user_id)
            .bind(following_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check follow: {e}")))?;

        Ok(row.is_some())
    }

    /// One page of the users `user_id` follows, most recently followed first
    ///
    /// # Errors
    ///
    /// Returns an error if either query fails
    pub async fn following(&self, user_id: i64, params: &PageParams) -> AppResult<(Vec<User>, u64)> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS total FROM follows WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count follows: {e}")))?
            .get("total");

        let rows = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.avatar, u.created_at
            FROM follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.user_id = $1
            ORDER BY f.id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(params.sql_limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list follows: {e}")))?;

        let users = rows.iter().map(row_to_user).collect::<AppResult<Vec<_>>>()?;
        Ok((users, u64::try_from(total).unwrap_or_default()))
    }
}
