// ABOUTME: User account storage
// ABOUTME: Accounts are provisioned by the CLI or an identity service; the API reads them and sets avatars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::pagination::PageParams;

impl Database {
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                username TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                avatar TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

/// User account queries
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new manager over `pool`
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user
    ///
    /// # Errors
    ///
    /// Returns a conflict if the email or username is taken
    pub async fn create(&self, user: &NewUser) -> AppResult<User> {
        let now = Utc::now();

        let id = sqlx::query(
            r"
            INSERT INTO users (email, username, first_name, last_name, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(User {
            id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar: None,
            created_at: now,
        })
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, user_id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, username, first_name, last_name, avatar, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by id or fail with 404
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such user exists
    pub async fn require(&self, user_id: i64) -> AppResult<User> {
        self.get(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))
    }

    /// One page of users, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if either query fails
    pub async fn list(&self, params: &PageParams) -> AppResult<(Vec<User>, u64)> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS total FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?
            .get("total");

        let rows = sqlx::query(
            r"
            SELECT id, email, username, first_name, last_name, avatar, created_at
            FROM users
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(params.sql_limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        let users = rows.iter().map(row_to_user).collect::<AppResult<Vec<_>>>()?;
        Ok((users, u64::try_from(total).unwrap_or_default()))
    }

    /// Replace the user's avatar reference; `None` clears it
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such user exists
    pub async fn set_avatar(&self, user_id: i64, avatar: Option<&str>) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET avatar = $1 WHERE id = $2")
            .bind(avatar)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update avatar: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id}")));
        }
        Ok(())
    }
}

/// Map a `users` row (or a join selecting the same column names)
pub(crate) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let created_at: String = row.get("created_at");

    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        avatar: row.get("avatar"),
        created_at: parse_timestamp(&created_at)?,
    })
}
