// ABOUTME: Tag reference data storage
// ABOUTME: Name and slug are unique ignoring case; tags are shared by many recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::collections::HashSet;

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{NewTag, Tag};

impl Database {
    pub(super) async fn migrate_tags(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                slug TEXT NOT NULL UNIQUE COLLATE NOCASE
            )
            ",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

/// Tag queries
pub struct TagsManager {
    pool: SqlitePool,
}

impl TagsManager {
    /// Create a new manager over `pool`
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a tag
    ///
    /// # Errors
    ///
    /// Returns a conflict if the name or slug already exists in any letter case
    pub async fn create(&self, tag: &NewTag) -> AppResult<Tag> {
        let id = sqlx::query("INSERT INTO tags (name, slug) VALUES ($1, $2)")
            .bind(&tag.name)
            .bind(&tag.slug)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Tag {
            id,
            name: tag.name.clone(),
            slug: tag.slug.clone(),
        })
    }

    /// All tags ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, slug FROM tags ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list tags: {e}")))?;

        Ok(rows.iter().map(row_to_tag).collect())
    }

    /// Get a tag by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, tag_id: i64) -> AppResult<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, slug FROM tags WHERE id = $1")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tag: {e}")))?;

        Ok(row.as_ref().map(row_to_tag))
    }

    /// Which of `tag_ids` exist
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn existing_ids(&self, tag_ids: &[i64]) -> AppResult<HashSet<i64>> {
        if tag_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let placeholders = tag_ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let query = format!("SELECT id FROM tags WHERE id IN ({placeholders})");

        let mut query_builder = sqlx::query(&query);
        for id in tag_ids {
            query_builder = query_builder.bind(id);
        }

        let rows = query_builder
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up tags: {e}")))?;

        Ok(rows.iter().map(|row| row.get::<i64, _>("id")).collect())
    }

    /// Tags linked to a recipe, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn for_recipe(&self, recipe_id: i64) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query(
            r"
            SELECT t.id, t.name, t.slug
            FROM tags t
            JOIN recipe_tags rt ON rt.tag_id = t.id
            WHERE rt.recipe_id = $1
            ORDER BY t.name, t.id
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load recipe tags: {e}")))?;

        Ok(rows.iter().map(row_to_tag).collect())
    }
}

fn row_to_tag(row: &SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
    }
}
