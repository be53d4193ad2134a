// ABOUTME: Recipe row storage, tag links and filtered listing
// ABOUTME: Write methods take the transaction's connection so a composite write stays atomic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Error as SqlxError, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use super::{parse_timestamp, Database};
use crate::constants::short_code::MAX_ATTEMPTS;
use crate::errors::{AppError, AppResult};
use crate::models::{MembershipKind, Recipe, RecipeFilter};
use crate::pagination::PageParams;
use crate::short_links::generate_short_code;

const RECIPE_COLUMNS: &str =
    "r.id, r.author_id, r.name, r.text, r.cooking_time, r.image, r.short_code, r.created_at";

impl Database {
    pub(super) async fn migrate_recipes(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                text TEXT NOT NULL,
                cooking_time INTEGER NOT NULL CHECK (cooking_time >= 1),
                image TEXT NOT NULL,
                short_code TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)")
            .execute(self.pool())
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_tags (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (recipe_id, tag_id)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipe_tags_tag ON recipe_tags(tag_id)")
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

/// Scalar fields of a new recipe
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Owning user
    pub author_id: i64,
    /// Title
    pub name: String,
    /// Description
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Stored image reference
    pub image: String,
}

/// Scalar fields of an update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    /// New title
    pub name: Option<String>,
    /// New description
    pub text: Option<String>,
    /// New cooking time
    pub cooking_time: Option<i64>,
    /// New image reference
    pub image: Option<String>,
}

/// Recipe queries
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new manager over `pool`
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a recipe row with a freshly drawn short code
    ///
    /// A code that collides with an existing one is redrawn up to `MAX_ATTEMPTS` times.
    /// `SQLite` keeps the surrounding transaction open after a failed statement, so the
    /// retry happens inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns an internal error when every attempt collided, or the underlying storage error
    pub async fn insert(conn: &mut SqliteConnection, recipe: &NewRecipe) -> AppResult<Recipe> {
        let created_at = Utc::now();

        for attempt in 1..=MAX_ATTEMPTS {
            let short_code = generate_short_code();
            let result = sqlx::query(
                r"
                INSERT INTO recipes (author_id, name, text, cooking_time, image, short_code, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(recipe.author_id)
            .bind(&recipe.name)
            .bind(&recipe.text)
            .bind(recipe.cooking_time)
            .bind(&recipe.image)
            .bind(&short_code)
            // Fixed-width timestamps sort correctly as text
            .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
            .execute(&mut *conn)
            .await;

            match result {
                Ok(done) => {
                    return Ok(Recipe {
                        id: done.last_insert_rowid(),
                        author_id: recipe.author_id,
                        name: recipe.name.clone(),
                        text: recipe.text.clone(),
                        cooking_time: recipe.cooking_time,
                        image: recipe.image.clone(),
                        short_code,
                        created_at,
                    });
                }
                Err(SqlxError::Database(db)) if db.is_unique_violation() => {
                    debug!(attempt, "Short code collision, drawing a new one");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::internal(format!(
            "Could not allocate a unique short code after {MAX_ATTEMPTS} attempts"
        )))
    }

    /// Apply scalar changes; the short code is never touched
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        changes: &RecipeChanges,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE recipes SET
                name = COALESCE($1, name),
                text = COALESCE($2, text),
                cooking_time = COALESCE($3, cooking_time),
                image = COALESCE($4, image)
            WHERE id = $5
            ",
        )
        .bind(changes.name.as_deref())
        .bind(changes.text.as_deref())
        .bind(changes.cooking_time)
        .bind(changes.image.as_deref())
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Replace the recipe's tag links with `tag_ids`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if a tag vanished, or the underlying storage error
    pub async fn replace_tags(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        tag_ids: &[i64],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
                .bind(recipe_id)
                .bind(tag_id)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }

    /// Get a recipe by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"))
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    /// Get a recipe by id or fail with 404
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such recipe exists
    pub async fn require(&self, recipe_id: i64) -> AppResult<Recipe> {
        self.get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))
    }

    /// Resolve a short code
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_by_short_code(&self, code: &str) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.short_code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to resolve short code: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    /// Delete a recipe; ledger rows, tag links and memberships cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete(&self, recipe_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// One page of recipes matching `filter`, newest first, with the total match count
    ///
    /// # Errors
    ///
    /// Returns an error if either query fails
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        params: &PageParams,
    ) -> AppResult<(Vec<Recipe>, u64)> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS total FROM recipes r");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?
            .get("total");

        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r"));
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ")
            .push_bind(params.sql_limit())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let recipes = rows.iter().map(row_to_recipe).collect::<AppResult<Vec<_>>>()?;
        Ok((recipes, u64::try_from(total).unwrap_or_default()))
    }

    /// An author's recipes, newest first, optionally truncated
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn by_author(&self, author_id: i64, limit: Option<i64>) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.author_id = $1 ORDER BY r.created_at DESC, r.id DESC LIMIT $2"
        ))
        .bind(author_id)
        // SQLite treats a negative LIMIT as no limit
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list author recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Number of recipes by an author
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_by_author(&self, author_id: i64) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM recipes WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count author recipes: {e}")))?;

        Ok(row.get("total"))
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &RecipeFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(author_id) = filter.author_id {
        query.push(" AND r.author_id = ").push_bind(author_id);
    }

    if !filter.tag_slugs.is_empty() {
        query.push(
            " AND r.id IN (SELECT rt.recipe_id FROM recipe_tags rt \
             JOIN tags t ON t.id = rt.tag_id WHERE t.slug IN (",
        );
        let mut slugs = query.separated(", ");
        for slug in &filter.tag_slugs {
            slugs.push_bind(slug.clone());
        }
        slugs.push_unseparated("))");
    }

    for (kind, user_id) in [
        (MembershipKind::Favorite, filter.favorited_by),
        (MembershipKind::ShoppingCart, filter.in_cart_of),
    ] {
        if let Some(user_id) = user_id {
            query
                .push(" AND r.id IN (SELECT m.recipe_id FROM recipe_memberships m WHERE m.kind = ")
                .push_bind(kind.as_str())
                .push(" AND m.user_id = ")
                .push_bind(user_id)
                .push(")");
        }
    }
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let created_at: String = row.get("created_at");

    Ok(Recipe {
        id: row.get("id"),
        author_id: row.get("author_id"),
        name: row.get("name"),
        text: row.get("text"),
        cooking_time: row.get("cooking_time"),
        image: row.get("image"),
        short_code: row.get("short_code"),
        created_at: parse_timestamp(&created_at)?,
    })
}
