// ABOUTME: Ingredient reference data storage
// ABOUTME: The (name, measurement unit) pair is unique; lookups support name-prefix search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::collections::HashSet;

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, NewIngredient};

impl Database {
    pub(super) async fn migrate_ingredients(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                measurement_unit TEXT NOT NULL,
                UNIQUE (name, measurement_unit)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_ingredients_name ON ingredients(name)")
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

/// Ingredient queries
pub struct IngredientsManager {
    pool: SqlitePool,
}

impl IngredientsManager {
    /// Create a new manager over `pool`
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an ingredient
    ///
    /// # Errors
    ///
    /// Returns a conflict if the (name, unit) pair exists
    pub async fn create(&self, ingredient: &NewIngredient) -> AppResult<Ingredient> {
        let id = sqlx::query("INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2)")
            .bind(&ingredient.name)
            .bind(&ingredient.measurement_unit)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Ingredient {
            id,
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
        })
    }

    /// Insert an ingredient unless the pair already exists
    ///
    /// Returns whether a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn insert_if_absent(&self, ingredient: &NewIngredient) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO ingredients (name, measurement_unit) VALUES ($1, $2)",
        )
        .bind(&ingredient.name)
        .bind(&ingredient.measurement_unit)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to import ingredient: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Ingredients ordered by name, optionally filtered by a case-insensitive name prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self, name_prefix: Option<&str>) -> AppResult<Vec<Ingredient>> {
        let rows = match name_prefix.filter(|prefix| !prefix.is_empty()) {
            Some(prefix) => {
                sqlx::query(
                    r"
                    SELECT id, name, measurement_unit FROM ingredients
                    WHERE name LIKE $1 ESCAPE '\'
                    ORDER BY name, measurement_unit
                    ",
                )
                .bind(format!("{}%", escape_like(prefix)))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT id, name, measurement_unit FROM ingredients ORDER BY name, measurement_unit",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        Ok(rows.iter().map(row_to_ingredient).collect())
    }

    /// Get an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, ingredient_id: i64) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
            .bind(ingredient_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        Ok(row.as_ref().map(row_to_ingredient))
    }

    /// Which of `ingredient_ids` exist
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn existing_ids(&self, ingredient_ids: &[i64]) -> AppResult<HashSet<i64>> {
        if ingredient_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let placeholders = ingredient_ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let query = format!("SELECT id FROM ingredients WHERE id IN ({placeholders})");

        let mut query_builder = sqlx::query(&query);
        for id in ingredient_ids {
            query_builder = query_builder.bind(id);
        }

        let rows = query_builder
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up ingredients: {e}")))?;

        Ok(rows.iter().map(|row| row.get::<i64, _>("id")).collect())
    }
}

/// Escape `LIKE` wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_ingredient(row: &SqliteRow) -> Ingredient {
    Ingredient {
        id: row.get("id"),
        name: row.get("name"),
        measurement_unit: row.get("measurement_unit"),
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
        assert_eq!(escape_like("flour"), "flour");
    }
}
