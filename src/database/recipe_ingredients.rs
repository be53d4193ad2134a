// ABOUTME: Ingredient quantity ledger: one (recipe, ingredient, amount) row per pair
// ABOUTME: Storage enforces pair uniqueness and positive amounts; also hosts the cart aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Ingredient Quantity Ledger
//!
//! The ledger is owned by its recipe. It is rebuilt wholesale on every recipe update and
//! removed by cascade when the recipe is deleted. A second row for an existing
//! `(recipe_id, ingredient_id)` pair is rejected by the `UNIQUE` constraint and surfaces as
//! a conflict; it never overwrites the first.

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{IngredientSpec, MembershipKind, RecipeIngredientView, ShoppingListItem};

impl Database {
    pub(super) async fn migrate_recipe_ingredients(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                amount INTEGER NOT NULL CHECK (amount >= 1),
                UNIQUE (recipe_id, ingredient_id)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_ingredient ON recipe_ingredients(ingredient_id)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

/// Ledger queries
pub struct RecipeIngredientsManager {
    pool: SqlitePool,
}

impl RecipeIngredientsManager {
    /// Create a new manager over `pool`
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record one ledger entry
    ///
    /// # Errors
    ///
    /// Returns a conflict if the pair already has an entry, `ValueOutOfRange` for a
    /// non-positive amount, `ResourceNotFound` for an unknown recipe or ingredient
    pub async fn insert(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        spec: IngredientSpec,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES ($1, $2, $3)",
        )
        .bind(recipe_id)
        .bind(spec.id)
        .bind(spec.amount)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Delete every entry of a recipe and write `specs` in their place
    ///
    /// # Errors
    ///
    /// Propagates the first failing insert; the caller's transaction then rolls back
    pub async fn replace(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        specs: &[IngredientSpec],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;

        for spec in specs {
            Self::insert(conn, recipe_id, *spec).await?;
        }

        Ok(())
    }

    /// A recipe's ingredients with amounts, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn for_recipe(&self, recipe_id: i64) -> AppResult<Vec<RecipeIngredientView>> {
        let rows = sqlx::query(
            r"
            SELECT i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY i.name, i.measurement_unit
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load recipe ingredients: {e}")))?;

        Ok(rows.iter().map(row_to_view).collect())
    }

    /// Summed amounts per (name, unit) over every recipe in a user's shopping cart
    ///
    /// Groups are ordered by name, then unit. An empty result means the cart is empty or
    /// none of its recipes has ledger entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn cart_totals(&self, user_id: i64) -> AppResult<Vec<ShoppingListItem>> {
        let rows = sqlx::query(
            r"
            SELECT i.name, i.measurement_unit, SUM(ri.amount) AS amount
            FROM recipe_memberships m
            JOIN recipe_ingredients ri ON ri.recipe_id = m.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE m.user_id = $1 AND m.kind = $2
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name, i.measurement_unit
            ",
        )
        .bind(user_id)
        .bind(MembershipKind::ShoppingCart.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to aggregate shopping cart: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| ShoppingListItem {
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                amount: row.get("amount"),
            })
            .collect())
    }
}

fn row_to_view(row: &SqliteRow) -> RecipeIngredientView {
    RecipeIngredientView {
        id: row.get("id"),
        name: row.get("name"),
        measurement_unit: row.get("measurement_unit"),
        amount: row.get("amount"),
    }
}
