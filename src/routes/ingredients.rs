// ABOUTME: Read-only ingredient reference data endpoints
// ABOUTME: Supports a case-insensitive name-prefix filter for autocomplete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Query parameters for the ingredient list
#[derive(Debug, Default, Deserialize)]
pub struct IngredientListQuery {
    /// Name prefix
    pub name: Option<String>,
}

/// Ingredient routes handler
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients/", get(Self::handle_list))
            .route("/api/ingredients/:id", get(Self::handle_get))
            .route("/api/ingredients/:id/", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle GET /api/ingredients/?name=<prefix>
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<IngredientListQuery>,
    ) -> Result<Response, AppError> {
        let ingredients = resources
            .database
            .ingredients()
            .list(query.name.as_deref().map(str::trim))
            .await?;
        Ok(Json(ingredients).into_response())
    }

    /// Handle GET /api/ingredients/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let ingredient = resources
            .database
            .ingredients()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {id}")))?;
        Ok(Json(ingredient).into_response())
    }
}
