// ABOUTME: Recipe endpoints: listing, composite create/update, delete, short links,
// ABOUTME: favorite and shopping-cart toggles, and the shopping list download
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::{Query, WithRejection};
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderMap, StatusCode, Uri};
use serde::{Deserialize, Serialize};

use crate::auth::AuthResult;
use crate::constants::shopping_list::{CONTENT_TYPE as SHOPPING_LIST_CONTENT_TYPE, FILENAME};
use crate::errors::AppError;
use crate::models::{MembershipKind, RecipePayload};
use crate::pagination::PageParams;
use crate::resources::ServerResources;
use crate::routes::{page_base, query_flag};
use crate::services::{memberships, recipes, shopping_list};

/// Query parameters for the recipe list
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Author id
    pub author: Option<i64>,
    /// Tag slugs, any of which must match
    #[serde(default)]
    pub tags: Vec<String>,
    /// Only the caller's favorites
    pub is_favorited: Option<String>,
    /// Only recipes in the caller's cart
    pub is_in_shopping_cart: Option<String>,
}

/// Short link response
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortLinkResponse {
    /// Absolute short URL
    #[serde(rename = "short-link")]
    pub short_link: String,
}

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes/",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/download_shopping_cart/",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/recipes/:id/",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/recipes/:id/get-link/", get(Self::handle_get_link))
            .route(
                "/api/recipes/:id/favorite/",
                post(Self::handle_add_favorite).delete(Self::handle_remove_favorite),
            )
            .route(
                "/api/recipes/:id/shopping_cart/",
                post(Self::handle_add_to_cart).delete(Self::handle_remove_from_cart),
            )
            .with_state(resources)
    }

    fn authenticate(headers: &HeaderMap, resources: &ServerResources) -> Result<AuthResult, AppError> {
        resources.auth_manager.authenticate(headers)
    }

    fn viewer(headers: &HeaderMap, resources: &ServerResources) -> Result<Option<i64>, AppError> {
        Ok(resources
            .auth_manager
            .authenticate_optional(headers)?
            .map(|auth| auth.user_id))
    }

    /// Handle GET /api/recipes/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        Query(query): Query<RecipeListQuery>,
    ) -> Result<Response, AppError> {
        let viewer = Self::viewer(&headers, &resources)?;
        let filter = recipes::build_filter(
            query.author,
            query.tags,
            query_flag(query.is_favorited.as_deref()),
            query_flag(query.is_in_shopping_cart.as_deref()),
            viewer,
        );
        let params = PageParams {
            page: query.page,
            limit: query.limit,
        };

        let page = recipes::list_recipes(
            &resources.database,
            &filter,
            &params,
            viewer,
            &page_base(&uri),
        )
        .await?;

        Ok(Json(page).into_response())
    }

    /// Handle POST /api/recipes/
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        WithRejection(Json(payload), _): WithRejection<Json<RecipePayload>, AppError>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let recipe = recipes::create_recipe(
            &resources.database,
            resources.images.as_ref(),
            &auth,
            &payload,
        )
        .await?;

        let view = recipes::recipe_view(&resources.database, recipe, Some(auth.user_id)).await?;
        Ok((StatusCode::CREATED, Json(view)).into_response())
    }

    /// Handle GET /api/recipes/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let viewer = Self::viewer(&headers, &resources)?;
        let view = recipes::get_recipe_view(&resources.database, id, viewer).await?;
        Ok(Json(view).into_response())
    }

    /// Handle PATCH /api/recipes/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        WithRejection(Json(payload), _): WithRejection<Json<RecipePayload>, AppError>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let recipe = recipes::update_recipe(
            &resources.database,
            resources.images.as_ref(),
            &auth,
            id,
            &payload,
        )
        .await?;

        let view = recipes::recipe_view(&resources.database, recipe, Some(auth.user_id)).await?;
        Ok(Json(view).into_response())
    }

    /// Handle DELETE /api/recipes/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        recipes::delete_recipe(&resources.database, resources.images.as_ref(), &auth, id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/recipes/:id/get-link/
    async fn handle_get_link(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let short_link = recipes::short_link(
            &resources.database,
            &resources.config.http.public_base_url,
            id,
        )
        .await?;
        Ok(Json(ShortLinkResponse { short_link }).into_response())
    }

    async fn add_membership(
        resources: &ServerResources,
        headers: &HeaderMap,
        recipe_id: i64,
        kind: MembershipKind,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(headers, resources)?;
        let summary = memberships::add(&resources.database, auth.user_id, recipe_id, kind).await?;
        Ok((StatusCode::CREATED, Json(summary)).into_response())
    }

    async fn remove_membership(
        resources: &ServerResources,
        headers: &HeaderMap,
        recipe_id: i64,
        kind: MembershipKind,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(headers, resources)?;
        memberships::remove(&resources.database, auth.user_id, recipe_id, kind).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/recipes/:id/favorite/
    async fn handle_add_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::add_membership(&resources, &headers, id, MembershipKind::Favorite).await
    }

    /// Handle DELETE /api/recipes/:id/favorite/
    async fn handle_remove_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::remove_membership(&resources, &headers, id, MembershipKind::Favorite).await
    }

    /// Handle POST /api/recipes/:id/shopping_cart/
    async fn handle_add_to_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::add_membership(&resources, &headers, id, MembershipKind::ShoppingCart).await
    }

    /// Handle DELETE /api/recipes/:id/shopping_cart/
    async fn handle_remove_from_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::remove_membership(&resources, &headers, id, MembershipKind::ShoppingCart).await
    }

    /// Handle GET /api/recipes/download_shopping_cart/
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let document = shopping_list::build_shopping_list(&resources.database, auth.user_id).await?;

        Ok((
            StatusCode::OK,
            [
                (CONTENT_TYPE, SHOPPING_LIST_CONTENT_TYPE.to_owned()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{FILENAME}\""),
                ),
            ],
            document,
        )
            .into_response())
    }
}
