// ABOUTME: User endpoints: listing, profile views, avatar upload, subscriptions, follow and unfollow
// ABOUTME: recipes_limit truncates the recipes embedded in follow-views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use http::{HeaderMap, StatusCode, Uri};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::pagination::PageParams;
use crate::resources::ServerResources;
use crate::routes::page_base;
use crate::services::follows::{self, parse_recipes_limit};
use crate::services::users::{self, user_view};

/// Query parameters of the user listing
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Avatar upload body and response
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AvatarPayload {
    /// `data:image/...;base64,...` on upload, the stored reference in the response
    pub avatar: Option<String>,
}

/// Query parameters accepted by the follow endpoints
#[derive(Debug, Default, Deserialize)]
pub struct FollowQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Maximum number of recipes per follow-view
    pub recipes_limit: Option<String>,
}

/// User routes handler
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users/", get(Self::handle_list))
            .route("/api/users/me/", get(Self::handle_me))
            .route(
                "/api/users/me/avatar/",
                put(Self::handle_set_avatar).delete(Self::handle_remove_avatar),
            )
            .route("/api/users/subscriptions/", get(Self::handle_subscriptions))
            .route("/api/users/:id", get(Self::handle_get))
            .route("/api/users/:id/", get(Self::handle_get))
            .route(
                "/api/users/:id/subscribe/",
                post(Self::handle_follow).delete(Self::handle_unfollow),
            )
            .with_state(resources)
    }

    /// Handle GET /api/users/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        Query(query): Query<UserListQuery>,
    ) -> Result<Response, AppError> {
        let viewer = resources
            .auth_manager
            .authenticate_optional(&headers)?
            .map(|auth| auth.user_id);
        let params = PageParams {
            page: query.page,
            limit: query.limit,
        };

        let page = users::list_users(&resources.database, &params, viewer, &page_base(&uri)).await?;
        Ok(Json(page).into_response())
    }

    /// Handle GET /api/users/me/
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_manager.authenticate(&headers)?;
        users::require_caller(&resources.database, &auth).await?;
        let view = user_view(&resources.database, auth.user_id, Some(auth.user_id)).await?;
        Ok(Json(view).into_response())
    }

    /// Handle PUT /api/users/me/avatar/
    async fn handle_set_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        WithRejection(Json(payload), _): WithRejection<Json<AvatarPayload>, AppError>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_manager.authenticate(&headers)?;
        let avatar = users::set_avatar(
            &resources.database,
            resources.images.as_ref(),
            &auth,
            payload.avatar.as_deref(),
        )
        .await?;

        Ok(Json(AvatarPayload {
            avatar: Some(avatar),
        })
        .into_response())
    }

    /// Handle DELETE /api/users/me/avatar/
    async fn handle_remove_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_manager.authenticate(&headers)?;
        users::remove_avatar(&resources.database, resources.images.as_ref(), &auth).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/users/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let viewer = resources
            .auth_manager
            .authenticate_optional(&headers)?
            .map(|auth| auth.user_id);
        let view = user_view(&resources.database, id, viewer).await?;
        Ok(Json(view).into_response())
    }

    /// Handle GET /api/users/subscriptions/
    async fn handle_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        Query(query): Query<FollowQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_manager.authenticate(&headers)?;
        let params = PageParams {
            page: query.page,
            limit: query.limit,
        };

        let page = follows::subscriptions(
            &resources.database,
            auth.user_id,
            &params,
            parse_recipes_limit(query.recipes_limit.as_deref()),
            &page_base(&uri),
        )
        .await?;

        Ok(Json(page).into_response())
    }

    /// Handle POST /api/users/:id/subscribe/
    async fn handle_follow(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Query(query): Query<FollowQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_manager.authenticate(&headers)?;
        let view = follows::follow(
            &resources.database,
            auth.user_id,
            id,
            parse_recipes_limit(query.recipes_limit.as_deref()),
        )
        .await?;

        Ok((StatusCode::CREATED, Json(view)).into_response())
    }

    /// Handle DELETE /api/users/:id/subscribe/
    async fn handle_unfollow(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_manager.authenticate(&headers)?;
        follows::unfollow(&resources.database, auth.user_id, id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
