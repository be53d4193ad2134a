// ABOUTME: Short-link redirect endpoint
// ABOUTME: Resolves /s/<code> to the recipe page with a 302
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use http::header::LOCATION;
use http::StatusCode;
use tracing::debug;

use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::recipes::resolve_short_code;

/// Short-link routes handler
pub struct ShortLinkRoutes;

impl ShortLinkRoutes {
    /// Create the redirect routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/s/:code", get(Self::handle_redirect))
            .route("/s/:code/", get(Self::handle_redirect))
            .with_state(resources)
    }

    /// Handle GET /s/:code
    async fn handle_redirect(
        State(resources): State<Arc<ServerResources>>,
        Path(code): Path<String>,
    ) -> Result<Response, AppError> {
        let location = resolve_short_code(&resources.database, &code).await?;
        debug!(code = %code, location = %location, "Short link resolved");
        Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
    }
}
