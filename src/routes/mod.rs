// ABOUTME: Route module organization for the Foodgram HTTP API
// ABOUTME: Assembles every domain router behind request-id, tracing, CORS, body-limit and timeout layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Route module for the Foodgram API
//!
//! Each domain module contains only route definitions and thin handler functions that
//! identify the caller, parse input and delegate to [`crate::services`].

pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod short_links;
pub mod tags;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use http::{HeaderName, Request, Uri};
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;
pub use short_links::ShortLinkRoutes;
pub use tags::TagRoutes;
pub use users::UserRoutes;

use crate::middleware::{create_request_span, setup_cors, RequestIdGenerator, REQUEST_ID_HEADER};
use crate::resources::ServerResources;

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let config = Arc::clone(&resources.config);
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(TagRoutes::routes(Arc::clone(&resources)))
        .merge(IngredientRoutes::routes(Arc::clone(&resources)))
        .merge(RecipeRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(Arc::clone(&resources)))
        .merge(ShortLinkRoutes::routes(resources))
        .layer(DefaultBodyLimit::max(config.media.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), RequestIdGenerator))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request<Body>| create_request_span(request)),
                )
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(setup_cors(&config.http))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.http.request_timeout_secs,
                ))),
        )
}

/// Path and query of `uri` with any `page`/`limit` pairs removed
///
/// Used as the base of pagination links so filters survive paging.
pub(crate) fn page_base(uri: &Uri) -> String {
    let kept: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(key, _)| key);
            key != "page" && key != "limit"
        })
        .collect();

    if kept.is_empty() {
        uri.path().to_owned()
    } else {
        format!("{}?{}", uri.path(), kept.join("&"))
    }
}

/// Interpret a boolean query flag (`1`, `true`, `yes`)
pub(crate) fn query_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes")
    )
}
