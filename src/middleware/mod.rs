// ABOUTME: HTTP middleware: CORS policy and request-id/span tracing
// ABOUTME: Layers are assembled into the router in routes::build_router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// CORS layer built from the HTTP configuration
pub mod cors;
/// Request ids and per-request spans
pub mod tracing;

pub use cors::setup_cors;
pub use tracing::{create_request_span, RequestIdGenerator, REQUEST_ID_HEADER};
