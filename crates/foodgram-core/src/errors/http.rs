// ABOUTME: axum integration for AppError: IntoResponse and JSON body rejections
// ABOUTME: Renders the JSON error body and logs server-side failures with their source chain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use tracing::{debug, error, warn};

use super::{AppError, ErrorCode, ErrorResponse};
use crate::constants::messages::{
    BODY_TOO_LARGE, INVALID_FIELD_VALUE, JSON_CONTENT_TYPE_REQUIRED, MALFORMED_BODY,
    NON_FIELD_ERRORS,
};

/// Prefix axum puts in front of the serde error of a `JsonDataError`
const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(
                error.code = ?self.code,
                error.message = %self.message,
                error.source = ?self.source,
                "Request failed with server error"
            );
        } else if status == StatusCode::CONFLICT {
            warn!(error.message = %self.message, "Request rejected with conflict");
        }

        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(rejection = %rejection.body_text(), "Rejected JSON body");

        match rejection {
            JsonRejection::JsonDataError(e) => {
                let text = e.body_text();
                let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(&text);
                match split_field_path(detail) {
                    Some((field, message)) => {
                        Self::new(ErrorCode::InvalidInput, INVALID_FIELD_VALUE)
                            .with_field(field, message)
                    }
                    None => Self::validation(NON_FIELD_ERRORS, detail),
                }
            }
            JsonRejection::JsonSyntaxError(_) => Self::validation(NON_FIELD_ERRORS, MALFORMED_BODY),
            JsonRejection::MissingJsonContentType(_) => {
                Self::invalid_input(JSON_CONTENT_TYPE_REQUIRED)
            }
            other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Self::new(ErrorCode::PayloadTooLarge, BODY_TOO_LARGE)
            }
            other => Self::invalid_input(other.body_text()),
        }
    }
}

/// Split `ingredients[0].amount: invalid type ...` into the top-level field and the message
///
/// Returns `None` when the error is not tied to a field path.
fn split_field_path(detail: &str) -> Option<(&str, &str)> {
    let (path, message) = detail.split_once(": ")?;
    if path.is_empty() || path.contains(char::is_whitespace) {
        return None;
    }
    let field = path.split(['.', '[']).next().filter(|field| !field.is_empty())?;
    Some((field, message))
}
