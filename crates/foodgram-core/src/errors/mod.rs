// ABOUTME: Unified error taxonomy with standard error codes and field-keyed validation maps
// ABOUTME: Every layer returns AppError; HTTP and sqlx integrations live behind features
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Unified Error Handling System
//!
//! All fallible operations in Foodgram return [`AppResult`]. The [`ErrorCode`] decides the
//! HTTP status, the message is human-readable, and validation failures additionally carry a
//! map of field name to messages so clients can highlight the offending inputs.
//!
//! The taxonomy:
//! - validation errors (`InvalidInput`, `MissingRequiredField`, `ValueOutOfRange`)
//! - `ResourceNotFound` for unknown recipes, users, tags or ingredients
//! - `ResourceAlreadyExists` for duplicate memberships, follows or ledger pairs
//! - `EmptyResult` for a shopping list with nothing to aggregate
//!
//! None of them is fatal to the process and none is retried.

/// `sqlx::Error` conversion with constraint-violation mapping
#[cfg(feature = "database-errors")]
mod database;

/// axum `IntoResponse` implementation
#[cfg(feature = "http-response")]
mod http;

/// Field-keyed validation error accumulation
mod validation;

pub use validation::{FieldErrors, ValidationErrors};

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication & Authorization
    /// No credentials were supplied for an endpoint that needs them
    AuthRequired,
    /// Credentials were supplied but could not be validated
    AuthInvalid,
    /// Caller is authenticated but not allowed to act on the resource
    PermissionDenied,

    // Validation
    /// Semantically invalid input
    InvalidInput,
    /// A field that must be present on this operation is absent
    MissingRequiredField,
    /// Numeric input outside the accepted range
    ValueOutOfRange,
    /// The request is valid but there is nothing to produce
    EmptyResult,
    /// Request body exceeds the upload limit
    PayloadTooLarge,

    // Resource Management
    /// Referenced resource does not exist
    ResourceNotFound,
    /// Resource or relationship already exists
    ResourceAlreadyExists,

    // Configuration
    /// Configuration is missing or invalid
    ConfigError,

    // Internal
    /// Unexpected internal failure
    InternalError,
    /// Database operation failed
    DatabaseError,
    /// Media storage operation failed
    StorageError,
    /// Data serialization/deserialization failed
    SerializationError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::ValueOutOfRange
            | Self::EmptyResult => 400,
            Self::AuthRequired | Self::AuthInvalid => 401,
            Self::PermissionDenied => 403,
            Self::ResourceNotFound => 404,
            Self::ResourceAlreadyExists => 409,
            Self::PayloadTooLarge => 413,
            Self::ConfigError
            | Self::InternalError
            | Self::DatabaseError
            | Self::StorageError
            | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::EmptyResult => "There is nothing to produce for this request",
            Self::PayloadTooLarge => "The request body is too large",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceAlreadyExists => "A resource with this identifier already exists",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether this code is a client-side (4xx) error
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Field-keyed messages for validation failures
    pub fields: FieldErrors,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: FieldErrors::new(),
            source: None,
        }
    }

    /// Attach a message to a specific input field
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Whether the error reports a uniqueness conflict
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.code == ErrorCode::ResourceAlreadyExists
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response body
///
/// `detail` carries the human-readable message, `errors` the per-field map (omitted when
/// the failure is not tied to specific fields).
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub detail: String,
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Field-keyed validation messages
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            detail: error.message,
            code: error.code,
            errors: error.fields,
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication credentials were not provided")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Caller may not act on the resource
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Validation failure tied to one field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::InvalidInput, message.clone()).with_field(field, message)
    }

    /// Field absent on an operation that requires it
    pub fn missing_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::MissingRequiredField, message.clone()).with_field(field, message)
    }

    /// Invalid input that is not tied to a single field
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Duplicate resource or relationship
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceAlreadyExists, message)
    }

    /// Nothing to produce
    pub fn empty_result(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EmptyResult, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Media storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}
