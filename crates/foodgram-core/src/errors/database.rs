// ABOUTME: Conversion from sqlx errors into the unified AppError taxonomy
// ABOUTME: Storage constraint violations become conflicts or validation errors, never 500s
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::{AppError, ErrorCode};

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        let (code, message) = match &error {
            sqlx::Error::RowNotFound => (ErrorCode::ResourceNotFound, "Record not found".to_owned()),
            sqlx::Error::Database(db) if db.is_unique_violation() => (
                ErrorCode::ResourceAlreadyExists,
                format!("Record already exists: {}", db.message()),
            ),
            sqlx::Error::Database(db) if db.is_check_violation() => (
                ErrorCode::ValueOutOfRange,
                format!("Value rejected by constraint: {}", db.message()),
            ),
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => (
                ErrorCode::ResourceNotFound,
                format!("Referenced record does not exist: {}", db.message()),
            ),
            other => (ErrorCode::DatabaseError, format!("Database error: {other}")),
        };

        Self::new(code, message).with_source(error)
    }
}
