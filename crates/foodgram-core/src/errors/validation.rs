// ABOUTME: Accumulator for field-keyed validation failures
// ABOUTME: Collects every field problem of a request before converting to a single AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::collections::BTreeMap;

use super::{AppError, AppResult, ErrorCode};

/// Map of field name to the messages reported for it
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Collects validation messages for several fields
#[derive(Debug, Default)]
pub struct ValidationErrors {
    fields: FieldErrors,
    code: Option<ErrorCode>,
}

impl ValidationErrors {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an invalid value for `field`
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.push(ErrorCode::InvalidInput, field, message.into());
    }

    /// Record that `field` is required but absent
    pub fn missing(&mut self, field: &str, message: impl Into<String>) {
        self.push(ErrorCode::MissingRequiredField, field, message.into());
    }

    fn push(&mut self, code: ErrorCode, field: &str, message: String) {
        // The first recorded code wins so the status stays stable for a given payload.
        self.code.get_or_insert(code);
        self.fields.entry(field.to_owned()).or_default().push(message);
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(())` when empty, otherwise one `AppError` carrying every field message
    ///
    /// # Errors
    ///
    /// Returns the accumulated validation error when any field was recorded
    pub fn into_result(self) -> AppResult<()> {
        let Some(code) = self.code else {
            return Ok(());
        };

        let message = self
            .fields
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
            .collect::<Vec<_>>()
            .join("; ");

        Err(AppError {
            code,
            message,
            fields: self.fields,
            source: None,
        })
    }
}
