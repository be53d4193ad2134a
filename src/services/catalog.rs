// ABOUTME: Tag and ingredient reference data: validated creation and bulk ingredient import
// ABOUTME: Used by the CLI to seed the catalog that recipes reference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::constants::limits::{
    MAX_INGREDIENT_NAME_LENGTH, MAX_MEASUREMENT_UNIT_LENGTH, MAX_TAG_NAME_LENGTH,
    MAX_TAG_SLUG_LENGTH, TAG_SLUG_PATTERN,
};
use crate::constants::messages::{INGREDIENT_EXISTS, TAG_EXISTS};
use crate::database::Database;
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::models::{Ingredient, NewIngredient, NewTag, Tag};

fn slug_regex() -> AppResult<&'static Regex> {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    if let Some(regex) = SLUG.get() {
        return Ok(regex);
    }
    let regex = Regex::new(TAG_SLUG_PATTERN)
        .map_err(|e| AppError::internal(format!("Invalid slug pattern: {e}")))?;
    Ok(SLUG.get_or_init(|| regex))
}

fn check_length(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.add(field, format!("{field} required"));
    } else if value.chars().count() > max {
        errors.add(field, format!("{field} must be at most {max} characters"));
    }
}

/// Validate a tag before insertion
///
/// # Errors
///
/// Returns a validation error for an empty or oversized name or an invalid slug
pub fn validate_tag(tag: &NewTag) -> AppResult<()> {
    let mut errors = ValidationErrors::new();
    check_length(&mut errors, "name", &tag.name, MAX_TAG_NAME_LENGTH);
    check_length(&mut errors, "slug", &tag.slug, MAX_TAG_SLUG_LENGTH);

    if !tag.slug.trim().is_empty() && !slug_regex()?.is_match(tag.slug.trim()) {
        errors.add("slug", "slug may contain only letters, digits, '-' and '_'");
    }

    errors.into_result()
}

/// Validate an ingredient before insertion
///
/// # Errors
///
/// Returns a validation error for an empty or oversized name or unit
pub fn validate_ingredient(ingredient: &NewIngredient) -> AppResult<()> {
    let mut errors = ValidationErrors::new();
    check_length(&mut errors, "name", &ingredient.name, MAX_INGREDIENT_NAME_LENGTH);
    check_length(
        &mut errors,
        "measurement_unit",
        &ingredient.measurement_unit,
        MAX_MEASUREMENT_UNIT_LENGTH,
    );
    errors.into_result()
}

fn normalize_ingredient(ingredient: &NewIngredient) -> NewIngredient {
    NewIngredient {
        name: ingredient.name.trim().to_owned(),
        measurement_unit: ingredient.measurement_unit.trim().to_owned(),
    }
}

/// Create a tag
///
/// # Errors
///
/// Returns a validation error for invalid input or a conflict when the name or slug is
/// taken in any letter case
pub async fn create_tag(db: &Database, tag: &NewTag) -> AppResult<Tag> {
    validate_tag(tag)?;
    let normalized = NewTag {
        name: tag.name.trim().to_owned(),
        slug: tag.slug.trim().to_owned(),
    };

    let created = db
        .tags()
        .create(&normalized)
        .await
        .map_err(|e| if e.is_conflict() { AppError::conflict(TAG_EXISTS) } else { e })?;

    info!(tag.id = created.id, slug = %created.slug, "Tag created");
    Ok(created)
}

/// Create an ingredient
///
/// # Errors
///
/// Returns a validation error for invalid input or a conflict for an existing pair
pub async fn create_ingredient(db: &Database, ingredient: &NewIngredient) -> AppResult<Ingredient> {
    validate_ingredient(ingredient)?;

    let created = db
        .ingredients()
        .create(&normalize_ingredient(ingredient))
        .await
        .map_err(|e| {
            if e.is_conflict() {
                AppError::conflict(INGREDIENT_EXISTS)
            } else {
                e
            }
        })?;

    info!(ingredient.id = created.id, "Ingredient created");
    Ok(created)
}

/// Outcome of a bulk ingredient import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Rows written
    pub inserted: usize,
    /// Existing pairs left untouched
    pub skipped: usize,
    /// Entries rejected by validation
    pub invalid: usize,
}

/// Parse an ingredient import document (a JSON array of `{name, measurement_unit}`)
///
/// # Errors
///
/// Returns a serialization error for malformed JSON
pub fn parse_ingredient_file(contents: &str) -> AppResult<Vec<NewIngredient>> {
    Ok(serde_json::from_str(contents)?)
}

/// Insert every valid ingredient that does not exist yet
///
/// # Errors
///
/// Returns an error if a storage operation fails
pub async fn import_ingredients(
    db: &Database,
    ingredients: &[NewIngredient],
) -> AppResult<ImportSummary> {
    let manager = db.ingredients();
    let mut summary = ImportSummary::default();

    for ingredient in ingredients {
        if let Err(e) = validate_ingredient(ingredient) {
            warn!(name = %ingredient.name, error = %e, "Skipping invalid ingredient");
            summary.invalid += 1;
            continue;
        }

        if manager
            .insert_if_absent(&normalize_ingredient(ingredient))
            .await?
        {
            summary.inserted += 1;
        } else {
            summary.skipped += 1;
        }
    }

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        invalid = summary.invalid,
        "Ingredient import finished"
    );
    Ok(summary)
}
