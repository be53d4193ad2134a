// ABOUTME: Ingredient reference data with its measurement unit
// ABOUTME: The (name, unit) pair is unique; the same name may exist under several units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

/// Ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Primary key
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Unit amounts of this ingredient are measured in
    pub measurement_unit: String,
}

/// Fields needed to insert an ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
}
