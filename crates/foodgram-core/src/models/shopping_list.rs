// ABOUTME: One aggregated line of a shopping list
// ABOUTME: Amounts are summed per (ingredient name, measurement unit)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

/// Summed amount for one (name, unit) group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Sum of the amounts across all cart recipes
    pub amount: i64,
}
