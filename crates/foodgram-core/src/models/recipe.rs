// ABOUTME: Recipe row, write payload and read representations
// ABOUTME: RecipeView is always rendered for one viewer; RecipeSummary is the compact embed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Tag, UserView};

/// Stored recipe row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Primary key
    pub id: i64,
    /// Owning user
    pub author_id: i64,
    /// Title
    pub name: String,
    /// Free-text description
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Image reference returned by the image store
    pub image: String,
    /// Immutable short-link token
    pub short_code: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// One `(ingredient, amount)` pair of a write payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSpec {
    /// Ingredient id
    pub id: i64,
    /// Amount in the ingredient's unit
    pub amount: i64,
}

/// Body of a recipe create or update request
///
/// Every field is optional at the wire level; which ones are required depends on the
/// operation and is checked by the recipe writer so that all problems are reported at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipePayload {
    /// Title
    pub name: Option<String>,
    /// Description
    pub text: Option<String>,
    /// Cooking time in minutes
    pub cooking_time: Option<i64>,
    /// Image as a base64 data URL
    pub image: Option<String>,
    /// Tag ids
    pub tags: Option<Vec<i64>>,
    /// Ingredient ids with amounts
    pub ingredients: Option<Vec<IngredientSpec>>,
}

/// Ingredient as listed inside a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredientView {
    /// Ingredient id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Amount used by the recipe
    pub amount: i64,
}

/// Full recipe as rendered to a specific viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeView {
    /// Primary key
    pub id: i64,
    /// Tags, ordered by name
    pub tags: Vec<Tag>,
    /// Author as seen by the viewer
    pub author: UserView,
    /// Ingredients with amounts, ordered by name
    pub ingredients: Vec<RecipeIngredientView>,
    /// Whether the recipe is in the viewer's favorites
    pub is_favorited: bool,
    /// Whether the recipe is in the viewer's shopping cart
    pub is_in_shopping_cart: bool,
    /// Title
    pub name: String,
    /// Image reference
    pub image: String,
    /// Description
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

/// Compact recipe embedded in membership and follow responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Primary key
    pub id: i64,
    /// Title
    pub name: String,
    /// Image reference
    pub image: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Recipe list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Only recipes by this author
    pub author_id: Option<i64>,
    /// Only recipes carrying at least one of these tag slugs
    pub tag_slugs: Vec<String>,
    /// Only recipes favorited by this user
    pub favorited_by: Option<i64>,
    /// Only recipes in this user's shopping cart
    pub in_cart_of: Option<i64>,
}
