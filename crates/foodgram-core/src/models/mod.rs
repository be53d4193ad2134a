// ABOUTME: Core data models for the Foodgram recipe-sharing API
// ABOUTME: Re-exports users, tags, ingredients, recipes, memberships and follow views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Data Models
//!
//! Plain data shared by the storage, service and HTTP layers. Row types mirror the
//! tables; `*View` types are the read representations rendered for a specific caller.

mod follow;
mod ingredient;
mod membership;
mod recipe;
mod shopping_list;
mod tag;
mod user;

pub use follow::FollowView;
pub use ingredient::{Ingredient, NewIngredient};
pub use membership::MembershipKind;
pub use recipe::{
    IngredientSpec, Recipe, RecipeFilter, RecipeIngredientView, RecipePayload, RecipeSummary,
    RecipeView,
};
pub use shopping_list::ShoppingListItem;
pub use tag::{NewTag, Tag};
pub use user::{NewUser, User, UserView};
