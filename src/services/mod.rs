// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Composite recipe writes, memberships, follows, shopping lists and reference data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Domain service layer
//!
//! Route handlers and the CLI parse input, identify the caller and render output; every
//! business rule lives here. Services are free functions over [`Database`](crate::database::Database)
//! so the same rules apply regardless of the entry point.

/// Tag and ingredient reference data
pub mod catalog;

/// Follow relationships and follow-views
pub mod follows;

/// Favorite and shopping-cart toggles
pub mod memberships;

/// Recipe composite writer and read-view assembly
pub mod recipes;

/// Shopping list aggregation and rendering
pub mod shopping_list;

/// User accounts and user views
pub mod users;
