// ABOUTME: Re-exports the data models from foodgram-core
// ABOUTME: Users, tags, ingredients, recipes, memberships and their read views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

pub use foodgram_core::models::*;
