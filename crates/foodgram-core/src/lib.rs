// ABOUTME: Core types and constants for the Foodgram recipe-sharing API
// ABOUTME: Foundation crate with error taxonomy, pagination, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Foodgram Core
//!
//! Foundation crate providing shared types and constants for the Foodgram backend.
//! This crate is designed to change infrequently, enabling incremental compilation
//! benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and field-keyed validation
//! - **constants**: Application-wide constants organized by domain
//! - **pagination**: Page-number pagination with next/previous links
//! - **models**: Users, tags, ingredients, recipes, memberships and their read views

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration values organized by domain
pub mod constants;

/// Page-number pagination
pub mod pagination;

/// Core data models
pub mod models;
