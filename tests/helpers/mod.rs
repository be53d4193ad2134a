// ABOUTME: Shared test helpers for integration tests
// ABOUTME: Exports the axum request builder used by the HTTP route tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod axum_test;
