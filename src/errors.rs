// ABOUTME: Re-exports the unified error taxonomy from foodgram-core
// ABOUTME: AppError renders itself as an HTTP response and converts from sqlx errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

pub use foodgram_core::errors::*;
