// ABOUTME: Short-code generation and short-link URL building for recipes
// ABOUTME: Codes are random tokens assigned once when a recipe is first stored
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use rand::Rng;

use crate::constants::endpoints::{RECIPE_PAGE_PREFIX, SHORT_LINK_PREFIX};
use crate::constants::short_code::{ALPHABET, LENGTH};

/// Draw a fresh random short code
///
/// Uniqueness is not checked here; the caller inserts it under the `UNIQUE` constraint
/// and draws again on collision.
#[must_use]
pub fn generate_short_code() -> String {
    let mut rng = rand::thread_rng();
    (0..LENGTH)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}

/// Public URL of a recipe's short link
#[must_use]
pub fn short_link_url(public_base_url: &str, code: &str) -> String {
    format!(
        "{}{SHORT_LINK_PREFIX}/{code}",
        public_base_url.trim_end_matches('/')
    )
}

/// Frontend path a short link redirects to
#[must_use]
pub fn recipe_page_path(recipe_id: i64) -> String {
    format!("{RECIPE_PAGE_PREFIX}/{recipe_id}")
}
