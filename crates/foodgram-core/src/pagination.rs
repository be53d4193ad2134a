// ABOUTME: Page-number pagination with an optional per-request page size
// ABOUTME: Turns an ordered, counted sequence into a page with next/previous links
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

use crate::constants::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters (`?page=2&limit=10`)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size, clamped to `MAX_PAGE_SIZE`
    pub limit: Option<u32>,
}

impl PageParams {
    /// Create explicit parameters
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Effective 1-based page number
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.limit
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }

    /// Number of rows to skip
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.page_size())
    }

    /// Page size as a SQL `LIMIT`
    #[must_use]
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.page_size())
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: u64,
    /// Link to the next page, if any
    pub next: Option<String>,
    /// Link to the previous page, if any
    pub previous: Option<String>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page from its items and the total item count
    ///
    /// `base` is the path (optionally with an existing query string) the links point at.
    #[must_use]
    pub fn new(results: Vec<T>, count: u64, params: &PageParams, base: &str) -> Self {
        let page = params.page();
        let size = params.page_size();
        let seen = u64::from(page - 1) * u64::from(size) + results.len() as u64;

        let next = (seen < count).then(|| page_link(base, page + 1, size));
        let previous = (page > 1).then(|| page_link(base, page - 1, size));

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Map the items while keeping the pagination metadata
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

fn page_link(base: &str, page: u32, limit: u32) -> String {
    let separator = if base.contains('?') {
        if base.ends_with('?') || base.ends_with('&') {
            ""
        } else {
            "&"
        }
    } else {
        "?"
    };
    format!("{base}{separator}page={page}&limit={limit}")
}
