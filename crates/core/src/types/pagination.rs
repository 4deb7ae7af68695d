//! Pagination directive shared by every `getMany`-style operation.

use serde::{Deserialize, Serialize};

/// Page size used when the user does not set one.
pub const DEFAULT_LIMIT: i64 = 50;

const fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// `returnAll` / `limit` pair as collected from the parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Return every result instead of a single page.
    #[serde(default)]
    pub return_all: bool,
    /// Page size; only consulted when `return_all` is false.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            return_all: false,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// The `limit` to merge into the filter bag, if any.
    ///
    /// `None` when `return_all` is set, otherwise the configured limit with a
    /// floor of 1.
    #[must_use]
    pub fn effective_limit(&self) -> Option<i64> {
        (!self.return_all).then(|| self.limit.max(1))
    }
}
