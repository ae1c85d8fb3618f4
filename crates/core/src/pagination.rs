//! Limit/offset pagination helpers for the gallery listing.

use serde::Serialize;

/// Images per page when the client does not ask for a size.
pub const DEFAULT_PAGE_SIZE: i64 = 24;

/// Upper bound on a client-requested page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit into `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// One page of results plus what the client needs to request the next one.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        let has_more = offset + (items.len() as i64) < total;
        Self {
            items,
            total,
            limit,
            offset,
            has_more,
        }
    }
}
