//! Limit/offset pagination
//!
//! Pagination is opt-in: a list is paginated only when the query carries a
//! positive integer `limit`. Unparsable values are ignored rather than
//! rejected, and a bad `offset` falls back to 0.

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl PaginationParams {
    pub fn resolve(&self) -> Option<LimitOffset> {
        let limit = self
            .limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)?;
        let offset = self
            .offset
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(0);
        Some(LimitOffset { limit, offset })
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page with `next`/`previous` links relative to `base_url`
    /// (scheme, host and path of the current request, without query).
    pub fn new(base_url: &str, window: LimitOffset, count: i64, results: Vec<T>) -> Self {
        let LimitOffset { limit, offset } = window;

        // Both values come straight from the query string.
        let next_offset = offset.saturating_add(limit);
        let next = (next_offset < count)
            .then(|| format!("{}?limit={}&offset={}", base_url, limit, next_offset));

        let previous = (offset > 0).then(|| {
            let previous_offset = offset.saturating_sub(limit);
            if previous_offset <= 0 {
                format!("{}?limit={}", base_url, limit)
            } else {
                format!("{}?limit={}&offset={}", base_url, limit, previous_offset)
            }
        });

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}
