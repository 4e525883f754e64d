use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// One page of a list endpoint response (`{ "data": [...], "total": n }`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> ListPage<T> {
    pub fn new(data: Vec<T>, total: u64) -> Self {
        Self { data, total }
    }
}

/// Rows shown on the current page, 1-based and inclusive.
///
/// Renders as `Showing {from}-{to} of {total} items`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRange {
    pub from: u64,
    pub to: u64,
    pub total: u64,
}

impl PageRange {
    /// Compute the visible range. An empty or out-of-range page yields `0-0`.
    #[must_use]
    pub fn new(total: u64, per_page: NonZeroU32, current_page: NonZeroU32) -> Self {
        let per_page = u64::from(per_page.get());
        let offset = u64::from(current_page.get() - 1).saturating_mul(per_page);
        if offset >= total {
            return Self {
                from: 0,
                to: 0,
                total,
            };
        }
        Self {
            from: offset + 1,
            to: offset.saturating_add(per_page).min(total),
            total,
        }
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {}-{} of {} items",
            self.from, self.to, self.total
        )
    }
}
