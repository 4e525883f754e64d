//! Filter and pagination state of one list view.

use crate::error::QueryError;
use crate::fields::QueryFields;
use crate::value::FilterValue;
use std::collections::BTreeMap;
use std::num::NonZeroU32;

/// Filter and pagination state of a list view.
///
/// Filters are keyed by field name. A missing entry is the absent value; a
/// present-but-falsy entry is kept here (the form may want to show it) and
/// dropped only at serialization time by [`crate::ScopedQuery`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct QueryState {
    filters: BTreeMap<String, FilterValue>,
    per_page: NonZeroU32,
    current_page: NonZeroU32,
}

impl QueryState {
    /// Create a state on the first page with no filters.
    pub fn new(per_page: NonZeroU32) -> Self {
        Self {
            filters: BTreeMap::new(),
            per_page,
            current_page: NonZeroU32::MIN,
        }
    }

    /// Builder-style variant of [`Self::set_filter`] for initial defaults.
    ///
    /// Pagination keys are ignored here; use [`Self::with_page`].
    pub fn with_filter(mut self, key: &str, value: impl Into<FilterValue>) -> Self {
        if !QueryFields::is_pagination(key) {
            self.filters.insert(key.to_owned(), value.into());
        }
        self
    }

    pub fn with_page(mut self, page: NonZeroU32) -> Self {
        self.current_page = page;
        self
    }

    /// Set or clear a filter. `None` removes the field.
    ///
    /// # Errors
    /// Returns `QueryError::ReservedKey` for `perPage`/`currentPage`.
    pub fn set_filter(&mut self, key: &str, value: Option<FilterValue>) -> Result<(), QueryError> {
        if QueryFields::is_pagination(key) {
            return Err(QueryError::ReservedKey(key.to_owned()));
        }
        match value {
            Some(v) => {
                self.filters.insert(key.to_owned(), v);
            }
            None => {
                self.filters.remove(key);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn filter(&self, key: &str) -> Option<&FilterValue> {
        self.filters.get(key)
    }

    /// Filters in lexicographic key order.
    pub fn filters(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn per_page(&self) -> NonZeroU32 {
        self.per_page
    }

    #[must_use]
    pub fn current_page(&self) -> NonZeroU32 {
        self.current_page
    }

    /// Move to another page. Filters and page size are untouched.
    pub fn set_page(&mut self, page: NonZeroU32) {
        self.current_page = page;
    }

    /// Change the page size and go back to the first page.
    pub fn set_per_page(&mut self, per_page: NonZeroU32) {
        self.per_page = per_page;
        self.reset_page();
    }

    pub fn reset_page(&mut self) {
        self.current_page = NonZeroU32::MIN;
    }
}
