//! Debounced filter reducer
//!
//! Merges filter-form change events into the [`QueryState`] of a list view.
//!
//! - A batch of changes is flattened into one patch (last write wins per key).
//! - Every key except the free-text search applies at once and sends the view
//!   back to page 1.
//! - The search key is committed through a [`DebounceSlot`]: a newer value
//!   within the quiescence window supersedes the pending one and restarts the
//!   window. The commit also resets the page.
//!
//! State is published on a `tokio::sync::watch` channel; the list controller
//! subscribes to it.

use crate::debounce::DebounceSlot;
use console_query::{FilterValue, QueryError, QueryFields, QueryState};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Default quiescence window for the search field.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// One edited field as reported by the form surface: `{ name: [key], value }`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FilterFieldChange {
    pub name: Vec<String>,
    #[serde(default)]
    pub value: Option<FilterValue>,
}

impl FilterFieldChange {
    pub fn new(key: &str, value: Option<FilterValue>) -> Self {
        Self {
            name: vec![key.to_owned()],
            value,
        }
    }

    pub fn set(key: &str, value: impl Into<FilterValue>) -> Self {
        Self::new(key, Some(value.into()))
    }

    pub fn cleared(key: &str) -> Self {
        Self::new(key, None)
    }

    /// Top-level field key (`name[0]`).
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.name.first().map(String::as_str)
    }
}

/// Flattened batch of changes, last write wins per key.
pub type FilterPatch = BTreeMap<String, Option<FilterValue>>;

/// Collapse a batch of changes into a single patch.
pub fn flatten<I>(changes: I) -> FilterPatch
where
    I: IntoIterator<Item = FilterFieldChange>,
{
    let mut patch = FilterPatch::new();
    for change in changes {
        let Some(key) = change.key() else {
            tracing::warn!("ignoring filter change without a field name");
            continue;
        };
        patch.insert(key.to_owned(), change.value);
    }
    patch
}

pub struct FilterReducer {
    state: Arc<watch::Sender<QueryState>>,
    search: DebounceSlot,
    window: Duration,
}

impl FilterReducer {
    pub fn new(initial: QueryState, window: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            state: Arc::new(tx),
            search: DebounceSlot::new(),
            window,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Apply one batch of filter-form changes.
    ///
    /// Non-search fields are committed before this returns. A search change is
    /// scheduled and needs a running tokio runtime.
    pub fn apply<I>(&self, changes: I)
    where
        I: IntoIterator<Item = FilterFieldChange>,
    {
        let mut patch = flatten(changes);

        if let Some(search) = patch.remove(QueryFields::SEARCH) {
            self.schedule_search(search);
        }

        if patch.is_empty() {
            return;
        }

        let changed = self
            .state
            .send_if_modified(|state| commit_patch(state, &patch));
        tracing::debug!(fields = patch.len(), changed, "applied filter patch");
    }

    /// Move to `page` (1-based), keeping filters and page size.
    ///
    /// # Errors
    /// Returns `QueryError::InvalidPage` for page 0.
    pub fn set_page(&self, page: u32) -> Result<(), QueryError> {
        let page = NonZeroU32::new(page).ok_or(QueryError::InvalidPage)?;
        self.state.send_if_modified(|state| {
            if state.current_page() == page {
                return false;
            }
            state.set_page(page);
            true
        });
        Ok(())
    }

    /// Change the page size; the view returns to page 1.
    ///
    /// # Errors
    /// Returns `QueryError::InvalidPageSize` for size 0.
    pub fn set_page_size(&self, per_page: u32) -> Result<(), QueryError> {
        let per_page = NonZeroU32::new(per_page).ok_or(QueryError::InvalidPageSize)?;
        self.state.send_if_modified(|state| {
            if state.per_page() == per_page {
                return false;
            }
            state.set_per_page(per_page);
            true
        });
        Ok(())
    }

    #[must_use]
    pub fn has_pending_search(&self) -> bool {
        self.search.is_pending()
    }

    /// Drop the pending search commit, if any. Called on view unmount.
    pub fn shutdown(&self) {
        if self.search.cancel() {
            tracing::debug!("cancelled pending search commit");
        }
    }

    fn schedule_search(&self, value: Option<FilterValue>) {
        let state = Arc::clone(&self.state);
        let patch = FilterPatch::from([(QueryFields::SEARCH.to_owned(), value)]);
        tracing::debug!(window_ms = self.window.as_millis(), "scheduling search commit");
        self.search.schedule(self.window, async move {
            let changed = state.send_if_modified(|s| commit_patch(s, &patch));
            tracing::debug!(changed, "committed debounced search");
        });
    }
}

impl Drop for FilterReducer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn commit_patch(state: &mut QueryState, patch: &FilterPatch) -> bool {
    let before = state.clone();
    for (key, value) in patch {
        if let Err(err) = state.set_filter(key, value.clone()) {
            tracing::warn!(%err, "rejected filter change");
        }
    }
    state.reset_page();
    *state != before
}
