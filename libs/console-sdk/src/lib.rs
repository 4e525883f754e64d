#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! # `console-sdk` - list-view runtime for the catalog console
//!
//! Building blocks shared by every list screen:
//!
//! - [`FilterReducer`] - merges filter-form edits into the query state and
//!   debounces free-text search
//! - [`QueryCache`] - keyed result cache with single-writer fetch tickets and
//!   list invalidation
//! - [`ListController`] - keeps a paginated list in sync with its query,
//!   showing previous data while refetching and ignoring stale responses
//! - [`MutationCoordinator`] - submits editor forms and invalidates the list
//!
//! ## Wiring
//!
//! ```rust,no_run
//! use console_query::QueryState;
//! use console_sdk::{FilterReducer, ListController, ListPage, QueryCache, DEFAULT_SEARCH_DEBOUNCE};
//! use std::num::NonZeroU32;
//! use std::sync::Arc;
//!
//! # async fn mount() {
//! let cache = Arc::new(QueryCache::new());
//! let reducer = FilterReducer::new(
//!     QueryState::new(NonZeroU32::new(10).unwrap()),
//!     DEFAULT_SEARCH_DEBOUNCE,
//! );
//! let list = ListController::spawn("tenants", None, cache, reducer.subscribe(), |query| async move {
//!     println!("GET /api/auth/tenants?{query}");
//!     Ok::<_, std::io::Error>(ListPage::<String>::new(vec![], 0))
//! });
//! let _snapshot = list.settled().await;
//! # }
//! ```

pub mod cache;
pub mod debounce;
pub mod list;
pub mod mutation;
pub mod page;
pub mod reducer;

pub use cache::{CacheKey, Cached, FetchTicket, QueryCache};
pub use debounce::DebounceSlot;
pub use list::{ListController, ListPhase, ListSnapshot, ListState};
pub use mutation::{Editor, EditorMode, MutationCoordinator, MutationError, Mutations};
pub use page::{ListPage, PageRange};
pub use reducer::{
    DEFAULT_SEARCH_DEBOUNCE, FilterFieldChange, FilterPatch, FilterReducer, flatten,
};
