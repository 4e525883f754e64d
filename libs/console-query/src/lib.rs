#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! # `console-query` - list query state for the catalog console
//!
//! This crate holds the pure part of the list-view engine:
//!
//! - **Filter values** (`value` module) - scalar filter values with truthiness rules
//! - **Query state** (`state` module) - filters plus `perPage`/`currentPage`
//! - **Actor scoping** (`scope` module) - role and tenant affiliation of the caller
//! - **Scoped query builder** (`builder` module) - drops falsy fields, enforces the
//!   tenant scope and renders the canonical query string
//!
//! ## Example
//!
//! ```rust
//! use console_query::{Actor, FilterValue, QueryFields, QueryState, ScopedQuery};
//! use std::num::NonZeroU32;
//!
//! let per_page = NonZeroU32::new(10).unwrap();
//! let state = QueryState::new(per_page)
//!     .with_filter(QueryFields::SEARCH, "pizza")
//!     .with_filter(QueryFields::TENANT_ID, FilterValue::Number(3));
//!
//! let manager = Actor::manager(42, 7);
//! let query = ScopedQuery::build(Some(&manager), &state);
//!
//! assert_eq!(query.to_query_string(), "perPage=10&currentPage=1&q=pizza&tenantId=7");
//! ```

pub mod builder;
pub mod error;
pub mod fields;
pub mod scope;
pub mod state;
pub mod value;

pub use builder::ScopedQuery;
pub use error::QueryError;
pub use fields::QueryFields;
pub use scope::{Actor, Role, TenantRef};
pub use state::QueryState;
pub use value::FilterValue;
