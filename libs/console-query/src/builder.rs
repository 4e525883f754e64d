//! Scoped query builder
//!
//! Turns a [`QueryState`] into the flat record sent to the list endpoints:
//!
//! 1. fields with falsy values (`""`, `0`, `false`, absent) are dropped;
//! 2. for a non-admin actor `tenantId` is replaced by the actor's own tenant,
//!    or removed when the actor has none;
//! 3. for an admin (or when no actor is known) `tenantId` passes through.
//!
//! Rendering order is fixed: `perPage`, `currentPage`, then filters in
//! lexicographic key order. The rendered string doubles as the fetch identity
//! of the list controller, so it must be stable for equal inputs.

use crate::fields::QueryFields;
use crate::scope::Actor;
use crate::state::QueryState;
use std::collections::BTreeMap;
use std::fmt;

/// Serialization-ready query record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct ScopedQuery {
    pairs: Vec<(String, String)>,
}

impl ScopedQuery {
    /// Build the scoped record for `state` as seen by `actor`.
    pub fn build(actor: Option<&Actor>, state: &QueryState) -> Self {
        let mut filters: BTreeMap<&str, String> = state
            .filters()
            .filter(|(_, value)| value.is_truthy())
            .map(|(key, value)| (key, value.to_string()))
            .collect();

        if let Some(actor) = actor
            && !actor.is_admin()
        {
            match actor.tenant_id().filter(|id| *id != 0) {
                Some(id) => filters.insert(QueryFields::TENANT_ID, id.to_string()),
                None => filters.remove(QueryFields::TENANT_ID),
            };
        }

        let mut pairs = Vec::with_capacity(filters.len() + 2);
        pairs.push((QueryFields::PER_PAGE.to_owned(), state.per_page().to_string()));
        pairs.push((
            QueryFields::CURRENT_PAGE.to_owned(),
            state.current_page().to_string(),
        ));
        pairs.extend(filters.into_iter().map(|(k, v)| (k.to_owned(), v)));

        Self { pairs }
    }

    /// Key/value pairs in rendering order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        // Serializing a slice of string pairs cannot fail.
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }
}

impl fmt::Display for ScopedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
