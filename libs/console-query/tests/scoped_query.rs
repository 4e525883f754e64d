#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Query-string properties shared by every list view.

use console_query::{Actor, FilterValue, QueryFields, QueryState, ScopedQuery};
use std::num::NonZeroU32;

fn nz(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn filters_part(query: &ScopedQuery) -> Vec<(String, String)> {
    query
        .pairs()
        .filter(|(k, _)| !QueryFields::is_pagination(k))
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

#[test]
fn fresh_view_sends_only_pagination() {
    let state = QueryState::new(nz(10))
        .with_filter(QueryFields::SEARCH, "")
        .with_filter(QueryFields::IS_PUBLISH, false)
        .with_filter(QueryFields::CATEGORY_ID, 0_i64);

    for actor in [None, Some(Actor::admin(1))] {
        let query = ScopedQuery::build(actor.as_ref(), &state);
        assert_eq!(query.to_query_string(), "perPage=10&currentPage=1");
        assert!(!query.to_query_string().contains("undefined"));
    }
}

#[test]
fn paging_leaves_filters_untouched() {
    let base = QueryState::new(nz(10))
        .with_filter(QueryFields::SEARCH, "pizza")
        .with_filter(QueryFields::IS_PUBLISH, true);
    let reference = filters_part(&ScopedQuery::build(None, &base));

    for (per_page, page) in [(10, 2), (25, 1), (50, 7)] {
        let mut state = base.clone();
        state.set_per_page(nz(per_page));
        state.set_page(nz(page));
        let query = ScopedQuery::build(None, &state);
        assert_eq!(filters_part(&query), reference);
        assert_eq!(query.get(QueryFields::PER_PAGE), Some(per_page.to_string().as_str()));
    }
}

#[test]
fn manager_scope_wins_over_any_requested_tenant() {
    let manager = Actor::manager(5, 7);
    for requested in [
        None,
        Some(FilterValue::from("9")),
        Some(FilterValue::from(9_i64)),
        Some(FilterValue::from("")),
    ] {
        let mut state = QueryState::new(nz(10));
        state.set_filter(QueryFields::TENANT_ID, requested).unwrap();
        let query = ScopedQuery::build(Some(&manager), &state);
        assert_eq!(query.get(QueryFields::TENANT_ID), Some("7"));
    }
}

#[test]
fn customer_without_tenant_sends_no_tenant() {
    let state = QueryState::new(nz(10)).with_filter(QueryFields::TENANT_ID, "9");
    let query = ScopedQuery::build(Some(&Actor::customer(3)), &state);
    assert_eq!(query.get(QueryFields::TENANT_ID), None);
}

#[test]
fn equal_states_render_equal_strings() {
    let a = QueryState::new(nz(10))
        .with_filter(QueryFields::ROLE, "manager")
        .with_filter(QueryFields::SEARCH, "ann");
    let b = QueryState::new(nz(10))
        .with_filter(QueryFields::SEARCH, "ann")
        .with_filter(QueryFields::ROLE, "manager");
    assert_eq!(
        ScopedQuery::build(None, &a).to_query_string(),
        ScopedQuery::build(None, &b).to_query_string()
    );
}
