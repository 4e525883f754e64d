//! Method and path of every service call the console makes.
//!
//! Paths are relative to the gateway origin and include the service prefix.
//! List paths take the canonical query string produced by
//! `console_query::ScopedQuery`.

use crate::models::{TenantId, UserId};
use http::Method;

pub const AUTH_SERVICE: &str = "/api/auth";
pub const CATALOG_SERVICE: &str = "/api/catalog";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
}

impl Endpoint {
    fn new(method: Method, path: String) -> Self {
        Self { method, path }
    }

    #[must_use]
    pub fn list_users(query: &str) -> Self {
        Self::new(Method::GET, with_query(format!("{AUTH_SERVICE}/users"), query))
    }

    #[must_use]
    pub fn create_user() -> Self {
        Self::new(Method::POST, format!("{AUTH_SERVICE}/users"))
    }

    #[must_use]
    pub fn update_user(id: UserId) -> Self {
        Self::new(Method::PATCH, format!("{AUTH_SERVICE}/users/{id}"))
    }

    #[must_use]
    pub fn list_tenants(query: &str) -> Self {
        Self::new(Method::GET, with_query(format!("{AUTH_SERVICE}/tenants"), query))
    }

    #[must_use]
    pub fn create_tenant() -> Self {
        Self::new(Method::POST, format!("{AUTH_SERVICE}/tenants"))
    }

    #[must_use]
    pub fn update_tenant(id: TenantId) -> Self {
        Self::new(Method::PATCH, format!("{AUTH_SERVICE}/tenants/{id}"))
    }

    #[must_use]
    pub fn list_categories() -> Self {
        Self::new(Method::GET, format!("{CATALOG_SERVICE}/categories"))
    }

    #[must_use]
    pub fn get_category(id: &str) -> Self {
        Self::new(Method::GET, format!("{CATALOG_SERVICE}/categories/{id}"))
    }

    #[must_use]
    pub fn list_products(query: &str) -> Self {
        Self::new(
            Method::GET,
            with_query(format!("{CATALOG_SERVICE}/products"), query),
        )
    }

    #[must_use]
    pub fn create_product() -> Self {
        Self::new(Method::POST, format!("{CATALOG_SERVICE}/products"))
    }
}

fn with_query(mut path: String, query: &str) -> String {
    if !query.is_empty() {
        path.push('?');
        path.push_str(query);
    }
    path
}
