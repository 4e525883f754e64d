//! Read and write models of the auth and catalog services.
//!
//! Field names follow the services' JSON (`camelCase`, `_id` for catalog
//! documents).

use crate::pricing::{Attribute, CanonicalPricing, PriceType};
use chrono::{DateTime, Utc};
use console_query::{Actor, Role, TenantRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type TenantId = u64;
pub type UserId = u64;
/// Catalog document id (`_id`).
pub type DocumentId = String;

/// A tenant (restaurant).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A console user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Tenant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Scoping projection of this user.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
            tenant: self.tenant.as_ref().map(|t| TenantRef { id: t.id }),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body of `POST /tenants` and `PATCH /tenants/:id`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub address: String,
}

/// Body of `POST /users` and `PATCH /users/:id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
}

/// Pricing dimension declared by a category: the option labels only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPriceConfiguration {
    pub price_type: PriceType,
    pub available_options: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Switch,
    Radio,
}

/// Attribute declared by a category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAttribute {
    pub name: String,
    pub widget_type: WidgetType,
    #[serde(default)]
    pub default_value: serde_json::Value,
    #[serde(default)]
    pub available_options: Vec<String>,
}

/// A product category and the schema of its pricing and attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    #[serde(default)]
    pub price_configuration: BTreeMap<String, CategoryPriceConfiguration>,
    #[serde(default)]
    pub attributes: Vec<CategoryAttribute>,
}

/// A catalog product as returned by `GET /products`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<DocumentId>,
    /// The catalog service stores tenant ids as strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub is_publish: bool,
    #[serde(default)]
    pub price_configuration: CanonicalPricing,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
