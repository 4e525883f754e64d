#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Catalog SDK
//!
//! Public contract between the catalog console and the services behind it:
//!
//! - [`CatalogClientV1`] - remote calls consumed by the console
//! - [`Endpoint`] - method and path of each call
//! - [`User`], [`Tenant`], [`Category`], [`Product`] - wire models
//! - [`CanonicalPricing`], [`Attribute`] - pricing and attribute wire shape
//! - [`MultipartForm`] - product upload body
//! - [`CatalogError`] - error type

pub mod api;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod multipart;
pub mod pricing;

pub use api::CatalogClientV1;
pub use endpoints::{AUTH_SERVICE, CATALOG_SERVICE, Endpoint};
pub use error::CatalogError;
pub use models::{
    Category, CategoryAttribute, CategoryPriceConfiguration, CreateTenant, CreateUser, DocumentId,
    Product, Tenant, TenantId, User, UserId, WidgetType,
};
pub use multipart::{FileUpload, MultipartForm, MultipartPart};
pub use pricing::{Attribute, CanonicalPricing, PriceConfiguration, PriceType};
