//! Client trait for the auth and catalog services.

use async_trait::async_trait;
use console_sdk::ListPage;

use crate::error::CatalogError;
use crate::models::{
    Category, CreateTenant, CreateUser, Product, Tenant, TenantId, User, UserId,
};
use crate::multipart::MultipartForm;

/// Every remote call the console makes.
///
/// A transport implementation maps each method to the matching
/// [`crate::Endpoint`]. List methods take the canonical query string.
///
/// # Errors
///
/// Non-2xx responses surface as [`CatalogError::Remote`] with a display
/// message extracted from the body.
#[async_trait]
pub trait CatalogClientV1: Send + Sync {
    async fn list_users(&self, query: &str) -> Result<ListPage<User>, CatalogError>;

    async fn create_user(&self, user: &CreateUser) -> Result<(), CatalogError>;

    async fn update_user(&self, id: UserId, user: &CreateUser) -> Result<(), CatalogError>;

    async fn list_tenants(&self, query: &str) -> Result<ListPage<Tenant>, CatalogError>;

    async fn create_tenant(&self, tenant: &CreateTenant) -> Result<(), CatalogError>;

    async fn update_tenant(&self, id: TenantId, tenant: &CreateTenant)
    -> Result<(), CatalogError>;

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError>;

    async fn get_category(&self, id: &str) -> Result<Category, CatalogError>;

    async fn list_products(&self, query: &str) -> Result<ListPage<Product>, CatalogError>;

    /// `POST /products` with a `multipart/form-data` body.
    async fn create_product(&self, form: MultipartForm) -> Result<(), CatalogError>;
}
