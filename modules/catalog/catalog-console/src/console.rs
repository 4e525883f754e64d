//! Console facade: one signed-in actor, one remote client, one shared cache.

use crate::config::ConsoleConfig;
use crate::domain::ProductFormValues;
use crate::editors::{ProductEditor, TenantEditor, UserEditor};
use crate::views::{Access, ListKind, ListView, access};
use catalog_sdk::{CatalogClientV1, CatalogError, Category, Product, Tenant, User};
use console_query::{Actor, QueryState, ScopedQuery};
use console_sdk::{ListPage, QueryCache};
use std::sync::Arc;

/// Mount refused by the access guard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{list} view is not available, redirecting to {to}")]
pub struct Redirect {
    pub list: &'static str,
    pub to: &'static str,
}

pub struct CatalogConsole {
    client: Arc<dyn CatalogClientV1>,
    cache: Arc<QueryCache>,
    actor: Actor,
    config: ConsoleConfig,
}

impl CatalogConsole {
    #[must_use]
    pub fn new(client: Arc<dyn CatalogClientV1>, actor: Actor, config: ConsoleConfig) -> Self {
        Self {
            client,
            cache: Arc::new(QueryCache::new()),
            actor,
            config,
        }
    }

    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    fn guard(&self, kind: ListKind) -> Result<(), Redirect> {
        match access(kind, &self.actor) {
            Access::Granted => Ok(()),
            Access::Redirect(to) => {
                tracing::info!(list = kind.name(), role = %self.actor.role, to, "list view redirected");
                Err(Redirect {
                    list: kind.name(),
                    to,
                })
            }
        }
    }

    fn mount<T, F, Fut>(&self, kind: ListKind, fetcher: F) -> ListView<T>
    where
        T: Send + Sync + 'static,
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ListPage<T>, CatalogError>> + Send + 'static,
    {
        ListView::mount(
            kind,
            &self.actor,
            Arc::clone(&self.cache),
            self.config.per_page,
            self.config.search_debounce(),
            fetcher,
        )
    }

    /// Mount the users screen. Admins only.
    ///
    /// # Errors
    /// [`Redirect`] for any other role; nothing is fetched.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn users_view(&self) -> Result<ListView<User>, Redirect> {
        self.guard(ListKind::Users)?;
        let client = Arc::clone(&self.client);
        Ok(self.mount(ListKind::Users, move |query| {
            let client = Arc::clone(&client);
            async move { client.list_users(&query).await }
        }))
    }

    /// Mount the tenants screen. Admins only.
    ///
    /// # Errors
    /// [`Redirect`] for any other role; nothing is fetched.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn tenants_view(&self) -> Result<ListView<Tenant>, Redirect> {
        self.guard(ListKind::Tenants)?;
        let client = Arc::clone(&self.client);
        Ok(self.mount(ListKind::Tenants, move |query| {
            let client = Arc::clone(&client);
            async move { client.list_tenants(&query).await }
        }))
    }

    /// Mount the products screen, scoped to the actor's tenant for non-admins.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn products_view(&self) -> ListView<Product> {
        let client = Arc::clone(&self.client);
        self.mount(ListKind::Products, move |query| {
            let client = Arc::clone(&client);
            async move { client.list_products(&query).await }
        })
    }

    #[must_use]
    pub fn tenant_editor(&self) -> TenantEditor {
        TenantEditor::tenants(
            self.actor.clone(),
            Arc::clone(&self.client),
            Arc::clone(&self.cache),
        )
    }

    #[must_use]
    pub fn user_editor(&self) -> UserEditor {
        UserEditor::users(
            self.actor.clone(),
            Arc::clone(&self.client),
            Arc::clone(&self.cache),
        )
    }

    #[must_use]
    pub fn product_editor(&self) -> ProductEditor {
        ProductEditor::products(
            self.actor.clone(),
            Arc::clone(&self.client),
            Arc::clone(&self.cache),
        )
    }

    /// First page of tenants for the product form's tenant picker.
    ///
    /// # Errors
    /// The remote failure.
    pub async fn tenant_options(&self) -> Result<Vec<Tenant>, CatalogError> {
        let state = QueryState::new(self.config.tenant_options_page_size);
        let query = ScopedQuery::build(None, &state).to_query_string();
        Ok(self.client.list_tenants(&query).await?.data)
    }

    /// # Errors
    /// The remote failure.
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.client.list_categories().await
    }

    /// # Errors
    /// The remote failure.
    pub async fn category(&self, id: &str) -> Result<Category, CatalogError> {
        self.client.get_category(id).await
    }

    /// Fresh product form for the chosen category.
    ///
    /// # Errors
    /// The remote failure while loading the category.
    pub async fn product_form_for_category(
        &self,
        id: &str,
    ) -> Result<ProductFormValues, CatalogError> {
        let category = self.category(id).await?;
        Ok(ProductFormValues::for_category(&category))
    }
}
