//! List screens: users, tenants and products.
//!
//! A [`ListView`] owns the filter reducer of one mounted screen and the
//! controller that keeps its rows in sync.

use catalog_sdk::CatalogError;
use console_query::{Actor, QueryError, QueryFields, QueryState};
use console_sdk::{
    FilterFieldChange, FilterReducer, ListController, ListPage, ListSnapshot, QueryCache,
};
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    Users,
    Tenants,
    Products,
}

impl ListKind {
    /// Cache namespace of the list.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Tenants => "tenants",
            Self::Products => "products",
        }
    }

    #[must_use]
    pub const fn admin_only(self) -> bool {
        matches!(self, Self::Users | Self::Tenants)
    }
}

/// Outcome of the mount guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(&'static str),
}

/// Admin-only screens send everyone else to the landing page.
#[must_use]
pub fn access(kind: ListKind, actor: &Actor) -> Access {
    if kind.admin_only() && !actor.is_admin() {
        Access::Redirect("/")
    } else {
        Access::Granted
    }
}

/// Query state a freshly mounted screen starts from.
///
/// The products screen of a manager starts filtered to their tenant; the
/// builder enforces the same scope on every request anyway.
#[must_use]
pub fn initial_query(kind: ListKind, actor: &Actor, per_page: NonZeroU32) -> QueryState {
    let state = QueryState::new(per_page);
    match (kind, actor.tenant_id()) {
        (ListKind::Products, Some(tenant)) if !actor.is_admin() => {
            state.with_filter(QueryFields::TENANT_ID, tenant.to_string())
        }
        _ => state,
    }
}

/// One mounted list screen.
pub struct ListView<T> {
    kind: ListKind,
    reducer: FilterReducer,
    controller: ListController<T>,
}

impl<T> ListView<T>
where
    T: Send + Sync + 'static,
{
    pub(crate) fn mount<F, Fut>(
        kind: ListKind,
        actor: &Actor,
        cache: Arc<QueryCache>,
        per_page: NonZeroU32,
        debounce: Duration,
        fetcher: F,
    ) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ListPage<T>, CatalogError>> + Send + 'static,
    {
        let reducer = FilterReducer::new(initial_query(kind, actor, per_page), debounce);
        let controller = ListController::spawn(
            kind.name(),
            Some(actor.clone()),
            cache,
            reducer.subscribe(),
            fetcher,
        );
        tracing::debug!(list = kind.name(), actor = actor.id, "mounted list view");
        Self {
            kind,
            reducer,
            controller,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// Feed one batch of filter-form edits.
    pub fn apply_filters<I>(&self, changes: I)
    where
        I: IntoIterator<Item = FilterFieldChange>,
    {
        self.reducer.apply(changes);
    }

    /// # Errors
    /// `QueryError::InvalidPage` for page 0.
    pub fn set_page(&self, page: u32) -> Result<(), QueryError> {
        self.reducer.set_page(page)
    }

    /// # Errors
    /// `QueryError::InvalidPageSize` for size 0.
    pub fn set_page_size(&self, per_page: u32) -> Result<(), QueryError> {
        self.reducer.set_page_size(per_page)
    }

    #[must_use]
    pub fn query(&self) -> QueryState {
        self.reducer.current()
    }

    #[must_use]
    pub fn has_pending_search(&self) -> bool {
        self.reducer.has_pending_search()
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.controller.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<T>> {
        self.controller.subscribe()
    }

    pub async fn settled(&self) -> Option<ListSnapshot<T>> {
        self.controller.settled().await
    }

    /// Cancel the pending search and stop the list driver.
    pub async fn unmount(self) {
        self.reducer.shutdown();
        self.controller.unmount().await;
        tracing::debug!(list = self.kind.name(), "unmounted list view");
    }
}
