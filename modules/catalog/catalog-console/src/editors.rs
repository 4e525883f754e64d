//! Tenant, user and product editors.
//!
//! Each editor pairs the modal form state with a [`MutationCoordinator`]
//! whose backend forwards to [`CatalogClientV1`].

use crate::domain::{
    ProductFormValues, ProductPayload, SubmissionError, TenantFormValues, UserFormValues,
};
use crate::views::ListKind;
use async_trait::async_trait;
use catalog_sdk::{
    CatalogClientV1, CatalogError, CreateTenant, CreateUser, DocumentId, MultipartForm, Product,
    Tenant, TenantId, User, UserId,
};
use console_query::Actor;
use console_sdk::{Editor, EditorMode, MutationCoordinator, Mutations, QueryCache};
use std::sync::Arc;

pub struct TenantBackend {
    client: Arc<dyn CatalogClientV1>,
}

#[async_trait]
impl Mutations for TenantBackend {
    type Id = TenantId;
    type Payload = CreateTenant;
    type Error = CatalogError;

    async fn create(&self, payload: CreateTenant) -> Result<(), CatalogError> {
        self.client.create_tenant(&payload).await
    }

    async fn update(&self, id: &TenantId, payload: CreateTenant) -> Result<(), CatalogError> {
        self.client.update_tenant(*id, &payload).await
    }
}

pub struct UserBackend {
    client: Arc<dyn CatalogClientV1>,
}

#[async_trait]
impl Mutations for UserBackend {
    type Id = UserId;
    type Payload = CreateUser;
    type Error = CatalogError;

    async fn create(&self, payload: CreateUser) -> Result<(), CatalogError> {
        self.client.create_user(&payload).await
    }

    async fn update(&self, id: &UserId, payload: CreateUser) -> Result<(), CatalogError> {
        self.client.update_user(*id, &payload).await
    }
}

pub struct ProductBackend {
    client: Arc<dyn CatalogClientV1>,
}

#[async_trait]
impl Mutations for ProductBackend {
    type Id = DocumentId;
    type Payload = MultipartForm;
    type Error = CatalogError;

    async fn create(&self, payload: MultipartForm) -> Result<(), CatalogError> {
        self.client.create_product(payload).await
    }

    async fn update(&self, id: &DocumentId, _payload: MultipartForm) -> Result<(), CatalogError> {
        Err(CatalogError::InvalidRequest(format!(
            "product {id} cannot be updated: the catalog service only accepts new products"
        )))
    }
}

/// Turns editor values into the backend payload.
pub trait FormPayload<M: Mutations> {
    /// # Errors
    /// Validation failures of the form.
    fn payload(&self, mode: EditorMode, actor: &Actor) -> Result<M::Payload, SubmissionError>;
}

impl FormPayload<TenantBackend> for TenantFormValues {
    fn payload(&self, _mode: EditorMode, _actor: &Actor) -> Result<CreateTenant, SubmissionError> {
        self.to_payload()
    }
}

impl FormPayload<UserBackend> for UserFormValues {
    fn payload(&self, mode: EditorMode, _actor: &Actor) -> Result<CreateUser, SubmissionError> {
        self.to_payload(mode)
    }
}

impl FormPayload<ProductBackend> for ProductFormValues {
    fn payload(&self, _mode: EditorMode, actor: &Actor) -> Result<MultipartForm, SubmissionError> {
        ProductPayload::build(actor, self)?.to_multipart()
    }
}

/// Modal editor bound to one list.
pub struct EntityEditor<V, M: Mutations> {
    actor: Actor,
    editor: Editor<V, M::Id>,
    coordinator: MutationCoordinator<M>,
}

pub type TenantEditor = EntityEditor<TenantFormValues, TenantBackend>;
pub type UserEditor = EntityEditor<UserFormValues, UserBackend>;
pub type ProductEditor = EntityEditor<ProductFormValues, ProductBackend>;

impl<V, M> EntityEditor<V, M>
where
    V: Default + FormPayload<M>,
    M: Mutations<Error = CatalogError>,
{
    fn new(actor: Actor, backend: M, cache: Arc<QueryCache>, list: &str) -> Self {
        Self {
            actor,
            editor: Editor::new(),
            coordinator: MutationCoordinator::new(backend, cache, list),
        }
    }

    pub fn open_create(&mut self) {
        self.editor.open_create();
    }

    /// Open for a new entity with pre-filled values (e.g. a category skeleton).
    pub fn open_create_with(&mut self, values: V) {
        self.editor.open_create();
        *self.editor.values_mut() = values;
    }

    pub fn open_edit(&mut self, id: M::Id, values: V) {
        self.editor.open_edit(id, values);
    }

    pub fn close(&mut self) {
        self.editor.close();
    }

    #[must_use]
    pub fn state(&self) -> &Editor<V, M::Id> {
        &self.editor
    }

    pub fn values_mut(&mut self) -> &mut V {
        self.editor.values_mut()
    }

    /// Validate and send the form.
    ///
    /// Validation failures and remote errors leave the editor open with its
    /// values and the error message; success closes and resets it.
    ///
    /// # Errors
    /// The validation or mutation failure.
    pub async fn submit(&mut self) -> Result<(), SubmissionError> {
        let payload = match self.editor.values().payload(self.editor.mode(), &self.actor) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::debug!(error = %err, "editor submission blocked by validation");
                self.editor.set_error(err.to_string());
                return Err(err);
            }
        };
        self.coordinator.submit(&mut self.editor, payload).await?;
        Ok(())
    }
}

impl TenantEditor {
    pub(crate) fn tenants(
        actor: Actor,
        client: Arc<dyn CatalogClientV1>,
        cache: Arc<QueryCache>,
    ) -> Self {
        Self::new(actor, TenantBackend { client }, cache, ListKind::Tenants.name())
    }

    pub fn edit(&mut self, tenant: &Tenant) {
        self.open_edit(tenant.id, TenantFormValues::from_tenant(tenant));
    }
}

impl UserEditor {
    pub(crate) fn users(
        actor: Actor,
        client: Arc<dyn CatalogClientV1>,
        cache: Arc<QueryCache>,
    ) -> Self {
        Self::new(actor, UserBackend { client }, cache, ListKind::Users.name())
    }

    pub fn edit(&mut self, user: &User) {
        self.open_edit(user.id, UserFormValues::from_user(user));
    }
}

impl ProductEditor {
    pub(crate) fn products(
        actor: Actor,
        client: Arc<dyn CatalogClientV1>,
        cache: Arc<QueryCache>,
    ) -> Self {
        Self::new(actor, ProductBackend { client }, cache, ListKind::Products.name())
    }

    pub fn edit(&mut self, product: &Product) {
        self.open_edit(product.id.clone(), ProductFormValues::from_product(product));
    }
}
