#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Console flows against an in-memory catalog service.

use async_trait::async_trait;
use catalog_console::{CatalogConsole, ConsoleConfig, ListKind, SubmissionError};
use catalog_sdk::{
    CatalogClientV1, CatalogError, Category, CreateTenant, CreateUser, FileUpload, MultipartForm,
    PriceType, Product, Tenant, TenantId, User, UserId,
};
use console_query::Actor;
use console_sdk::{FilterFieldChange, ListPage};
use http::StatusCode;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

#[derive(Default)]
struct FakeCatalog {
    tenants: Mutex<Vec<Tenant>>,
    queries: Mutex<Vec<(&'static str, String)>>,
    products: Mutex<Vec<MultipartForm>>,
    reject_tenants: Mutex<Option<String>>,
}

impl FakeCatalog {
    fn queries(&self, list: &str) -> Vec<String> {
        self.queries
            .lock()
            .iter()
            .filter(|(l, _)| *l == list)
            .map(|(_, q)| q.clone())
            .collect()
    }
}

#[async_trait]
impl CatalogClientV1 for FakeCatalog {
    async fn list_users(&self, query: &str) -> Result<ListPage<User>, CatalogError> {
        self.queries.lock().push(("users", query.to_owned()));
        Ok(ListPage::new(vec![], 0))
    }

    async fn create_user(&self, _user: &CreateUser) -> Result<(), CatalogError> {
        Ok(())
    }

    async fn update_user(&self, _id: UserId, _user: &CreateUser) -> Result<(), CatalogError> {
        Ok(())
    }

    async fn list_tenants(&self, query: &str) -> Result<ListPage<Tenant>, CatalogError> {
        self.queries.lock().push(("tenants", query.to_owned()));
        let tenants = self.tenants.lock().clone();
        let total = tenants.len() as u64;
        Ok(ListPage::new(tenants, total))
    }

    async fn create_tenant(&self, tenant: &CreateTenant) -> Result<(), CatalogError> {
        if let Some(message) = self.reject_tenants.lock().clone() {
            return Err(CatalogError::Remote {
                status: StatusCode::CONFLICT,
                message,
            });
        }
        let mut tenants = self.tenants.lock();
        let id = tenants.len() as TenantId + 1;
        tenants.push(Tenant {
            id,
            name: tenant.name.clone(),
            address: tenant.address.clone(),
            created_at: None,
        });
        Ok(())
    }

    async fn update_tenant(&self, _id: TenantId, _t: &CreateTenant) -> Result<(), CatalogError> {
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(vec![pizza()])
    }

    async fn get_category(&self, id: &str) -> Result<Category, CatalogError> {
        if id == "c1" {
            Ok(pizza())
        } else {
            Err(CatalogError::Remote {
                status: StatusCode::NOT_FOUND,
                message: "Category not found".to_owned(),
            })
        }
    }

    async fn list_products(&self, query: &str) -> Result<ListPage<Product>, CatalogError> {
        self.queries.lock().push(("products", query.to_owned()));
        Ok(ListPage::new(vec![], 0))
    }

    async fn create_product(&self, form: MultipartForm) -> Result<(), CatalogError> {
        self.products.lock().push(form);
        Ok(())
    }
}

fn pizza() -> Category {
    serde_json::from_value(json!({
        "_id": "c1",
        "name": "Pizza",
        "priceConfiguration": {
            "Size": { "priceType": "base", "availableOptions": ["Small", "Large"] },
            "Crust": { "priceType": "additional", "availableOptions": ["Thin"] }
        },
        "attributes": [
            {
                "name": "Spiciness",
                "widgetType": "radio",
                "defaultValue": "Mild",
                "availableOptions": ["Mild", "Hot"]
            }
        ]
    }))
    .unwrap()
}

fn console(actor: Actor) -> (Arc<FakeCatalog>, CatalogConsole) {
    let fake = Arc::new(FakeCatalog::default());
    let console = CatalogConsole::new(fake.clone(), actor, ConsoleConfig::default());
    (fake, console)
}

async fn until(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    cond()
}

#[tokio::test]
async fn non_admin_is_redirected_before_any_fetch() {
    let (fake, console) = console(Actor::manager(2, 7));

    let err = console.users_view().err().unwrap();
    assert_eq!(err.to, "/");
    assert_eq!(err.list, ListKind::Users.name());
    assert!(console.tenants_view().is_err());

    tokio::task::yield_now().await;
    assert!(fake.queries.lock().is_empty());
}

#[tokio::test]
async fn manager_products_are_scoped_to_own_tenant() {
    let (fake, console) = console(Actor::manager(2, 7));
    let view = console.products_view();
    view.settled().await.unwrap();

    // An attempt to look at another tenant is overridden by the scope.
    view.apply_filters([FilterFieldChange::set("tenantId", "99")]);
    view.apply_filters([FilterFieldChange::set("isPublish", true)]);
    assert!(until(|| fake.queries("products").len() == 2).await);

    assert_eq!(
        fake.queries("products"),
        [
            "perPage=10&currentPage=1&tenantId=7",
            "perPage=10&currentPage=1&isPublish=true&tenantId=7",
        ]
    );
    view.unmount().await;
}

#[tokio::test]
async fn admin_tenant_list_starts_with_plain_pagination() {
    let (fake, console) = console(Actor::admin(1));
    let view = console.tenants_view().unwrap();
    let snapshot = view.settled().await.unwrap();

    assert_eq!(fake.queries("tenants"), ["perPage=10&currentPage=1"]);
    assert_eq!(snapshot.range().to_string(), "Showing 0-0 of 0 items");
    view.unmount().await;
}

#[tokio::test]
async fn created_tenant_appears_after_invalidation() {
    let (fake, console) = console(Actor::admin(1));
    let view = console.tenants_view().unwrap();
    view.settled().await.unwrap();

    let mut editor = console.tenant_editor();
    editor.open_create();
    editor.values_mut().name = "Pizza Hub".to_owned();
    editor.values_mut().address = "Main st 1".to_owned();
    editor.submit().await.unwrap();

    assert!(!editor.state().is_open());
    assert!(editor.state().values().name.is_empty());
    assert!(until(|| view.snapshot().rows().len() == 1).await);
    assert_eq!(view.snapshot().rows()[0].name, "Pizza Hub");
    assert_eq!(fake.queries("tenants").len(), 2);
    view.unmount().await;
}

#[tokio::test]
async fn rejected_tenant_keeps_editor_open() {
    let (fake, console) = console(Actor::admin(1));
    *fake.reject_tenants.lock() = Some("Tenant already exists".to_owned());

    let mut editor = console.tenant_editor();
    editor.open_create();
    editor.values_mut().name = "Pizza Hub".to_owned();
    editor.values_mut().address = "Main st 1".to_owned();
    let err = editor.submit().await.unwrap_err();

    assert!(matches!(err, SubmissionError::Mutation(_)));
    assert!(editor.state().is_open());
    assert_eq!(editor.state().values().name, "Pizza Hub");
    assert_eq!(
        editor.state().error(),
        Some("HTTP 409 Conflict: Tenant already exists")
    );
}

#[tokio::test]
async fn invalid_tenant_form_is_not_sent() {
    let (fake, console) = console(Actor::admin(1));
    let mut editor = console.tenant_editor();
    editor.open_create();
    editor.values_mut().name = "Pizza Hub".to_owned();

    let err = editor.submit().await.unwrap_err();

    assert!(matches!(err, SubmissionError::MissingFields(ref f) if f == &["address"]));
    assert!(editor.state().is_open());
    assert!(fake.tenants.lock().is_empty());
}

#[tokio::test]
async fn manager_product_is_filed_under_own_tenant() {
    let (fake, console) = console(Actor::manager(2, 7));
    let mut values = console.product_form_for_category("c1").await.unwrap();
    values.name = "Margherita".to_owned();
    values.description = "Classic".to_owned();
    values.tenant_id = Some("99".to_owned());
    values.image = Some(FileUpload {
        file_name: "m.png".to_owned(),
        content_type: mime::IMAGE_PNG,
        data: bytes::Bytes::from_static(b"\x89PNG"),
    });
    let size = values
        .pricing
        .entries()
        .map(|(key, _)| key.clone())
        .find(|key| key.price_type == PriceType::Base)
        .unwrap();
    values.pricing.set_price(size.clone(), "Small", 400);
    values.pricing.set_price(size, "Large", 700);
    let crust = values
        .pricing
        .entries()
        .map(|(key, _)| key.clone())
        .find(|key| key.price_type == PriceType::Additional)
        .unwrap();
    values.pricing.set_price(crust, "Thin", 50);

    let mut editor = console.product_editor();
    editor.open_create_with(values);
    editor.submit().await.unwrap();

    let forms = fake.products.lock();
    let form = forms.first().unwrap();
    assert_eq!(form.get_text("tenantId"), Some("7"));
    assert_eq!(form.get_text("categoryId"), Some("c1"));
    assert_eq!(form.get_text("isPublish"), Some("false"));
    let pricing: serde_json::Value =
        serde_json::from_str(form.get_text("priceConfiguration").unwrap()).unwrap();
    assert_eq!(
        pricing,
        json!({
            "Crust": { "priceType": "additional", "availableOptions": { "Thin": 50 } },
            "Size": { "priceType": "base", "availableOptions": { "Large": 700, "Small": 400 } }
        })
    );
    assert_eq!(
        form.get_text("attributes"),
        Some(r#"[{"name":"Spiciness","value":"Mild"}]"#)
    );
}

#[tokio::test]
async fn tenant_options_fetch_one_large_page() {
    let (fake, console) = console(Actor::admin(1));
    console.tenant_options().await.unwrap();
    assert_eq!(fake.queries("tenants"), ["perPage=100&currentPage=1"]);
}

#[tokio::test]
async fn unknown_category_surfaces_remote_message() {
    let (_fake, console) = console(Actor::admin(1));
    let err = console.product_form_for_category("nope").await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 404 Not Found: Category not found");
}
