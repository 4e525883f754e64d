#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! # Catalog console
//!
//! Core of the catalog administration console, independent of any UI:
//!
//! - [`CatalogConsole`] - entry point bound to the signed-in actor; mounts
//!   list views and hands out editors
//! - [`views`] - users, tenants and products screens with the admin guard
//! - [`domain`] - pricing/attribute transformer and form validation
//! - [`editors`] - tenant, user and product editors over the mutation
//!   coordinator
//! - [`config`] and [`telemetry`] - host-side configuration and logging
//!
//! ```rust,no_run
//! use catalog_console::{CatalogConsole, ConsoleConfig};
//! use catalog_sdk::CatalogClientV1;
//! use console_query::Actor;
//! use std::sync::Arc;
//!
//! # async fn run(client: Arc<dyn CatalogClientV1>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsoleConfig::load(None)?;
//! let console = CatalogConsole::new(client, Actor::manager(1, 7), config);
//!
//! let products = console.products_view();
//! if let Some(page) = products.settled().await {
//!     println!("{}", page.range());
//! }
//! products.unmount().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod console;
pub mod domain;
pub mod editors;
pub mod telemetry;
pub mod views;

pub use config::{ConfigError, ConsoleConfig, LoggingConfig};
pub use console::{CatalogConsole, Redirect};
pub use domain::{PriceKey, PricingError, PricingForm, ProductFormValues, SubmissionError};
pub use editors::{EntityEditor, ProductEditor, TenantEditor, UserEditor};
pub use telemetry::{TelemetryError, init_logging};
pub use views::{Access, ListKind, ListView};
