//! # Catalog Actor
//!
//! An in-process catalog snapshot: the products a demo or test session can browse, put in a
//! cart or pick for a build. The storefront reads it through
//! [`CatalogSource`](crate::clients::CatalogSource), so a remote catalog can replace it.
//!
//! ## Structure
//!
//! - [`entity`]: [`ActorEntity`](storefront_actor::ActorEntity) for
//!   [`CatalogProduct`](crate::model::CatalogProduct)
//! - [`actions`]: [`CatalogAction`] (read-only stock check)
//! - [`error`]: [`CatalogError`]
//! - [`new()`]: factory for the actor and its client
//!
//! ## Usage
//!
//! ```rust
//! use pc_storefront::catalog_actor;
//! use pc_storefront::clients::{CatalogClient, CatalogSource};
//! use pc_storefront::model::{ProductCreate, ProductFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = catalog_actor::new();
//!     let catalog = CatalogClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     catalog
//!         .create_product(ProductCreate::new("GPU001", "RTX 4060", "GPU", 7_990_000, 3))
//!         .await?;
//!
//!     let page = catalog.list_products(&ProductFilter::category("GPU")).await?;
//!     assert_eq!(page.total, 1);
//!     assert_eq!(catalog.check_stock("GPU001".into()).await?, 3);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::CatalogProduct;
use storefront_actor::{ResourceActor, ResourceClient};

/// Creates a new Catalog actor and its client.
pub fn new() -> (ResourceActor<CatalogProduct>, ResourceClient<CatalogProduct>) {
    ResourceActor::new(64)
}
