//! # Order Actor
//!
//! The in-process order backend. It keeps every [`SubmittedOrder`] it accepts, assigns ids
//! (`ORD000001`, `ORD000002`, ...) and validates each draft against the catalog before
//! accepting it. Orders are never changed after creation.
//!
//! The actor's context is a [`CatalogClient`](crate::clients::CatalogClient); run it with a
//! client for the same catalog the cart was filled from.
//!
//! ```rust
//! use pc_storefront::{catalog_actor, order_actor};
//! use pc_storefront::clients::{CatalogClient, OrderClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (catalog_actor, catalog) = catalog_actor::new();
//!     let (order_actor, orders) = order_actor::new();
//!     tokio::spawn(catalog_actor.run(()));
//!     tokio::spawn(order_actor.run(CatalogClient::new(catalog)));
//!     let _orders = OrderClient::new(orders);
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::SubmittedOrder;
use storefront_actor::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new() -> (ResourceActor<SubmittedOrder>, ResourceClient<SubmittedOrder>) {
    ResourceActor::new(32)
}
