//! # Cart Actor
//!
//! Owns the session cart. Every mutation is a [`CartAction`] processed by one
//! [`ResourceActor`], so lines are changed in the order requests arrive and totals are always
//! computed from a consistent line list.
//!
//! ## Structure
//!
//! - [`entity`]: [`ActorEntity`](storefront_actor::ActorEntity) for [`Cart`], plus
//!   [`CartStorage`], the actor context that loads and saves the lines
//! - [`actions`]: [`CartAction`] and [`CartActionResult`]
//! - [`error`]: [`CartError`]
//! - [`new()`]: factory for the actor and its client
//!
//! ## Usage
//!
//! ```rust
//! use pc_storefront::cart_actor::{self, CartStorage};
//! use pc_storefront::clients::CartClient;
//! use pc_storefront::model::CatalogProduct;
//! use pc_storefront::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = cart_actor::new();
//!     tokio::spawn(actor.run(CartStorage::new(Arc::new(MemoryStore::new()), "cart")));
//!
//!     let cart = CartClient::open(generic_client).await?;
//!     let cpu = CatalogProduct::new("CPU001", "Intel Core i7-13700K", 15_990_000, 5);
//!     cart.add_product(cpu.clone(), 2).await?;
//!     cart.add_product(cpu, 3).await?;
//!
//!     assert_eq!(cart.item_count().await?, 5);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::CartStorage;
pub use error::*;

use crate::model::Cart;
use storefront_actor::{ResourceActor, ResourceClient};

/// Creates a new Cart actor and its client.
///
/// Open the session cart with [`CartClient::open`](crate::clients::CartClient::open) once the
/// actor is running.
pub fn new() -> (ResourceActor<Cart>, ResourceClient<Cart>) {
    ResourceActor::new(32)
}
