//! # Storefront Actor Runtime
//!
//! The runtime that every stateful part of the storefront sits on: the catalog snapshot, the
//! session cart and the order book are each one [`ResourceActor`] owning its resources, with
//! a cloneable [`ResourceClient`] in front.
//!
//! ## Why actors for a cart?
//!
//! The cart has exactly one owner. Every add, quantity change, removal and clear is a message
//! processed in arrival order by that owner, so totals are always computed from the lines the
//! actor holds at that moment and no caller can race another into a torn state. Persistence
//! happens inside the same loop, after each mutation.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): the resource and its business rules.
//! 2. **Runtime** ([`ResourceActor`]): mailbox loop, id assignment, change broadcast.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): typed async calls.
//!
//! ## Context Injection
//!
//! Dependencies arrive through `run(context)`, after construction. The storefront uses this
//! to hand the cart actor its durable storage and the order actor a catalog client:
//!
//! ```rust
//! use storefront_actor::{ActorEntity, ResourceActor, ResourceClient};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Warehouse { code: String }
//! #[derive(Debug)] struct WarehouseCreate { code: String }
//! #[derive(Debug)] struct WarehouseUpdate;
//! #[derive(Debug)] enum WarehouseAction {}
//! #[derive(Debug, thiserror::Error)] #[error("warehouse")] struct WarehouseError;
//!
//! #[async_trait]
//! impl ActorEntity for Warehouse {
//!     type Id = String; type Create = WarehouseCreate; type Update = WarehouseUpdate;
//!     type Action = WarehouseAction; type ActionResult = (); type Context = (); type Error = WarehouseError;
//!     fn assign_id(_: u32, p: &WarehouseCreate) -> String { p.code.clone() }
//!     fn from_create_params(code: String, _: WarehouseCreate) -> Result<Self, WarehouseError> { Ok(Self { code }) }
//!     async fn on_update(&mut self, _: WarehouseUpdate, _: &()) -> Result<(), WarehouseError> { Ok(()) }
//!     async fn handle_action(&mut self, _: WarehouseAction, _: &()) -> Result<(), WarehouseError> { Ok(()) }
//! }
//!
//! #[derive(Clone, Debug)] struct Transfer { id: u32, from: String }
//! #[derive(Debug)] struct TransferCreate { from: String }
//! #[derive(Debug)] struct TransferUpdate;
//! #[derive(Debug)] enum TransferAction {}
//! #[derive(Debug, thiserror::Error)] #[error("unknown warehouse {0}")] struct TransferError(String);
//!
//! #[async_trait]
//! impl ActorEntity for Transfer {
//!     type Id = u32; type Create = TransferCreate; type Update = TransferUpdate;
//!     type Action = TransferAction; type ActionResult = ();
//!     type Context = ResourceClient<Warehouse>;
//!     type Error = TransferError;
//!
//!     fn assign_id(seq: u32, _: &TransferCreate) -> u32 { seq }
//!     fn from_create_params(id: u32, p: TransferCreate) -> Result<Self, TransferError> {
//!         Ok(Self { id, from: p.from })
//!     }
//!     async fn on_create(&mut self, warehouses: &ResourceClient<Warehouse>) -> Result<(), TransferError> {
//!         match warehouses.get(self.from.clone()).await {
//!             Ok(Some(_)) => Ok(()),
//!             _ => Err(TransferError(self.from.clone())),
//!         }
//!     }
//!     async fn on_update(&mut self, _: TransferUpdate, _: &Self::Context) -> Result<(), TransferError> { Ok(()) }
//!     async fn handle_action(&mut self, _: TransferAction, _: &Self::Context) -> Result<(), TransferError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (warehouse_actor, warehouses) = ResourceActor::<Warehouse>::new(10);
//!     let (transfer_actor, transfers) = ResourceActor::<Transfer>::new(10);
//!     tokio::spawn(warehouse_actor.run(()));
//!     tokio::spawn(transfer_actor.run(warehouses.clone()));
//!
//!     warehouses.create(WarehouseCreate { code: "HN".into() }).await.unwrap();
//!     assert!(transfers.create(TransferCreate { from: "HN".into() }).await.is_ok());
//!     assert!(transfers.create(TransferCreate { from: "SG".into() }).await.is_err());
//! }
//! ```
//!
//! ## Change Subscriptions
//!
//! Every successful create, update, delete or mutating action is published as a
//! [`ResourceEvent`]. Interested components call [`ResourceClient::subscribe`] and own their
//! receiver; nothing is broadcast through global state.
//!
//! ## Testing
//!
//! See [`mock`] for scripted clients and raw mailbox helpers.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceEvent, ResourceRequest, Response};
