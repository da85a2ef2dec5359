//! Plain data shared across the storefront: catalog records, build drafts, cart lines,
//! checkout drafts and submitted orders.
//!
//! Everything that is persisted or sent over the wire derives `Serialize`/`Deserialize`.
//! `CatalogProduct`, `Cart` and `SubmittedOrder` are also managed by actors; their
//! [`ActorEntity`](storefront_actor::ActorEntity) impls live next to each actor.

pub mod build;
pub mod cart;
pub mod checkout;
pub mod order;
pub mod product;

pub use build::*;
pub use cart::*;
pub use checkout::*;
pub use order::*;
pub use product::*;
