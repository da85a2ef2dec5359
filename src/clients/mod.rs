//! Type-safe wrappers around [`ResourceClient`](storefront_actor::ResourceClient), one per
//! actor, plus the [`CatalogSource`] read interface.

pub mod cart_client;
pub mod catalog_client;
pub mod order_client;

pub use cart_client::*;
pub use catalog_client::*;
pub use order_client::*;
