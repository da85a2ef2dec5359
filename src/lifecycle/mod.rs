//! # Storefront Lifecycle
//!
//! Starting, wiring and stopping the actors behind one storefront session.
//!
//! ## Wiring
//!
//! Actors are created without dependencies and receive them through `run(context)`:
//!
//! | Actor | Context |
//! |---|---|
//! | Catalog | `()` |
//! | Cart | [`CartStorage`](crate::cart_actor::CartStorage): key-value store and key |
//! | Order | [`CatalogClient`](crate::clients::CatalogClient), to check product lines |
//!
//! With `order_api_url` configured, no order actor is started and submissions go to
//! [`HttpOrderBackend`](crate::backend::HttpOrderBackend).
//!
//! ## Shutdown
//!
//! 1. Drop every client, closing the mailboxes
//! 2. Each actor drains and leaves its loop
//! 3. Await the actor tasks
//!
//! The dependency graph is acyclic (order → catalog), so channel closure is enough.
//!
//! ## Tracing
//!
//! [`setup_tracing`] installs the compact `RUST_LOG`-driven subscriber.

pub mod storefront;

pub use storefront::*;
pub use storefront_actor::tracing::setup_tracing;
