//! # PC Storefront
//!
//! Cart and checkout for a computer hardware shop: catalog products and custom-assembled PC
//! builds share one cart, the cart survives restarts, and checkout branches between cash on
//! delivery and bank transfer (in full or as a deposit) before an order reaches the backend.
//!
//! ## Flow
//!
//! ```text
//! Catalog ─▶ Build Configurator ─▶ Cart ─▶ Checkout ─▶ Order Submission ─▶ backend
//! ```
//!
//! ## Modules
//!
//! - [`model`]: plain data (products, build drafts, cart lines, orders)
//! - [`catalog_actor`], [`cart_actor`], [`order_actor`]: the stateful parts, each a
//!   [`ResourceActor`](storefront_actor::ResourceActor) with its own entity, actions and errors
//! - [`clients`]: typed handles to those actors, and the [`CatalogSource`](clients::CatalogSource)
//!   read interface
//! - [`configurator`]: slot-by-slot PC builds and the external build advisor
//! - [`checkout`]: the Form → PaymentDetails → Success workflow, payment amounts, and the
//!   order submission adapter
//! - [`backend`]: the [`OrderBackend`](backend::OrderBackend) interface and its REST client
//! - [`storage`]: key-value persistence for the cart
//! - [`config`]: CLI/environment configuration
//! - [`lifecycle`]: starting and stopping a whole [`Storefront`](lifecycle::Storefront)
//!
//! ## Error Handling
//!
//! Each actor and component has its own `thiserror` enum (`CartError`, `CheckoutError`,
//! `SubmissionError`, ...). Clients turn framework failures back into their domain error, so
//! a rejected zero-quantity add arrives as `CartError::InvalidQuantity`, not as a boxed
//! actor error.
//!
//! ## Testing
//!
//! Unit tests sit next to the code. `tests/` runs whole flows against real actors with
//! in-memory storage, and uses [`storefront_actor::mock`] where a dependency should be
//! scripted instead.

pub mod backend;
pub mod cart_actor;
pub mod catalog_actor;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod configurator;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod storage;
