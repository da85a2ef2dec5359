//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber used by the storefront binary.
//!
//! The format is compact and hides the module path (`with_target(false)`); actors identify
//! themselves through the `entity_type` field instead. Levels come from `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info cargo run    # state changes only
//! RUST_LOG=debug cargo run   # request payloads and reads
//! RUST_LOG=storefront_actor=debug,pc_storefront=info cargo run
//! ```
//!
//! A deposit checkout at `info` looks like:
//!
//! ```text
//! INFO Actor started entity_type="Cart"
//! INFO Created entity_type="Cart" id=cart_1 size=1
//! INFO Action ok entity_type="Cart" id=cart_1
//! INFO checkout:submit: Order accepted order_id=ORD000001 amount_to_pay=6000000
//! INFO checkout:submit: Checkout transition from="Form" to="PaymentDetails"
//! ```
//!
//! Payloads are logged with `?` at `debug` once, at the entry of each client call.

/// Initializes the global tracing subscriber from `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
