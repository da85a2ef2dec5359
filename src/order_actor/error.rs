//! Error types for the Order actor.

use thiserror::Error;

/// Reasons the in-process backend refuses or cannot find an order.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Order has no items")]
    EmptyOrder,

    /// A product line references something the catalog does not carry.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Order total {declared} does not match its items ({computed})")]
    TotalMismatch { declared: u64, computed: u64 },

    #[error("Amount to pay {amount} is not valid for a total of {total}")]
    InvalidPaymentAmount { amount: u64, total: u64 },

    #[error("Order validation error: {0}")]
    ValidationError(String),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
