//! Error types for the Cart actor.

use crate::model::LineId;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(String),

    /// Adding zero units is rejected rather than clamped.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Cart line not found: {0}")]
    LineNotFound(LineId),

    /// The actor answered with a result for a different action.
    #[error("Unexpected cart action result: {0}")]
    UnexpectedResult(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
