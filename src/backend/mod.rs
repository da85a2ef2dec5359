//! # Order Backends
//!
//! [`OrderBackend`] is the one write the checkout makes: turn an [`OrderDraft`] into a
//! [`SubmittedOrder`]. Two implementations ship with the crate:
//!
//! - [`OrderClient`](crate::clients::OrderClient): the in-process order actor
//! - [`HttpOrderBackend`]: a JSON REST API (`POST <base>/orders`)
//!
//! Whatever goes wrong, the caller gets a [`SubmissionError`], and the cart is left alone.

pub mod http;

pub use http::HttpOrderBackend;

use crate::model::{OrderDraft, SubmittedOrder};
use async_trait::async_trait;
use thiserror::Error;

/// Why an order was not created.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmissionError {
    /// The backend looked at the draft and said no.
    #[error("Order rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or failed internally.
    #[error("Order backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with something that is not an order.
    #[error("Invalid response from order backend: {0}")]
    InvalidResponse(String),
}

impl SubmissionError {
    /// Whether sending the same draft again might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmissionError::Unavailable(_))
    }
}

#[async_trait]
pub trait OrderBackend: Send + Sync {
    async fn create_order(&self, draft: OrderDraft) -> Result<SubmittedOrder, SubmissionError>;
}
