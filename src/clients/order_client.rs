//! # Order Client
//!
//! Wraps a `ResourceClient<SubmittedOrder>`. Draft validation happens in the order actor's
//! `on_create` hook; this client only creates, reads back and translates errors.
use crate::backend::{OrderBackend, SubmissionError};
use crate::model::{OrderDraft, OrderId, SubmittedOrder};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use storefront_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<SubmittedOrder>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<SubmittedOrder>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, draft), fields(total = draft.total_amount))]
    pub async fn create_order(&self, draft: OrderDraft) -> Result<SubmittedOrder, OrderError> {
        debug!(?draft, "Sending create_order to actor");
        let id = self.inner.create(draft).await.map_err(Self::map_error)?;
        let order = ActorClient::get(self, id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
        info!(order_id = %order.id, "Order stored");
        Ok(order)
    }

    pub async fn find(&self, id: OrderId) -> Result<Option<SubmittedOrder>, OrderError> {
        ActorClient::get(self, id).await
    }
}

#[async_trait]
impl ActorClient<SubmittedOrder> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<SubmittedOrder> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> OrderError {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .downcast_entity::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl From<OrderError> for SubmissionError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::ActorCommunicationError(_) | OrderError::CatalogUnavailable(_) => {
                SubmissionError::Unavailable(e.to_string())
            }
            OrderError::NotFound(_) => SubmissionError::InvalidResponse(e.to_string()),
            _ => SubmissionError::Rejected(e.to_string()),
        }
    }
}

#[async_trait]
impl OrderBackend for OrderClient {
    async fn create_order(&self, draft: OrderDraft) -> Result<SubmittedOrder, SubmissionError> {
        Ok(OrderClient::create_order(self, draft).await?)
    }
}
