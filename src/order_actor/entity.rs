//! ActorEntity implementation for [`SubmittedOrder`].
//!
//! Creating an order is where the in-process backend checks the draft: the checks run in
//! `on_create` against the injected catalog client, and a failed check means no order
//! exists.

use super::error::OrderError;
use crate::clients::{CatalogClient, CatalogSource};
use crate::model::{OrderDraft, OrderId, OrderItemKind, PaymentMethod, ProductId, SubmittedOrder};
use async_trait::async_trait;
use chrono::Utc;
use std::convert::Infallible;
use storefront_actor::ActorEntity;
use tracing::debug;

impl SubmittedOrder {
    fn check_amounts(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "item {} has zero quantity",
                item.line_id
            )));
        }

        let computed = self
            .items
            .iter()
            .try_fold(0u64, |total, item| total.checked_add(item.checked_line_total()?))
            .ok_or_else(|| OrderError::ValidationError("order total overflows".to_string()))?;
        if computed != self.total_amount {
            return Err(OrderError::TotalMismatch {
                declared: self.total_amount,
                computed,
            });
        }

        let amount = self.payment_details.amount_to_pay;
        let valid_amount = match self.payment_details.method {
            PaymentMethod::Cod => amount == self.total_amount,
            PaymentMethod::BankTransfer => amount > 0 && amount <= self.total_amount,
        };
        if !valid_amount {
            return Err(OrderError::InvalidPaymentAmount {
                amount,
                total: self.total_amount,
            });
        }

        let customer = &self.customer_info;
        if customer.full_name.trim().is_empty() || customer.phone.trim().is_empty() {
            return Err(OrderError::ValidationError(
                "customer name and phone are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for SubmittedOrder {
    type Id = OrderId;
    type Create = OrderDraft;
    type Update = Infallible;
    type Action = Infallible;
    type ActionResult = ();
    type Context = CatalogClient;
    type Error = OrderError;

    fn assign_id(seq: u32, _draft: &OrderDraft) -> OrderId {
        OrderId::from_seq(seq)
    }

    fn from_create_params(id: OrderId, draft: OrderDraft) -> Result<Self, OrderError> {
        Ok(SubmittedOrder::from_draft(id, draft, Utc::now()))
    }

    /// Rejects drafts with no items, inconsistent totals, an out-of-range amount to pay, or
    /// product lines the catalog does not know.
    async fn on_create(&mut self, catalog: &CatalogClient) -> Result<(), OrderError> {
        self.check_amounts()?;

        for item in self
            .items
            .iter()
            .filter(|item| item.kind == OrderItemKind::Product)
        {
            let id = ProductId::new(item.line_id.as_str());
            let found = catalog
                .get_product(&id)
                .await
                .map_err(|e| OrderError::CatalogUnavailable(e.to_string()))?;
            if found.is_none() {
                return Err(OrderError::UnknownProduct(id.to_string()));
            }
            debug!(order_id = %self.id, product_id = %id, "Product verified");
        }
        Ok(())
    }

    async fn on_update(&mut self, update: Infallible, _catalog: &CatalogClient) -> Result<(), OrderError> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: Infallible,
        _catalog: &CatalogClient,
    ) -> Result<(), OrderError> {
        match action {}
    }
}
