//! Order submission: from cart lines and a checkout form to a backend order.

use crate::backend::{OrderBackend, SubmissionError};
use crate::model::{
    CartLineItem, CheckoutDraft, CustomerInfo, OrderDraft, OrderItem, PaymentDetails,
    PaymentMethod, PaymentStatus, SubmittedOrder,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct OrderSubmissionAdapter {
    backend: Arc<dyn OrderBackend>,
}

impl OrderSubmissionAdapter {
    pub fn new(backend: Arc<dyn OrderBackend>) -> Self {
        Self { backend }
    }

    /// Freezes the lines into order items. `amount_to_pay` is decided by the caller.
    pub fn build_draft(
        lines: &[CartLineItem],
        checkout: &CheckoutDraft,
        amount_to_pay: u64,
        user_id: Option<String>,
    ) -> OrderDraft {
        let items: Vec<OrderItem> = lines.iter().map(OrderItem::from).collect();
        let total_amount = lines
            .iter()
            .fold(0u64, |total, line| total.saturating_add(line.line_total()));
        let status = match checkout.payment_method {
            PaymentMethod::Cod => PaymentStatus::Pending,
            PaymentMethod::BankTransfer => PaymentStatus::AwaitingTransfer,
        };
        let customer = &checkout.customer;

        OrderDraft {
            customer_info: CustomerInfo {
                full_name: customer.full_name.trim().to_string(),
                phone: customer.phone.trim().to_string(),
                address: customer.address.trim().to_string(),
                email: customer.email.trim().to_string(),
                notes: customer
                    .notes
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string),
            },
            items,
            total_amount,
            payment_details: PaymentDetails {
                method: checkout.payment_method,
                status,
                transfer_option: checkout.effective_transfer_option(),
                amount_to_pay,
            },
            user_id,
        }
    }

    #[instrument(skip(self, draft), fields(total = draft.total_amount, amount_to_pay = draft.payment_details.amount_to_pay))]
    pub async fn submit(&self, draft: OrderDraft) -> Result<SubmittedOrder, SubmissionError> {
        let expected_total = draft.total_amount;
        match self.backend.create_order(draft).await {
            Ok(order) => {
                if order.total_amount != expected_total {
                    warn!(
                        order_id = %order.id,
                        expected_total,
                        actual_total = order.total_amount,
                        "Backend changed the order total"
                    );
                }
                info!(order_id = %order.id, "Order accepted");
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "Order submission failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogProduct, ProductLine, TransferOption};

    #[test]
    fn test_draft_freezes_lines_and_trims_contact() {
        let lines = vec![CartLineItem::Product(ProductLine {
            product: CatalogProduct::new("CPU001", "Intel Core i7-13700K", 15_990_000, 5),
            quantity: 2,
        })];
        let checkout = CheckoutDraft {
            customer: CustomerInfo {
                full_name: "  Pham D ".into(),
                phone: "0912345678 ".into(),
                address: "1 Hang Bai".into(),
                email: "d@example.com".into(),
                notes: Some("   ".into()),
            },
            payment_method: PaymentMethod::Cod,
            transfer_option: TransferOption::Deposit,
        };

        let draft = OrderSubmissionAdapter::build_draft(&lines, &checkout, 31_980_000, None);

        assert_eq!(draft.total_amount, 31_980_000);
        assert_eq!(draft.items[0].quantity, 2);
        assert_eq!(draft.items[0].line_id.as_str(), "CPU001");
        assert_eq!(draft.customer_info.full_name, "Pham D");
        assert_eq!(draft.customer_info.notes, None);
        assert_eq!(draft.payment_details.status, PaymentStatus::Pending);
        assert_eq!(draft.payment_details.transfer_option, None);
    }
}
