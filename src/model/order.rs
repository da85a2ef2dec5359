/// Orders: the draft the checkout hands to a backend and the record it gets back.
///
/// # Actor Framework
/// [`SubmittedOrder`] implements [`ActorEntity`](storefront_actor::ActorEntity) with
/// [`OrderDraft`] as its creation payload; see [`crate::order_actor`].
use super::build::{ComponentSlot, SelectedComponent};
use super::cart::{CartLineItem, LineId};
use super::checkout::{CustomerInfo, PaymentMethod, TransferOption};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Backend-assigned order identifier, e.g. `ORD000042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn from_seq(seq: u32) -> Self {
        Self(format!("ORD{seq:06}"))
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentStatus {
    /// Collected on delivery.
    Pending,
    /// Waiting for the buyer's bank transfer.
    AwaitingTransfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_option: Option<TransferOption>,
    pub amount_to_pay: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderItemKind {
    Product,
    CustomBuild,
}

/// Frozen copy of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub line_id: LineId,
    pub kind: OrderItemKind,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<BTreeMap<ComponentSlot, SelectedComponent>>,
}

impl OrderItem {
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }

    pub fn checked_line_total(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

impl From<&CartLineItem> for OrderItem {
    fn from(line: &CartLineItem) -> Self {
        let (kind, components) = match line {
            CartLineItem::Product(_) => (OrderItemKind::Product, None),
            CartLineItem::CustomBuild(build) => (
                OrderItemKind::CustomBuild,
                Some(build.build_components.clone()),
            ),
        };
        Self {
            line_id: line.id(),
            kind,
            name: line.name().to_string(),
            unit_price: line.unit_price(),
            quantity: line.quantity(),
            components,
        }
    }
}

/// Everything a backend needs to create an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub customer_info: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub total_amount: u64,
    pub payment_details: PaymentDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// An order accepted by a backend. Never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedOrder {
    pub id: OrderId,
    pub total_amount: u64,
    pub customer_info: CustomerInfo,
    pub payment_details: PaymentDetails,
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SubmittedOrder {
    pub fn from_draft(id: OrderId, draft: OrderDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            total_amount: draft.total_amount,
            customer_info: draft.customer_info,
            payment_details: draft.payment_details,
            items: draft.items,
            user_id: draft.user_id,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_format() {
        assert_eq!(OrderId::from_seq(1).to_string(), "ORD000001");
        assert_eq!(OrderId::from_seq(1_234_567).to_string(), "ORD1234567");
    }

    #[test]
    fn test_payment_details_wire_format() {
        let details = PaymentDetails {
            method: PaymentMethod::BankTransfer,
            status: PaymentStatus::AwaitingTransfer,
            transfer_option: Some(TransferOption::Deposit),
            amount_to_pay: 6_000_000,
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["method"], "BankTransfer");
        assert_eq!(json["status"], "awaitingTransfer");
        assert_eq!(json["transferOption"], "deposit");
        assert_eq!(json["amountToPay"], 6_000_000);
    }
}
