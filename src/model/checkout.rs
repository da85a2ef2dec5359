//! What the buyer fills in on the checkout form.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    #[serde(rename = "COD")]
    Cod,
    #[serde(rename = "BankTransfer")]
    BankTransfer,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cod => f.write_str("COD"),
            PaymentMethod::BankTransfer => f.write_str("BankTransfer"),
        }
    }
}

/// How much of a bank-transfer order is paid up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferOption {
    #[default]
    Full,
    Deposit,
}

/// Contact and delivery details attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The checkout form. `transfer_option` only matters for bank transfers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDraft {
    pub customer: CustomerInfo,
    pub payment_method: PaymentMethod,
    pub transfer_option: TransferOption,
}

impl CheckoutDraft {
    /// The option that actually applies: `None` for cash on delivery.
    pub fn effective_transfer_option(&self) -> Option<TransferOption> {
        match self.payment_method {
            PaymentMethod::Cod => None,
            PaymentMethod::BankTransfer => Some(self.transfer_option),
        }
    }
}
