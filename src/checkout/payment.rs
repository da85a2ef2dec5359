//! Amounts and bank-transfer references.

use crate::config::PaymentConfig;
use crate::model::{PaymentMethod, SubmittedOrder, TransferOption};
use reqwest::Url;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::warn;

/// What the buyer pays now: the whole total, or the deposit share of it for a
/// bank-transfer deposit.
///
/// The deposit is rounded half away from zero to whole VND and is at least 1 VND on a
/// non-zero total. A share outside `(0, 1]` is ignored and the full total is charged.
pub fn amount_to_pay(
    total: u64,
    method: PaymentMethod,
    option: TransferOption,
    deposit_percentage: Decimal,
) -> u64 {
    if method != PaymentMethod::BankTransfer || option != TransferOption::Deposit {
        return total;
    }
    if deposit_percentage <= Decimal::ZERO || deposit_percentage > Decimal::ONE {
        warn!(%deposit_percentage, "Deposit share out of range, charging full total");
        return total;
    }
    (Decimal::from(total) * deposit_percentage)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .map_or(total, |amount| amount.clamp(total.min(1), total))
}

/// Transfer memo the shop matches incoming payments against.
pub fn transfer_memo(order: &SubmittedOrder) -> String {
    format!("TT DON HANG {}", order.id)
}

/// Everything the buyer needs to make the transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReference {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub amount: u64,
    pub memo: String,
    /// `None` when the configured template is not a usable URL.
    pub qr_url: Option<String>,
}

impl PaymentReference {
    /// Same order and configuration always give the same reference.
    pub fn for_order(order: &SubmittedOrder, config: &PaymentConfig) -> Self {
        let amount = order.payment_details.amount_to_pay;
        let memo = transfer_memo(order);
        let qr_url = render_qr_url(
            &config.qr_template,
            &[
                ("bank", config.bank_name.as_str()),
                ("account", config.account_number.as_str()),
                ("amount", &amount.to_string()),
                ("memo", &memo),
                ("holder", config.account_holder.as_str()),
            ],
        );
        Self {
            bank_name: config.bank_name.clone(),
            account_number: config.account_number.clone(),
            account_holder: config.account_holder.clone(),
            amount,
            memo,
            qr_url,
        }
    }
}

fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

/// Substitutes `{key}` placeholders. Query values are encoded by the URL builder.
fn render_qr_url(template: &str, values: &[(&str, &str)]) -> Option<String> {
    let (base, query) = template.split_once('?').unwrap_or((template, ""));
    let params: Vec<(String, String)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key.to_string(), fill(value, values))
        })
        .collect();

    match Url::parse_with_params(&fill(base, values), &params) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            warn!(error = %e, "QR template is not a valid URL");
            None
        }
    }
}
