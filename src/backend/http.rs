//! REST order backend.
//!
//! Sends the draft as JSON to `POST <base>/orders`. The backend answers with the created
//! order; only its `id` (string or number) and optional `createdAt` are read back, the rest of
//! the record is the draft that was sent.

use super::{OrderBackend, SubmissionError};
use crate::model::{OrderDraft, OrderId, SubmittedOrder};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpOrderBackend {
    client: Client,
    base_url: String,
}

impl HttpOrderBackend {
    /// # Arguments
    /// * `base_url` - API root, e.g. `http://localhost:3001/api`
    pub fn new(base_url: &str) -> Result<Self, SubmissionError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| SubmissionError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn orders_url(&self) -> String {
        format!("{}/orders", self.base_url)
    }
}

/// Turns the backend's answer into an order, or says why it is not one.
pub(crate) fn interpret_response(
    status: StatusCode,
    body: &str,
    draft: OrderDraft,
) -> Result<SubmittedOrder, SubmissionError> {
    if status.is_client_error() {
        return Err(SubmissionError::Rejected(error_message(status, body)));
    }
    if !status.is_success() {
        return Err(SubmissionError::Unavailable(error_message(status, body)));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| SubmissionError::InvalidResponse(format!("not JSON: {e}")))?;
    let id = match value.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(SubmissionError::InvalidResponse(
                "missing order id".to_string(),
            ))
        }
    };
    let created_at = value
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    Ok(SubmittedOrder::from_draft(OrderId(id), draft, created_at))
}

/// Prefers a `message` or `error` field from a JSON body, else the raw text.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());
    if detail.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {detail}")
    }
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
    #[instrument(skip(self, draft), fields(url = %self.orders_url(), total = draft.total_amount))]
    async fn create_order(&self, draft: OrderDraft) -> Result<SubmittedOrder, SubmissionError> {
        debug!(?draft, "Posting order");
        let response = self
            .client
            .post(self.orders_url())
            .json(&draft)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Order request failed");
                SubmissionError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))?;

        let order = interpret_response(status, &body, draft)?;
        info!(order_id = %order.id, "Order created");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CustomerInfo, OrderItem, OrderItemKind, PaymentDetails, PaymentMethod, PaymentStatus,
    };

    fn draft() -> OrderDraft {
        OrderDraft {
            customer_info: CustomerInfo {
                full_name: "Nguyen Van A".into(),
                phone: "0912345678".into(),
                address: "1 Trang Tien, Ha Noi".into(),
                email: "a@example.com".into(),
                notes: None,
            },
            items: vec![OrderItem {
                line_id: "CPU001".into(),
                kind: OrderItemKind::Product,
                name: "Intel Core i7-13700K".into(),
                unit_price: 15_990_000,
                quantity: 1,
                components: None,
            }],
            total_amount: 15_990_000,
            payment_details: PaymentDetails {
                method: PaymentMethod::Cod,
                status: PaymentStatus::Pending,
                transfer_option: None,
                amount_to_pay: 15_990_000,
            },
            user_id: None,
        }
    }

    #[test]
    fn test_created_order_keeps_the_draft() {
        let body = r#"{"id": 42, "createdAt": "2024-05-01T08:30:00Z", "items": []}"#;
        let order = interpret_response(StatusCode::CREATED, body, draft()).unwrap();
        assert_eq!(order.id, OrderId("42".into()));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.created_at.to_rfc3339(), "2024-05-01T08:30:00+00:00");
    }

    #[test]
    fn test_client_errors_are_rejections() {
        let err = interpret_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "phone is invalid"}"#,
            draft(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SubmissionError::Rejected("422 Unprocessable Entity: phone is invalid".into())
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_server_errors_are_retryable() {
        let err = interpret_response(StatusCode::BAD_GATEWAY, "", draft()).unwrap_err();
        assert_eq!(err, SubmissionError::Unavailable("502 Bad Gateway".into()));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_success_without_id_is_invalid() {
        let err = interpret_response(StatusCode::OK, r#"{"ok": true}"#, draft()).unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidResponse(_)));

        let err = interpret_response(StatusCode::OK, "<html>", draft()).unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        let backend = HttpOrderBackend::new("http://127.0.0.1:1/api/").unwrap();
        assert_eq!(backend.orders_url(), "http://127.0.0.1:1/api/orders");
        let err = backend.create_order(draft()).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Unavailable(_)));
    }
}
