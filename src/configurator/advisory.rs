//! Build recommendations from an external advisor.
//!
//! The advisor is a black box: it gets the use case, the budget, what is selected so far and
//! the names on offer per slot, and answers with a name and a reason per slot. Any failure
//! is an [`AdvisoryError`], which the configurator treats as "advice unavailable" and never
//! as a reason to block manual selection.

use crate::config::AdvisoryConfig;
use crate::model::{AdvisoryComponent, ComponentSlot};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Every variant means the same thing to a buyer: no advice this time.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdvisoryError {
    #[error("Advisory unavailable: advisor is not configured")]
    Disabled,

    #[error("Advisory unavailable: no answer within {0}s")]
    Timeout(u64),

    #[error("Advisory unavailable: {0}")]
    Transport(String),

    #[error("Advisory unavailable: malformed response ({0})")]
    Malformed(String),
}

/// What the advisor is asked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRequest {
    pub use_case: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    /// Slot → name of what is already chosen.
    pub current_selection: BTreeMap<ComponentSlot, String>,
    /// Slot → names the advisor may pick from.
    pub options: BTreeMap<ComponentSlot, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvisoryResult {
    pub recommendations: BTreeMap<ComponentSlot, AdvisoryComponent>,
    pub summary: Option<String>,
}

#[async_trait]
pub trait Advisor: Send + Sync {
    async fn recommend_build(
        &self,
        request: &AdvisoryRequest,
    ) -> Result<AdvisoryResult, AdvisoryError>;
}

/// Used when no credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAdvisor;

#[async_trait]
impl Advisor for DisabledAdvisor {
    async fn recommend_build(
        &self,
        _request: &AdvisoryRequest,
    ) -> Result<AdvisoryResult, AdvisoryError> {
        Err(AdvisoryError::Disabled)
    }
}

/// Posts [`AdvisoryRequest`]s as JSON with a bearer key.
#[derive(Debug, Clone)]
pub struct HttpAdvisor {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpAdvisor {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

/// The advisor the configuration asks for: HTTP when endpoint and key are set, disabled
/// otherwise.
pub fn advisor_from_config(config: &AdvisoryConfig) -> Arc<dyn Advisor> {
    match config.credentials() {
        Some((endpoint, key)) => {
            info!(endpoint, "Build advisor enabled");
            Arc::new(HttpAdvisor::new(endpoint, key))
        }
        None => {
            info!("Build advisor disabled, no credentials");
            Arc::new(DisabledAdvisor)
        }
    }
}

#[async_trait]
impl Advisor for HttpAdvisor {
    #[instrument(skip(self, request), fields(use_case = %request.use_case))]
    async fn recommend_build(
        &self,
        request: &AdvisoryRequest,
    ) -> Result<AdvisoryResult, AdvisoryError> {
        debug!(?request, "Requesting recommendations");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdvisoryError::Transport(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;
        parse_recommendations(&body)
    }
}

/// Reads `{"recommendations": {"CPU": {"name", "reasoning"}, ...}, "summary": ...}`.
///
/// Chat-style gateways wrap that object in a `text` or `content` string, often inside a
/// markdown fence; the object is cut out of the text first. Unknown slot keys are ignored.
pub fn parse_recommendations(body: &str) -> Result<AdvisoryResult, AdvisoryError> {
    let mut value: Value =
        serde_json::from_str(body).map_err(|e| AdvisoryError::Malformed(e.to_string()))?;

    if value.get("recommendations").is_none() {
        let text = value
            .get("text")
            .or_else(|| value.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| AdvisoryError::Malformed("no recommendations".to_string()))?;
        let (start, end) = match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if start < end => (start, end),
            _ => return Err(AdvisoryError::Malformed("no JSON object in text".to_string())),
        };
        value = serde_json::from_str(&text[start..=end])
            .map_err(|e| AdvisoryError::Malformed(e.to_string()))?;
    }

    let entries = value
        .get("recommendations")
        .and_then(Value::as_object)
        .ok_or_else(|| AdvisoryError::Malformed("recommendations is not an object".to_string()))?;

    let mut recommendations = BTreeMap::new();
    for (key, entry) in entries {
        let Some(slot) = ComponentSlot::parse(key) else {
            debug!(key, "Ignoring unknown slot");
            continue;
        };
        let component = match entry {
            Value::String(name) => AdvisoryComponent {
                name: name.clone(),
                reasoning: String::new(),
            },
            other => serde_json::from_value::<AdvisoryComponent>(other.clone())
                .map_err(|e| AdvisoryError::Malformed(format!("{slot}: {e}")))?,
        };
        if !component.name.trim().is_empty() {
            recommendations.insert(slot, component);
        }
    }

    if recommendations.is_empty() {
        return Err(AdvisoryError::Malformed("no usable recommendations".to_string()));
    }

    Ok(AdvisoryResult {
        recommendations,
        summary: value
            .get("summary")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_object() {
        let body = r#"{
            "recommendations": {
                "CPU": {"name": "AMD Ryzen 5 7600", "reasoning": "Best value for 1080p gaming"},
                "gpu": "RTX 4060",
                "Fan": {"name": "Noctua"}
            },
            "summary": "Balanced gaming build"
        }"#;
        let result = parse_recommendations(body).unwrap();
        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(
            result.recommendations[&ComponentSlot::Cpu].reasoning,
            "Best value for 1080p gaming"
        );
        assert_eq!(result.recommendations[&ComponentSlot::Gpu].name, "RTX 4060");
        assert_eq!(result.summary.as_deref(), Some("Balanced gaming build"));
    }

    #[test]
    fn test_parses_fenced_text_reply() {
        let inner = r#"Here you go:\n```json\n{\"recommendations\": {\"RAM\": {\"name\": \"32GB DDR5\", \"reasoning\": \"Headroom\"}}}\n```"#;
        let body = format!(r#"{{"text": "{inner}"}}"#);
        let result = parse_recommendations(&body).unwrap();
        assert_eq!(result.recommendations[&ComponentSlot::Ram].name, "32GB DDR5");
    }

    #[test]
    fn test_rejects_garbage() {
        for body in ["not json", r#"{"text": "sorry, no idea"}"#, r#"{"recommendations": {}}"#] {
            assert!(matches!(
                parse_recommendations(body),
                Err(AdvisoryError::Malformed(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_disable_advice() {
        let advisor = advisor_from_config(&AdvisoryConfig::default());
        let request = AdvisoryRequest {
            use_case: "gaming".into(),
            budget: Some(20_000_000),
            current_selection: BTreeMap::new(),
            options: BTreeMap::new(),
        };
        assert_eq!(
            advisor.recommend_build(&request).await,
            Err(AdvisoryError::Disabled)
        );
    }
}
