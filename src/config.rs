//! Storefront configuration.
//!
//! Every setting can be given as a flag or an environment variable and has a default, so a
//! bare `pc-storefront` run works. Library users build the structs through `Default`.

use clap::{Args, Parser};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

/// PC storefront configuration
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "pc-storefront", about = "PC storefront cart and checkout", long_about = None)]
pub struct StorefrontConfig {
    /// Bank account shown on transfer payments.
    #[command(flatten)]
    pub payment: PaymentConfig,

    /// Where the session cart is persisted.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Build advisor service.
    #[command(flatten)]
    pub advisory: AdvisoryConfig,

    /// Order backend selection.
    #[command(flatten)]
    pub backend: BackendConfig,
}

impl StorefrontConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

const DEFAULT_QR_TEMPLATE: &str = "https://img.vietqr.io/image/{bank}-{account}-compact2.png?amount={amount}&addInfo={memo}&accountName={holder}";

/// Static bank account data for transfer payments.
#[derive(Debug, Clone, Args)]
pub struct PaymentConfig {
    /// Receiving bank
    #[arg(long, env = "PAYMENT_BANK_NAME", default_value = "Vietcombank")]
    pub bank_name: String,

    /// Receiving account number
    #[arg(long, env = "PAYMENT_ACCOUNT_NUMBER", default_value = "0123456789")]
    pub account_number: String,

    /// Name on the receiving account
    #[arg(long, env = "PAYMENT_ACCOUNT_HOLDER", default_value = "CONG TY TNHH PC STORE")]
    pub account_holder: String,

    /// Share of the total paid up front on deposit orders, e.g. 0.3
    #[arg(long, env = "PAYMENT_DEPOSIT_PERCENTAGE", default_value = "0.3")]
    pub deposit_percentage: Decimal,

    /// QR image URL with `{bank}`, `{account}`, `{amount}`, `{memo}` and `{holder}` placeholders
    #[arg(long, env = "PAYMENT_QR_TEMPLATE", default_value = DEFAULT_QR_TEMPLATE)]
    pub qr_template: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            bank_name: "Vietcombank".to_string(),
            account_number: "0123456789".to_string(),
            account_holder: "CONG TY TNHH PC STORE".to_string(),
            deposit_percentage: Decimal::new(3, 1),
            qr_template: DEFAULT_QR_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory for persisted state
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".storefront")]
    pub data_dir: PathBuf,

    /// Key the cart lines are stored under
    #[arg(long, env = "STOREFRONT_CART_KEY", default_value = "cart")]
    pub cart_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".storefront"),
            cart_key: "cart".to_string(),
        }
    }
}

/// Advisor settings. Without both endpoint and key the advisor is disabled.
#[derive(Debug, Clone, Args)]
pub struct AdvisoryConfig {
    /// Recommendation endpoint URL
    #[arg(long = "advisory-endpoint", env = "ADVISORY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// API key sent as a bearer token
    #[arg(long = "advisory-api-key", env = "ADVISORY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Seconds before a recommendation request is abandoned
    #[arg(long = "advisory-timeout-secs", env = "ADVISORY_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,
}

impl AdvisoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint and key, when both are set and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let endpoint = self.endpoint.as_deref().filter(|s| !s.trim().is_empty())?;
        let key = self.api_key.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((endpoint, key))
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct BackendConfig {
    /// Base URL of the order API. Orders stay in process when unset.
    #[arg(long = "order-api-url", env = "ORDER_API_URL")]
    pub order_api_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_match_default_impl() {
        let parsed = StorefrontConfig::try_parse_from(["pc-storefront"]).unwrap();
        let default = StorefrontConfig::default();
        assert_eq!(parsed.payment.bank_name, default.payment.bank_name);
        assert_eq!(parsed.payment.deposit_percentage, default.payment.deposit_percentage);
        assert_eq!(parsed.payment.qr_template, default.payment.qr_template);
        assert_eq!(parsed.storage.data_dir, default.storage.data_dir);
        assert_eq!(parsed.storage.cart_key, default.storage.cart_key);
        assert_eq!(parsed.advisory.timeout_secs, default.advisory.timeout_secs);
    }

    #[test]
    fn test_flags_override_defaults() {
        let parsed = StorefrontConfig::try_parse_from([
            "pc-storefront",
            "--deposit-percentage",
            "0.5",
            "--order-api-url",
            "http://localhost:8080/api",
        ])
        .unwrap();
        assert_eq!(parsed.payment.deposit_percentage, Decimal::new(5, 1));
        assert_eq!(
            parsed.backend.order_api_url.as_deref(),
            Some("http://localhost:8080/api")
        );
    }

    #[test]
    fn test_advisory_needs_both_credentials() {
        let mut config = AdvisoryConfig {
            endpoint: Some("https://advisor.example/recommend".into()),
            ..AdvisoryConfig::default()
        };
        assert!(config.credentials().is_none());
        config.api_key = Some("  ".into());
        assert!(config.credentials().is_none());
        config.api_key = Some("secret".into());
        assert_eq!(
            config.credentials(),
            Some(("https://advisor.example/recommend", "secret"))
        );
    }
}
