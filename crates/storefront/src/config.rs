//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPMINT_API_URL` - Base URL of the commerce backend
//!
//! ## Optional
//! - `SHOPMINT_API_TOKEN` - Bearer token for an authenticated session
//! - `SHOPMINT_DATA_DIR` - Directory for local snapshots (default: `.shopmint`)
//! - `SHOPMINT_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 50)
//! - `SHOPMINT_SHIPPING_FEE` - Flat shipping fee below the threshold (default: 9.99)
//! - `SHOPMINT_TAX_RATE` - Flat tax rate as a decimal fraction (default: 0.08)

use std::path::PathBuf;

use rust_decimal::Decimal;
use secrecy::SecretString;
use shopmint_core::Money;
use thiserror::Error;

use crate::pricing::PricingRules;

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront engine configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Base URL of the commerce backend (no trailing slash).
    pub api_url: String,
    /// Bearer token for an authenticated session, if one exists.
    pub api_token: Option<SecretString>,
    /// Directory for durable local snapshots (anonymous cart, wishlist).
    pub data_dir: PathBuf,
    /// Shipping and tax rules applied by the checkout composer.
    pub pricing: PricingRules,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("data_dir", &self.data_dir)
            .field("pricing", &self.pricing)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, numeric
    /// values fail to parse, or the API token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("SHOPMINT_API_URL")?
            .trim_end_matches('/')
            .to_string();
        let api_token = match get_optional_env("SHOPMINT_API_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "SHOPMINT_API_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };
        let data_dir = PathBuf::from(get_env_or_default("SHOPMINT_DATA_DIR", ".shopmint"));
        let pricing = pricing_from_env()?;

        Ok(Self {
            api_url,
            api_token,
            data_dir,
            pricing,
        })
    }
}

/// Build [`PricingRules`] from the optional override variables.
fn pricing_from_env() -> Result<PricingRules, ConfigError> {
    let defaults = PricingRules::default();
    Ok(PricingRules {
        free_shipping_threshold: get_money_or(
            "SHOPMINT_FREE_SHIPPING_THRESHOLD",
            defaults.free_shipping_threshold,
        )?,
        flat_shipping_fee: get_money_or("SHOPMINT_SHIPPING_FEE", defaults.flat_shipping_fee)?,
        tax_rate: get_decimal_or("SHOPMINT_TAX_RATE", defaults.tax_rate)?,
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional decimal environment variable.
fn get_decimal_or(key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<Decimal>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Parse an optional monetary environment variable.
fn get_money_or(key: &str, default: Money) -> Result<Money, ConfigError> {
    get_decimal_or(key, default.amount()).map(Money::new)
}

/// Validate that a secret is not an obvious placeholder.
///
/// Tokens are minted by the backend, so this only guards against config
/// files checked in with sample values still in place.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}
