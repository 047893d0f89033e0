//! CLI configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use store_commerce::cart::PricingRules;
use store_commerce::{Currency, Money};
use store_data::ClientConfig;

/// File names searched for, in order, when no `--config` is given.
pub const CONFIG_NAMES: [&str; 3] = ["store.toml", ".store.toml", "store.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// API connection.
    #[serde(default)]
    pub api: ClientConfig,

    /// Order pricing.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Token storage.
    #[serde(default)]
    pub session: SessionConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Config with the named environment's overrides applied.
    pub fn for_environment(&self, env: &str) -> Result<CliConfig> {
        let Some(env_config) = self.environments.get(env) else {
            bail!("Unknown environment: {}", env);
        };

        let mut config = self.clone();
        if let Some(ref api) = env_config.api {
            config.api = api.clone();
        }
        if let Some(ref pricing) = env_config.pricing {
            config.pricing = pricing.clone();
        }
        Ok(config)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Order pricing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub currency: Currency,

    /// Subtotal at which shipping becomes free.
    #[serde(default = "default_threshold")]
    pub free_shipping_threshold_cents: i64,

    #[serde(default = "default_flat_shipping")]
    pub flat_shipping_cents: i64,

    /// Whole or fractional percent, e.g. `15` or `7.25`.
    #[serde(default = "default_tax_rate")]
    pub tax_rate_percent: Decimal,
}

fn default_threshold() -> i64 {
    10_000
}

fn default_flat_shipping() -> i64 {
    1_000
}

fn default_tax_rate() -> Decimal {
    Decimal::from(15)
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            free_shipping_threshold_cents: default_threshold(),
            flat_shipping_cents: default_flat_shipping(),
            tax_rate_percent: default_tax_rate(),
        }
    }
}

impl PricingConfig {
    /// Rules handed to checkout.
    pub fn rules(&self) -> Result<PricingRules> {
        if self.free_shipping_threshold_cents < 0 || self.flat_shipping_cents < 0 {
            bail!("pricing amounts must not be negative");
        }
        if self.tax_rate_percent.is_sign_negative() || self.tax_rate_percent > Decimal::from(100) {
            bail!("pricing.tax_rate_percent must be between 0 and 100");
        }

        Ok(PricingRules {
            free_shipping_threshold: Money::new(self.free_shipping_threshold_cents, self.currency),
            flat_shipping: Money::new(self.flat_shipping_cents, self.currency),
            tax_rate: self.tax_rate_percent / Decimal::from(100),
        })
    }
}

/// Where the session token is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Relative paths resolve against the working directory.
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

fn default_token_file() -> PathBuf {
    PathBuf::from(".store").join("session.json")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub api: Option<ClientConfig>,

    #[serde(default)]
    pub pricing: Option<PricingConfig>,
}

/// Generate a default store.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront client configuration

[api]
base_url = "{base_url}"
timeout_secs = 15

[pricing]
currency = "USD"
free_shipping_threshold_cents = 10000
flat_shipping_cents = 1000
tax_rate_percent = 15

[session]
token_file = ".store/session.json"

[environments.staging.api]
base_url = "https://staging.example.com/api"
timeout_secs = 30
"#,
        base_url = store_data::DEFAULT_BASE_URL
    )
}
