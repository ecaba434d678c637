//! # Storefront Configuration
//!
//! Configuration for the trolley app: where the catalog lives, how the
//! simulated gateway behaves, and what a fresh session starts with.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GALLEY_CATALOG_URL=https://catalog.internal                        │
//! │     GALLEY_CURRENCY=EUR                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/galley-pos/galley.toml (Linux)                           │
//! │     ~/Library/Application Support/com.galley.pos/galley.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     fixture catalog, USD, Retail, seat A1                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # galley.toml
//! [catalog]
//! base_url = "https://my-json-server.typicode.com/rcasanovan/fakeProductsAPI"
//! timeout_secs = 15
//! default_currency = "USD"
//!
//! [payment]
//! simulated_delay_ms = 1000
//! confirmation_timeout_secs = 10
//!
//! [session]
//! currency = "EUR"
//! sale_type = "Crew"
//! seat_number = "C4"
//! ```

use galley_core::validation::validate_seat_number;
use galley_core::{Currency, SaleType, ValidationError};
use galley_services::{
    CatalogConfig, ServiceResult, SimulatedGateway, DEFAULT_CATALOG_TIMEOUT_SECS,
    DEFAULT_CATALOG_URL, DEFAULT_CONFIRMATION_TIMEOUT_SECS, DEFAULT_PAYMENT_DELAY_MS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Config Errors
// =============================================================================

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to load config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[catalog]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_url")]
    pub base_url: String,

    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,

    /// Currency given to catalog records that don't carry one.
    #[serde(default)]
    pub default_currency: Currency,
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_catalog_timeout() -> u64 {
    DEFAULT_CATALOG_TIMEOUT_SECS
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            base_url: default_catalog_url(),
            timeout_secs: default_catalog_timeout(),
            default_currency: Currency::default(),
        }
    }
}

/// `[payment]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSettings {
    #[serde(default = "default_payment_delay")]
    pub simulated_delay_ms: u64,

    #[serde(default = "default_confirmation_timeout")]
    pub confirmation_timeout_secs: u64,

    /// Base URL for confirmation lookups. Unset means answer locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_url: Option<String>,
}

fn default_payment_delay() -> u64 {
    DEFAULT_PAYMENT_DELAY_MS
}

fn default_confirmation_timeout() -> u64 {
    DEFAULT_CONFIRMATION_TIMEOUT_SECS
}

impl Default for PaymentSettings {
    fn default() -> Self {
        PaymentSettings {
            simulated_delay_ms: default_payment_delay(),
            confirmation_timeout_secs: default_confirmation_timeout(),
            confirmation_url: None,
        }
    }
}

/// `[session]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Display currency a fresh product grid starts in.
    #[serde(default)]
    pub currency: Currency,

    #[serde(default)]
    pub sale_type: SaleType,

    /// Seat preselected on the payment ticket.
    #[serde(default = "default_seat")]
    pub seat_number: String,
}

fn default_seat() -> String {
    "A1".to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            currency: Currency::default(),
            sale_type: SaleType::default(),
            seat_number: default_seat(),
        }
    }
}

// =============================================================================
// Main Storefront Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub payment: PaymentSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (galley.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = &self.catalog.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "Catalog URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "catalog timeout_secs must be greater than 0".into(),
            ));
        }

        if self.payment.confirmation_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "payment confirmation_timeout_secs must be greater than 0".into(),
            ));
        }

        validate_seat_number(&self.session.seat_number)?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `GALLEY_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("GALLEY_CATALOG_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.catalog.base_url = url;
        }

        if let Some(secs) = lookup("GALLEY_CATALOG_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.catalog.timeout_secs = secs,
                Err(_) => warn!(value = %secs, "Ignoring invalid GALLEY_CATALOG_TIMEOUT_SECS"),
            }
        }

        if let Some(delay) = lookup("GALLEY_PAYMENT_DELAY_MS") {
            match delay.parse() {
                Ok(ms) => self.payment.simulated_delay_ms = ms,
                Err(_) => warn!(value = %delay, "Ignoring invalid GALLEY_PAYMENT_DELAY_MS"),
            }
        }

        if let Some(url) = lookup("GALLEY_CONFIRMATION_URL") {
            self.payment.confirmation_url = Some(url);
        }

        if let Some(currency) = lookup("GALLEY_CURRENCY") {
            match currency.parse() {
                Ok(parsed) => {
                    debug!(%currency, "Overriding session currency from environment");
                    self.session.currency = parsed;
                }
                Err(_) => warn!(%currency, "Unknown currency in environment"),
            }
        }

        if let Some(sale_type) = lookup("GALLEY_SALE_TYPE") {
            match sale_type.parse() {
                Ok(parsed) => self.session.sale_type = parsed,
                Err(_) => warn!(%sale_type, "Unknown sale type in environment"),
            }
        }

        if let Some(seat) = lookup("GALLEY_SEAT") {
            self.session.seat_number = seat;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "galley", "pos")
            .map(|dirs| dirs.config_dir().join("galley.toml"))
    }

    // =========================================================================
    // Collaborator Construction
    // =========================================================================

    /// Settings for [`galley_services::HttpCatalog`].
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.catalog.base_url.clone(),
            timeout: Duration::from_secs(self.catalog.timeout_secs),
            default_currency: self.catalog.default_currency,
        }
    }

    /// The simulated gateway, with remote confirmations when configured.
    pub fn payment_gateway(&self) -> ServiceResult<SimulatedGateway> {
        let gateway = SimulatedGateway::new(Duration::from_millis(self.payment.simulated_delay_ms));

        match &self.payment.confirmation_url {
            Some(url) => gateway.with_confirmation_endpoint(
                url,
                Duration::from_secs(self.payment.confirmation_timeout_secs),
            ),
            None => Ok(gateway),
        }
    }
}
