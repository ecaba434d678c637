//! # Catalog Service
//!
//! Fetches the trolley's product list.
//!
//! ## Fetch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Fetch                                   │
//! │                                                                         │
//! │  GET <base_url>/products  (Accept: application/json)                    │
//! │        │                                                                │
//! │        ▼  timeout (default 15 s) ──► ServiceError::Timeout              │
//! │  [{ id: 1, name, price: 2.5, image, inventory: 10, type: "drinks" }]    │
//! │        │                                                                │
//! │        ▼  CatalogRecord::into_product(default_currency)                 │
//! │  Product { id: "1", ..., currency: USD }                                │
//! │        │                                                                │
//! │        ▼  Product::validate  (bad records are dropped with a warning)   │
//! │  Vec<Product>                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use galley_core::{Currency, Money, Product};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::{DEFAULT_CATALOG_TIMEOUT_SECS, DEFAULT_CATALOG_URL, USER_AGENT};

// =============================================================================
// Catalog Trait
// =============================================================================

/// Source of the product list.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetches every product currently on offer.
    async fn fetch_products(&self) -> ServiceResult<Vec<Product>>;
}

// =============================================================================
// Wire Records
// =============================================================================

/// Catalog ids arrive as JSON numbers from the fixture server and as strings
/// from everything else.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

impl RecordId {
    fn into_string(self) -> String {
        match self {
            RecordId::Text(text) => text,
            RecordId::Number(number) => number.to_string(),
        }
    }
}

/// One product as the catalog endpoint sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    id: RecordId,
    name: String,
    price: Money,
    #[serde(default)]
    image: Option<String>,
    #[serde(alias = "stock")]
    inventory: u32,
    #[serde(rename = "type")]
    #[serde(default)]
    product_type: Option<String>,
    /// Records rarely carry one; `default_currency` fills the gap.
    #[serde(default)]
    currency: Option<Currency>,
}

impl CatalogRecord {
    /// Maps the record onto a [`Product`].
    pub fn into_product(self, default_currency: Currency) -> Product {
        Product {
            id: self.id.into_string(),
            name: self.name,
            price: self.price,
            currency: self.currency.unwrap_or(default_currency),
            inventory: self.inventory,
            image: self.image,
            product_type: self.product_type,
        }
    }
}

/// Turns a catalog body into products, dropping records that fail validation.
pub fn parse_catalog(body: &str, default_currency: Currency) -> ServiceResult<Vec<Product>> {
    let records: Vec<CatalogRecord> = serde_json::from_str(body)?;

    let products = records
        .into_iter()
        .map(|record| record.into_product(default_currency))
        .filter(|product| match product.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(id = %product.id, error = %e, "Dropping invalid catalog record");
                false
            }
        })
        .collect();

    Ok(products)
}

// =============================================================================
// HTTP Catalog
// =============================================================================

/// Configuration for [`HttpCatalog`].
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Root of the catalog API; `/products` is appended.
    pub base_url: String,

    /// Client-side timeout for the whole request.
    pub timeout: Duration,

    /// Currency assigned to records that don't name one.
    pub default_currency: Currency,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_CATALOG_TIMEOUT_SECS),
            default_currency: Currency::Usd,
        }
    }
}

/// Catalog fetched over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl HttpCatalog {
    /// Builds the client with JSON headers and the Galley user agent.
    pub fn new(config: CatalogConfig) -> ServiceResult<Self> {
        Ok(HttpCatalog {
            client: json_client()?,
            config,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.config.base_url.trim_end_matches('/'))
    }

    async fn fetch_body(&self, url: &str) -> ServiceResult<String> {
        let response = self.client.get(url).send().await?;
        debug!(status = %response.status(), "Catalog response received");

        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn fetch_products(&self) -> ServiceResult<Vec<Product>> {
        let url = self.products_url();
        info!(%url, "Fetching catalog");

        let body = match timeout(self.config.timeout, self.fetch_body(&url)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(timeout = ?self.config.timeout, "Catalog fetch timed out");
                return Err(ServiceError::Timeout {
                    operation: "catalog fetch",
                    secs: self.config.timeout.as_secs(),
                });
            }
        };

        let products = parse_catalog(&body, self.config.default_currency)?;
        info!(count = products.len(), "Catalog loaded");
        Ok(products)
    }
}

/// A `reqwest` client that sends and accepts JSON.
pub(crate) fn json_client() -> ServiceResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()?)
}

// =============================================================================
// Static Catalog
// =============================================================================

/// In-memory catalog for tests and offline demos.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        StaticCatalog { products }
    }

    /// The onboard menu the demo binary ships with.
    pub fn onboard_menu() -> Self {
        let product = |id: &str, name: &str, cents: i64, inventory: u32, kind: &str| {
            Product::new(id, name, Money::from_minor(cents), Currency::Usd, inventory)
                .with_type(kind)
        };

        StaticCatalog::new(vec![
            product("1", "Still Water", 250, 24, "drinks"),
            product("2", "Orange Juice", 553, 10, "drinks"),
            product("3", "Coffee", 300, 30, "drinks"),
            product("4", "Salted Crisps", 180, 15, "snacks"),
            product("5", "Chocolate Bar", 220, 12, "snacks"),
            product("6", "Chicken Sandwich", 750, 6, "food"),
        ])
    }
}

#[async_trait]
impl CatalogService for StaticCatalog {
    async fn fetch_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.products.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
