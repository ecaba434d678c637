//! # galley-services: Catalog and Payment Collaborators
//!
//! The pricing core never talks to the network. This crate does, behind two
//! traits the storefront session depends on.
//!
//! ## Modules
//! - [`catalog`] - `CatalogService`, the HTTP client and a static fixture
//! - [`payment`] - `PaymentGateway` and the simulated gateway
//! - [`error`] - `ServiceError`
//!
//! ## Timeouts
//! ```text
//! ┌────────────────────────────────┬──────────┐
//! │ Call                           │ Default  │
//! ├────────────────────────────────┼──────────┤
//! │ GET  /products                 │ 15 s     │
//! │ POST /paymentResponse          │ 10 s     │
//! │ Simulated payment delay        │ 1 s      │
//! └────────────────────────────────┴──────────┘
//! ```

pub mod catalog;
pub mod error;
pub mod payment;

pub use catalog::{
    parse_catalog, CatalogConfig, CatalogRecord, CatalogService, HttpCatalog, StaticCatalog,
};
pub use error::{ServiceError, ServiceResult};
pub use payment::{parse_confirmation, PaymentGateway, SimulatedGateway, APPROVED_MESSAGE};

/// Fixture server the trolley tablets point at out of the box.
pub const DEFAULT_CATALOG_URL: &str =
    "https://my-json-server.typicode.com/rcasanovan/fakeProductsAPI";

pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_PAYMENT_DELAY_MS: u64 = 1000;

/// Sent on every request.
pub const USER_AGENT: &str = concat!("Galley/", env!("CARGO_PKG_VERSION"));
