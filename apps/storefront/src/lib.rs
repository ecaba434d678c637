//! # Galley Storefront Library
//!
//! Session state for the Galley POS trolley app: the product grid, the
//! payment ticket, and the store that moves the cart between them.
//!
//! ## Module Organization
//! ```text
//! galley_storefront/
//! ├── lib.rs          ◄─── You are here (logging setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports, surface messages
//! │   ├── selection.rs◄─── Product grid session
//! │   ├── payment.rs  ◄─── Payment ticket session
//! │   └── store.rs    ◄─── AppStore, navigation between surfaces
//! ├── config.rs       ◄─── galley.toml + GALLEY_* overrides
//! └── error.rs        ◄─── AppError for the frontend
//! ```
//!
//! ## Wiring
//! ```text
//! StorefrontConfig::load_or_default()
//!        │
//!        ├── catalog_config() ──► HttpCatalog ──┐
//!        ├── payment_gateway() ─► SimulatedGateway
//!        └── session ──► AppStore::from_config()│
//!                              │                │
//!                              └─ initialize(&catalog)
//! ```

pub mod config;
pub mod error;
pub mod state;

use tracing::Subscriber;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use config::StorefrontConfig;
pub use error::{AppError, AppResult, ErrorCode};
pub use state::{AppStore, CartSummary, Confirmation, PaymentSession, ProductSelection, Screen};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,galley=debug,reqwest=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=galley=trace` - Show trace for galley crates only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    subscriber(filter).init();
}

/// The fmt subscriber, gated by `filter` alone.
fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}
