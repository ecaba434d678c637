//! # State Module
//!
//! Session state behind the two storefront surfaces.
//!
//! ## Why Separate Session Types?
//! The product grid and the payment ticket each own their own state and
//! only meet through a [`CartSnapshot`](galley_core::CartSnapshot) handed
//! across. [`AppStore`] owns both and moves the snapshot between them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                        AppStore                                 │   │
//! │  │   screen: Selection | Payment                                   │   │
//! │  └───────────────┬─────────────────────────────────┬───────────────┘   │
//! │                  ▼                                 ▼                    │
//! │  ┌──────────────────────────┐   snapshot   ┌──────────────────────────┐│
//! │  │    ProductSelection      │─────────────►│     PaymentSession       ││
//! │  │                          │◄─────────────│                          ││
//! │  │  products, filter        │  hand-back   │  ticket lines            ││
//! │  │  cart, currency          │              │  card form, cash, seat   ││
//! │  │  sale type               │              │  confirmation            ││
//! │  │  watch::Sender<Summary>  │              │                          ││
//! │  └──────────────────────────┘              └──────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod payment;
mod selection;
mod store;

pub use payment::{Confirmation, PaymentSession};
pub use selection::{CartSummary, ProductSelection};
pub use store::{AppStore, Screen};

// =============================================================================
// Surface Messages
// =============================================================================

/// Filter value that shows every product.
pub const ALL_PRODUCTS_FILTER: &str = "all";

/// Seat a fresh ticket is served to.
pub const DEFAULT_SEAT: &str = "A1";

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load products";

pub const INVENTORY_EXCEEDED_MESSAGE: &str = "Cannot add more items than available in inventory";

pub const EMPTY_CART_MESSAGE: &str = "No products in cart";

pub const CASH_INSUFFICIENT_MESSAGE: &str = "Cash amount must be greater than or equal to total";

pub const CARD_INCOMPLETE_MESSAGE: &str = "Please complete all card details";

pub const PAYMENT_FAILED_MESSAGE: &str = "Payment failed. Please try again.";

pub const CASH_SUCCESS_MESSAGE: &str = "Cash payment processed successfully";

pub const CARD_SUCCESS_MESSAGE: &str = galley_services::APPROVED_MESSAGE;
