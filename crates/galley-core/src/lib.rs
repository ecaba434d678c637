//! # galley-core: Pure Pricing Engine for Galley POS
//!
//! This crate is the **heart** of Galley POS. Every price the crew sees,
//! on the product grid or on the payment ticket, is computed here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Galley POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Frontend (React Native)                         │   │
//! │  │        Product Grid  ──────────►  Payment Ticket                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              apps/storefront (session state)                    │   │
//! │  │      ProductSelection, PaymentSession, AppStore                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ galley-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐ │   │
//! │  │  │ currency │ │ discount │ │   cart   │ │ pricing  │ │checkout│ │   │
//! │  │  │ rates    │ │ SaleType │ │ CartItem │ │ Quote    │ │ cash/  │ │   │
//! │  │  │ format   │ │ labels   │ │ Cart     │ │ totals   │ │ card   │ │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └──────────┘ └───────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Exact decimal `Money` type
//! - [`currency`] - Currency enum, static exchange-rate table, formatting
//! - [`discount`] - Sale types and their discount percentages
//! - [`types`] - Product and payment request/response types
//! - [`cart`] - CartItem, Cart, and the typed snapshot passed between surfaces
//! - [`pricing`] - The single convert → discount → multiply pipeline
//! - [`checkout`] - Cash and card input rules
//! - [`validation`] - Boundary validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **Exact Money**: Decimal arithmetic, rounded only when formatted for display
//! 3. **One Pricing Path**: Both surfaces call [`pricing`], never their own formula
//! 4. **Closed Sets**: Currencies and sale types are enums, so no lookup can miss
//!
//! ## Example Usage
//!
//! ```rust
//! use galley_core::{cart_line_total, format_currency, CartItem, Currency, Money, Product, SaleType};
//!
//! let product = Product::new("1", "Orange Juice", Money::from_str_exact("5.53").unwrap(), Currency::Eur, 10);
//! let item = CartItem::new(product, 2);
//!
//! // 5.53 EUR → 5.9724 USD → 25% crew discount → 4.4793 → ×2
//! let total = cart_line_total(&item, Currency::Usd, SaleType::Crew);
//! assert_eq!(format_currency(total, Currency::Usd), "8.96 $");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod currency;
pub mod discount;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use galley_core::Money` instead of
// `use galley_core::money::Money`

pub use cart::{Cart, CartData, CartItem, CartSnapshot};
pub use currency::{alternative_currencies, convert, format_currency, Currency};
pub use discount::{
    calculate_discounted_price, discount_label, discount_percentage, has_discount, SaleType,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{
    cart_grand_total, cart_line_total, grand_total, guarded_alternatives, quote, unit_price, Quote,
    QuoteLine,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Seat rows served by the trolley.
pub const SEAT_ROWS: &[char] = &['A', 'B', 'C', 'D', 'E', 'F'];

/// Seats per row.
pub const SEATS_PER_ROW: u32 = 6;
