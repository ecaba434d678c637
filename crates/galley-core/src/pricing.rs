//! # Pricing Module
//!
//! The one pricing path both surfaces use.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Line Total Calculation                            │
//! │                                                                         │
//! │  product.price (native)                                                 │
//! │        │                                                                │
//! │        ▼  convert(price, product.currency, target)                      │
//! │  converted unit price                                                   │
//! │        │                                                                │
//! │        ▼  calculate_discounted_price(.., sale_type)                     │
//! │  discounted unit price                                                  │
//! │        │                                                                │
//! │        ▼  × quantity                                                    │
//! │  line total ──► Σ over lines ──► grand total                            │
//! │                                                                         │
//! │  5.53 EUR → 5.9724 USD → 4.4793 (Crew) → 8.9586 (×2) → "8.96 $"        │
//! │                                                                         │
//! │  Nothing in this pipeline rounds. format_currency does, once.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The product grid and the payment ticket used to carry their own copies of
//! this formula. They now both call into here, so the same
//! cart/currency/sale-type triple always yields the same number.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::cart::{Cart, CartItem};
use crate::currency::{alternative_currencies, convert, format_currency, Currency};
use crate::discount::{calculate_discounted_price, discount_label, SaleType};
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Totals
// =============================================================================

/// Price of one unit of `product` in `target`, after the sale-type discount.
pub fn unit_price(product: &Product, target: Currency, sale_type: SaleType) -> Money {
    let converted = convert(product.price, product.currency, target);
    calculate_discounted_price(converted, sale_type)
}

/// Line total in `target`: convert, discount, then multiply by quantity.
pub fn cart_line_total(item: &CartItem, target: Currency, sale_type: SaleType) -> Money {
    unit_price(item.product(), target, sale_type).multiply_quantity(item.quantity())
}

/// Sum of line totals. Zero for no lines.
pub fn grand_total(items: &[CartItem], target: Currency, sale_type: SaleType) -> Money {
    items
        .iter()
        .map(|item| cart_line_total(item, target, sale_type))
        .sum()
}

/// [`grand_total`] over a whole cart.
pub fn cart_grand_total(cart: &Cart, target: Currency, sale_type: SaleType) -> Money {
    grand_total(cart.items(), target, sale_type)
}

// =============================================================================
// Quote
// =============================================================================

/// One priced ticket line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    /// e.g. `"4.48 $"`
    pub formatted_unit_price: String,
    /// e.g. `"8.96 $"`
    pub formatted_line_total: String,
}

/// Everything a surface shows for a cart under a currency and sale type.
///
/// ## User Workflow
/// ```text
/// Crew taps "Crew" in the sale-type dropdown
///      │
///      ▼
/// quote(items, USD, Crew)
///      │
///      ├──► lines: per-line unit price and total
///      ├──► formatted_total: "8.96 $"   discount_label: "25% OFF"
///      └──► alternatives: { EUR: "8.33 €", GBP: "7.17 £" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    pub currency: Currency,
    pub sale_type: SaleType,
    pub discount_label: String,
    /// Exact, unrounded.
    pub total: Money,
    pub formatted_total: String,
    /// Empty unless `total > 0`.
    pub alternatives: BTreeMap<Currency, String>,
}

/// Prices `items` for display.
pub fn quote(items: &[CartItem], currency: Currency, sale_type: SaleType) -> Quote {
    let lines: Vec<QuoteLine> = items
        .iter()
        .map(|item| {
            let unit = unit_price(item.product(), currency, sale_type);
            let line_total = unit.multiply_quantity(item.quantity());
            QuoteLine {
                product_id: item.id().to_string(),
                name: item.product().name.clone(),
                quantity: item.quantity(),
                unit_price: unit,
                line_total,
                formatted_unit_price: format_currency(unit, currency),
                formatted_line_total: format_currency(line_total, currency),
            }
        })
        .collect();

    let total: Money = lines.iter().map(|line| line.line_total).sum();

    Quote {
        lines,
        currency,
        sale_type,
        discount_label: discount_label(sale_type),
        total,
        formatted_total: format_currency(total, currency),
        alternatives: guarded_alternatives(total, currency),
    }
}

/// Alternative-currency strings, or nothing when there is nothing to pay.
pub fn guarded_alternatives(total: Money, base: Currency) -> BTreeMap<Currency, String> {
    if !total.is_positive() {
        return BTreeMap::new();
    }
    alternative_currencies(total, base)
}

// =============================================================================
// Unit Tests
// =============================================================================
