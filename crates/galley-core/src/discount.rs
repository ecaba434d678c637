//! # Discount Module
//!
//! Sale types and the percentage markdown each one carries.
//!
//! ## Discount Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale type             Alias                    Discount    Label       │
//! │  ───────────────────   ──────────────────────   ────────   ──────────   │
//! │  Retail                                            0%      No discount  │
//! │  Crew                                             25%      25% OFF      │
//! │  Happy hour                                       30%      30% OFF      │
//! │  Business Invitation   Invitación business        50%      50% OFF      │
//! │  Tourist Invitation    Invitación turista         40%      40% OFF      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount is applied to the **unit** price after currency conversion
//! and before quantity multiplication. See [`crate::pricing`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Sale Type
// =============================================================================

/// The discount tier selected for a transaction.
///
/// Older builds of the frontend send the Spanish invitation labels; both
/// spellings deserialize to the same variant and serialize to the English one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SaleType {
    /// Full price.
    #[default]
    Retail,
    /// Crew members buying for themselves.
    Crew,
    #[serde(rename = "Happy hour")]
    HappyHour,
    #[serde(rename = "Business Invitation")]
    #[serde(alias = "Invitación business")]
    BusinessInvitation,
    #[serde(rename = "Tourist Invitation")]
    #[serde(alias = "Invitación turista")]
    TouristInvitation,
}

impl SaleType {
    /// Every sale type, in dropdown order.
    pub const ALL: [SaleType; 5] = [
        SaleType::Retail,
        SaleType::Crew,
        SaleType::HappyHour,
        SaleType::BusinessInvitation,
        SaleType::TouristInvitation,
    ];

    /// Label shown in the sale-type dropdown.
    pub const fn label(&self) -> &'static str {
        match self {
            SaleType::Retail => "Retail",
            SaleType::Crew => "Crew",
            SaleType::HappyHour => "Happy hour",
            SaleType::BusinessInvitation => "Business Invitation",
            SaleType::TouristInvitation => "Tourist Invitation",
        }
    }

    /// Percentage taken off the unit price, 0..=100.
    pub const fn discount_percentage(&self) -> u8 {
        match self {
            SaleType::Retail => 0,
            SaleType::Crew => 25,
            SaleType::HappyHour => 30,
            SaleType::BusinessInvitation => 50,
            SaleType::TouristInvitation => 40,
        }
    }
}

impl fmt::Display for SaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SaleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retail" => Ok(SaleType::Retail),
            "crew" => Ok(SaleType::Crew),
            "happy hour" | "happy_hour" => Ok(SaleType::HappyHour),
            "business invitation" | "business_invitation" | "invitación business" => {
                Ok(SaleType::BusinessInvitation)
            }
            "tourist invitation" | "tourist_invitation" | "invitación turista" => {
                Ok(SaleType::TouristInvitation)
            }
            _ => Err(ValidationError::NotAllowed {
                field: "sale type".to_string(),
                allowed: SaleType::ALL.iter().map(|t| t.label().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Discount Calculator
// =============================================================================

/// Looks up the discount percentage for a sale type.
#[inline]
pub fn discount_percentage(sale_type: SaleType) -> u8 {
    sale_type.discount_percentage()
}

/// Applies the sale type's discount to a single unit price.
///
/// `price - price × pct / 100`, exact, unrounded.
///
/// ## Example
/// ```rust
/// use galley_core::{calculate_discounted_price, Money, SaleType};
///
/// let price = Money::from_minor(10000);
/// assert_eq!(calculate_discounted_price(price, SaleType::Crew), Money::from_minor(7500));
/// assert_eq!(calculate_discounted_price(price, SaleType::Retail), price);
/// ```
pub fn calculate_discounted_price(original_price: Money, sale_type: SaleType) -> Money {
    original_price.apply_percentage_discount(discount_percentage(sale_type))
}

/// Whether the sale type takes anything off.
#[inline]
pub fn has_discount(sale_type: SaleType) -> bool {
    discount_percentage(sale_type) > 0
}

/// Badge text next to the total: `"No discount"` or `"<N>% OFF"`.
pub fn discount_label(sale_type: SaleType) -> String {
    match discount_percentage(sale_type) {
        0 => "No discount".to_string(),
        pct => format!("{pct}% OFF"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
