//! # Domain Types
//!
//! Core domain types used throughout Galley POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    Product      │   │  PaymentRequest  │   │ PaymentResponse │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id             │   │  items           │   │  success        │      │
//! │  │  name           │   │  total, currency │   │  message        │      │
//! │  │  price+currency │   │  sale_type       │   │  transaction_id │      │
//! │  │  inventory      │   │  seat_number     │   └─────────────────┘      │
//! │  │  image, type    │   │  method          │                            │
//! │  └─────────────────┘   └──────────────────┘                            │
//! │                                                                         │
//! │  Currency and SaleType live in their own modules with their tables.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartItem;
use crate::checkout::CardForm;
use crate::currency::{format_currency, Currency};
use crate::discount::SaleType;
use crate::money::Money;
use crate::validation::{
    validate_price, validate_product_id, validate_product_name, ValidationResult,
};

// =============================================================================
// Product
// =============================================================================

/// A product on the trolley.
///
/// Built from catalog data and never mutated afterwards; a catalog reload
/// replaces products wholesale. Cart lines keep their own copy, so a reload
/// never retroactively invalidates a quantity already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier, unique within a catalog.
    pub id: String,

    /// Display name on the product card and the ticket.
    pub name: String,

    /// Unit price in `currency`.
    pub price: Money,

    /// Currency `price` is expressed in.
    #[serde(default)]
    pub currency: Currency,

    /// Units available to sell.
    #[serde(alias = "stock")]
    pub inventory: u32,

    /// Product picture URI.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Category tag used by the grid filter ("drinks", "snacks", ...).
    #[serde(rename = "type")]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
}

impl Product {
    /// Creates a product with no image or category.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        currency: Currency,
        inventory: u32,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price,
            currency,
            inventory,
            image: None,
            product_type: None,
        }
    }

    /// Sets the picture URI.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Sets the category tag.
    pub fn with_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    /// Checks the catalog data is usable: an id, a name, a non-negative price.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_product_id(&self.id)?;
        validate_product_name(&self.name)?;
        validate_price(self.price)?;
        Ok(())
    }

    /// Whether any units are left.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.inventory > 0
    }

    /// Whether `quantity` units could be sold.
    ///
    /// This is the only gate every cart mutation goes through.
    #[inline]
    pub fn can_purchase(&self, quantity: u32) -> bool {
        self.inventory >= quantity
    }

    /// Native price as shown on the product card, e.g. `"2.50 $"`.
    pub fn formatted_price(&self) -> String {
        format_currency(self.price, self.currency)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Notes and coins handed over at the seat.
    Cash,
    /// Card keyed into the payment form.
    #[default]
    Card,
}

// =============================================================================
// Payment Request / Response
// =============================================================================

/// What the payment surface submits to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub items: Vec<CartItem>,
    /// Grand total in `currency`, unrounded.
    pub total: Money,
    pub currency: Currency,
    pub sale_type: SaleType,
    /// Row letter plus seat digit, e.g. `"C4"`.
    pub seat_number: String,
    pub method: PaymentMethod,
    /// For cash: what the passenger handed over.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_tendered: Option<Money>,
    /// For card: the form as submitted.
    #[serde(rename = "cardDetails")]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardForm>,
}

/// What the gateway answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl PaymentResponse {
    /// A successful response carrying a transaction id.
    pub fn approved(message: impl Into<String>, transaction_id: impl Into<String>) -> Self {
        PaymentResponse {
            success: true,
            message: message.into(),
            transaction_id: Some(transaction_id.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn water(inventory: u32) -> Product {
        Product::new("7", "Still Water", Money::from_minor(250), Currency::Usd, inventory)
    }

    #[test]
    fn test_availability() {
        assert!(water(1).is_available());
        assert!(!water(0).is_available());
    }

    #[test]
    fn test_can_purchase() {
        let product = water(10);
        assert!(product.can_purchase(1));
        assert!(product.can_purchase(10));
        assert!(!product.can_purchase(11));
        assert!(water(0).can_purchase(0));
    }

    #[test]
    fn test_formatted_price() {
        assert_eq!(water(1).formatted_price(), "2.50 $");
    }

    #[test]
    fn test_validate() {
        assert!(water(3).validate().is_ok());

        let mut nameless = water(3);
        nameless.name = "  ".to_string();
        assert!(nameless.validate().is_err());

        let mut negative = water(3);
        negative.price = Money::from_minor(-1);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_product_json_shape() {
        let product = water(4).with_type("drinks");
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["type"], "drinks");
        assert_eq!(json["price"], "2.50");
        assert_eq!(json["currency"], "USD");
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_product_accepts_stock_alias() {
        let json = r#"{"id":"9","name":"Crisps","price":1.8,"stock":5}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.inventory, 5);
        assert_eq!(product.currency, Currency::Usd);
        assert_eq!(product.price, Money::from_minor(180));
    }

    #[test]
    fn test_payment_method_serde() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"cash\"");
        assert_eq!(PaymentMethod::default(), PaymentMethod::Card);
    }
}
