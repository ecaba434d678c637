//! # Cart Module
//!
//! The cart aggregate, its lines, and the typed snapshot handed between the
//! product grid and the payment ticket.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Surface Action            Cart Method              Gate                │
//! │  ──────────────            ───────────              ────                │
//! │                                                                         │
//! │  Grid: tap product ───────► add_item() ───────────► can_purchase(new)  │
//! │                                                                         │
//! │  Grid: tap "−" ───────────► update_item_quantity()  (qty−1, or remove) │
//! │                                                                         │
//! │  Ticket: swipe delete ────► remove_item()                               │
//! │                                                                         │
//! │  Ticket: change qty ──────► update_item_quantity() ► can_purchase(qty) │
//! │                                                                         │
//! │  Payment approved ────────► clear()                                     │
//! │                                                                         │
//! │  NOTE: Ordinary failures (out of stock, unknown line) return `false`.  │
//! │        The try_* methods say why.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id (adding the same product increases quantity)
//! - Every quantity is ≥ 1; reaching 0 removes the line
//! - A quantity never exceeds the product's inventory *as of the last mutation*
//! - Lines iterate in insertion order, so the ticket doesn't reshuffle

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::currency::{format_currency, Currency};
use crate::discount::SaleType;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::grand_total;
use crate::types::Product;
use crate::validation::{validate_product_id, validate_quantity, ValidationResult};

// =============================================================================
// Cart Item
// =============================================================================

/// One line of the cart: a product and how many of it.
///
/// ## Design Notes
/// The line owns a copy of the product as it was when added. If the catalog
/// reloads with a lower inventory, the line keeps its quantity until the next
/// mutation re-checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    product: Product,
    quantity: u32,
}

impl CartItem {
    /// Creates a line. Inventory is checked by [`Cart`], not here.
    pub fn new(product: Product, quantity: u32) -> Self {
        CartItem { product, quantity }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The product id, which is also the line's key in the cart.
    pub fn id(&self) -> &str {
        &self.product.id
    }

    /// Unit price × quantity in the product's own currency.
    ///
    /// Conversion and discounts belong to [`crate::pricing`].
    pub fn total_price(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }

    /// Native line total for display, e.g. `"11.06 €"`.
    pub fn formatted_total_price(&self) -> String {
        format_currency(self.total_price(), self.product.currency)
    }

    pub fn can_increase_quantity(&self) -> bool {
        self.quantity
            .checked_add(1)
            .is_some_and(|next| self.product.can_purchase(next))
    }

    /// Adds one unit if inventory allows. Returns whether it did.
    pub fn increase_quantity(&mut self) -> bool {
        if self.can_increase_quantity() {
            self.quantity += 1;
            return true;
        }
        false
    }

    /// Removes one unit if more than one is left. Returns whether it did.
    ///
    /// Going from 1 to 0 is the caller's job (remove the line).
    pub fn decrease_quantity(&mut self) -> bool {
        if self.quantity > 1 {
            self.quantity -= 1;
            return true;
        }
        false
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Serialized form of a cart: the lines, product data and quantity each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartData {
    pub items: Vec<CartItem>,
}

/// The shopping cart, keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get_item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == product_id)
    }

    /// Quantity in the cart for `product_id`, 0 when absent.
    pub fn get_item_quantity(&self, product_id: &str) -> u32 {
        self.get_item(product_id).map_or(0, CartItem::quantity)
    }

    /// Adds `quantity` units of `product`, or increases the existing line.
    ///
    /// ## Returns
    /// `false` (and no change) when the resulting quantity would exceed the
    /// product's inventory, or when `quantity` is 0.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> bool {
        self.try_add_item(product, quantity).is_ok()
    }

    /// [`Cart::add_item`] with the reason for failure.
    pub fn try_add_item(&mut self, product: &Product, quantity: u32) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.id() == product.id) {
            let new_quantity = item.quantity.saturating_add(quantity);
            if !product.can_purchase(new_quantity) {
                return Err(CoreError::InventoryExceeded {
                    product_id: product.id.clone(),
                    available: product.inventory,
                    requested: new_quantity,
                });
            }
            item.quantity = new_quantity;
            return Ok(());
        }

        if !product.can_purchase(quantity) {
            return Err(CoreError::InventoryExceeded {
                product_id: product.id.clone(),
                available: product.inventory,
                requested: quantity,
            });
        }

        self.items.push(CartItem::new(product.clone(), quantity));
        Ok(())
    }

    /// Deletes the line for `product_id`. Returns whether one was there.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        self.try_remove_item(product_id).is_ok()
    }

    /// [`Cart::remove_item`] with the reason for failure.
    pub fn try_remove_item(&mut self, product_id: &str) -> CoreResult<CartItem> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::UnknownCartEntry(product_id.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Behavior
    /// - Unknown product: fails
    /// - Quantity ≤ 0: removes the line (success)
    /// - Quantity over inventory: fails, line untouched
    pub fn update_item_quantity(&mut self, product_id: &str, quantity: i64) -> bool {
        self.try_update_item_quantity(product_id, quantity).is_ok()
    }

    /// [`Cart::update_item_quantity`] with the reason for failure.
    pub fn try_update_item_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::UnknownCartEntry(product_id.to_string()))?;

        if quantity <= 0 {
            self.items.remove(index);
            return Ok(());
        }

        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
        let item = &mut self.items[index];
        if !item.product.can_purchase(requested) {
            return Err(CoreError::InventoryExceeded {
                product_id: product_id.to_string(),
                available: item.product.inventory,
                requested,
            });
        }

        item.quantity = requested;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(CartItem::quantity).sum()
    }

    /// Returns the number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Hands the lines over, leaving nothing behind.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    // -------------------------------------------------------------------------
    // Data access
    // -------------------------------------------------------------------------

    pub fn to_data(&self) -> CartData {
        CartData {
            items: self.items.clone(),
        }
    }

    /// Rebuilds a cart keyed by product id. A repeated id replaces the
    /// earlier line, keeping the earlier line's position.
    pub fn from_data(data: CartData) -> Self {
        let mut cart = Cart::new();
        for item in data.items {
            match cart.position(item.id()) {
                Some(index) => cart.items[index] = item,
                None => cart.items.push(item),
            }
        }
        cart
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(&self.to_data())?)
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        let data: CartData = serde_json::from_str(json)?;
        Ok(Cart::from_data(data))
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == product_id)
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// Everything the payment surface needs from the product grid, and what it
/// hands back after the passenger has edited the ticket.
///
/// ## Hand-off
/// ```text
/// ProductSelection ──capture()──► CartSnapshot ──► PaymentSession
///        ▲                                              │
///        └───────── update_cart_from_payment() ◄────────┘
///                   (ownership transfer, not merge)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub currency: Currency,
    pub sale_type: SaleType,
    /// Grand total when the snapshot was taken. Surfaces recompute from
    /// `items` rather than trusting this.
    pub total: Money,
}

impl CartSnapshot {
    /// Captures the cart with its total in `currency` under `sale_type`.
    pub fn capture(cart: &Cart, currency: Currency, sale_type: SaleType) -> Self {
        CartSnapshot {
            items: cart.items().to_vec(),
            currency,
            sale_type,
            total: grand_total(cart.items(), currency, sale_type),
        }
    }

    /// Recomputes `total` from the current lines.
    pub fn refresh_total(&mut self) {
        self.total = grand_total(&self.items, self.currency, self.sale_type);
    }

    /// Boundary check: sane ids and quantities, no repeated product.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            validate_product_id(item.id())?;
            validate_quantity(item.quantity())?;
            if !seen.insert(item.id()) {
                return Err(ValidationError::Duplicate {
                    field: "product".to_string(),
                    value: item.id().to_string(),
                });
            }
        }

        Ok(())
    }

    /// Parses and validates a snapshot received from the other surface.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let snapshot: CartSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Turns the lines back into a cart.
    pub fn into_cart(self) -> Cart {
        Cart::from_data(CartData { items: self.items })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price_minor: i64, inventory: u32) -> Product {
        Product::new(
            id,
            format!("Product {id}"),
            Money::from_minor(price_minor),
            Currency::Eur,
            inventory,
        )
    }

    #[test]
    fn test_cart_item_total_price() {
        let item = CartItem::new(product("1", 553, 10), 2);
        assert_eq!(item.total_price(), Money::from_minor(1106));
        assert_eq!(item.formatted_total_price(), "11.06 €");
    }

    #[test]
    fn test_cart_item_increase_respects_inventory() {
        let mut item = CartItem::new(product("1", 100, 2), 1);
        assert!(item.increase_quantity());
        assert_eq!(item.quantity(), 2);
        assert!(!item.increase_quantity());
        assert_eq!(item.quantity(), 2);
    }

    #[test]
    fn test_cart_item_at_max_quantity_cannot_increase() {
        let mut item = CartItem::new(product("1", 100, u32::MAX), u32::MAX);

        assert!(!item.can_increase_quantity());
        assert!(!item.increase_quantity());
        assert_eq!(item.quantity(), u32::MAX);
    }

    #[test]
    fn test_cart_item_decrease_stops_at_one() {
        let mut item = CartItem::new(product("1", 100, 5), 2);
        assert!(item.decrease_quantity());
        assert_eq!(item.quantity(), 1);
        assert!(!item.decrease_quantity());
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let juice = product("1", 553, 10);

        assert!(cart.add_item(&juice, 2));

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.get_item_quantity("1"), 2);
    }

    #[test]
    fn test_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let juice = product("1", 553, 10);

        assert!(cart.add_item(&juice, 2));
        assert!(cart.add_item(&juice, 3));

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_eleventh_add_fails_at_inventory_ten() {
        let mut cart = Cart::new();
        let juice = product("1", 553, 10);

        for _ in 0..10 {
            assert!(cart.add_item(&juice, 1));
        }
        assert!(!cart.add_item(&juice, 1));
        assert_eq!(cart.get_item_quantity("1"), 10);
    }

    #[test]
    fn test_add_beyond_inventory_reports_reason() {
        let mut cart = Cart::new();
        let juice = product("1", 553, 3);
        cart.add_item(&juice, 2);

        let err = cart.try_add_item(&juice, 2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InventoryExceeded {
                available: 3,
                requested: 4,
                ..
            }
        ));
        assert_eq!(cart.get_item_quantity("1"), 2);
    }

    #[test]
    fn test_add_new_product_over_inventory_fails() {
        let mut cart = Cart::new();
        assert!(!cart.add_item(&product("1", 100, 0), 1));
        assert!(!cart.add_item(&product("2", 100, 2), 3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_zero_quantity_is_rejected() {
        let mut cart = Cart::new();
        assert!(!cart.add_item(&product("1", 100, 5), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_returns_false() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 100, 5), 1);
        let before = cart.clone();

        assert!(!cart.remove_item("nope"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_present() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 100, 5), 1);

        assert!(cart.remove_item("1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_item_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 100, 5), 1);

        assert!(cart.update_item_quantity("1", 4));
        assert_eq!(cart.get_item_quantity("1"), 4);

        // Over inventory: untouched
        assert!(!cart.update_item_quantity("1", 6));
        assert_eq!(cart.get_item_quantity("1"), 4);

        // Unknown line
        assert!(!cart.update_item_quantity("2", 1));
        assert!(matches!(
            cart.try_update_item_quantity("2", 1),
            Err(CoreError::UnknownCartEntry(_))
        ));
    }

    #[test]
    fn test_update_to_zero_or_less_removes() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 100, 5), 2);
        cart.add_item(&product("2", 100, 5), 2);

        assert!(cart.update_item_quantity("1", 0));
        assert!(cart.update_item_quantity("2", -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_absent_with_zero_or_less_fails() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 100, 5), 2);
        let before = cart.clone();

        assert!(!cart.update_item_quantity("absent", 0));
        assert!(!cart.update_item_quantity("absent", -1));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_large_quantities_only_bound_by_inventory() {
        let mut cart = Cart::new();
        let crate_of_water = product("1", 100, 2000);

        assert!(cart.add_item(&crate_of_water, 1000));
        assert!(cart.add_item(&crate_of_water, 500));
        assert_eq!(cart.get_item_quantity("1"), 1500);

        assert!(!cart.add_item(&crate_of_water, 501));
        assert_eq!(cart.get_item_quantity("1"), 1500);
    }

    #[test]
    fn test_no_limit_on_distinct_lines() {
        let mut cart = Cart::new();
        for n in 0..101 {
            assert!(cart.add_item(&product(&n.to_string(), 100, 1), 1));
        }
        assert_eq!(cart.item_count(), 101);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = Cart::new();
        for id in ["3", "1", "2"] {
            cart.add_item(&product(id, 100, 5), 1);
        }
        cart.add_item(&product("1", 100, 5), 1);

        let ids: Vec<&str> = cart.items().iter().map(CartItem::id).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 100, 5), 2);
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut cart = Cart::new();
        cart.add_item(&product("2", 250, 5).with_type("drinks"), 3);
        cart.add_item(&product("1", 553, 10), 1);

        let restored = Cart::from_json(&cart.to_json().unwrap()).unwrap();

        assert_eq!(restored.item_count(), 2);
        for item in cart.items() {
            let other = restored.get_item(item.id()).unwrap();
            assert_eq!(other.product(), item.product());
            assert_eq!(other.quantity(), item.quantity());
        }
    }

    #[test]
    fn test_from_data_is_keyed_by_id_regardless_of_order() {
        let a = CartItem::new(product("a", 100, 5), 1);
        let b = CartItem::new(product("b", 100, 5), 2);

        let forward = Cart::from_data(CartData {
            items: vec![a.clone(), b.clone()],
        });
        let backward = Cart::from_data(CartData {
            items: vec![b, a],
        });

        for id in ["a", "b"] {
            assert_eq!(forward.get_item(id), backward.get_item(id));
        }
    }

    #[test]
    fn test_snapshot_validation() {
        let item = CartItem::new(product("1", 100, 5), 1);
        let mut snapshot = CartSnapshot {
            items: vec![item.clone()],
            currency: Currency::Usd,
            sale_type: SaleType::Retail,
            total: Money::zero(),
        };
        assert!(snapshot.validate().is_ok());

        snapshot.items.push(item);
        assert!(matches!(
            snapshot.validate(),
            Err(ValidationError::Duplicate { .. })
        ));

        snapshot.items = vec![CartItem::new(product("1", 100, 5), 0)];
        assert!(snapshot.validate().is_err());

        snapshot.items = vec![CartItem::new(product("1", 100, 2000), 1500)];
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_snapshot_from_json_rejects_invalid() {
        let json = r#"{
            "items": [{"product": {"id": "", "name": "Tea", "price": "2.00", "inventory": 3}, "quantity": 1}],
            "currency": "USD",
            "saleType": "Crew",
            "total": "1.50"
        }"#;
        assert!(matches!(
            CartSnapshot::from_json(json),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_snapshot_capture_and_back() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 553, 10), 2);

        let snapshot = CartSnapshot::capture(&cart, Currency::Usd, SaleType::Crew);
        assert_eq!(snapshot.total, Money::from_str_exact("8.9586").unwrap());

        let json = snapshot.to_json().unwrap();
        let back = CartSnapshot::from_json(&json).unwrap();
        assert_eq!(back.into_cart(), cart);
    }
}
