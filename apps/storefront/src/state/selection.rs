//! # Product Selection State
//!
//! The product grid: catalog, filters, cart, and the display currency and
//! sale type the footer total is priced in.
//!
//! ## Grid Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Grid Operations                              │
//! │                                                                         │
//! │  Surface Action            Session Method            Cart Change        │
//! │  ──────────────            ──────────────            ───────────        │
//! │                                                                         │
//! │  Open app ────────────────► load_products() ───────► (none)            │
//! │                                                                         │
//! │  Tap product card ────────► add_to_cart() ─────────► qty + 1           │
//! │                                                                         │
//! │  Tap "−" on card ─────────► remove_from_cart() ────► qty − 1 / remove  │
//! │                                                                         │
//! │  Pick currency / type ────► set_currency() ...  ───► (none, re-priced) │
//! │                                                                         │
//! │  "Pay" ───────────────────► payment_snapshot() ────► (none)            │
//! │                                                                         │
//! │  Back from ticket ────────► update_cart_from_payment() ► replaced      │
//! │                                                                         │
//! │  Every change publishes a fresh CartSummary on the watch channel.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use galley_core::pricing::{cart_grand_total, guarded_alternatives, quote, Quote};
use galley_core::{format_currency, Cart, CartSnapshot, Currency, Money, Product, SaleType};
use galley_services::CatalogService;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use ts_rs::TS;

use crate::error::{AppError, AppResult};
use crate::state::{ALL_PRODUCTS_FILTER, INVENTORY_EXCEEDED_MESSAGE, LOAD_FAILED_MESSAGE};

// =============================================================================
// Cart Summary
// =============================================================================

/// What the grid footer shows, pushed to subscribers after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: usize,
    pub total_quantity: u32,
    pub total: Money,
    pub formatted_total: String,
    pub currency: Currency,
    pub sale_type: SaleType,
}

impl CartSummary {
    fn of(cart: &Cart, currency: Currency, sale_type: SaleType) -> Self {
        let total = cart_grand_total(cart, currency, sale_type);
        CartSummary {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total,
            formatted_total: format_currency(total, currency),
            currency,
            sale_type,
        }
    }
}

// =============================================================================
// Product Selection
// =============================================================================

#[derive(Debug)]
pub struct ProductSelection {
    products: Vec<Product>,
    cart: Cart,
    currency: Currency,
    sale_type: SaleType,
    filter: String,
    loading: bool,
    error: Option<String>,
    summary_tx: watch::Sender<CartSummary>,
}

impl Default for ProductSelection {
    fn default() -> Self {
        ProductSelection::new(Currency::default(), SaleType::default())
    }
}

impl ProductSelection {
    /// Creates an empty grid priced in `currency` under `sale_type`.
    pub fn new(currency: Currency, sale_type: SaleType) -> Self {
        let cart = Cart::new();
        let (summary_tx, _) = watch::channel(CartSummary::of(&cart, currency, sale_type));

        ProductSelection {
            products: Vec::new(),
            cart,
            currency,
            sale_type,
            filter: ALL_PRODUCTS_FILTER.to_string(),
            loading: false,
            error: None,
            summary_tx,
        }
    }

    /// Starts the grid over in `currency` and `sale_type`: no products, an
    /// empty cart, no filter and no error.
    ///
    /// Existing subscribers stay attached and receive the empty summary.
    pub fn reset(&mut self, currency: Currency, sale_type: SaleType) {
        self.products.clear();
        self.cart.clear();
        self.currency = currency;
        self.sale_type = sale_type;
        self.filter = ALL_PRODUCTS_FILTER.to_string();
        self.loading = false;
        self.error = None;
        self.publish();
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Replaces the product list from `catalog`.
    ///
    /// On failure the previous products stay, and the surface error reads
    /// "Failed to load products".
    pub async fn load_products(&mut self, catalog: &dyn CatalogService) -> AppResult<()> {
        self.loading = true;
        self.error = None;

        let result = catalog.fetch_products().await;
        self.loading = false;

        match result {
            Ok(products) => {
                info!(count = products.len(), "Products loaded");
                self.products = products;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to load products");
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
                Err(e.into())
            }
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products matching the selected filter.
    pub fn filtered_products(&self) -> Vec<&Product> {
        if self.filter == ALL_PRODUCTS_FILTER {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| p.product_type.as_deref() == Some(self.filter.as_str()))
            .collect()
    }

    /// `"all"` followed by each product type, in first-seen order.
    pub fn product_types(&self) -> Vec<String> {
        let mut types = vec![ALL_PRODUCTS_FILTER.to_string()];
        for product_type in self.products.iter().filter_map(|p| p.product_type.as_ref()) {
            if !types.contains(product_type) {
                types.push(product_type.clone());
            }
        }
        types
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Loaded and non-empty.
    pub fn is_initialized(&self) -> bool {
        !self.loading && !self.products.is_empty()
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Grand total in the selected currency, unrounded.
    pub fn total(&self) -> Money {
        cart_grand_total(&self.cart, self.currency, self.sale_type)
    }

    pub fn formatted_total(&self) -> String {
        format_currency(self.total(), self.currency)
    }

    /// The total in the other currencies. Empty when there is nothing to pay.
    pub fn alternative_currencies(&self) -> BTreeMap<Currency, String> {
        guarded_alternatives(self.total(), self.currency)
    }

    /// Line-by-line pricing of the cart.
    pub fn quote(&self) -> Quote {
        quote(self.cart.items(), self.currency, self.sale_type)
    }

    pub fn can_proceed_to_payment(&self) -> bool {
        !self.cart.is_empty()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds one unit of `product_id`.
    pub fn add_to_cart(&mut self, product_id: &str) -> AppResult<()> {
        let product = self
            .products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AppError::cart(format!("Product {product_id} is not in the catalog")))?;

        if let Err(e) = self.cart.try_add_item(product, 1) {
            warn!(product_id, error = %e, "Add to cart refused");
            self.error = Some(INVENTORY_EXCEEDED_MESSAGE.to_string());
            return Err(e.into());
        }

        debug!(product_id, quantity = self.cart.get_item_quantity(product_id), "Added to cart");
        self.publish();
        Ok(())
    }

    /// Takes one unit of `product_id` off; the last unit removes the line.
    ///
    /// Does nothing when the product isn't in the cart.
    pub fn remove_from_cart(&mut self, product_id: &str) {
        let quantity = self.cart.get_item_quantity(product_id);
        let changed = match quantity {
            0 => false,
            1 => self.cart.remove_item(product_id),
            n => self.cart.update_item_quantity(product_id, i64::from(n) - 1),
        };

        if changed {
            debug!(product_id, quantity = quantity - 1, "Removed from cart");
            self.publish();
        }
    }

    pub fn cart_quantity(&self, product_id: &str) -> u32 {
        self.cart.get_item_quantity(product_id)
    }

    /// Empties the cart after a completed payment.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.publish();
    }

    // =========================================================================
    // Selections
    // =========================================================================

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn sale_type(&self) -> SaleType {
        self.sale_type
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
        self.publish();
    }

    pub fn set_sale_type(&mut self, sale_type: SaleType) {
        self.sale_type = sale_type;
        self.publish();
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// The message the surface should show, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // =========================================================================
    // Hand-off
    // =========================================================================

    /// The cart, currency and sale type for the payment ticket.
    pub fn payment_snapshot(&self) -> CartSnapshot {
        CartSnapshot::capture(&self.cart, self.currency, self.sale_type)
    }

    /// Takes over the cart the payment ticket hands back.
    ///
    /// The old cart is dropped, and each returned line is re-added through
    /// the inventory gate. Lines that no longer fit are left out.
    pub fn update_cart_from_payment(&mut self, snapshot: CartSnapshot) {
        self.cart.clear();

        for item in snapshot.items {
            if let Err(e) = self.cart.try_add_item(item.product(), item.quantity()) {
                warn!(product_id = item.id(), error = %e, "Dropping returned cart line");
            }
        }

        debug!(lines = self.cart.item_count(), "Cart replaced from payment");
        self.publish();
    }

    // =========================================================================
    // Change Notification
    // =========================================================================

    /// Receives a fresh [`CartSummary`] after every cart or pricing change.
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.summary_tx.subscribe()
    }

    fn publish(&self) {
        self.summary_tx
            .send_replace(CartSummary::of(&self.cart, self.currency, self.sale_type));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
