//! # App Store
//!
//! Owns both surfaces and moves the cart between them.
//!
//! ## Navigation
//! ```text
//! ┌────────────┐  begin_checkout()       ┌────────────┐
//! │ Selection  │────────────────────────►│  Payment   │
//! │  (grid)    │◄────────────────────────│  (ticket)  │
//! └────────────┘  return_to_selection()  └─────┬──────┘
//!       ▲                                      │ approved
//!       └──────────── complete_checkout() ◄────┘
//!                     (cart cleared)
//! ```

use galley_services::CatalogService;
use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use crate::config::SessionSettings;
use crate::error::{AppError, AppResult};
use crate::state::{Confirmation, PaymentSession, ProductSelection, EMPTY_CART_MESSAGE};

/// Which surface is in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Selection,
    Payment,
}

#[derive(Debug)]
pub struct AppStore {
    settings: SessionSettings,
    selection: ProductSelection,
    payment: PaymentSession,
    screen: Screen,
}

impl Default for AppStore {
    fn default() -> Self {
        AppStore::from_config(&SessionSettings::default())
    }
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts both surfaces from the `[session]` settings.
    pub fn from_config(settings: &SessionSettings) -> Self {
        AppStore {
            settings: settings.clone(),
            selection: ProductSelection::new(settings.currency, settings.sale_type),
            payment: PaymentSession::new(settings.seat_number.clone()),
            screen: Screen::Selection,
        }
    }

    /// Loads the product grid.
    pub async fn initialize(&mut self, catalog: &dyn CatalogService) -> AppResult<()> {
        info!("Initializing storefront");
        self.selection.load_products(catalog).await
    }

    /// Starts both surfaces over on the grid.
    ///
    /// Products are dropped too; call [`AppStore::initialize`] again. Cart
    /// subscribers stay attached.
    pub fn reset(&mut self) {
        debug!("Resetting storefront");
        self.selection.reset(self.settings.currency, self.settings.sale_type);
        self.payment = PaymentSession::new(self.settings.seat_number.clone());
        self.screen = Screen::Selection;
    }

    // =========================================================================
    // Surfaces
    // =========================================================================

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selection(&self) -> &ProductSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut ProductSelection {
        &mut self.selection
    }

    pub fn payment(&self) -> &PaymentSession {
        &self.payment
    }

    pub fn payment_mut(&mut self) -> &mut PaymentSession {
        &mut self.payment
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Opens the payment ticket with the current cart.
    pub fn begin_checkout(&mut self) -> AppResult<()> {
        if !self.selection.can_proceed_to_payment() {
            return Err(AppError::cart(EMPTY_CART_MESSAGE));
        }

        let snapshot = self.selection.payment_snapshot();
        info!(
            lines = snapshot.items.len(),
            total = %snapshot.total,
            "Checkout started"
        );
        self.payment.initialize(snapshot);
        self.screen = Screen::Payment;
        Ok(())
    }

    /// Back to the grid, taking the edited ticket with it.
    pub fn return_to_selection(&mut self) {
        if let Some(snapshot) = self.payment.take_snapshot() {
            self.selection.update_cart_from_payment(snapshot);
        }
        self.payment.clear_error();
        self.screen = Screen::Selection;
    }

    /// Finishes an approved payment: the cart is emptied and the grid is
    /// back in front.
    pub fn complete_checkout(&mut self) -> AppResult<Confirmation> {
        let confirmation = self
            .payment
            .confirmation()
            .cloned()
            .ok_or_else(|| AppError::payment("No approved payment to complete"))?;

        self.selection.clear_cart();
        self.payment.take_snapshot();
        self.payment.reset_form();
        self.payment.close_confirmation();
        self.screen = Screen::Selection;

        info!(transaction_id = ?confirmation.transaction_id, "Checkout complete");
        Ok(confirmation)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use galley_core::{Currency, Money, PaymentMethod, Product, SaleType};
    use galley_services::{SimulatedGateway, StaticCatalog};
    use std::time::Duration;

    async fn store() -> AppStore {
        let mut store = AppStore::new();
        store.initialize(&StaticCatalog::onboard_menu()).await.unwrap();
        store
    }

    fn first_product_id(store: &AppStore) -> String {
        store.selection().products()[0].id.clone()
    }

    #[tokio::test]
    async fn test_from_config() {
        let settings = SessionSettings {
            currency: Currency::Gbp,
            sale_type: SaleType::Crew,
            seat_number: "C4".to_string(),
        };
        let store = AppStore::from_config(&settings);

        assert_eq!(store.selection().currency(), Currency::Gbp);
        assert_eq!(store.selection().sale_type(), SaleType::Crew);
        assert_eq!(store.payment().seat(), "C4");
        assert_eq!(store.screen(), Screen::Selection);
    }

    #[tokio::test]
    async fn test_begin_checkout_needs_a_cart() {
        let mut store = store().await;

        let err = store.begin_checkout().unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(store.screen(), Screen::Selection);
    }

    #[tokio::test]
    async fn test_ticket_edits_come_back() {
        let mut store = store().await;
        let id = first_product_id(&store);
        store.selection_mut().add_to_cart(&id).unwrap();
        store.selection_mut().add_to_cart(&id).unwrap();

        store.begin_checkout().unwrap();
        assert_eq!(store.screen(), Screen::Payment);
        assert_eq!(store.payment().cart_items().len(), 1);

        store.payment_mut().update_quantity(&id, 1).unwrap();
        store.return_to_selection();

        assert_eq!(store.screen(), Screen::Selection);
        assert_eq!(store.selection().cart_quantity(&id), 1);
        assert!(store.payment().cart_items().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_checkout_clears_cart() {
        let mut store = store().await;
        let id = first_product_id(&store);
        store.selection_mut().add_to_cart(&id).unwrap();
        store.begin_checkout().unwrap();

        assert!(store.complete_checkout().is_err());

        store.payment_mut().set_cash_amount("100");
        let gateway = SimulatedGateway::new(Duration::from_millis(1000));
        store
            .payment_mut()
            .process_payment(&gateway, PaymentMethod::Cash)
            .await
            .unwrap();

        let confirmation = store.complete_checkout().unwrap();
        assert!(confirmation.is_cash_payment);
        assert!(store.selection().cart().is_empty());
        assert!(store.payment().confirmation().is_none());
        assert_eq!(store.screen(), Screen::Selection);
    }

    #[tokio::test]
    async fn test_reset_starts_over() {
        let mut store = store().await;
        let id = first_product_id(&store);
        store.selection_mut().add_to_cart(&id).unwrap();
        store.selection_mut().set_currency(Currency::Eur);

        store.reset();

        assert!(store.selection().cart().is_empty());
        assert!(store.selection().products().is_empty());
        assert_eq!(store.selection().currency(), Currency::Usd);
    }

    #[tokio::test]
    async fn test_subscribers_survive_reset() {
        let mut store = store().await;
        let mut rx = store.selection().subscribe();
        let id = first_product_id(&store);
        store.selection_mut().add_to_cart(&id).unwrap();
        rx.borrow_and_update();

        store.reset();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().total_quantity, 0);

        store.initialize(&StaticCatalog::onboard_menu()).await.unwrap();
        store.selection_mut().add_to_cart(&id).unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().total_quantity, 1);
    }

    #[tokio::test]
    async fn test_ticket_line_above_999_survives_hand_back() {
        let mut store = AppStore::new();
        let water = Product::new(
            "big",
            "Water Crate",
            Money::from_minor(100),
            Currency::Usd,
            2000,
        );
        store
            .initialize(&StaticCatalog::new(vec![water]))
            .await
            .unwrap();
        store.selection_mut().add_to_cart("big").unwrap();
        store.begin_checkout().unwrap();

        store.payment_mut().update_quantity("big", 1500).unwrap();
        store.return_to_selection();

        assert_eq!(store.selection().cart_quantity("big"), 1500);
    }
}
