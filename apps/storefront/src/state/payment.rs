//! # Payment Session State
//!
//! The payment ticket: the cart handed over from the grid, the card form,
//! the cash input and the seat, plus the outcome of the last payment.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Payment Ticket                                    │
//! │                                                                         │
//! │  initialize(snapshot)                                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  edit lines ──► remove_item() / update_quantity()  (inventory gated)    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  process_payment(gateway, method)                                       │
//! │        │                                                                │
//! │        ├── no lines ───────────────► "No products in cart"              │
//! │        ├── cash < total ───────────► "Cash amount must be ..."          │
//! │        ├── card form incomplete ───► "Please complete all card details" │
//! │        │                                                                │
//! │        ▼  one gateway call                                              │
//! │  ┌────────────┐   success   ┌───────────────────────────────┐           │
//! │  │  Gateway   │────────────►│ Confirmation + change / clear │           │
//! │  └────────────┘             └───────────────────────────────┘           │
//! │        │ failure                                                        │
//! │        ▼                                                                │
//! │  "Payment failed. Please try again."                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, Utc};
use galley_core::checkout::{
    can_process_cash, cash_change, parse_cash_amount, sanitize_cash_amount, CardForm,
};
use galley_core::pricing::{cart_line_total, grand_total};
use galley_core::validation::validate_seat_number;
use galley_core::{
    format_currency, Cart, CartData, CartItem, CartSnapshot, CoreError, Currency, Money,
    PaymentMethod, PaymentRequest, SaleType,
};
use galley_services::PaymentGateway;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use ts_rs::TS;

use crate::error::{AppError, AppResult};
use crate::state::{
    CARD_INCOMPLETE_MESSAGE, CARD_SUCCESS_MESSAGE, CASH_INSUFFICIENT_MESSAGE,
    CASH_SUCCESS_MESSAGE, DEFAULT_SEAT, EMPTY_CART_MESSAGE, PAYMENT_FAILED_MESSAGE,
};

// =============================================================================
// Confirmation
// =============================================================================

/// Shown in the confirmation dialog after an approved payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub message: String,
    pub transaction_id: Option<String>,
    pub is_cash_payment: bool,
}

// =============================================================================
// Payment Session
// =============================================================================

#[derive(Debug)]
pub struct PaymentSession {
    snapshot: Option<CartSnapshot>,
    card: CardForm,
    cash_amount: String,
    seat: String,
    processing: bool,
    error: Option<String>,
    confirmation: Option<Confirmation>,
    cash_change: Option<Money>,
    current_year: u32,
}

impl Default for PaymentSession {
    fn default() -> Self {
        PaymentSession::new(DEFAULT_SEAT)
    }
}

impl PaymentSession {
    /// Creates an empty ticket for `seat`.
    pub fn new(seat: impl Into<String>) -> Self {
        PaymentSession {
            snapshot: None,
            card: CardForm::new(),
            cash_amount: String::new(),
            seat: seat.into(),
            processing: false,
            error: None,
            confirmation: None,
            cash_change: None,
            current_year: Utc::now().year().rem_euclid(100) as u32,
        }
    }

    /// Pins the two-digit year card expiry dates are checked against.
    pub fn with_current_year(mut self, year: u32) -> Self {
        self.current_year = year % 100;
        self
    }

    /// Takes over the cart handed from the product grid.
    pub fn initialize(&mut self, snapshot: CartSnapshot) {
        debug!(
            lines = snapshot.items.len(),
            currency = %snapshot.currency,
            sale_type = %snapshot.sale_type,
            "Payment ticket opened"
        );
        self.snapshot = Some(snapshot);
        self.error = None;
    }

    // =========================================================================
    // Ticket
    // =========================================================================

    pub fn cart_items(&self) -> &[CartItem] {
        self.snapshot.as_ref().map_or(&[][..], |s| s.items.as_slice())
    }

    pub fn currency(&self) -> Currency {
        self.snapshot.as_ref().map(|s| s.currency).unwrap_or_default()
    }

    pub fn sale_type(&self) -> SaleType {
        self.snapshot.as_ref().map(|s| s.sale_type).unwrap_or_default()
    }

    /// Recomputed from the current lines, never read from the snapshot.
    pub fn total(&self) -> Money {
        grand_total(self.cart_items(), self.currency(), self.sale_type())
    }

    pub fn formatted_total(&self) -> String {
        format_currency(self.total(), self.currency())
    }

    /// Line total in the ticket currency after discount.
    pub fn formatted_line_price(&self, item: &CartItem) -> String {
        let line = cart_line_total(item, self.currency(), self.sale_type());
        format_currency(line, self.currency())
    }

    /// Drops a line from the ticket.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        self.edit_lines(|cart| cart.remove_item(product_id))
    }

    /// Sets a line's quantity. Zero or less removes it.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> AppResult<()> {
        let mut outcome = Err(CoreError::UnknownCartEntry(product_id.to_string()));
        self.edit_lines(|cart| {
            outcome = cart.try_update_item_quantity(product_id, quantity);
            outcome.is_ok()
        });

        outcome.map_err(|e| {
            warn!(product_id, quantity, error = %e, "Quantity change refused");
            e.into()
        })
    }

    fn edit_lines(&mut self, edit: impl FnOnce(&mut Cart) -> bool) -> bool {
        let Some(snapshot) = self.snapshot.as_mut() else {
            return false;
        };

        let mut cart = Cart::from_data(CartData {
            items: std::mem::take(&mut snapshot.items),
        });
        let changed = edit(&mut cart);
        snapshot.items = cart.into_items();
        snapshot.refresh_total();
        changed
    }

    // =========================================================================
    // Card Form
    // =========================================================================

    pub fn card(&self) -> &CardForm {
        &self.card
    }

    pub fn set_card_number(&mut self, value: &str) {
        self.card.set_card_number(value);
    }

    pub fn set_expiry_date(&mut self, value: &str) {
        self.card.set_expiry_date(value, self.current_year);
    }

    pub fn set_cvv(&mut self, value: &str) {
        self.card.set_cvv(value);
    }

    pub fn set_cardholder_name(&mut self, value: &str) {
        self.card.set_cardholder_name(value);
    }

    pub fn is_form_valid(&self) -> bool {
        self.card.is_valid()
    }

    /// `MM/YY` as typed so far.
    pub fn formatted_expiry_date(&self) -> String {
        self.card.formatted_expiry_date()
    }

    // =========================================================================
    // Cash & Seat
    // =========================================================================

    pub fn cash_amount(&self) -> &str {
        &self.cash_amount
    }

    pub fn set_cash_amount(&mut self, value: &str) {
        self.cash_amount = sanitize_cash_amount(value);
    }

    pub fn can_process_cash(&self) -> bool {
        can_process_cash(parse_cash_amount(&self.cash_amount), self.total())
    }

    /// Change owed after the last cash payment.
    pub fn cash_change(&self) -> Option<Money> {
        self.cash_change
    }

    pub fn seat(&self) -> &str {
        &self.seat
    }

    /// Sets the seat the ticket is served to, e.g. `"C4"`.
    pub fn set_seat(&mut self, seat: &str) -> AppResult<()> {
        let seat = seat.trim().to_uppercase();
        validate_seat_number(&seat)?;
        self.seat = seat;
        Ok(())
    }

    // =========================================================================
    // Payment
    // =========================================================================

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Submits the ticket to `gateway`.
    ///
    /// Guards run first and touch nothing but the error message. The gateway
    /// is called exactly once; there is no retry.
    pub async fn process_payment(
        &mut self,
        gateway: &dyn PaymentGateway,
        method: PaymentMethod,
    ) -> AppResult<Confirmation> {
        self.error = None;
        let total = self.total();

        if self.cart_items().is_empty() {
            return Err(self.refuse(AppError::cart(EMPTY_CART_MESSAGE)));
        }

        let tendered = parse_cash_amount(&self.cash_amount);
        match method {
            PaymentMethod::Cash if !can_process_cash(tendered, total) => {
                return Err(self.refuse(AppError::validation(CASH_INSUFFICIENT_MESSAGE)));
            }
            PaymentMethod::Card if !self.card.is_valid() => {
                return Err(self.refuse(AppError::validation(CARD_INCOMPLETE_MESSAGE)));
            }
            _ => {}
        }

        let request = PaymentRequest {
            items: self.cart_items().to_vec(),
            total,
            currency: self.currency(),
            sale_type: self.sale_type(),
            seat_number: self.seat.clone(),
            method,
            cash_tendered: (method == PaymentMethod::Cash).then_some(tendered),
            card: (method == PaymentMethod::Card).then(|| self.card.clone()),
        };

        self.processing = true;
        let result = gateway.process_payment(&request).await;
        self.processing = false;

        let response = match result {
            Ok(response) if response.success => response,
            Ok(response) => {
                warn!(message = %response.message, "Payment declined");
                return Err(self.refuse(AppError::payment(PAYMENT_FAILED_MESSAGE)));
            }
            Err(e) => {
                error!(error = %e, "Payment failed");
                self.error = Some(PAYMENT_FAILED_MESSAGE.to_string());
                return Err(e.into());
            }
        };

        let confirmation = match method {
            PaymentMethod::Cash => {
                let change = cash_change(tendered, total);
                info!(
                    transaction_id = ?response.transaction_id,
                    change = %change,
                    "Cash payment processed"
                );
                self.cash_change = Some(change);
                self.cash_amount.clear();
                Confirmation {
                    message: CASH_SUCCESS_MESSAGE.to_string(),
                    transaction_id: response.transaction_id,
                    is_cash_payment: true,
                }
            }
            PaymentMethod::Card => {
                info!(transaction_id = ?response.transaction_id, "Card payment processed");
                self.card.clear();
                self.cash_change = None;
                Confirmation {
                    message: CARD_SUCCESS_MESSAGE.to_string(),
                    transaction_id: response.transaction_id,
                    is_cash_payment: false,
                }
            }
        };

        self.confirmation = Some(confirmation.clone());
        Ok(confirmation)
    }

    fn refuse(&mut self, err: AppError) -> AppError {
        debug!(code = ?err.code, message = %err.message, "Payment refused");
        self.error = Some(err.message.clone());
        err
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn close_confirmation(&mut self) {
        self.confirmation = None;
        self.cash_change = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Clears the card form and the cash input.
    pub fn reset_form(&mut self) {
        self.card.clear();
        self.cash_amount.clear();
    }

    // =========================================================================
    // Hand-back
    // =========================================================================

    /// Hands the edited cart back, leaving the ticket empty.
    pub fn take_snapshot(&mut self) -> Option<CartSnapshot> {
        self.snapshot.take().map(|mut snapshot| {
            snapshot.refresh_total();
            snapshot
        })
    }

    pub fn into_snapshot(mut self) -> Option<CartSnapshot> {
        self.take_snapshot()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use async_trait::async_trait;
    use galley_core::{PaymentResponse, Product};
    use galley_services::{ServiceError, ServiceResult, SimulatedGateway};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every request and answers with a canned outcome.
    struct RecordingGateway {
        outcome: Result<PaymentResponse, String>,
        requests: Mutex<Vec<PaymentRequest>>,
    }

    impl RecordingGateway {
        fn approving() -> Self {
            RecordingGateway {
                outcome: Ok(PaymentResponse::approved("OK", "TXN-42")),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            RecordingGateway {
                outcome: Err("gateway down".to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PaymentGateway for RecordingGateway {
        async fn process_payment(&self, request: &PaymentRequest) -> ServiceResult<PaymentResponse> {
            self.requests.lock().unwrap().push(request.clone());
            self.outcome.clone().map_err(ServiceError::Http)
        }

        async fn payment_response(&self, transaction_id: &str) -> ServiceResult<PaymentResponse> {
            Ok(PaymentResponse::approved("OK", transaction_id))
        }
    }

    fn snapshot() -> CartSnapshot {
        let juice = Product::new("1", "Orange Juice", Money::from_minor(553), Currency::Eur, 10);
        let water = Product::new("3", "Water", Money::from_minor(150), Currency::Usd, 5);

        let mut cart = Cart::new();
        cart.add_item(&juice, 2);
        cart.add_item(&water, 1);
        CartSnapshot::capture(&cart, Currency::Usd, SaleType::Crew)
    }

    fn session() -> PaymentSession {
        let mut session = PaymentSession::default().with_current_year(26);
        session.initialize(snapshot());
        session
    }

    fn fill_card(session: &mut PaymentSession) {
        session.set_card_number("4111 1111 1111 1111");
        session.set_expiry_date("1230");
        session.set_cvv("123");
        session.set_cardholder_name("Ada Lovelace");
    }

    #[test]
    fn test_empty_ticket_defaults() {
        let session = PaymentSession::default();

        assert!(session.cart_items().is_empty());
        assert_eq!(session.currency(), Currency::Usd);
        assert_eq!(session.sale_type(), SaleType::Retail);
        assert_eq!(session.formatted_total(), "0.00 $");
        assert_eq!(session.seat(), "A1");
    }

    #[test]
    fn test_totals_recomputed_from_lines() {
        let mut session = session();
        // 8.9586 + 1.50 × 0.75
        assert_eq!(session.formatted_total(), "10.08 $");
        assert_eq!(
            session.formatted_line_price(&session.cart_items()[0].clone()),
            "8.96 $"
        );

        assert!(session.remove_item("3"));
        assert_eq!(session.formatted_total(), "8.96 $");
        assert!(!session.remove_item("3"));
    }

    #[test]
    fn test_update_quantity_is_inventory_gated() {
        let mut session = session();

        let err = session.update_quantity("3", 6).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(session.cart_items()[1].quantity(), 1);

        session.update_quantity("3", 5).unwrap();
        assert_eq!(session.cart_items()[1].quantity(), 5);

        session.update_quantity("3", 0).unwrap();
        assert_eq!(session.cart_items().len(), 1);

        let err = session.update_quantity("9", 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_form_inputs_are_sanitized() {
        let mut session = session();
        fill_card(&mut session);

        assert_eq!(session.card().card_number(), "4111111111111111");
        assert_eq!(session.formatted_expiry_date(), "12/30");
        assert!(session.is_form_valid());

        session.set_cash_amount("12.345");
        assert_eq!(session.cash_amount(), "12.34");

        session.reset_form();
        assert!(!session.is_form_valid());
        assert_eq!(session.cash_amount(), "");
    }

    #[test]
    fn test_set_seat_validates() {
        let mut session = session();

        session.set_seat("c4").unwrap();
        assert_eq!(session.seat(), "C4");

        let err = session.set_seat("Z9").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(session.seat(), "C4");
    }

    #[tokio::test]
    async fn test_empty_cart_is_refused() {
        let gateway = RecordingGateway::approving();
        let mut session = PaymentSession::default();

        let err = session
            .process_payment(&gateway, PaymentMethod::Card)
            .await
            .unwrap_err();

        assert_eq!(err.message, "No products in cart");
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_cash_is_refused() {
        let gateway = RecordingGateway::approving();
        let mut session = session();
        session.set_cash_amount("10.00");

        assert!(!session.can_process_cash());
        let err = session
            .process_payment(&gateway, PaymentMethod::Cash)
            .await
            .unwrap_err();

        assert_eq!(
            session.error(),
            Some("Cash amount must be greater than or equal to total")
        );
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_incomplete_card_is_refused() {
        let gateway = RecordingGateway::approving();
        let mut session = session();
        session.set_card_number("4111");

        session
            .process_payment(&gateway, PaymentMethod::Card)
            .await
            .unwrap_err();

        assert_eq!(session.error(), Some("Please complete all card details"));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_cash_payment_records_change() {
        let gateway = RecordingGateway::approving();
        let mut session = session();
        session.set_cash_amount("20");

        let confirmation = session
            .process_payment(&gateway, PaymentMethod::Cash)
            .await
            .unwrap();

        assert!(confirmation.is_cash_payment);
        assert_eq!(confirmation.message, "Cash payment processed successfully");
        assert_eq!(confirmation.transaction_id.as_deref(), Some("TXN-42"));
        // 20 − 10.0836
        assert_eq!(session.cash_change(), Some(Money::from_str_exact("9.9164").unwrap()));
        assert_eq!(session.cash_amount(), "");

        let sent = gateway.requests.lock().unwrap()[0].clone();
        assert_eq!(sent.cash_tendered, Some(Money::from_minor(2000)));
        assert!(sent.card.is_none());
        assert_eq!(sent.seat_number, "A1");

        session.close_confirmation();
        assert!(session.confirmation().is_none());
        assert!(session.cash_change().is_none());
    }

    #[tokio::test]
    async fn test_card_payment_clears_form() {
        let gateway = RecordingGateway::approving();
        let mut session = session();
        fill_card(&mut session);

        let confirmation = session
            .process_payment(&gateway, PaymentMethod::Card)
            .await
            .unwrap();

        assert!(!confirmation.is_cash_payment);
        assert_eq!(confirmation.message, "Payment processed successfully");
        assert!(!session.is_form_valid());
        assert_eq!(session.confirmation(), Some(&confirmation));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_not_retried() {
        let gateway = RecordingGateway::failing();
        let mut session = session();
        fill_card(&mut session);

        let err = session
            .process_payment(&gateway, PaymentMethod::Card)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ServiceUnavailable);
        assert_eq!(session.error(), Some("Payment failed. Please try again."));
        assert!(!session.is_processing());
        assert!(session.is_form_valid());
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_gateway_end_to_end() {
        let gateway = SimulatedGateway::new(Duration::from_millis(1000));
        let mut session = session();
        fill_card(&mut session);

        let confirmation = session
            .process_payment(&gateway, PaymentMethod::Card)
            .await
            .unwrap();

        assert!(confirmation.transaction_id.unwrap().starts_with("TXN-"));
        assert_eq!(gateway.attempts(), 1);
    }

    #[test]
    fn test_hand_back_leaves_ticket_empty() {
        let mut session = session();
        session.remove_item("1");

        let returned = session.take_snapshot().unwrap();
        assert_eq!(returned.items.len(), 1);
        assert_eq!(returned.total, Money::from_str_exact("1.125").unwrap());
        assert!(session.cart_items().is_empty());
        assert!(session.take_snapshot().is_none());
    }
}
