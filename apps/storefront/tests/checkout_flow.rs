//! End-to-end checkout through the store, with the onboard menu and the
//! simulated gateway.

use std::time::Duration;

use async_trait::async_trait;
use galley_core::{Currency, PaymentMethod, PaymentRequest, PaymentResponse, SaleType};
use galley_services::{
    PaymentGateway, ServiceError, ServiceResult, SimulatedGateway, StaticCatalog,
};
use galley_storefront::config::SessionSettings;
use galley_storefront::{AppStore, ErrorCode, Screen};

/// Refuses every payment.
struct DecliningGateway;

#[async_trait]
impl PaymentGateway for DecliningGateway {
    async fn process_payment(&self, _request: &PaymentRequest) -> ServiceResult<PaymentResponse> {
        Err(ServiceError::Status { status: 502 })
    }

    async fn payment_response(&self, _transaction_id: &str) -> ServiceResult<PaymentResponse> {
        Err(ServiceError::Status { status: 502 })
    }
}

async fn crew_store() -> AppStore {
    let settings = SessionSettings {
        currency: Currency::Usd,
        sale_type: SaleType::Crew,
        seat_number: "B2".to_string(),
    };
    let mut store = AppStore::from_config(&settings);
    store
        .initialize(&StaticCatalog::onboard_menu())
        .await
        .unwrap();
    store
}

#[tokio::test(start_paused = true)]
async fn cash_checkout_prices_pays_and_clears() {
    let mut store = crew_store().await;
    let mut summary = store.selection().subscribe();

    // Orange Juice 5.53 ×2, Coffee 3.00 ×1
    store.selection_mut().add_to_cart("2").unwrap();
    store.selection_mut().add_to_cart("2").unwrap();
    store.selection_mut().add_to_cart("3").unwrap();

    // (11.06 + 3.00) × 0.75
    assert_eq!(store.selection().formatted_total(), "10.55 $");
    assert_eq!(summary.borrow_and_update().total_quantity, 3);

    store.begin_checkout().unwrap();
    assert_eq!(store.screen(), Screen::Payment);
    assert_eq!(store.payment().formatted_total(), "10.55 $");

    let payment = store.payment_mut();
    payment.set_cash_amount("20.00");
    assert!(payment.can_process_cash());

    let gateway = SimulatedGateway::new(Duration::from_millis(1000));
    let confirmation = payment
        .process_payment(&gateway, PaymentMethod::Cash)
        .await
        .unwrap();
    assert!(confirmation.is_cash_payment);
    assert_eq!(
        payment.cash_change().map(|change| change.to_fixed()),
        Some("9.46".to_string())
    );

    store.complete_checkout().unwrap();
    assert!(store.selection().cart().is_empty());
    assert!(summary.has_changed().unwrap());
    assert_eq!(summary.borrow_and_update().total_quantity, 0);
    assert_eq!(gateway.attempts(), 1);
}

#[tokio::test]
async fn declined_card_keeps_the_ticket() {
    let mut store = crew_store().await;
    store.selection_mut().add_to_cart("6").unwrap();
    store.begin_checkout().unwrap();

    let payment = store.payment_mut();
    payment.set_card_number("4111111111111111");
    payment.set_expiry_date("1299");
    payment.set_cvv("321");
    payment.set_cardholder_name("Grace Hopper");

    let err = payment
        .process_payment(&DecliningGateway, PaymentMethod::Card)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ServiceUnavailable);
    assert_eq!(payment.error(), Some("Payment failed. Please try again."));
    assert!(payment.confirmation().is_none());

    assert!(store.complete_checkout().is_err());

    store.return_to_selection();
    assert_eq!(store.selection().cart_quantity("6"), 1);
}

#[tokio::test]
async fn inventory_caps_the_grid_and_the_ticket() {
    let mut store = crew_store().await;

    // Chicken Sandwich: 6 on board
    for _ in 0..6 {
        store.selection_mut().add_to_cart("6").unwrap();
    }
    let err = store.selection_mut().add_to_cart("6").unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(
        store.selection().error(),
        Some("Cannot add more items than available in inventory")
    );

    store.begin_checkout().unwrap();
    assert!(store.payment_mut().update_quantity("6", 7).is_err());
    store.payment_mut().update_quantity("6", 2).unwrap();

    store.return_to_selection();
    assert_eq!(store.selection().cart_quantity("6"), 2);
}

#[tokio::test]
async fn switching_currency_reprices_the_ticket() {
    let mut store = crew_store().await;
    store.selection_mut().add_to_cart("1").unwrap();
    store.selection_mut().set_currency(Currency::Gbp);

    // 2.50 × 0.80 × 0.75
    assert_eq!(store.selection().formatted_total(), "1.50 £");
    let alternatives = store.selection().alternative_currencies();
    assert_eq!(alternatives.get(&Currency::Usd).map(String::as_str), Some("1.88 $"));

    store.begin_checkout().unwrap();
    assert_eq!(store.payment().currency(), Currency::Gbp);
    assert_eq!(store.payment().formatted_total(), "1.50 £");
}
