//! # Payment Gateway
//!
//! Payment submission and confirmation lookup.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Payment Flow                                   │
//! │                                                                         │
//! │  PaymentSession ──process_payment(request)──► PaymentGateway            │
//! │                                                  │                      │
//! │                          (one attempt, no retry) │                      │
//! │                                                  ▼                      │
//! │                        { success, message, transactionId: TXN-… }       │
//! │                                                                         │
//! │  Later, if needed:                                                      │
//! │  payment_response(transaction_id) ──► POST <base>/paymentResponse       │
//! │        body.paymentResponse │ body itself │ default success echo        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Real acquiring is out of scope. [`SimulatedGateway`] waits, then approves.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use galley_core::{PaymentRequest, PaymentResponse};
use serde_json::{json, Value};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::catalog::json_client;
use crate::error::{ServiceError, ServiceResult};
use crate::DEFAULT_PAYMENT_DELAY_MS;

/// Message on every approved payment.
pub const APPROVED_MESSAGE: &str = "Payment processed successfully";

// =============================================================================
// Gateway Trait
// =============================================================================

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submits a payment. Called exactly once per checkout attempt.
    async fn process_payment(&self, request: &PaymentRequest) -> ServiceResult<PaymentResponse>;

    /// Looks up the confirmation for an earlier payment.
    async fn payment_response(&self, transaction_id: &str) -> ServiceResult<PaymentResponse>;
}

// =============================================================================
// Confirmation Parsing
// =============================================================================

/// Reads a confirmation body.
///
/// ## Resolution Order
/// 1. `body.paymentResponse`, when it is a valid response
/// 2. `body` itself, when it is a valid response
/// 3. An approval echoing `transaction_id`
pub fn parse_confirmation(body: &Value, transaction_id: &str) -> PaymentResponse {
    let nested = body
        .get("paymentResponse")
        .and_then(|value| serde_json::from_value(value.clone()).ok());

    nested
        .or_else(|| serde_json::from_value(body.clone()).ok())
        .unwrap_or_else(|| PaymentResponse::approved(APPROVED_MESSAGE, transaction_id))
}

/// `TXN-<unix millis>`.
pub fn new_transaction_id() -> String {
    format!("TXN-{}", Utc::now().timestamp_millis())
}

// =============================================================================
// Simulated Gateway
// =============================================================================

/// Where confirmations are looked up.
#[derive(Debug, Clone)]
struct ConfirmationEndpoint {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

/// A gateway that approves every payment after a fixed delay.
///
/// Without a confirmation endpoint, [`PaymentGateway::payment_response`]
/// answers locally with an approval echoing the transaction id.
#[derive(Debug)]
pub struct SimulatedGateway {
    delay: Duration,
    confirmation: Option<ConfirmationEndpoint>,
    attempts: AtomicUsize,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        SimulatedGateway::new(Duration::from_millis(DEFAULT_PAYMENT_DELAY_MS))
    }
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        SimulatedGateway {
            delay,
            confirmation: None,
            attempts: AtomicUsize::new(0),
        }
    }

    /// Looks confirmations up at `<base_url>/paymentResponse`.
    pub fn with_confirmation_endpoint(
        mut self,
        base_url: &str,
        timeout: Duration,
    ) -> ServiceResult<Self> {
        self.confirmation = Some(ConfirmationEndpoint {
            client: json_client()?,
            url: format!("{}/paymentResponse", base_url.trim_end_matches('/')),
            timeout,
        });
        Ok(self)
    }

    /// Payments submitted so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    async fn fetch_confirmation(
        endpoint: &ConfirmationEndpoint,
        transaction_id: &str,
    ) -> ServiceResult<Value> {
        let response = endpoint
            .client
            .post(&endpoint.url)
            .json(&json!({ "transactionId": transaction_id }))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn process_payment(&self, request: &PaymentRequest) -> ServiceResult<PaymentResponse> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        debug!(
            method = ?request.method,
            total = %request.total,
            currency = %request.currency,
            seat = %request.seat_number,
            "Submitting payment"
        );

        sleep(self.delay).await;

        let transaction_id = new_transaction_id();
        info!(%transaction_id, "Payment approved");
        Ok(PaymentResponse::approved(APPROVED_MESSAGE, transaction_id))
    }

    async fn payment_response(&self, transaction_id: &str) -> ServiceResult<PaymentResponse> {
        let Some(endpoint) = &self.confirmation else {
            return Ok(PaymentResponse::approved(APPROVED_MESSAGE, transaction_id));
        };

        debug!(url = %endpoint.url, %transaction_id, "Looking up payment confirmation");
        match timeout(
            endpoint.timeout,
            Self::fetch_confirmation(endpoint, transaction_id),
        )
        .await
        {
            Ok(body) => Ok(parse_confirmation(&body?, transaction_id)),
            Err(_) => {
                warn!(timeout = ?endpoint.timeout, "Confirmation lookup timed out");
                Err(ServiceError::Timeout {
                    operation: "payment confirmation",
                    secs: endpoint.timeout.as_secs(),
                })
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
