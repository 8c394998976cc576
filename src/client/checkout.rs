//! Card checkout for an accepted order.
//!
//! Sequence: create a payment intent on the backend, confirm the card with
//! the processor, then record the payment on the order. Card data only ever
//! reaches the [`PaymentProcessor`].

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use reqwest::Method;
use thiserror::Error;

use crate::{
    client::{
        Bazaar,
        error::{ClientError, ClientResult},
    },
    dto::{orders::PayOrderRequest, payments::CreatePaymentIntentRequest},
    models::{Order, PaymentIntent, PaymentStatus},
};

#[derive(Clone, PartialEq, Eq)]
pub struct CardInput {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: String,
}

impl CardInput {
    pub fn new(number: impl Into<String>, exp_month: u8, exp_year: u16, cvc: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            exp_month,
            exp_year,
            cvc: cvc.into(),
        }
    }

    fn digits(&self) -> String {
        self.number.chars().filter(char::is_ascii_digit).collect()
    }

    fn last4(&self) -> String {
        let digits = self.digits();
        digits[digits.len().saturating_sub(4)..].to_string()
    }
}

impl fmt::Debug for CardInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardInput")
            .field("number", &format_args!("**** {}", self.last4()))
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .field("cvc", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingDetails {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedPayment {
    /// Recorded on the order as its transaction id.
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    #[error("Your card was declined.")]
    Declined,

    #[error("Your card has insufficient funds.")]
    InsufficientFunds,

    #[error("{0}")]
    InvalidCard(String),

    #[error("Payment could not be confirmed: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        card: &CardInput,
        billing: &BillingDetails,
    ) -> Result<ConfirmedPayment, ProcessorError>;
}

/// Test-mode processor. The card number decides the outcome:
/// `4000000000000002` is declined, `4000000000009995` has insufficient funds,
/// any other well-formed number succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SandboxProcessor;

pub const DECLINED_CARD: &str = "4000000000000002";
pub const INSUFFICIENT_FUNDS_CARD: &str = "4000000000009995";
pub const SUCCESS_CARD: &str = "4242424242424242";

#[async_trait]
impl PaymentProcessor for SandboxProcessor {
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        card: &CardInput,
        billing: &BillingDetails,
    ) -> Result<ConfirmedPayment, ProcessorError> {
        let Some((intent_id, _)) = client_secret.split_once("_secret_") else {
            return Err(ProcessorError::Unavailable("malformed client secret".into()));
        };

        let digits = card.digits();
        if !(13..=19).contains(&digits.len()) {
            return Err(ProcessorError::InvalidCard("Your card number is incomplete.".into()));
        }
        if !(1..=12).contains(&card.exp_month) {
            return Err(ProcessorError::InvalidCard(
                "Your card's expiration date is invalid.".into(),
            ));
        }
        if !(3..=4).contains(&card.cvc.len()) {
            return Err(ProcessorError::InvalidCard(
                "Your card's security code is incomplete.".into(),
            ));
        }

        match digits.as_str() {
            DECLINED_CARD => Err(ProcessorError::Declined),
            INSUFFICIENT_FUNDS_CARD => Err(ProcessorError::InsufficientFunds),
            _ => {
                tracing::debug!(intent = intent_id, email = %billing.email, card = ?card, "sandbox payment confirmed");
                Ok(ConfirmedPayment {
                    id: intent_id.to_string(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    Paid(Order),
    /// The processor refused the card; the order is unchanged.
    Declined { message: String },
}

pub struct CheckoutFlow<'a> {
    bazaar: &'a Bazaar,
    processor: Arc<dyn PaymentProcessor>,
    in_flight: AtomicBool,
}

impl Bazaar {
    pub fn checkout(&self, processor: Arc<dyn PaymentProcessor>) -> CheckoutFlow<'_> {
        CheckoutFlow {
            bazaar: self,
            processor,
            in_flight: AtomicBool::new(false),
        }
    }
}

impl CheckoutFlow<'_> {
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Runs the whole sequence once. A second call while one is running
    /// fails with [`ClientError::InFlight`]. Nothing is retried.
    pub async fn pay(&self, order: &Order, card: &CardInput) -> ClientResult<CheckoutOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ClientError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        if order.payment_status == PaymentStatus::Paid {
            return Err(ClientError::Payment("This order is already paid".to_string()));
        }
        if !order.is_payable() {
            return Err(ClientError::Payment(
                "Only accepted orders can be paid".to_string(),
            ));
        }

        let amount = order
            .amount_minor_units()
            .ok_or_else(|| ClientError::Payment("Order total is too large".to_string()))?;

        let api = self.bazaar.api();
        let intent: PaymentIntent = api
            .send(
                Method::POST,
                "/create-payment-intent",
                &CreatePaymentIntentRequest {
                    order_id: order.id,
                    amount,
                },
            )
            .await?;
        tracing::debug!(order_id = %order.id, intent = %intent.id, amount = intent.amount, "payment intent created");

        let billing = BillingDetails {
            email: order.customer_email.clone(),
            name: self
                .bazaar
                .session()
                .snapshot()
                .user()
                .map(|u| u.display_name.clone()),
        };
        let confirmed = match self
            .processor
            .confirm_card_payment(&intent.client_secret, card, &billing)
            .await
        {
            Ok(confirmed) => confirmed,
            Err(err) => {
                tracing::info!(order_id = %order.id, reason = %err, "payment declined");
                return Ok(CheckoutOutcome::Declined {
                    message: err.to_string(),
                });
            }
        };

        let paid: Order = api
            .send(
                Method::PATCH,
                &format!("/orders/{}/pay", order.id),
                &PayOrderRequest {
                    transaction_id: confirmed.id,
                },
            )
            .await?;
        tracing::info!(order_id = %paid.id, transaction = ?paid.transaction_id, "order paid");

        self.bazaar.invalidate_orders();
        Ok(CheckoutOutcome::Paid(paid))
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
