mod common;

use std::sync::Arc;

use async_trait::async_trait;
use local_chef_bazaar::{
    client::{
        Bazaar,
        checkout::{
            BillingDetails, CardInput, CheckoutOutcome, ConfirmedPayment, DECLINED_CARD,
            INSUFFICIENT_FUNDS_CARD, PaymentProcessor, ProcessorError, SUCCESS_CARD,
            SandboxProcessor,
        },
        error::ClientError,
    },
    dto::orders::PlaceOrderRequest,
    models::{Order, OrderStatus, PaymentStatus},
};
use tokio::sync::Notify;

async fn accepted_order() -> (common::TestServer, Bazaar, Order) {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    let customer = common::signed_up(&server, "Sam", "sam@bazaar.test").await;
    let meal = common::create_meal(&chef, "Chicken Biryani", 320).await;

    let order = customer
        .place_order(&PlaceOrderRequest {
            meal_id: meal.id,
            quantity: 1,
            address: "Road 7".to_string(),
        })
        .await
        .expect("place order");
    let accepted = chef
        .update_order_status(order.id, OrderStatus::Accepted)
        .await
        .expect("accept order");
    (server, customer, accepted)
}

#[tokio::test]
async fn declined_card_leaves_order_unpaid() -> anyhow::Result<()> {
    let (_server, customer, order) = accepted_order().await;
    let checkout = customer.checkout(Arc::new(SandboxProcessor));

    for (card, expected) in [
        (DECLINED_CARD, "Your card was declined."),
        (INSUFFICIENT_FUNDS_CARD, "Your card has insufficient funds."),
    ] {
        let outcome = checkout
            .pay(&order, &CardInput::new(card, 1, 2031, "999"))
            .await?;
        assert_eq!(
            outcome,
            CheckoutOutcome::Declined {
                message: expected.to_string()
            }
        );
    }

    let orders = customer.my_orders().await?;
    assert_eq!(orders[0].payment_status, PaymentStatus::Pending);
    assert!(orders[0].transaction_id.is_none());
    Ok(())
}

#[tokio::test]
async fn unaccepted_and_paid_orders_are_rejected_before_any_call() -> anyhow::Result<()> {
    let (_server, customer, order) = accepted_order().await;
    let checkout = customer.checkout(Arc::new(SandboxProcessor));
    let card = CardInput::new(SUCCESS_CARD, 1, 2031, "999");

    let pending = Order {
        status: OrderStatus::Pending,
        ..order.clone()
    };
    let err = checkout.pay(&pending, &card).await.expect_err("not payable");
    assert!(matches!(err, ClientError::Payment(_)));

    let CheckoutOutcome::Paid(paid) = checkout.pay(&order, &card).await? else {
        panic!("expected payment");
    };
    let err = checkout.pay(&paid, &card).await.expect_err("already paid");
    assert_eq!(err.user_message(), "This order is already paid");
    Ok(())
}

/// Holds every confirmation until released.
struct GatedProcessor {
    release: Notify,
}

#[async_trait]
impl PaymentProcessor for GatedProcessor {
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        card: &CardInput,
        billing: &BillingDetails,
    ) -> Result<ConfirmedPayment, ProcessorError> {
        self.release.notified().await;
        SandboxProcessor
            .confirm_card_payment(client_secret, card, billing)
            .await
    }
}

#[tokio::test]
async fn second_submission_while_in_flight_is_refused() -> anyhow::Result<()> {
    let (_server, customer, order) = accepted_order().await;
    let processor = Arc::new(GatedProcessor {
        release: Notify::new(),
    });
    let checkout = customer.checkout(processor.clone());
    let card = CardInput::new(SUCCESS_CARD, 1, 2031, "999");

    let first = checkout.pay(&order, &card);
    let second = async {
        while !checkout.is_submitting() {
            tokio::task::yield_now().await;
        }
        let result = checkout.pay(&order, &card).await;
        processor.release.notify_one();
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(second, Err(ClientError::InFlight));
    assert!(matches!(first?, CheckoutOutcome::Paid(_)));
    assert!(!checkout.is_submitting());
    Ok(())
}

#[test]
fn card_debug_output_is_redacted() {
    let card = CardInput::new("4242 4242 4242 4242", 4, 2030, "314");
    let printed = format!("{card:?}");
    assert!(printed.contains("**** 4242"));
    assert!(!printed.contains("314"));
    assert!(!printed.contains("4242 4242"));
}
