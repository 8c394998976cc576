mod common;

use std::sync::Arc;

use local_chef_bazaar::{
    client::{
        checkout::{CardInput, CheckoutOutcome, SUCCESS_CARD, SandboxProcessor},
        gate::GateDecision,
        screens::order::OrderScreen,
    },
    dto::{meals::UpdateMealRequest, orders::PlaceOrderRequest, params::MealListQuery},
    models::{MAX_MEAL_PRICE, MAX_ORDER_QUANTITY, OrderStatus, PaymentStatus},
};

// Chef lists a meal, customer orders two, chef accepts, customer pays by card.
#[tokio::test]
async fn order_and_pay_flow() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    let customer = common::signed_up(&server, "Sam", "sam@bazaar.test").await;

    let meal = common::create_meal(&chef, "Pasta Alfredo", 250).await;
    assert!(meal.chef_id.starts_with("chef-"));

    let listed = customer.meals(MealListQuery::default()).await?;
    assert!(listed.items.iter().any(|m| m.id == meal.id));

    let mut screen = OrderScreen::open(&customer, meal.id).await;
    assert_eq!(screen.decision, GateDecision::Render);
    let form = screen.form.as_mut().expect("order form");
    form.quantity = 2;
    form.address = "House 12, Road 5".to_string();
    assert_eq!(form.total(), Some(500));

    let order = screen.submit(&customer).await?;
    assert_eq!(order.total, 500);
    assert_eq!(order.status, OrderStatus::Pending);

    let mine = customer.my_orders().await?;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].total, 500);

    let incoming = chef.chef_orders().await?;
    assert_eq!(incoming.len(), 1);
    let accepted = chef
        .update_order_status(order.id, OrderStatus::Accepted)
        .await?;
    assert_eq!(accepted.status, OrderStatus::Accepted);
    assert_eq!(accepted.amount_minor_units(), Some(50_000));

    // The customer's cached list predates the acceptance.
    customer.cache().clear();
    let accepted = customer
        .my_orders()
        .await?
        .into_iter()
        .find(|o| o.id == order.id)
        .expect("order listed");
    assert!(accepted.is_payable());

    let checkout = customer.checkout(Arc::new(SandboxProcessor));
    let card = CardInput::new(SUCCESS_CARD, 12, 2030, "123");
    let outcome = checkout.pay(&accepted, &card).await?;
    let CheckoutOutcome::Paid(paid) = outcome else {
        panic!("expected payment to succeed");
    };
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert!(paid.transaction_id.as_deref().is_some_and(|t| t.starts_with("pi_")));

    let mine = customer.my_orders().await?;
    assert_eq!(mine[0].payment_status, PaymentStatus::Paid);

    let stats = admin.admin_stats().await?;
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_payment, 500);

    chef.update_order_status(order.id, OrderStatus::Delivered).await?;
    admin.cache().clear();
    let stats = admin.admin_stats().await?;
    assert_eq!(stats.delivered_orders, 1);
    Ok(())
}

#[tokio::test]
async fn customer_can_cancel_but_not_accept() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    let customer = common::signed_up(&server, "Sam", "sam@bazaar.test").await;
    let meal = common::create_meal(&chef, "Beef Tehari", 300).await;

    let mut screen = OrderScreen::open(&customer, meal.id).await;
    screen.form.as_mut().expect("order form").address = "Road 3".to_string();
    let order = screen.submit(&customer).await?;

    let err = customer
        .update_order_status(order.id, OrderStatus::Accepted)
        .await
        .expect_err("customer cannot accept");
    assert_eq!(err.status(), Some(403));

    let cancelled = customer
        .update_order_status(order.id, OrderStatus::Cancelled)
        .await?;
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let err = chef
        .update_order_status(order.id, OrderStatus::Accepted)
        .await
        .expect_err("cancelled orders stay cancelled");
    assert_eq!(err.status(), Some(400));
    Ok(())
}

#[tokio::test]
async fn backend_rejects_out_of_range_meals_and_orders() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    let customer = common::signed_up(&server, "Sam", "sam@bazaar.test").await;

    let mut request = common::meal_form("Gold Leaf Kacchi", 500).validate()?;
    request.price = 100_000_000_000_000_000;
    let err = chef
        .create_meal(&request)
        .await
        .expect_err("price above the cap");
    assert_eq!(err.status(), Some(400));

    let meal = common::create_meal(&chef, "Beef Tehari", MAX_MEAL_PRICE).await;
    let err = chef
        .update_meal(
            meal.id,
            &UpdateMealRequest {
                name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect_err("blank name");
    assert_eq!(err.status(), Some(400));
    assert_eq!(chef.meal(meal.id).await?.name, "Beef Tehari");

    let err = customer
        .place_order(&PlaceOrderRequest {
            meal_id: meal.id,
            quantity: MAX_ORDER_QUANTITY + 1,
            address: "Road 1".to_string(),
        })
        .await
        .expect_err("quantity above the cap");
    assert_eq!(err.status(), Some(400));

    let order = customer
        .place_order(&PlaceOrderRequest {
            meal_id: meal.id,
            quantity: MAX_ORDER_QUANTITY,
            address: "Road 1".to_string(),
        })
        .await?;
    assert_eq!(order.total, MAX_MEAL_PRICE * i64::from(MAX_ORDER_QUANTITY));
    assert!(order.amount_minor_units().is_some());
    Ok(())
}
