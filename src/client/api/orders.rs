use reqwest::Method;
use uuid::Uuid;

use crate::{
    client::{
        Bazaar,
        cache::{CacheKey, keys},
        error::{ClientError, ClientResult},
    },
    dto::orders::{OrderList, PlaceOrderRequest, UpdateOrderStatusRequest},
    models::{Order, OrderStatus},
};

impl Bazaar {
    /// Orders placed by the signed-in customer.
    pub async fn my_orders(&self) -> ClientResult<Vec<Order>> {
        let email = self.require_email()?;
        let api = self.api().clone();
        let path = format!("/orders/{email}");
        self.cache()
            .fetch(CacheKey::new(keys::ORDERS).with(email), move || async move {
                let list: OrderList = api.get(&path).await?;
                Ok(list.items)
            })
            .await
    }

    /// Incoming orders of the signed-in chef.
    pub async fn chef_orders(&self) -> ClientResult<Vec<Order>> {
        let chef_id = self.chef_id().await?;
        let api = self.api().clone();
        let path = format!("/orders/chef/{chef_id}");
        self.cache()
            .fetch(CacheKey::new(keys::CHEF_ORDERS).with(chef_id), move || async move {
                let list: OrderList = api.get(&path).await?;
                Ok(list.items)
            })
            .await
    }

    pub async fn place_order(&self, request: &PlaceOrderRequest) -> ClientResult<Order> {
        let order: Order = self.api().send(Method::POST, "/orders", request).await?;
        tracing::info!(order_id = %order.id, total = order.total, "order placed");
        self.invalidate_orders();
        Ok(order)
    }

    pub async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> ClientResult<Order> {
        let order: Order = self
            .api()
            .send(
                Method::PATCH,
                &format!("/orders/{id}"),
                &UpdateOrderStatusRequest { status },
            )
            .await?;
        self.invalidate_orders();
        Ok(order)
    }

    pub(crate) fn invalidate_orders(&self) {
        let cache = self.cache();
        cache.invalidate_resource(keys::ORDERS);
        cache.invalidate_resource(keys::CHEF_ORDERS);
        cache.invalidate_resource(keys::ADMIN_STATS);
    }

    async fn chef_id(&self) -> ClientResult<String> {
        let cached = self
            .session()
            .snapshot()
            .profile
            .and_then(|p| p.chef_id);
        if let Some(chef_id) = cached {
            return Ok(chef_id);
        }
        // Role approval may have happened after the profile sync.
        self.session()
            .refresh_profile()
            .await?
            .and_then(|p| p.chef_id)
            .ok_or_else(|| ClientError::Backend {
                status: 403,
                message: "Only chefs have incoming orders".to_string(),
            })
    }
}
