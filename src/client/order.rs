//! Order service client.

use reqwest::Client;

use crate::client::error::ClientResult;
use crate::client::service::ServiceClient;
use crate::client::types::{
    CreateOrderRequest, HealthStatus, Listing, Order, OrderStatus, UpdateOrderStatusRequest,
};

/// Typed access to the order service API.
#[derive(Debug, Clone)]
pub struct OrderServiceClient {
    inner: ServiceClient,
}

impl OrderServiceClient {
    pub fn new(base_url: &str, http: Client) -> ClientResult<Self> {
        Ok(Self {
            inner: ServiceClient::new("order-service", base_url, http)?,
        })
    }

    /// Untyped access for status-code assertions.
    pub fn raw(&self) -> &ServiceClient {
        &self.inner
    }

    pub async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        let order: Order = self.inner.post_json(&["orders"], request).await?;
        tracing::debug!(order_id = %order.id, user_id = %order.user_id, "Order created");
        Ok(order)
    }

    pub async fn get_orders(&self, page: u32, size: u32) -> ClientResult<Listing<Order>> {
        self.inner
            .get_json(
                &["orders"],
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await
    }

    pub async fn get_order_by_id(&self, order_id: &str) -> ClientResult<Order> {
        self.inner.get_json(&["orders", order_id], &[]).await
    }

    pub async fn get_orders_by_user(&self, user_id: &str) -> ClientResult<Vec<Order>> {
        self.inner.get_json(&["orders", "user", user_id], &[]).await
    }

    pub async fn get_orders_by_status(
        &self,
        status: OrderStatus,
    ) -> ClientResult<Listing<Order>> {
        self.inner
            .get_json(&["orders", "status", status.as_str()], &[])
            .await
    }

    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> ClientResult<Order> {
        self.inner
            .put_json(
                &["orders", order_id, "status"],
                &UpdateOrderStatusRequest { status },
            )
            .await
    }

    pub async fn health_check(&self) -> ClientResult<HealthStatus> {
        self.inner.get_json(&["health"], &[]).await
    }
}
