//! Payment service client.

use reqwest::Client;

use crate::client::error::ClientResult;
use crate::client::service::ServiceClient;
use crate::client::types::{HealthStatus, Payment, PaymentStats};

/// Typed access to the payment service API.
#[derive(Debug, Clone)]
pub struct PaymentServiceClient {
    inner: ServiceClient,
}

impl PaymentServiceClient {
    pub fn new(base_url: &str, http: Client) -> ClientResult<Self> {
        Ok(Self {
            inner: ServiceClient::new("payment-service", base_url, http)?,
        })
    }

    /// Untyped access for status-code assertions.
    pub fn raw(&self) -> &ServiceClient {
        &self.inner
    }

    pub async fn get_payments(&self) -> ClientResult<Vec<Payment>> {
        self.inner.get_json(&["payments"], &[]).await
    }

    /// Payment for an order; a 404 is an error here.
    pub async fn get_payment_by_order_id(&self, order_id: &str) -> ClientResult<Payment> {
        self.inner
            .get_json(&["payments", "order", order_id], &[])
            .await
    }

    /// Like [`get_payment_by_order_id`](Self::get_payment_by_order_id), but a
    /// 404 means "not created yet" and yields `None`.
    pub async fn find_payment_by_order_id(&self, order_id: &str) -> ClientResult<Option<Payment>> {
        match self.get_payment_by_order_id(order_id).await {
            Ok(payment) => Ok(Some(payment)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get_payments_by_user(&self, user_id: &str) -> ClientResult<Vec<Payment>> {
        self.inner
            .get_json(&["payments", "user", user_id], &[])
            .await
    }

    pub async fn get_payment_stats(&self) -> ClientResult<PaymentStats> {
        self.inner.get_json(&["payments", "stats"], &[]).await
    }

    pub async fn health_check(&self) -> ClientResult<HealthStatus> {
        self.inner.get_json(&["health"], &[]).await
    }
}
