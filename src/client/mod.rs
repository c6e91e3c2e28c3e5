//! HTTP clients for the services under test.
//!
//! # Data Flow
//! ```text
//! HarnessConfig.http  → build_http_client → reqwest::Client (shared pool)
//! HarnessConfig.services → OrderServiceClient / PaymentServiceClient
//!     → ServiceClient (URL building, JSON encode/decode, debug logging)
//!     → typed result | ClientError | RawResponse
//! ```
//!
//! # Design Decisions
//! - Clients never retry; callers compose them with `resilience`
//! - Non-2xx responses become `ClientError::Status` with the body kept verbatim
//! - One `reqwest::Client` is shared by both services

pub mod error;
pub mod order;
pub mod payment;
pub mod service;
pub mod types;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::config::{HarnessConfig, HttpConfig};

pub use error::{ClientError, ClientResult};
pub use order::OrderServiceClient;
pub use payment::PaymentServiceClient;
pub use service::{RawResponse, ServiceClient};
pub use types::{
    CreateOrderRequest, ErrorResponse, HealthStatus, Listing, Order, OrderStatus, Page, Payment,
    PaymentStats, PaymentStatus, UpdateOrderStatusRequest,
};

/// Build the shared HTTP client with the configured timeouts.
pub fn build_http_client(config: &HttpConfig) -> ClientResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .default_headers(headers)
        .build()
        .map_err(ClientError::Build)
}

/// Both service clients, sharing one connection pool.
pub fn clients_from_config(
    config: &HarnessConfig,
) -> ClientResult<(OrderServiceClient, PaymentServiceClient)> {
    let http = build_http_client(&config.http)?;
    let orders = OrderServiceClient::new(&config.services.order_url, http.clone())?;
    let payments = PaymentServiceClient::new(&config.services.payment_url, http)?;
    Ok((orders, payments))
}
