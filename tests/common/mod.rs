//! Shared utilities for integration testing.
//!
//! Starts in-process stand-ins for the order and payment services on ephemeral
//! ports. Creating an order publishes an event on an in-memory channel; the
//! payment side consumes it after a configurable lag, stores a PENDING payment
//! and then processes it to COMPLETED or FAILED.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use commerce_e2e::client::types::{Pageable, Sort};
use commerce_e2e::client::{
    CreateOrderRequest, Order, OrderStatus, Page, Payment, PaymentStats, PaymentStatus,
    UpdateOrderStatusRequest,
};
use commerce_e2e::config::{HarnessConfig, PollConfig, RetryConfig};

/// Behaviour of the mock stack.
#[derive(Debug, Clone)]
pub struct StackOptions {
    /// Delay between an order being created and the payment side seeing it.
    pub consumer_lag: Duration,
    /// Time a payment spends in PROCESSING.
    pub processing_time: Duration,
    /// Share of payments that end up FAILED (0.0 to 1.0).
    pub fail_rate: f64,
    /// When false, order events are dropped and no payment is ever created.
    pub deliver_events: bool,
}

impl Default for StackOptions {
    fn default() -> Self {
        Self {
            consumer_lag: Duration::from_millis(100),
            processing_time: Duration::from_millis(200),
            fail_rate: 0.0,
            deliver_events: true,
        }
    }
}

/// Order event passed from the order side to the payment side.
#[derive(Debug, Clone)]
struct OrderCreated {
    order_id: String,
    user_id: String,
    amount: f64,
}

pub struct OrderState {
    orders: Mutex<Vec<Order>>,
    events: mpsc::UnboundedSender<OrderCreated>,
}

pub struct PaymentState {
    payments: Mutex<Vec<Payment>>,
    options: StackOptions,
}

/// Both mock services, already listening.
pub struct MockStack {
    pub order_url: String,
    pub payment_url: String,
    pub orders: Arc<OrderState>,
    pub payments: Arc<PaymentState>,
}

impl MockStack {
    pub fn order_count(&self) -> usize {
        self.orders.orders.lock().unwrap().len()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.payments.lock().unwrap().len()
    }

    pub fn order_status(&self, order_id: &str) -> Option<OrderStatus> {
        self.orders
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == order_id)
            .map(|o| o.status)
    }

    pub fn order_statuses(&self) -> Vec<OrderStatus> {
        self.orders
            .orders
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.status)
            .collect()
    }

    /// Harness configuration pointing at this stack with short waits.
    pub fn config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::default();
        config.services.order_url = self.order_url.clone();
        config.services.payment_url = self.payment_url.clone();
        config.http.request_timeout_secs = 5;
        config.retry = RetryConfig {
            max_attempts: 3,
            initial_delay_ms: 20,
        };
        config.poll = PollConfig {
            timeout_ms: 2000,
            interval_ms: 50,
        };
        config.scenario.payment_timeout_ms = 3000;
        config.scenario.payment_interval_ms = 50;
        config
    }
}

/// Start both services with default options.
pub async fn start_stack() -> MockStack {
    start_stack_with(StackOptions::default()).await
}

pub async fn start_stack_with(options: StackOptions) -> MockStack {
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let orders = Arc::new(OrderState {
        orders: Mutex::new(Vec::new()),
        events: events_tx,
    });
    let payments = Arc::new(PaymentState {
        payments: Mutex::new(Vec::new()),
        options,
    });

    tokio::spawn(consume_order_events(events_rx, payments.clone()));

    let order_addr = serve(order_router(orders.clone())).await;
    let payment_addr = serve(payment_router(payments.clone())).await;

    MockStack {
        order_url: format!("http://{}/api", order_addr),
        payment_url: format!("http://{}/api", payment_addr),
        orders,
        payments,
    }
}

/// Start a programmable backend answering every request with `f(call_number)`.
///
/// Call numbers start at 1. Returns the API root URL and the call counter.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (String, Arc<AtomicU32>)
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (StatusCode, Value)> + Send + 'static,
{
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let f = Arc::new(f);

    let app = Router::new().fallback(move || {
        let f = f.clone();
        let counter = counter.clone();
        async move {
            let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
            let (status, body) = f(call).await;
            (status, Json(body))
        }
    });

    let addr = serve(app).await;
    (format!("http://{}/api", addr), calls)
}

/// A backend that is unavailable for the first `failures` calls, then healthy.
pub async fn start_flaky_backend(failures: u32) -> (String, Arc<AtomicU32>) {
    start_programmable_backend(move |call| async move {
        if call <= failures {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "status": "DOWN" }),
            )
        } else {
            (StatusCode::OK, json!({ "status": "UP" }))
        }
    })
    .await
}

/// URL of a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// ---------------------------------------------------------------------------
// Order service
// ---------------------------------------------------------------------------

fn order_router(state: Arc<OrderState>) -> Router {
    Router::new()
        .route("/api/health", get(|| async { Json(json!({ "status": "UP", "service": "order-service" })) }))
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/status", put(update_order_status))
        .route("/api/orders/user/{user_id}", get(orders_by_user))
        .route("/api/orders/status/{status}", get(orders_by_status))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PageParams {
    #[serde(default)]
    page: u32,
    #[serde(default = "default_page_size")]
    size: u32,
}

fn default_page_size() -> u32 {
    20
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "Validation failed",
            "message": message.into(),
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

fn validate_order(body: Value) -> Result<CreateOrderRequest, String> {
    let request: CreateOrderRequest =
        serde_json::from_value(body).map_err(|e| format!("Malformed order request: {}", e))?;

    if request.user_id.trim().is_empty() {
        return Err("User ID is required".into());
    }
    if request.product_id.trim().is_empty() {
        return Err("Product ID is required".into());
    }
    if request.product_name.trim().is_empty() {
        return Err("Product name is required".into());
    }
    if request.quantity < 1 {
        return Err("Quantity must be at least 1".into());
    }
    if request.price <= 0.0 {
        return Err("Price must be greater than 0".into());
    }
    Ok(request)
}

async fn create_order(State(state): State<Arc<OrderState>>, Json(body): Json<Value>) -> Response {
    let request = match validate_order(body) {
        Ok(request) => request,
        Err(message) => return bad_request(message),
    };

    let now = Utc::now();
    let order = Order {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: request.user_id.clone(),
        product_id: request.product_id.clone(),
        product_name: request.product_name.clone(),
        quantity: request.quantity,
        price: request.price,
        total_price: request.expected_total(),
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    state.orders.lock().unwrap().push(order.clone());
    let _ = state.events.send(OrderCreated {
        order_id: order.id.clone(),
        user_id: order.user_id.clone(),
        amount: order.total_price,
    });

    (StatusCode::CREATED, Json(order)).into_response()
}

fn page_of(items: Vec<Order>, page: u32, size: u32) -> Page<Order> {
    let size = size.max(1);
    let total = items.len() as u64;
    let total_pages = total.div_ceil(u64::from(size)) as u32;
    let content: Vec<Order> = items
        .into_iter()
        .skip((page * size) as usize)
        .take(size as usize)
        .collect();
    let sort = Sort {
        sorted: false,
        unsorted: true,
        empty: true,
    };

    Page {
        number_of_elements: content.len() as u32,
        empty: content.is_empty(),
        content,
        pageable: Pageable {
            page_number: page,
            page_size: size,
            sort: sort.clone(),
            offset: u64::from(page) * u64::from(size),
            paged: true,
            unpaged: false,
        },
        total_pages,
        total_elements: total,
        last: page + 1 >= total_pages,
        size,
        number: page,
        sort,
        first: page == 0,
    }
}

async fn list_orders(
    State(state): State<Arc<OrderState>>,
    Query(params): Query<PageParams>,
) -> Json<Page<Order>> {
    let orders = state.orders.lock().unwrap().clone();
    Json(page_of(orders, params.page, params.size))
}

async fn get_order(State(state): State<Arc<OrderState>>, Path(id): Path<String>) -> Response {
    match state.orders.lock().unwrap().iter().find(|o| o.id == id) {
        Some(order) => Json(order.clone()).into_response(),
        None => not_found(format!("Order not found: {}", id)),
    }
}

async fn orders_by_user(
    State(state): State<Arc<OrderState>>,
    Path(user_id): Path<String>,
) -> Json<Vec<Order>> {
    let orders = state.orders.lock().unwrap();
    Json(orders.iter().filter(|o| o.user_id == user_id).cloned().collect())
}

async fn orders_by_status(
    State(state): State<Arc<OrderState>>,
    Path(status): Path<String>,
    Query(params): Query<PageParams>,
) -> Response {
    let Ok(status) = serde_json::from_value::<OrderStatus>(Value::String(status.clone())) else {
        return bad_request(format!("Unknown order status: {}", status));
    };
    let orders: Vec<Order> = state
        .orders
        .lock()
        .unwrap()
        .iter()
        .filter(|o| o.status == status)
        .cloned()
        .collect();
    Json(page_of(orders, params.page, params.size)).into_response()
}

async fn update_order_status(
    State(state): State<Arc<OrderState>>,
    Path(id): Path<String>,
    Json(update): Json<UpdateOrderStatusRequest>,
) -> Response {
    let mut orders = state.orders.lock().unwrap();
    match orders.iter_mut().find(|o| o.id == id) {
        Some(order) => {
            order.status = update.status;
            order.updated_at = Utc::now();
            Json(order.clone()).into_response()
        }
        None => not_found(format!("Order not found: {}", id)),
    }
}

// ---------------------------------------------------------------------------
// Payment service
// ---------------------------------------------------------------------------

fn payment_router(state: Arc<PaymentState>) -> Router {
    Router::new()
        .route(
            "/api/health",
            get(|| async {
                Json(json!({
                    "status": "UP",
                    "service": "payment-service",
                    "timestamp": Utc::now().to_rfc3339(),
                }))
            }),
        )
        .route("/api/payments", get(list_payments))
        .route("/api/payments/stats", get(payment_stats))
        .route("/api/payments/order/{order_id}", get(payment_by_order))
        .route("/api/payments/user/{user_id}", get(payments_by_user))
        .with_state(state)
}

async fn consume_order_events(
    mut events: mpsc::UnboundedReceiver<OrderCreated>,
    state: Arc<PaymentState>,
) {
    while let Some(event) = events.recv().await {
        if !state.options.deliver_events {
            continue;
        }
        let state = state.clone();
        tokio::spawn(async move {
            tokio::time::sleep(state.options.consumer_lag).await;
            process_payment(state, event).await;
        });
    }
}

async fn process_payment(state: Arc<PaymentState>, event: OrderCreated) {
    let now = Utc::now();
    let payment_id = uuid::Uuid::new_v4().to_string();
    state.payments.lock().unwrap().push(Payment {
        id: payment_id.clone(),
        order_id: event.order_id,
        user_id: event.user_id,
        amount: event.amount,
        status: PaymentStatus::Pending,
        created_at: now,
        updated_at: now,
    });

    set_payment_status(&state, &payment_id, PaymentStatus::Processing);
    tokio::time::sleep(state.options.processing_time).await;

    let failed = rand::thread_rng().gen_bool(state.options.fail_rate.clamp(0.0, 1.0));
    let outcome = if failed {
        PaymentStatus::Failed
    } else {
        PaymentStatus::Completed
    };
    set_payment_status(&state, &payment_id, outcome);
}

fn set_payment_status(state: &PaymentState, payment_id: &str, status: PaymentStatus) {
    let mut payments = state.payments.lock().unwrap();
    if let Some(payment) = payments.iter_mut().find(|p| p.id == payment_id) {
        payment.status = status;
        payment.updated_at = Utc::now();
    }
}

async fn list_payments(State(state): State<Arc<PaymentState>>) -> Json<Vec<Payment>> {
    Json(state.payments.lock().unwrap().clone())
}

async fn payment_by_order(
    State(state): State<Arc<PaymentState>>,
    Path(order_id): Path<String>,
) -> Response {
    match state.payments.lock().unwrap().iter().find(|p| p.order_id == order_id) {
        Some(payment) => Json(payment.clone()).into_response(),
        None => not_found(format!("Payment not found for order: {}", order_id)),
    }
}

async fn payments_by_user(
    State(state): State<Arc<PaymentState>>,
    Path(user_id): Path<String>,
) -> Json<Vec<Payment>> {
    let payments = state.payments.lock().unwrap();
    Json(payments.iter().filter(|p| p.user_id == user_id).cloned().collect())
}

async fn payment_stats(State(state): State<Arc<PaymentState>>) -> Json<PaymentStats> {
    let payments = state.payments.lock().unwrap();
    let count = |status: PaymentStatus| payments.iter().filter(|p| p.status == status).count() as u64;

    let total_payments = payments.len() as u64;
    let completed = count(PaymentStatus::Completed);
    let total_amount_processed = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Completed)
        .map(|p| p.amount)
        .sum();
    let success_rate = if total_payments == 0 {
        0.0
    } else {
        completed as f64 / total_payments as f64 * 100.0
    };

    Json(PaymentStats {
        total_payments,
        completed,
        failed: count(PaymentStatus::Failed),
        pending: count(PaymentStatus::Pending),
        processing: count(PaymentStatus::Processing),
        total_amount_processed,
        success_rate,
    })
}
