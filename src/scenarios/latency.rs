//! Latency budgets for single calls.

use std::time::Duration;

use tokio::time::Instant;

use crate::client::{CreateOrderRequest, Order, Payment};
use crate::fixtures::TestContext;
use crate::scenarios::{ensure_within, ScenarioResult};

/// Create an order and require it to finish within `scenario.max_order_create_ms`.
pub async fn create_order_within_budget(
    ctx: &TestContext,
    request: &CreateOrderRequest,
) -> ScenarioResult<(Order, Duration)> {
    let started = Instant::now();
    let order = ctx.orders.create_order(request).await?;
    let elapsed = started.elapsed();

    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "Order creation timed");
    ensure_within("create order", elapsed, ctx.config.scenario.max_order_create_ms)?;
    Ok((order, elapsed))
}

/// List all payments and require it to finish within `scenario.max_payment_lookup_ms`.
pub async fn list_payments_within_budget(
    ctx: &TestContext,
) -> ScenarioResult<(Vec<Payment>, Duration)> {
    let started = Instant::now();
    let payments = ctx.payments.get_payments().await?;
    let elapsed = started.elapsed();

    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "Payment lookup timed");
    ensure_within("list payments", elapsed, ctx.config.scenario.max_payment_lookup_ms)?;
    Ok((payments, elapsed))
}
