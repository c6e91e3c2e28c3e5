//! The order → event → payment flow.

use std::time::Duration;

use tokio::time::Instant;

use crate::client::{ClientError, CreateOrderRequest, Order, OrderStatus, Payment, PaymentStatus};
use crate::fixtures::TestContext;
use crate::scenarios::{ensure_amount, ensure_eq, ScenarioError, ScenarioResult};

/// What one run of [`order_to_payment`] observed.
#[derive(Debug, Clone)]
pub struct FlowReport {
    pub order: Order,
    pub payment: Payment,
    /// Round trip of the create-order call.
    pub order_latency: Duration,
    /// Time from order creation until the payment was visible.
    pub payment_wait: Duration,
}

/// Create an order and follow it through to its payment.
///
/// Checks, in order:
/// 1. the new order is `PENDING` and echoes the request with `totalPrice = quantity × price`
/// 2. a payment for it appears within the scenario's payment timeout
/// 3. the payment agrees with the order on id, user and amount, and is not `FAILED`
/// 4. both per-user listings contain the new records
pub async fn order_to_payment(
    ctx: &TestContext,
    request: &CreateOrderRequest,
) -> ScenarioResult<FlowReport> {
    order_to_payment_with(ctx, request, |_| {}).await
}

/// [`order_to_payment`] with a hook that sees the order as soon as it exists.
///
/// `on_created` runs before any check, so teardown registered there still
/// happens when a later step fails or the flow is dropped mid-wait.
pub async fn order_to_payment_with<H>(
    ctx: &TestContext,
    request: &CreateOrderRequest,
    on_created: H,
) -> ScenarioResult<FlowReport>
where
    H: FnOnce(&Order),
{
    let started = Instant::now();
    let order = ctx.orders.create_order(request).await?;
    let order_latency = started.elapsed();
    on_created(&order);

    verify_new_order(request, &order)?;
    tracing::info!(
        order_id = %order.id,
        total_price = order.total_price,
        elapsed_ms = order_latency.as_millis() as u64,
        "Order created, waiting for payment"
    );

    let waiting = Instant::now();
    let payment = await_payment(ctx, &order.id).await?;
    let payment_wait = waiting.elapsed();

    verify_payment_for_order(&order, &payment)?;
    tracing::info!(
        order_id = %order.id,
        payment_id = %payment.id,
        status = %payment.status,
        amount = payment.amount,
        waited_ms = payment_wait.as_millis() as u64,
        "Payment verified"
    );

    let user_orders = ctx.orders.get_orders_by_user(&order.user_id).await?;
    if !user_orders.iter().any(|o| o.id == order.id) {
        return Err(missing_from_listing("orders", &order.user_id, &order.id, user_orders.len()));
    }

    let user_payments = ctx.payments.get_payments_by_user(&order.user_id).await?;
    if !user_payments.iter().any(|p| p.order_id == order.id) {
        return Err(missing_from_listing("payments", &order.user_id, &order.id, user_payments.len()));
    }

    Ok(FlowReport {
        order,
        payment,
        order_latency,
        payment_wait,
    })
}

/// Poll the payment service until a payment for `order_id` exists.
///
/// A 404 means the event has not been consumed yet and the poll continues;
/// any other failure ends it.
pub async fn await_payment(ctx: &TestContext, order_id: &str) -> ScenarioResult<Payment> {
    ctx.payment_poll_policy()
        .find(|| ctx.payments.find_payment_by_order_id(order_id))
        .await
        .map_err(|source| ScenarioError::Wait {
            what: format!("payment for order {}", order_id),
            source,
        })
}

/// Poll a user's payments until every order in `order_ids` has one.
///
/// Payments are returned in the order of `order_ids`.
pub async fn await_user_payments(
    ctx: &TestContext,
    user_id: &str,
    order_ids: &[String],
) -> ScenarioResult<Vec<Payment>> {
    ctx.payment_poll_policy()
        .find(move || async move {
            let payments = ctx.payments.get_payments_by_user(user_id).await?;
            let matched: Option<Vec<Payment>> = order_ids
                .iter()
                .map(|id| payments.iter().find(|p| &p.order_id == id).cloned())
                .collect();
            Ok::<_, ClientError>(matched)
        })
        .await
        .map_err(|source| ScenarioError::Wait {
            what: format!("{} payment(s) of user {}", order_ids.len(), user_id),
            source,
        })
}

/// Register a cleanup action that sets `order` to `CANCELLED`.
pub fn cancel_on_teardown(ctx: &TestContext, order: &Order) {
    let orders = ctx.orders.clone();
    let order_id = order.id.clone();
    let label = format!("cancel order {}", order_id);
    ctx.cleanup.register_named(label, move || async move {
        orders
            .update_order_status(&order_id, OrderStatus::Cancelled)
            .await
            .map(|_| ())
    });
}

/// Check a freshly created order against the request that created it.
pub fn verify_new_order(request: &CreateOrderRequest, order: &Order) -> ScenarioResult<()> {
    let subject = format!("order {}", order.id);

    ensure_eq(&subject, "status", OrderStatus::Pending, order.status)?;
    ensure_eq(&subject, "userId", request.user_id.as_str(), order.user_id.as_str())?;
    ensure_eq(&subject, "productId", request.product_id.as_str(), order.product_id.as_str())?;
    ensure_eq(&subject, "quantity", request.quantity, order.quantity)?;
    ensure_amount(&subject, "price", request.price, order.price)?;
    ensure_amount(&subject, "totalPrice", request.expected_total(), order.total_price)
}

/// Check that `payment` belongs to `order` and is not `FAILED`.
pub fn verify_payment_for_order(order: &Order, payment: &Payment) -> ScenarioResult<()> {
    let subject = format!("payment {}", payment.id);

    ensure_eq(&subject, "orderId", order.id.as_str(), payment.order_id.as_str())?;
    ensure_eq(&subject, "userId", order.user_id.as_str(), payment.user_id.as_str())?;
    ensure_amount(&subject, "amount", order.total_price, payment.amount)?;

    if payment.status == PaymentStatus::Failed {
        return Err(ScenarioError::Mismatch {
            subject,
            field: "status",
            expected: "PENDING, PROCESSING or COMPLETED".to_string(),
            actual: payment.status.to_string(),
        });
    }
    Ok(())
}

fn missing_from_listing(kind: &str, user_id: &str, order_id: &str, listed: usize) -> ScenarioError {
    ScenarioError::Mismatch {
        subject: format!("{} of user {}", kind, user_id),
        field: "orderId",
        expected: order_id.to_string(),
        actual: format!("{} record(s) without it", listed),
    }
}
