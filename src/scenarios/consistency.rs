//! Order/payment agreement for a single user.

use crate::client::{Order, Payment, PaymentStats};
use crate::fixtures::TestContext;
use crate::scenarios::{ensure_amount, ensure_eq, ScenarioError, ScenarioResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub orders: usize,
    pub payments: usize,
    /// Orders that have a payment and agree with it.
    pub matched: usize,
    /// Orders without a payment yet.
    pub unmatched_orders: Vec<String>,
}

/// Fetch a user's orders and payments and check that they agree.
///
/// Orders whose payment has not been created yet are reported, not failed.
pub async fn verify_user_consistency(
    ctx: &TestContext,
    user_id: &str,
) -> ScenarioResult<ConsistencyReport> {
    let (orders, payments) = tokio::try_join!(
        ctx.orders.get_orders_by_user(user_id),
        ctx.payments.get_payments_by_user(user_id),
    )?;

    let report = check_consistency(&orders, &payments)?;
    tracing::info!(
        user_id,
        orders = report.orders,
        payments = report.payments,
        matched = report.matched,
        "User data consistent"
    );
    Ok(report)
}

/// Every order with a payment must agree with it on user and amount.
pub fn check_consistency(orders: &[Order], payments: &[Payment]) -> ScenarioResult<ConsistencyReport> {
    let mut report = ConsistencyReport {
        orders: orders.len(),
        payments: payments.len(),
        ..Default::default()
    };

    for order in orders {
        let Some(payment) = payments.iter().find(|p| p.order_id == order.id) else {
            report.unmatched_orders.push(order.id.clone());
            continue;
        };

        let subject = format!("payment {} of order {}", payment.id, order.id);
        ensure_eq(&subject, "userId", order.user_id.as_str(), payment.user_id.as_str())?;
        ensure_amount(&subject, "amount", order.total_price, payment.amount)?;
        report.matched += 1;
    }

    Ok(report)
}

/// Fetch payment statistics and require the counters to add up.
pub async fn verify_payment_stats(ctx: &TestContext) -> ScenarioResult<PaymentStats> {
    let stats = ctx.payments.get_payment_stats().await?;
    check_stats(&stats)?;
    Ok(stats)
}

pub fn check_stats(stats: &PaymentStats) -> ScenarioResult<()> {
    let Some(calculated) = stats.calculated_total() else {
        return Err(ScenarioError::Mismatch {
            subject: "payment stats".to_string(),
            field: "totalPayments",
            expected: stats.total_payments.to_string(),
            actual: "per-status counters overflow u64".to_string(),
        });
    };
    ensure_eq("payment stats", "totalPayments", calculated, stats.total_payments)?;
    if !stats.is_consistent() {
        return Err(ScenarioError::Mismatch {
            subject: "payment stats".to_string(),
            field: "successRate",
            expected: format!("{:.2}", stats.expected_success_rate()),
            actual: format!("{:.2}", stats.success_rate),
        });
    }
    Ok(())
}
