//! Service health gate run before any scenario.

use crate::client::HealthStatus;
use crate::fixtures::TestContext;
use crate::scenarios::{ScenarioError, ScenarioResult};

/// Health of both services.
#[derive(Debug, Clone)]
pub struct ServicesHealth {
    pub order: HealthStatus,
    pub payment: HealthStatus,
}

/// Require both services to report `UP`.
///
/// Failed health requests are retried with the context's retry policy so
/// services that are still starting get a chance. A service that answers with
/// a status other than `UP` fails immediately.
pub async fn ensure_services_healthy(ctx: &TestContext) -> ScenarioResult<ServicesHealth> {
    let policy = ctx.retry_policy();

    let (order, payment) = tokio::try_join!(
        policy.retry(|| ctx.orders.health_check()),
        policy.retry(|| ctx.payments.health_check()),
    )?;

    require_up("order-service", &order)?;
    require_up("payment-service", &payment)?;

    tracing::info!(
        order = %order.status,
        payment = %payment.status,
        "Services healthy"
    );
    Ok(ServicesHealth { order, payment })
}

fn require_up(service: &'static str, health: &HealthStatus) -> ScenarioResult<()> {
    if health.is_up() {
        Ok(())
    } else {
        Err(ScenarioError::Unhealthy {
            service,
            status: health.status.clone(),
        })
    }
}

