//! Per-test context: clients, configuration and a cleanup registry.

use std::future::Future;
use std::time::Duration;

use crate::client::{clients_from_config, ClientError, ClientResult, OrderServiceClient, PaymentServiceClient};
use crate::config::HarnessConfig;
use crate::lifecycle::{with_cleanup, CleanupRegistry};
use crate::resilience::{PollPolicy, RetryPolicy};

/// Everything a scenario needs to talk to both services.
#[derive(Debug, Clone)]
pub struct TestContext {
    pub orders: OrderServiceClient,
    pub payments: PaymentServiceClient,
    pub config: HarnessConfig,
    pub cleanup: CleanupRegistry,
}

impl TestContext {
    pub fn new(config: HarnessConfig, cleanup: CleanupRegistry) -> ClientResult<Self> {
        let (orders, payments) = clients_from_config(&config)?;
        Ok(Self {
            orders,
            payments,
            config,
            cleanup,
        })
    }

    /// Build a context, run `body`, then run every registered cleanup action.
    ///
    /// Cleanup runs even if `body` fails or panics.
    pub async fn run<F, Fut, T, E>(config: HarnessConfig, body: F) -> Result<T, E>
    where
        F: FnOnce(TestContext) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<ClientError>,
    {
        with_cleanup(|registry| async move {
            match TestContext::new(config, registry) {
                Ok(ctx) => body(ctx).await,
                Err(e) => Err(E::from(e)),
            }
        })
        .await
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.config.retry)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from(&self.config.poll)
    }

    /// Policy for waiting on a payment to appear.
    pub fn payment_poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.config.scenario.payment_timeout_ms),
            Duration::from_millis(self.config.scenario.payment_interval_ms),
        )
    }
}
