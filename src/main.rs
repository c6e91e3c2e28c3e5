//! commerce-e2e command line.
//!
//! Runs the verification scenarios against a live order/payment deployment.
//!
//! ```text
//! commerce-e2e [--config FILE] [--order-url URL] [--payment-url URL] <COMMAND>
//!
//!   health                 both services report UP
//!   stats                  payment statistics + counter consistency
//!   smoke                  order → payment flow with teardown
//!   wait-payment ORDER_ID  poll until the order's payment exists
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use commerce_e2e::config::{load_with_overrides, ConfigError, HarnessConfig};
use commerce_e2e::fixtures::{order_request, TestContext};
use commerce_e2e::lifecycle::signals;
use commerce_e2e::observability::init_logging;
use commerce_e2e::scenarios;

#[derive(Parser)]
#[command(name = "commerce-e2e")]
#[command(about = "End-to-end checks for the order and payment services", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Order service API root, e.g. http://localhost:8081/api
    #[arg(long, global = true)]
    order_url: Option<String>,

    /// Payment service API root, e.g. http://localhost:8082/api
    #[arg(long, global = true)]
    payment_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that both services report UP
    Health,
    /// Show payment statistics and check they add up
    Stats,
    /// Create an order and follow it through to its payment
    Smoke {
        /// Leave the order as is instead of cancelling it afterwards
        #[arg(long)]
        keep: bool,
    },
    /// Wait for the payment of an existing order
    WaitPayment {
        order_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("Logging disabled: {}", e);
    }

    tracing::info!(
        order_url = %config.services.order_url,
        payment_url = %config.services.payment_url,
        "Configuration loaded"
    );

    TestContext::run(config, |ctx| async move {
        tokio::select! {
            result = run_command(&ctx, cli.command) => result,
            _ = signals::interrupted() => {
                tracing::warn!("Interrupted, running cleanup");
                Err("interrupted".into())
            }
        }
    })
    .await
}

fn resolve_config(cli: &Cli) -> Result<HarnessConfig, ConfigError> {
    load_with_overrides(cli.config.as_deref(), |config| {
        if let Some(url) = &cli.order_url {
            config.services.order_url = url.clone();
        }
        if let Some(url) = &cli.payment_url {
            config.services.payment_url = url.clone();
        }
    })
}

async fn run_command(ctx: &TestContext, command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Health => {
            let health = scenarios::ensure_services_healthy(ctx).await?;
            print_json(&health.order)?;
            print_json(&health.payment)?;
        }
        Commands::Stats => {
            let stats = scenarios::verify_payment_stats(ctx).await?;
            print_json(&stats)?;
        }
        Commands::Smoke { keep } => {
            scenarios::ensure_services_healthy(ctx).await?;

            let request = order_request().product_name("Smoke Test Product").build();
            let report = scenarios::order_to_payment_with(ctx, &request, |order| {
                if !keep {
                    scenarios::cancel_on_teardown(ctx, order);
                }
            })
            .await?;

            println!(
                "Order {} → payment {} ({}), created in {}ms, payment after {}ms",
                report.order.id,
                report.payment.id,
                report.payment.status,
                report.order_latency.as_millis(),
                report.payment_wait.as_millis()
            );
        }
        Commands::WaitPayment { order_id } => {
            let payment = scenarios::await_payment(ctx, &order_id).await?;
            print_json(&payment)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
