//! TokenSwap Simulator
//!
//! Deploys a swap engine over in-memory ledgers and drives it with named
//! scenarios or a seeded random workload.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tokenswap_engine::DeployConfig;

mod holder;
mod scenario;
mod controller;
mod metrics;

use controller::SimulationController;
use scenario::Scenario;

/// TokenSwap Simulator CLI
#[derive(Parser, Debug)]
#[command(name = "swap-sim")]
#[command(about = "TokenSwap scenario runner and load generator")]
struct Args {
    /// Number of simulated holders to create
    #[arg(long, default_value = "3")]
    holders: usize,

    /// Built-in scenario name or path to a JSON scenario
    #[arg(short, long)]
    scenario: Option<String>,

    /// Number of random swaps when no scenario is given
    #[arg(long, default_value = "100")]
    swaps: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Read deployment parameters from the environment
    #[arg(long)]
    from_env: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if args.from_env {
        DeployConfig::from_env()
    } else {
        DeployConfig::default()
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    info!("Starting TokenSwap Simulator");
    info!("Holders: {}", args.holders);
    info!(
        "Pair: {} / {} at rate {}, fees {}% / {}%",
        config.token_a, config.token_b, config.rate, config.fee_percent_a, config.fee_percent_b
    );

    let mut controller = SimulationController::new(args.holders, config, args.seed);
    controller.initialize().await?;

    if let Some(scenario_name) = &args.scenario {
        let scenario = Scenario::load(scenario_name)?;
        controller.run_scenario(scenario).await?;
    } else {
        controller.run(args.swaps).await?;
    }

    let metrics = controller.get_metrics().await;
    info!("Simulation complete");
    info!("Total swaps: {}", metrics.total_swaps);
    info!("Successful: {}", metrics.successful_swaps);
    info!("Failed: {}", metrics.failed_swaps);
    info!("Success rate: {:.1}%", metrics.success_rate() * 100.0);
    let latency = metrics.latency();
    info!(
        "Latency: avg {}us, p50 {}us, p99 {}us",
        latency.average_us, latency.p50_us, latency.p99_us
    );

    for summary in controller.holder_summaries().await {
        info!(
            holder = %summary.holder,
            swaps = summary.swaps(),
            a_to_b = summary.a_to_b,
            b_to_a = summary.b_to_a,
            fees_a = %summary.fees_a,
            fees_b = %summary.fees_b,
            "Holder totals"
        );
    }

    if let Some(engine) = controller.engine_metrics() {
        info!(
            "Volume: A in {}, B out {}, B in {}, A out {}",
            engine.volume_in_a, engine.volume_out_b, engine.volume_in_b, engine.volume_out_a
        );
        info!("Fees withheld: A {}, B {}", engine.fees_a, engine.fees_b);
        info!("Engine report: {}", serde_json::to_string(&engine)?);
    }

    Ok(())
}
