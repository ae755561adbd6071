//! Simulation controller.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use tokenswap_common::{AccountId, Amount, Capability, FeePercent, SwapDirection, SwapError, SwapRequest};
use tokenswap_engine::{DeployConfig, Deployment, SwapMetricsSnapshot};

use crate::holder::{HolderFactory, HolderSummary, SimulatedHolder};
use crate::metrics::SimulationMetrics;
use crate::scenario::{tokens, AssertCondition, Scenario, ScenarioStep, TokenSide};

/// Token A each holder starts a random workload with.
const INITIAL_BALANCE: Amount = tokens(1_000);

/// Controls the simulation.
pub struct SimulationController {
    /// Number of holders.
    holder_count: usize,
    /// Deployment parameters.
    config: DeployConfig,
    /// Random number generator.
    rng: RwLock<StdRng>,
    /// Engine and ledgers, once initialized.
    deployment: Option<Deployment>,
    /// Simulated holders.
    holders: Vec<SimulatedHolder>,
    /// Simulation metrics.
    metrics: RwLock<SimulationMetrics>,
}

impl SimulationController {
    /// Create a new simulation controller.
    pub fn new(holder_count: usize, config: DeployConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Self {
            holder_count,
            config,
            rng: RwLock::new(rng),
            deployment: None,
            holders: Vec::new(),
            metrics: RwLock::new(SimulationMetrics::new()),
        }
    }

    /// Deploy the engine and create holders with empty balances.
    pub async fn initialize(&mut self) -> anyhow::Result<()> {
        info!(holders = self.holder_count, "Initializing simulation");

        let deployment = Deployment::deploy(&self.config).await?;
        info!(
            admins = ?deployment.capabilities.holders(Capability::Admin),
            operator = %deployment.engine.operator(),
            "Engine deployed"
        );

        self.deployment = Some(deployment);
        self.holders = HolderFactory::create_holders(self.holder_count);

        Ok(())
    }

    /// Run a scenario. Fails on the first unmet assertion or expectation.
    pub async fn run_scenario(&self, scenario: Scenario) -> anyhow::Result<()> {
        info!("Running scenario: {} - {}", scenario.name, scenario.description);

        for (index, step) in scenario.steps.iter().enumerate() {
            self.execute_step(step)
                .await
                .map_err(|e| anyhow::anyhow!("step {} of {} failed: {}", index + 1, scenario.name, e))?;
        }

        info!(scenario = %scenario.name, "Scenario passed");
        Ok(())
    }

    /// Fund every holder with token A and run `swaps` random swaps.
    pub async fn run(&self, swaps: usize) -> anyhow::Result<()> {
        let deployment = self.deployment()?;
        if self.holders.is_empty() {
            return Err(anyhow::anyhow!("no holders to swap with"));
        }

        for holder in &self.holders {
            deployment.fund_a(&holder.id, INITIAL_BALANCE)?;
            deployment.approve_b(&holder.id, Amount::MAX);
        }

        info!(swaps, holders = self.holders.len(), "Running random workload");

        for _ in 0..swaps {
            let (holder, direction, amount) = self.next_swap(deployment).await;
            let request = SwapRequest::new(direction, amount, holder.id.clone());
            self.submit(holder, request).await;
        }

        Ok(())
    }

    /// Get simulation metrics.
    pub async fn get_metrics(&self) -> SimulationMetrics {
        self.metrics.read().await.clone()
    }

    /// Swap totals for every simulated holder.
    pub async fn holder_summaries(&self) -> Vec<HolderSummary> {
        let mut summaries = Vec::with_capacity(self.holders.len());
        for holder in &self.holders {
            summaries.push(holder.summary().await);
        }
        summaries
    }

    /// Engine-side counters, if deployed.
    pub fn engine_metrics(&self) -> Option<SwapMetricsSnapshot> {
        self.deployment.as_ref().map(|d| d.engine.metrics())
    }

    /// Pick a holder, a direction it can afford and an amount.
    async fn next_swap(&self, deployment: &Deployment) -> (&SimulatedHolder, SwapDirection, Amount) {
        let mut rng = self.rng.write().await;
        let holder = &self.holders[rng.gen_range(0..self.holders.len())];

        let balance_a = deployment.token_a.balance(&holder.id);
        let balance_b = deployment.token_b.balance(&holder.id);
        let available_for = |direction: SwapDirection| match direction {
            SwapDirection::AtoB => balance_a,
            SwapDirection::BtoA => balance_b,
        };

        let mut direction = if rng.gen_bool(0.5) {
            SwapDirection::AtoB
        } else {
            SwapDirection::BtoA
        };
        if available_for(direction) == 0 {
            direction = direction.reverse();
        }
        let available = available_for(direction);
        // an empty holder still submits, exercising the rejection path
        let amount = if available == 0 { 1 } else { rng.gen_range(1..=available) };

        (holder, direction, amount)
    }

    async fn submit(&self, holder: &SimulatedHolder, request: SwapRequest) {
        let Ok(deployment) = self.deployment() else {
            return;
        };

        let started = Instant::now();
        match deployment.engine.execute(request).await {
            Ok(receipt) => {
                self.metrics.write().await.record_success(started.elapsed());
                holder.record(receipt).await;
            }
            Err(e) => {
                debug!(holder = %holder.id, code = e.error_code(), "Swap failed");
                self.metrics.write().await.record_failure();
            }
        }
    }

    /// Execute a single scenario step.
    async fn execute_step(&self, step: &ScenarioStep) -> anyhow::Result<()> {
        let deployment = self.deployment()?;

        match step {
            ScenarioStep::Wait { millis } => {
                debug!("Waiting {} ms", millis);
                tokio::time::sleep(Duration::from_millis(*millis)).await;
            }
            ScenarioStep::Fund { holder, token, amount } => {
                let account = AccountId::new(holder.as_str());
                match token {
                    TokenSide::A => deployment.fund_a(&account, *amount)?,
                    TokenSide::B => {
                        deployment.token_b.mint(&account, *amount)?;
                        let allowance = deployment.token_b.allowance(&account, deployment.engine.operator());
                        deployment.approve_b(&account, allowance.saturating_add(*amount));
                    }
                }
                info!(holder = %account, token = ?token, amount = %amount, "Funded holder");
            }
            ScenarioStep::SetFees {
                caller,
                fee_percent_a,
                fee_percent_b,
                expect_error,
            } => {
                let caller = AccountId::new(caller.as_str());
                let result = match (
                    FeePercent::from_percent(*fee_percent_a),
                    FeePercent::from_percent(*fee_percent_b),
                ) {
                    (Ok(fee_a), Ok(fee_b)) => deployment.engine.set_fees(&caller, fee_a, fee_b).await,
                    (Err(e), _) | (_, Err(e)) => Err(e),
                };
                check_outcome("SetFees", result, expect_error.as_deref())?;
            }
            ScenarioStep::Swap {
                holder,
                direction,
                amount,
                expect_error,
            } => {
                let account = AccountId::new(holder.as_str());
                let started = Instant::now();
                let result = deployment
                    .engine
                    .execute(SwapRequest::new(*direction, *amount, account.clone()))
                    .await;

                match &result {
                    Ok(receipt) => {
                        self.metrics.write().await.record_success(started.elapsed());
                        if let Some(h) = self.holders.iter().find(|h| h.id == account) {
                            h.record(receipt.clone()).await;
                        }
                    }
                    Err(_) => self.metrics.write().await.record_failure(),
                }
                check_outcome("Swap", result.map(|_| ()), expect_error.as_deref())?;
            }
            ScenarioStep::Assert { condition } => {
                self.check(deployment, condition).await?;
            }
        }

        Ok(())
    }

    async fn check(&self, deployment: &Deployment, condition: &AssertCondition) -> anyhow::Result<()> {
        match condition {
            AssertCondition::BalanceEquals { holder, token, amount } => {
                let account = AccountId::new(holder.as_str());
                let actual = match token {
                    TokenSide::A => deployment.token_a.balance(&account),
                    TokenSide::B => deployment.token_b.balance(&account),
                };
                if actual != *amount {
                    return Err(anyhow::anyhow!(
                        "balance of {} on {:?} is {}, expected {}",
                        holder,
                        token,
                        actual,
                        amount
                    ));
                }
            }
            AssertCondition::QuoteEquals {
                direction,
                amount,
                expected,
            } => {
                let actual = deployment.engine.quote(*direction, *amount)?.amount_out;
                if actual != *expected {
                    return Err(anyhow::anyhow!(
                        "quote {} of {} is {}, expected {}",
                        direction,
                        amount,
                        actual,
                        expected
                    ));
                }
            }
        }

        debug!(condition = ?condition, "Assertion held");
        Ok(())
    }

    fn deployment(&self) -> anyhow::Result<&Deployment> {
        self.deployment
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("simulation not initialized"))
    }
}

/// Compare an operation's result against the error code a step expects.
fn check_outcome(
    operation: &str,
    result: Result<(), SwapError>,
    expected: Option<&str>,
) -> anyhow::Result<()> {
    match (result, expected) {
        (Ok(()), None) => Ok(()),
        (Err(e), Some(code)) if e.error_code() == code => {
            info!(operation, code, "Rejected as expected");
            Ok(())
        }
        (Ok(()), Some(code)) => Err(anyhow::anyhow!("{operation} succeeded, expected {code}")),
        (Err(e), expected) => {
            warn!(operation, code = e.error_code(), error = %e, "Unexpected failure");
            Err(anyhow::anyhow!(
                "{operation} failed with {} ({e}), expected {}",
                e.error_code(),
                expected.unwrap_or("success")
            ))
        }
    }
}
