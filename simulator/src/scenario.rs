//! Simulation scenarios.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tokenswap_common::{Amount, SwapDirection};

/// Smallest units per whole token in the built-in scenarios.
pub const UNIT: Amount = 1_000_000_000_000_000_000;

/// `n` whole tokens in smallest units.
pub const fn tokens(n: u128) -> Amount {
    n * UNIT
}

/// A simulation scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Steps in the scenario.
    pub steps: Vec<ScenarioStep>,
}

/// Which side of the pair a step refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSide {
    A,
    B,
}

/// A step in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScenarioStep {
    /// Wait for a duration.
    Wait { millis: u64 },
    /// Issue tokens to a holder and approve the engine to spend them.
    Fund {
        holder: String,
        token: TokenSide,
        amount: Amount,
    },
    /// Change fees as `caller`.
    SetFees {
        caller: String,
        fee_percent_a: Decimal,
        fee_percent_b: Decimal,
        #[serde(default)]
        expect_error: Option<String>,
    },
    /// Execute a swap.
    Swap {
        holder: String,
        direction: SwapDirection,
        amount: Amount,
        #[serde(default)]
        expect_error: Option<String>,
    },
    /// Assert a condition.
    Assert { condition: AssertCondition },
}

/// Conditions that can be asserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AssertCondition {
    /// Holder balance equals.
    BalanceEquals {
        holder: String,
        token: TokenSide,
        amount: Amount,
    },
    /// Current preview equals.
    QuoteEquals {
        direction: SwapDirection,
        amount: Amount,
        expected: Amount,
    },
}

impl Scenario {
    /// Load a built-in scenario by name, or a JSON scenario from a path.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        match name {
            "zero-fees" => Ok(Self::fee_fixture(name, 0, 0, 100, 300)),
            "fee-a-10" => Ok(Self::fee_fixture(name, 10, 0, 90, 300)),
            "fee-b-10" => Ok(Self::fee_fixture(name, 0, 10, 100, 270)),
            "both-fees-10" => Ok(Self::fee_fixture(name, 10, 10, 90, 270)),
            "both-fees-90" => Ok(Self::fee_fixture(name, 90, 90, 10, 30)),
            "unauthorized-fees" => Ok(Self::unauthorized_fees()),
            path if path.ends_with(".json") => {
                let raw = std::fs::read_to_string(path)?;
                Ok(serde_json::from_str(&raw)?)
            }
            _ => Err(anyhow::anyhow!("Unknown scenario: {}", name)),
        }
    }

    /// Names of the built-in scenarios.
    pub fn builtin_names() -> &'static [&'static str] {
        &[
            "zero-fees",
            "fee-a-10",
            "fee-b-10",
            "both-fees-10",
            "both-fees-90",
            "unauthorized-fees",
        ]
    }

    /// Swap 300 A into B, top up to 100 B and swap it back into A.
    ///
    /// `out_b` and `out_a` are whole tokens expected from each leg at rate 3.
    fn fee_fixture(name: &str, fee_a: u64, fee_b: u64, out_b: u128, out_a: u128) -> Self {
        let holder = "alice".to_string();

        Self {
            name: name.to_string(),
            description: format!("Round trip at rate 3 with fees A={fee_a}% B={fee_b}%"),
            steps: vec![
                ScenarioStep::SetFees {
                    caller: "admin".to_string(),
                    fee_percent_a: Decimal::from(fee_a),
                    fee_percent_b: Decimal::from(fee_b),
                    expect_error: None,
                },
                ScenarioStep::Fund {
                    holder: holder.clone(),
                    token: TokenSide::A,
                    amount: tokens(300),
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::QuoteEquals {
                        direction: SwapDirection::AtoB,
                        amount: tokens(300),
                        expected: tokens(out_b),
                    },
                },
                ScenarioStep::Swap {
                    holder: holder.clone(),
                    direction: SwapDirection::AtoB,
                    amount: tokens(300),
                    expect_error: None,
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::BalanceEquals {
                        holder: holder.clone(),
                        token: TokenSide::B,
                        amount: tokens(out_b),
                    },
                },
                ScenarioStep::Fund {
                    holder: holder.clone(),
                    token: TokenSide::B,
                    amount: tokens(100) - tokens(out_b.min(100)),
                },
                ScenarioStep::Swap {
                    holder: holder.clone(),
                    direction: SwapDirection::BtoA,
                    amount: tokens(100),
                    expect_error: None,
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::BalanceEquals {
                        holder,
                        token: TokenSide::A,
                        amount: tokens(out_a),
                    },
                },
            ],
        }
    }

    /// Fee changes by a non-admin and out-of-range fees are refused.
    fn unauthorized_fees() -> Self {
        Self {
            name: "unauthorized-fees".to_string(),
            description: "Fee changes without the admin role or above 100% are rejected".to_string(),
            steps: vec![
                ScenarioStep::SetFees {
                    caller: "admin".to_string(),
                    fee_percent_a: Decimal::ZERO,
                    fee_percent_b: Decimal::ZERO,
                    expect_error: None,
                },
                ScenarioStep::SetFees {
                    caller: "alice".to_string(),
                    fee_percent_a: Decimal::from(10),
                    fee_percent_b: Decimal::from(10),
                    expect_error: Some("UNAUTHORIZED".to_string()),
                },
                ScenarioStep::SetFees {
                    caller: "admin".to_string(),
                    fee_percent_a: Decimal::from(101),
                    fee_percent_b: Decimal::ZERO,
                    expect_error: Some("INVALID_PERCENTAGE".to_string()),
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::QuoteEquals {
                        direction: SwapDirection::AtoB,
                        amount: tokens(300),
                        expected: tokens(100),
                    },
                },
                ScenarioStep::Swap {
                    holder: "alice".to_string(),
                    direction: SwapDirection::AtoB,
                    amount: 0,
                    expect_error: Some("INVALID_AMOUNT".to_string()),
                },
                ScenarioStep::Wait { millis: 10 },
            ],
        }
    }
}
