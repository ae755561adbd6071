//! Simulated token holders.

use tokio::sync::RwLock;

use serde::Serialize;

use tokenswap_common::{AccountId, Amount, SwapDirection};
use tokenswap_engine::SwapReceipt;

/// An account that swaps through the engine.
pub struct SimulatedHolder {
    /// Holder account.
    pub id: AccountId,
    /// Completed swaps, oldest first.
    history: RwLock<Vec<SwapReceipt>>,
}

impl SimulatedHolder {
    /// Create a new simulated holder.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(id),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Record a completed swap.
    pub async fn record(&self, receipt: SwapReceipt) {
        self.history.write().await.push(receipt);
    }

    /// Totals over this holder's completed swaps.
    pub async fn summary(&self) -> HolderSummary {
        let history = self.history.read().await;
        let mut summary = HolderSummary {
            holder: self.id.clone(),
            a_to_b: 0,
            b_to_a: 0,
            fees_a: 0,
            fees_b: 0,
        };
        for receipt in history.iter() {
            let (count, fees) = match receipt.direction {
                SwapDirection::AtoB => (&mut summary.a_to_b, &mut summary.fees_a),
                SwapDirection::BtoA => (&mut summary.b_to_a, &mut summary.fees_b),
            };
            *count += 1;
            *fees = fees.saturating_add(receipt.fee);
        }
        summary
    }
}

/// Per-holder swap totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolderSummary {
    pub holder: AccountId,
    pub a_to_b: usize,
    pub b_to_a: usize,
    /// Token A withheld from this holder's A to B swaps.
    pub fees_a: Amount,
    /// Token B withheld from this holder's B to A swaps.
    pub fees_b: Amount,
}

impl HolderSummary {
    pub fn swaps(&self) -> usize {
        self.a_to_b + self.b_to_a
    }
}

/// Holder factory for creating test accounts.
pub struct HolderFactory;

impl HolderFactory {
    /// Create N simulated holders.
    pub fn create_holders(count: usize) -> Vec<SimulatedHolder> {
        const NAMES: [&str; 8] = ["alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi"];

        (0..count)
            .map(|i| match NAMES.get(i) {
                Some(name) => SimulatedHolder::new(*name),
                None => SimulatedHolder::new(format!("holder-{}", i + 1)),
            })
            .collect()
    }
}
