//! Swap counters.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use tokenswap_common::{Amount, SwapDirection};

/// Cumulative amounts moved by successful swaps. Saturating.
#[derive(Debug, Clone, Copy, Default)]
struct Volumes {
    in_a: Amount,
    in_b: Amount,
    out_a: Amount,
    out_b: Amount,
    fees_a: Amount,
    fees_b: Amount,
}

/// Engine metrics.
pub struct SwapMetrics {
    /// Swap requests received.
    pub swaps_attempted: AtomicU64,
    /// Swaps that moved funds.
    pub swaps_succeeded: AtomicU64,
    /// Swaps refused before any ledger mutation.
    pub swaps_rejected: AtomicU64,
    /// Swaps whose credit leg failed after the debit was applied.
    pub swaps_failed: AtomicU64,
    volumes: Mutex<Volumes>,
}

impl SwapMetrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            swaps_attempted: AtomicU64::new(0),
            swaps_succeeded: AtomicU64::new(0),
            swaps_rejected: AtomicU64::new(0),
            swaps_failed: AtomicU64::new(0),
            volumes: Mutex::new(Volumes::default()),
        }
    }

    pub fn swap_attempted(&self) {
        self.swaps_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn swap_rejected(&self) {
        self.swaps_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn swap_failed(&self) {
        self.swaps_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed swap and its volumes.
    pub fn swap_succeeded(&self, direction: SwapDirection, amount_in: Amount, fee: Amount, amount_out: Amount) {
        self.swaps_succeeded.fetch_add(1, Ordering::Relaxed);
        let mut guard = self.volumes.lock();
        let v = &mut *guard;
        let (vin, vout, fees) = match direction {
            SwapDirection::AtoB => (&mut v.in_a, &mut v.out_b, &mut v.fees_a),
            SwapDirection::BtoA => (&mut v.in_b, &mut v.out_a, &mut v.fees_b),
        };
        *vin = vin.saturating_add(amount_in);
        *vout = vout.saturating_add(amount_out);
        *fees = fees.saturating_add(fee);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> SwapMetricsSnapshot {
        let v = *self.volumes.lock();
        SwapMetricsSnapshot {
            swaps_attempted: self.swaps_attempted.load(Ordering::Relaxed),
            swaps_succeeded: self.swaps_succeeded.load(Ordering::Relaxed),
            swaps_rejected: self.swaps_rejected.load(Ordering::Relaxed),
            swaps_failed: self.swaps_failed.load(Ordering::Relaxed),
            volume_in_a: v.in_a,
            volume_in_b: v.in_b,
            volume_out_a: v.out_a,
            volume_out_b: v.out_b,
            fees_a: v.fees_a,
            fees_b: v.fees_b,
        }
    }
}

impl Default for SwapMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwapMetricsSnapshot {
    pub swaps_attempted: u64,
    pub swaps_succeeded: u64,
    pub swaps_rejected: u64,
    pub swaps_failed: u64,
    pub volume_in_a: Amount,
    pub volume_in_b: Amount,
    pub volume_out_a: Amount,
    pub volume_out_b: Amount,
    pub fees_a: Amount,
    pub fees_b: Amount,
}

impl SwapMetricsSnapshot {
    /// Fraction of attempted swaps that succeeded, in `[0, 1]`.
    pub fn success_rate(&self) -> f64 {
        if self.swaps_attempted == 0 {
            return 0.0;
        }
        self.swaps_succeeded as f64 / self.swaps_attempted as f64
    }
}
