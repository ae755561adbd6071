//! Client-side swap outcomes and timings.

use std::time::Duration;

use serde::Serialize;

/// Outcomes and latencies observed by the simulator.
#[derive(Debug, Clone, Default)]
pub struct SimulationMetrics {
    pub total_swaps: u64,
    pub successful_swaps: u64,
    pub failed_swaps: u64,
    latencies: Vec<Duration>,
}

/// Latency of successful swaps, in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub average_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
}

impl SimulationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, latency: Duration) {
        self.total_swaps += 1;
        self.successful_swaps += 1;
        self.latencies.push(latency);
    }

    pub fn record_failure(&mut self) {
        self.total_swaps += 1;
        self.failed_swaps += 1;
    }

    /// Fraction of submitted swaps that succeeded, in `[0, 1]`.
    pub fn success_rate(&self) -> f64 {
        match self.total_swaps {
            0 => 0.0,
            total => self.successful_swaps as f64 / total as f64,
        }
    }

    /// Nearest-rank percentiles over every recorded success.
    pub fn latency(&self) -> LatencySummary {
        let mut micros: Vec<u64> = self
            .latencies
            .iter()
            .map(|d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
            .collect();
        if micros.is_empty() {
            return LatencySummary::default();
        }
        micros.sort_unstable();

        let len = micros.len();
        let rank = |percentile: usize| micros[(percentile * len).div_ceil(100).saturating_sub(1)];
        let sum: u128 = micros.iter().map(|&us| u128::from(us)).sum();

        LatencySummary {
            average_us: u64::try_from(sum / len as u128).unwrap_or(u64::MAX),
            p50_us: rank(50),
            p99_us: rank(99),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_and_latency() {
        let mut metrics = SimulationMetrics::new();
        for us in [200, 100, 150] {
            metrics.record_success(Duration::from_micros(us));
        }
        metrics.record_failure();

        assert_eq!(metrics.total_swaps, 4);
        assert_eq!(metrics.failed_swaps, 1);
        assert_eq!(metrics.success_rate(), 0.75);
        assert_eq!(
            metrics.latency(),
            LatencySummary {
                average_us: 150,
                p50_us: 150,
                p99_us: 200,
            }
        );
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = SimulationMetrics::new();
        assert_eq!(metrics.success_rate(), 0.0);
        assert_eq!(metrics.latency(), LatencySummary::default());
    }
}
