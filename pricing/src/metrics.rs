//! Metrics collection for pricing.

use std::sync::atomic::{AtomicU64, Ordering};

/// Pricing counters.
#[derive(Debug, Default)]
pub struct PricingMetrics {
    /// Calculations attempted.
    pub calculations_total: AtomicU64,
    /// Calculations that stored a price.
    pub calculations_succeeded: AtomicU64,
    /// Calculations that returned an error.
    pub calculations_failed: AtomicU64,
    /// Successful calculations priced with a live rate.
    pub live_rates: AtomicU64,
    /// Successful calculations priced with the fallback rate.
    pub fallback_rates: AtomicU64,
}

impl PricingMetrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calculation_started(&self) {
        self.calculations_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a stored price and which kind of rate produced it.
    pub fn calculation_succeeded(&self, live_rate: bool) {
        self.calculations_succeeded.fetch_add(1, Ordering::Relaxed);
        if live_rate {
            self.live_rates.fetch_add(1, Ordering::Relaxed);
        } else {
            self.fallback_rates.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn calculation_failed(&self) {
        self.calculations_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> PricingMetricsSnapshot {
        PricingMetricsSnapshot {
            calculations_total: self.calculations_total.load(Ordering::Relaxed),
            calculations_succeeded: self.calculations_succeeded.load(Ordering::Relaxed),
            calculations_failed: self.calculations_failed.load(Ordering::Relaxed),
            live_rates: self.live_rates.load(Ordering::Relaxed),
            fallback_rates: self.fallback_rates.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`PricingMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PricingMetricsSnapshot {
    pub calculations_total: u64,
    pub calculations_succeeded: u64,
    pub calculations_failed: u64,
    pub live_rates: u64,
    pub fallback_rates: u64,
}
