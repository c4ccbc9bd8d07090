use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use strum::IntoEnumIterator;

use crate::{MatchResult, Tier};

/// Counters behind the tier/confidence badge and resolution telemetry.
#[derive(Default)]
pub struct Metrics {
    tiers: [AtomicU64; 5],
    total_processing_ms: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    timed_out: AtomicU64,
    validation_failures: AtomicU64,
    rebuilds: AtomicU64,
    failed_rebuilds: AtomicU64,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, result: &MatchResult) {
        self.tiers[result.tier as usize].fetch_add(1, Ordering::Relaxed);
        self.total_processing_ms
            .fetch_add(result.processing_time_ms, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rebuild(&self, success: bool) {
        if success {
            self.rebuilds.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_rebuilds.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tiers: Tier::iter()
                .map(|t| (t, self.tiers[t as usize].load(Ordering::Relaxed)))
                .collect(),
            total_processing_ms: self.total_processing_ms.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            rebuilds: self.rebuilds.load(Ordering::Relaxed),
            failed_rebuilds: self.failed_rebuilds.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub tiers: BTreeMap<Tier, u64>,
    pub total_processing_ms: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub timed_out: u64,
    pub validation_failures: u64,
    pub rebuilds: u64,
    pub failed_rebuilds: u64,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn resolutions(&self) -> u64 {
        self.tiers.values().sum()
    }

    #[must_use]
    pub fn tier_count(&self, tier: Tier) -> u64 {
        self.tiers.get(&tier).copied().unwrap_or_default()
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tier_share(&self, tier: Tier) -> f64 {
        match self.resolutions() {
            0 => 0.0,
            n => self.tier_count(tier) as f64 / n as f64,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_processing_ms(&self) -> f64 {
        match self.resolutions() {
            0 => 0.0,
            n => self.total_processing_ms as f64 / n as f64,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cache_hit_rate(&self) -> f64 {
        match self.cache_hits + self.cache_misses {
            0 => 0.0,
            n => self.cache_hits as f64 / n as f64,
        }
    }
}
