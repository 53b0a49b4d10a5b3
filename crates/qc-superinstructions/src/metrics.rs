//! Conversion counters.
//!
//! Lock-free counters updated on every `convert` call. Read them through
//! [`ConversionMetrics::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe conversion counters.
#[derive(Debug, Default)]
pub struct ConversionMetrics {
    /// Conversions actually computed (cache misses and uncacheable requests)
    pub conversions: AtomicU64,
    /// Requests answered from the cache
    pub cache_hits: AtomicU64,
    /// Cacheable requests that had to convert
    pub cache_misses: AtomicU64,
    /// Requests with the zero hash or with the cache disabled
    pub uncacheable_requests: AtomicU64,
    /// Requests answered by identity conversion
    pub identity_conversions: AtomicU64,
    /// Superinstructions placed across all computed conversions
    pub superinstructions_emitted: AtomicU64,
    /// Dispatches saved across all computed conversions
    pub dispatches_saved: AtomicU64,
    /// Conversions that failed an invariant
    pub failures: AtomicU64,
}

impl ConversionMetrics {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit.
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cacheable miss.
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request that bypassed the cache.
    pub fn record_uncacheable(&self) {
        self.uncacheable_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an identity conversion.
    pub fn record_identity(&self) {
        self.identity_conversions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a computed conversion.
    pub fn record_conversion(&self, superinstructions: usize, dispatches_saved: usize) {
        self.conversions.fetch_add(1, Ordering::Relaxed);
        self.superinstructions_emitted
            .fetch_add(superinstructions as u64, Ordering::Relaxed);
        self.dispatches_saved
            .fetch_add(dispatches_saved as u64, Ordering::Relaxed);
    }

    /// Record a failed conversion.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            conversions: self.conversions.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            uncacheable_requests: self.uncacheable_requests.load(Ordering::Relaxed),
            identity_conversions: self.identity_conversions.load(Ordering::Relaxed),
            superinstructions_emitted: self.superinstructions_emitted.load(Ordering::Relaxed),
            dispatches_saved: self.dispatches_saved.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.conversions,
            &self.cache_hits,
            &self.cache_misses,
            &self.uncacheable_requests,
            &self.identity_conversions,
            &self.superinstructions_emitted,
            &self.dispatches_saved,
            &self.failures,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time metrics snapshot
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub conversions: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub uncacheable_requests: u64,
    pub identity_conversions: u64,
    pub superinstructions_emitted: u64,
    pub dispatches_saved: u64,
    pub failures: u64,
}

impl MetricsSnapshot {
    /// Fraction of cacheable requests served from the cache.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total > 0 {
            self.cache_hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot() {
        let metrics = ConversionMetrics::new();
        metrics.record_cache_miss();
        metrics.record_conversion(3, 7);
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_hit();

        let snap = metrics.snapshot();
        assert_eq!(snap.conversions, 1);
        assert_eq!(snap.superinstructions_emitted, 3);
        assert_eq!(snap.dispatches_saved, 7);
        assert!((snap.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let metrics = ConversionMetrics::new();
        metrics.record_failure();
        metrics.record_identity();
        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_hit_rate_without_traffic() {
        assert!(MetricsSnapshot::default().hit_rate().abs() < f64::EPSILON);
    }
}
