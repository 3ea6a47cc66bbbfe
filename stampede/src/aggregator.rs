//! Concurrency-safe collection of request outcomes.
//!
//! Workers record through cloned [`WorkerRecorder`] handles backed by shared
//! atomics; nothing blocks on the hot path. Latencies go into a lock-free
//! bucket and are drained into a t-digest at finalization, so percentiles
//! are a bounded-memory streaming approximation: accurate near the median
//! and within a few percent at the tails (p99).

use metrics_util::AtomicBucket;
use pdatastructs::tdigest::{TDigest, K1};
use stampede_core::{RequestOutcome, RunSummary, StatusBucket};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, trace, warn};

const TDIGEST_BACKLOG_SIZE: usize = 100;

struct Shared {
    buckets: [AtomicU64; StatusBucket::COUNT],
    passed: AtomicU64,
    failed: AtomicU64,
    errors: AtomicU64,
    latency: AtomicBucket<Duration>,
}

impl Shared {
    fn new() -> Self {
        Self {
            buckets: Default::default(),
            passed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            latency: AtomicBucket::new(),
        }
    }
}

/// Accumulates [`RequestOutcome`] values from all workers and produces the
/// final [`RunSummary`]. Finalization consumes the aggregator, so a run is
/// finalized exactly once.
pub struct Aggregator {
    shared: Arc<Shared>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::new()),
        }
    }

    pub fn recorder(&self) -> WorkerRecorder {
        WorkerRecorder {
            shared: self.shared.clone(),
        }
    }

    /// Requests recorded so far. Safe to call while workers are running.
    pub fn total(&self) -> u64 {
        self.shared
            .buckets
            .iter()
            .map(|count| count.load(Ordering::Relaxed))
            .sum()
    }

    pub fn finalize(self, elapsed: Duration) -> RunSummary {
        let mut digest = default_tdigest();
        self.shared.latency.clear_with(|durations| {
            for latency in durations {
                digest.insert(latency.as_secs_f64());
            }
        });

        let mut count_by_bucket = HashMap::new();
        for bucket in StatusBucket::ALL {
            let count = self.shared.buckets[bucket.index()].load(Ordering::Relaxed);
            if count > 0 {
                count_by_bucket.insert(bucket, count);
            }
        }

        RunSummary {
            total_requests: count_by_bucket.values().sum(),
            count_by_bucket,
            latency_p50: quantile(&digest, 0.5),
            latency_p90: quantile(&digest, 0.90),
            latency_p99: quantile(&digest, 0.99),
            error_count: self.shared.errors.load(Ordering::Relaxed),
            passed_checks: self.shared.passed.load(Ordering::Relaxed),
            failed_checks: self.shared.failed.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-worker handle onto the shared accumulation state.
#[derive(Clone)]
pub struct WorkerRecorder {
    shared: Arc<Shared>,
}

impl WorkerRecorder {
    /// Consumes the outcome; each outcome is recorded exactly once.
    pub fn record(&self, outcome: RequestOutcome) {
        let bucket = outcome.bucket();
        self.shared.buckets[bucket.index()].fetch_add(1, Ordering::Relaxed);

        if outcome.check_passed() {
            self.shared.passed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.shared.failed.fetch_add(1, Ordering::Relaxed);
            trace!("Failed check: status={:?} error={:?}", outcome.status, outcome.error);
        }

        if outcome.is_transport_failure() {
            self.shared.errors.fetch_add(1, Ordering::Relaxed);
        }

        self.shared.latency.push(outcome.latency);

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("stampede_requests_total").increment(1);
            if outcome.check_passed() {
                metrics::counter!("stampede_checks_passed").increment(1);
            } else {
                metrics::counter!("stampede_checks_failed").increment(1);
            }
            metrics::histogram!("stampede_request_latency")
                .record(outcome.latency.as_nanos() as f64);
        }
    }
}

fn quantile(digest: &TDigest<K1>, q: f64) -> Duration {
    let secs = digest.quantile(q);

    // An empty digest yields NaN; report zero rather than poisoning the
    // summary.
    if secs.is_finite() {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

fn default_tdigest() -> TDigest<K1> {
    TDigest::new(K1::new(10.), TDIGEST_BACKLOG_SIZE)
}
