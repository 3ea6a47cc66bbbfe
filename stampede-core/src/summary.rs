use crate::outcome::StatusBucket;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Aggregated statistics for a completed (or aborted) run.
///
/// Built incrementally by the aggregator and finalized exactly once.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_requests: u64,
    pub count_by_bucket: HashMap<StatusBucket, u64>,
    pub latency_p50: Duration,
    pub latency_p90: Duration,
    pub latency_p99: Duration,
    /// Transport failures only; a 500 is a failed check but not an error.
    pub error_count: u64,
    pub passed_checks: u64,
    pub failed_checks: u64,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn bucket_count(&self, bucket: StatusBucket) -> u64 {
        self.count_by_bucket.get(&bucket).copied().unwrap_or(0)
    }

    /// Sum over all buckets; equals `total_requests` for every run.
    pub fn bucket_total(&self) -> u64 {
        self.count_by_bucket.values().sum()
    }

    pub fn error_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.
        } else {
            self.failed_checks as f64 / self.total_requests as f64
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Requests={}, Passed={}, Failed={}, Errors={}, p50={:?}, p90={:?}, p99={:?}, Elapsed={:?}",
            self.total_requests,
            self.passed_checks,
            self.failed_checks,
            self.error_count,
            self.latency_p50,
            self.latency_p90,
            self.latency_p99,
            self.elapsed,
        )?;
        for bucket in StatusBucket::ALL {
            let count = self.bucket_count(bucket);
            if count > 0 {
                write!(f, ", {bucket}={count}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        let mut count_by_bucket = HashMap::new();
        count_by_bucket.insert(StatusBucket::Success, 90);
        count_by_bucket.insert(StatusBucket::ClientError, 8);
        count_by_bucket.insert(StatusBucket::Transport, 2);
        RunSummary {
            total_requests: 100,
            count_by_bucket,
            latency_p50: Duration::from_millis(10),
            latency_p90: Duration::from_millis(25),
            latency_p99: Duration::from_millis(60),
            error_count: 2,
            passed_checks: 98,
            failed_checks: 2,
            elapsed: Duration::from_secs(30),
        }
    }

    #[test]
    fn bucket_total_matches_requests() {
        let summary = summary();
        assert_eq!(summary.bucket_total(), summary.total_requests);
        assert_eq!(summary.bucket_count(StatusBucket::ServerError), 0);
    }

    #[test]
    fn error_rate_is_failed_fraction() {
        assert!((summary().error_rate() - 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn display_includes_nonzero_buckets_only() {
        let rendered = summary().to_string();
        assert!(rendered.contains("2xx=90"));
        assert!(rendered.contains("transport=2"));
        assert!(!rendered.contains("5xx"));
    }
}
