use crate::constants::PASSING_STATUSES;
use std::fmt;
use std::time::{Duration, SystemTime};

/// The result of a single dispatched request.
///
/// Exactly one of these is produced per request and handed to the
/// aggregator exactly once.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub timestamp: SystemTime,
    /// Absent on transport failure (connection refused, DNS, timeout).
    pub status: Option<u16>,
    pub latency: Duration,
    pub error: Option<String>,
}

impl RequestOutcome {
    pub fn response(timestamp: SystemTime, status: u16, latency: Duration) -> Self {
        Self {
            timestamp,
            status: Some(status),
            latency,
            error: None,
        }
    }

    pub fn transport_failure(
        timestamp: SystemTime,
        error: impl fmt::Display,
        latency: Duration,
    ) -> Self {
        Self {
            timestamp,
            status: None,
            latency,
            error: Some(error.to_string()),
        }
    }

    pub fn bucket(&self) -> StatusBucket {
        StatusBucket::from_status(self.status)
    }

    /// The per-request check: passes on any status in the accepted set.
    /// A transport failure never passes.
    pub fn check_passed(&self) -> bool {
        matches!(self.status, Some(status) if PASSING_STATUSES.contains(&status))
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status.is_none()
    }
}

/// Coarse classification of an outcome by status class, with a separate
/// bucket for requests that never produced a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBucket {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
    Transport,
}

impl StatusBucket {
    pub const COUNT: usize = 6;

    pub const ALL: [StatusBucket; Self::COUNT] = [
        StatusBucket::Informational,
        StatusBucket::Success,
        StatusBucket::Redirection,
        StatusBucket::ClientError,
        StatusBucket::ServerError,
        StatusBucket::Transport,
    ];

    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(100..=199) => StatusBucket::Informational,
            Some(200..=299) => StatusBucket::Success,
            Some(300..=399) => StatusBucket::Redirection,
            Some(400..=499) => StatusBucket::ClientError,
            // Statuses outside the defined classes land with the server
            // errors rather than getting their own bucket.
            Some(_) => StatusBucket::ServerError,
            None => StatusBucket::Transport,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            StatusBucket::Informational => 0,
            StatusBucket::Success => 1,
            StatusBucket::Redirection => 2,
            StatusBucket::ClientError => 3,
            StatusBucket::ServerError => 4,
            StatusBucket::Transport => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusBucket::Informational => "1xx",
            StatusBucket::Success => "2xx",
            StatusBucket::Redirection => "3xx",
            StatusBucket::ClientError => "4xx",
            StatusBucket::ServerError => "5xx",
            StatusBucket::Transport => "transport",
        }
    }
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
