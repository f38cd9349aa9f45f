//! Per-request result records

use std::time::{Duration, SystemTime};

/// Outcome of a single HTTP attempt
///
/// Created by a worker, sent to the aggregator by value, never mutated
/// afterwards. Exactly one record exists per attempt; there are no retries.
#[derive(Debug, Clone)]
pub struct RequestResult {
    /// Endpoint path that was requested
    pub endpoint: String,
    /// Worker that issued the request
    pub worker_id: usize,
    /// Per-worker 0-based sequence index; reconstructs per-worker order
    pub sequence: u64,
    /// HTTP status code; 0 means the request never produced a response
    pub status: u16,
    /// Wall-clock time from send to response (or to transport failure)
    pub duration: Duration,
    /// Transport error message, populated only when `status == 0`
    pub error: Option<String>,
    /// Wall-clock completion time
    pub completed_at: SystemTime,
}

impl RequestResult {
    /// Record for a request that produced an HTTP response
    pub fn completed(
        endpoint: String,
        worker_id: usize,
        sequence: u64,
        status: u16,
        duration: Duration,
    ) -> Self {
        Self {
            endpoint,
            worker_id,
            sequence,
            status,
            duration,
            error: None,
            completed_at: SystemTime::now(),
        }
    }

    /// Record for a request that failed before any response arrived
    /// (connection refused, timeout, DNS failure)
    pub fn transport_failure(
        endpoint: String,
        worker_id: usize,
        sequence: u64,
        duration: Duration,
        error: String,
    ) -> Self {
        Self {
            endpoint,
            worker_id,
            sequence,
            status: 0,
            duration,
            error: Some(error),
            completed_at: SystemTime::now(),
        }
    }

    /// Success means a status in [200, 399]; the 0 sentinel never qualifies
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}
