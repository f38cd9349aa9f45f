//! Run configuration and endpoint weight tables

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// One weighted endpoint path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct EndpointWeight {
    /// Path appended to the run's base URL (e.g. "/api/fast")
    pub path: String,
    /// Relative weight in (0, 1]; weights need not sum to 1
    pub weight: f64,
}

impl EndpointWeight {
    pub fn new(path: impl Into<String>, weight: f64) -> Self {
        Self { path: path.into(), weight }
    }
}

/// Ordered endpoint weight table
///
/// The first entry doubles as the designated fallback: the selector returns
/// it whenever floating-point rounding makes the cumulative walk come up
/// short. Weights are normalized at selection time, so a table whose weights
/// sum to 2.0 behaves identically to the same ratios summing to 1.0.
#[derive(Debug, Clone)]
pub struct EndpointWeightTable {
    entries: Vec<EndpointWeight>,
}

impl EndpointWeightTable {
    /// Build a validated table
    ///
    /// Rejects empty tables, empty paths, and weights outside (0, 1].
    pub fn new(entries: Vec<EndpointWeight>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::Config("endpoint weight table requires at least one entry".into()));
        }
        for entry in &entries {
            if entry.path.is_empty() {
                return Err(Error::Config("endpoint path cannot be empty".into()));
            }
            if !entry.weight.is_finite() || entry.weight <= 0.0 || entry.weight > 1.0 {
                return Err(Error::Config(format!(
                    "weight {} for '{}' must be in (0, 1]",
                    entry.weight, entry.path
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The endpoint mix of the observability demo service
    pub fn demo_mix() -> Self {
        Self {
            entries: vec![
                EndpointWeight::new("/api/fast", 0.4),
                EndpointWeight::new("/api/medium", 0.3),
                EndpointWeight::new("/api/slow", 0.1),
                EndpointWeight::new("/api/unreliable", 0.1),
                EndpointWeight::new("/api/cpu-intensive", 0.05),
                EndpointWeight::new("/api/memory-intensive", 0.05),
            ],
        }
    }

    pub fn entries(&self) -> &[EndpointWeight] {
        &self.entries
    }

    /// The designated fallback entry (always present)
    pub fn fallback(&self) -> &EndpointWeight {
        &self.entries[0]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable configuration for one load run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Base URL of the target service (e.g. "http://localhost:3010")
    pub base_url: String,
    /// Run length; `None` runs until the stop signal fires
    pub duration: Option<Duration>,
    /// Target aggregate request rate across all workers
    pub requests_per_second: f64,
    /// Number of concurrent workers
    pub worker_count: usize,
    /// Fixed per-worker inter-request delay, overriding the derived pacing
    pub worker_delay: Option<Duration>,
    /// Upper bound on a single request attempt
    pub request_timeout: Duration,
    /// Master seed for reproducible endpoint selection
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Configuration matching the demo defaults: 60s of the `normal` mix
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            duration: Some(Duration::from_secs(60)),
            requests_per_second: 10.0,
            worker_count: 5,
            worker_delay: None,
            request_timeout: Duration::from_secs(5),
            seed: None,
        }
    }

    /// Check startup preconditions
    ///
    /// Called by the coordinator before any network activity; a rejected
    /// config never causes a single request to be issued.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config("base URL cannot be empty".into()));
        }
        if self.worker_count < 1 {
            return Err(Error::Config(format!(
                "worker count must be >= 1, got {}",
                self.worker_count
            )));
        }
        if !self.requests_per_second.is_finite() || self.requests_per_second <= 0.0 {
            return Err(Error::Config(format!(
                "requests per second must be > 0, got {}",
                self.requests_per_second
            )));
        }
        if let Some(duration) = self.duration {
            if duration.is_zero() {
                return Err(Error::Config("duration must be > 0".into()));
            }
        }
        Ok(())
    }

    /// Delay each worker waits between consecutive requests
    ///
    /// Derived so that `worker_count` workers jointly approximate the target
    /// aggregate rate: `worker_count / requests_per_second` seconds. Expects
    /// a config that passed [`RunConfig::validate`].
    pub fn pacing_interval(&self) -> Duration {
        if let Some(delay) = self.worker_delay {
            return delay;
        }
        Duration::from_secs_f64(self.worker_count as f64 / self.requests_per_second)
    }
}
