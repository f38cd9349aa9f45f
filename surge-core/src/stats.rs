//! Run-level statistics
//!
//! `RunStats` is owned by the aggregator alone. Workers never touch it;
//! they send immutable [`RequestResult`] values over a channel and the
//! aggregator applies them one at a time, so no counter is ever updated
//! from two threads.

use std::collections::BTreeMap;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::result::RequestResult;

/// Running totals for one load run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    total: u64,
    successes: u64,
    failures: u64,
    summed_duration: Duration,
    min_duration: Option<Duration>,
    max_duration: Option<Duration>,
    by_status: BTreeMap<u16, u64>,
    by_endpoint: BTreeMap<String, u64>,
}

impl RunStats {
    /// Fold one result into the totals
    pub fn apply(&mut self, result: &RequestResult) {
        self.total += 1;
        if result.is_success() {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.summed_duration += result.duration;
        self.min_duration = Some(match self.min_duration {
            Some(min) => min.min(result.duration),
            None => result.duration,
        });
        self.max_duration = Some(match self.max_duration {
            Some(max) => max.max(result.duration),
            None => result.duration,
        });
        *self.by_status.entry(result.status).or_insert(0) += 1;
        *self.by_endpoint.entry(result.endpoint.clone()).or_insert(0) += 1;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn summed_duration(&self) -> Duration {
        self.summed_duration
    }

    /// Fraction of successful requests; 0 for an empty run
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.successes as f64 / self.total as f64
    }

    /// Arithmetic mean of all recorded durations; zero for an empty run
    pub fn average_duration(&self) -> Duration {
        if self.total == 0 {
            return Duration::ZERO;
        }
        self.summed_duration.div_f64(self.total as f64)
    }

    pub fn min_duration(&self) -> Option<Duration> {
        self.min_duration
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration
    }

    /// Request counts by status code (0 = transport error)
    pub fn by_status(&self) -> &BTreeMap<u16, u64> {
        &self.by_status
    }

    /// Request counts by endpoint path
    pub fn by_endpoint(&self) -> &BTreeMap<String, u64> {
        &self.by_endpoint
    }
}

/// Drain a result channel into fresh stats
///
/// Runs on the aggregator thread until every sender is dropped, i.e. until
/// the last worker has exited its loop.
pub fn aggregate(results: Receiver<RequestResult>) -> RunStats {
    let mut stats = RunStats::default();
    for result in results {
        stats.apply(&result);
    }
    stats
}

/// Final statistics plus the run's measured wall-clock time
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: RunStats,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Observed aggregate request rate
    pub fn throughput_rps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.stats.total() as f64 / secs
        } else {
            0.0
        }
    }
}
