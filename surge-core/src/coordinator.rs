//! Run lifecycle coordination
//!
//! The coordinator owns a run end to end: it validates the configuration,
//! probes the target's health endpoint, fans out workers, and joins every
//! one of them before computing the summary. All cross-worker communication
//! is message passing; the aggregator thread is the sole owner of the
//! mutable statistics.

use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

use crate::config::{EndpointWeightTable, RunConfig};
use crate::error::{Error, Result};
use crate::signal::StopSignal;
use crate::stats::{aggregate, RunSummary};
use crate::worker::Worker;

/// Health probe path on the target service
pub const HEALTH_PATH: &str = "/health";

pub struct LoadCoordinator {
    config: Arc<RunConfig>,
    table: EndpointWeightTable,
    stop: StopSignal,
}

impl LoadCoordinator {
    pub fn new(config: RunConfig, table: EndpointWeightTable) -> Self {
        Self { config: Arc::new(config), table, stop: StopSignal::new() }
    }

    /// Handle for requesting an early stop from another thread
    ///
    /// Stopping is cooperative: each worker observes the signal within one
    /// pacing interval, and in-flight requests complete naturally.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Execute the run and return its final statistics
    ///
    /// Fails only on startup preconditions (invalid config, unhealthy
    /// target); once workers are launched, every request outcome is
    /// absorbed into the statistics. Does not return until every worker
    /// has exited its loop, even those caught mid-sleep.
    pub fn run(&self) -> Result<RunSummary> {
        self.config.validate()?;
        self.probe_health()?;

        tracing::info!(
            workers = self.config.worker_count,
            rps = self.config.requests_per_second,
            pacing_ms = self.config.pacing_interval().as_millis() as u64,
            duration = ?self.config.duration,
            "starting load run"
        );

        let (tx, rx) = mpsc::channel();

        // Construct every worker before spawning anything, so a failure
        // here leaves no thread behind.
        let mut workers = Vec::with_capacity(self.config.worker_count);
        for worker_id in 0..self.config.worker_count {
            workers.push(Worker::new(
                worker_id,
                Arc::clone(&self.config),
                &self.table,
                tx.clone(),
                self.stop.clone(),
            )?);
        }
        drop(tx);

        let started = Instant::now();
        let aggregator = thread::spawn(move || aggregate(rx));

        let start_barrier = Arc::new(Barrier::new(workers.len()));
        let mut handles = Vec::with_capacity(workers.len());
        for worker in workers {
            let barrier = Arc::clone(&start_barrier);
            handles.push(thread::spawn(move || worker.run(&barrier)));
        }

        for handle in handles {
            handle
                .join()
                .map_err(|e| Error::Other(format!("worker thread panicked: {e:?}")))?;
        }
        let stats = aggregator
            .join()
            .map_err(|e| Error::Other(format!("aggregator thread panicked: {e:?}")))?;
        let elapsed = started.elapsed();

        tracing::info!(
            total = stats.total(),
            failures = stats.failures(),
            elapsed_ms = elapsed.as_millis() as u64,
            "load run finished"
        );

        Ok(RunSummary { stats, elapsed })
    }

    /// Probe the target once before starting any worker
    fn probe_health(&self) -> Result<()> {
        let url = format!("{}{}", self.config.base_url, HEALTH_PATH);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.request_timeout)
            .build()?;

        match client.get(&url).send() {
            Ok(response) if response.status().is_success() => {
                tracing::info!(url = %url, "health check passed");
                Ok(())
            }
            Ok(response) => Err(Error::Health {
                status: Some(response.status().as_u16()),
                message: format!("{url} returned a non-success status"),
            }),
            Err(err) => Err(Error::Health {
                status: None,
                message: format!("{url} unreachable: {err}"),
            }),
        }
    }
}
