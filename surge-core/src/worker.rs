//! Paced request worker
//!
//! Each worker is one native thread running a select / request / report /
//! sleep loop. Workers never share state: every worker owns its selector,
//! its HTTP client, and a sender half of the result channel.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Barrier};
use std::time::Instant;

use crate::config::{EndpointWeightTable, RunConfig};
use crate::error::Result;
use crate::result::RequestResult;
use crate::select::EndpointSelector;
use crate::signal::StopSignal;

pub struct Worker {
    id: usize,
    config: Arc<RunConfig>,
    selector: EndpointSelector,
    client: reqwest::blocking::Client,
    results: Sender<RequestResult>,
    stop: StopSignal,
}

impl Worker {
    /// Build a worker with its own selector and HTTP client
    ///
    /// With a master seed configured, the selector seed is derived per
    /// worker so runs are reproducible without correlating the workers.
    pub fn new(
        id: usize,
        config: Arc<RunConfig>,
        table: &EndpointWeightTable,
        results: Sender<RequestResult>,
        stop: StopSignal,
    ) -> Result<Self> {
        let seed = config.seed.map(|master| {
            crate::seed::derive_seed(master, &crate::seed::worker_component(id))
        });
        let selector = EndpointSelector::with_seed(table, seed);
        // Redirects are reported as-is; a 3xx counts as its own outcome
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { id, config, selector, client, results, stop })
    }

    /// Run until the stop signal fires or the configured duration elapses
    ///
    /// Every iteration issues exactly one GET; a failed request is reported
    /// and the loop continues. The pacing sleep observes the stop signal,
    /// so a stop request never waits out a full interval.
    pub fn run(mut self, start_barrier: &Barrier) {
        start_barrier.wait();

        let deadline = self.config.duration.map(|d| Instant::now() + d);
        let pacing = self.config.pacing_interval();
        let mut sequence = 0u64;

        loop {
            if self.should_stop(deadline) {
                break;
            }

            let path = self.selector.select().to_string();
            let url = format!("{}{}", self.config.base_url, path);
            let started = Instant::now();

            // One attempt per iteration; the unreliable endpoint's failures
            // are signal, not something to retry away.
            let result = match self.client.get(&url).send() {
                Ok(response) => RequestResult::completed(
                    path,
                    self.id,
                    sequence,
                    response.status().as_u16(),
                    started.elapsed(),
                ),
                Err(err) => RequestResult::transport_failure(
                    path,
                    self.id,
                    sequence,
                    started.elapsed(),
                    err.to_string(),
                ),
            };
            sequence += 1;

            tracing::debug!(
                worker = self.id,
                endpoint = %result.endpoint,
                status = result.status,
                duration_ms = result.duration.as_millis() as u64,
                "request finished"
            );

            if self.results.send(result).is_err() {
                // Aggregator is gone; nothing left to report to
                break;
            }

            if self.should_stop(deadline) {
                break;
            }
            if self.stop.sleep(pacing) {
                break;
            }
        }

        tracing::debug!(worker = self.id, requests = sequence, "worker finished");
    }

    fn should_stop(&self, deadline: Option<Instant>) -> bool {
        if self.stop.is_triggered() {
            return true;
        }
        deadline.is_some_and(|d| Instant::now() >= d)
    }
}
