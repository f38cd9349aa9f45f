//! Results output formatting

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use surge_core::RunSummary;

/// Load run results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub scenario: String,
    pub target: String,
    pub duration_secs: f64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub success_rate_pct: f64,
    pub average_duration_ms: f64,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    pub throughput_rps: f64,
    /// Request counts by status code (0 = transport error)
    pub by_status: BTreeMap<u16, u64>,
    /// Request counts by endpoint path
    pub by_endpoint: BTreeMap<String, u64>,
}

impl RunReport {
    /// Create a report from a run summary
    pub fn from_summary(scenario: &str, target: &str, summary: &RunSummary) -> Self {
        let stats = &summary.stats;
        Self {
            scenario: scenario.to_string(),
            target: target.to_string(),
            duration_secs: summary.elapsed.as_secs_f64(),
            total_requests: stats.total(),
            successful_requests: stats.successes(),
            failed_requests: stats.failures(),
            success_rate_pct: stats.success_rate() * 100.0,
            average_duration_ms: stats.average_duration().as_secs_f64() * 1000.0,
            min_duration_ms: stats
                .min_duration()
                .map_or(0.0, |d| d.as_secs_f64() * 1000.0),
            max_duration_ms: stats
                .max_duration()
                .map_or(0.0, |d| d.as_secs_f64() * 1000.0),
            throughput_rps: summary.throughput_rps(),
            by_status: stats.by_status().clone(),
            by_endpoint: stats.by_endpoint().clone(),
        }
    }

    /// Print results to stdout in human-readable form
    pub fn print_human(&self) {
        println!("\n{}", "=".repeat(60));
        println!("Surge Load Test Results");
        println!("{}", "=".repeat(60));
        println!();
        println!("Configuration:");
        println!("  Scenario:        {}", self.scenario);
        println!("  Target:          {}", self.target);
        println!("  Duration:        {:.2}s", self.duration_secs);
        println!();
        println!("Requests:");
        println!("  Total:           {}", self.total_requests);
        println!("  Successful:      {}", self.successful_requests);
        println!("  Failed:          {}", self.failed_requests);
        println!("  Success rate:    {:.2}%", self.success_rate_pct);
        println!("  Throughput:      {:.2} req/s", self.throughput_rps);
        println!();
        println!("Latency (milliseconds):");
        println!("  Average:         {:.2} ms", self.average_duration_ms);
        println!("  Min:             {:.2} ms", self.min_duration_ms);
        println!("  Max:             {:.2} ms", self.max_duration_ms);
        if !self.by_status.is_empty() {
            println!();
            println!("Status codes:");
            for (status, count) in &self.by_status {
                if *status == 0 {
                    println!("  transport error: {count}");
                } else {
                    println!("  {status}: {count}");
                }
            }
        }
        if !self.by_endpoint.is_empty() {
            println!();
            println!("Endpoints:");
            for (endpoint, count) in &self.by_endpoint {
                println!("  {endpoint}: {count}");
            }
        }
        println!();
        println!("{}", "=".repeat(60));
    }

    /// Write results to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
