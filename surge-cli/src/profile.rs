//! TOML profile support
//!
//! Profiles capture a full run definition in one file for reproducibility;
//! CLI flags override individual values. Every field has a default, so an
//! empty profile (or none at all) reproduces the stock demo run.

use anyhow::{bail, Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use surge_core::EndpointWeight;

/// Top-level profile configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct LoadProfile {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub load: LoadConfig,
    /// Endpoint weight table; the built-in demo mix when omitted
    #[serde(default)]
    pub endpoints: Vec<EndpointWeight>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target service configuration
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TargetConfig {
    /// Base URL of the service under load
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self { base_url: default_base_url() }
    }
}

fn default_base_url() -> String {
    "http://localhost:3010".to_string()
}

/// Load shape configuration
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct LoadConfig {
    /// Scenario preset: baseline, normal, high, stress
    #[serde(default = "default_scenario")]
    pub scenario: String,
    /// Target aggregate rate, overriding the scenario preset
    #[serde(default)]
    pub requests_per_second: Option<f64>,
    /// Worker count, overriding the scenario preset
    #[serde(default)]
    pub workers: Option<usize>,
    /// Run duration
    #[serde(with = "humantime_serde", default = "default_duration")]
    #[schemars(with = "String")]
    pub duration: Duration,
    /// Fixed per-worker delay between requests, overriding derived pacing
    #[serde(with = "humantime_serde", default)]
    #[schemars(with = "Option<String>")]
    pub worker_delay: Option<Duration>,
    /// Per-request timeout
    #[serde(with = "humantime_serde", default = "default_timeout")]
    #[schemars(with = "String")]
    pub request_timeout: Duration,
    /// Master seed for reproducible endpoint selection
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            scenario: default_scenario(),
            requests_per_second: None,
            workers: None,
            duration: default_duration(),
            worker_delay: None,
            request_timeout: default_timeout(),
            seed: None,
        }
    }
}

fn default_scenario() -> String {
    "normal".to_string()
}

fn default_duration() -> Duration {
    Duration::from_secs(60)
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct OutputConfig {
    /// Optional JSON results file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoadProfile {
    /// Load and validate a profile from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile: {}", path.display()))?;

        let profile: LoadProfile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse profile: {}", path.display()))?;

        profile.validate()?;
        Ok(profile)
    }

    /// Validate profile values
    ///
    /// Endpoint weights are validated again by the core table constructor;
    /// the checks here exist to fail with the profile's field names.
    pub fn validate(&self) -> Result<()> {
        if self.target.base_url.is_empty() {
            bail!("target.base_url cannot be empty");
        }
        if self.load.duration.is_zero() {
            bail!("load.duration must be > 0");
        }
        if let Some(rate) = self.load.requests_per_second {
            if !rate.is_finite() || rate <= 0.0 {
                bail!("load.requests_per_second must be > 0, got {rate}");
            }
        }
        if let Some(workers) = self.load.workers {
            if workers < 1 {
                bail!("load.workers must be >= 1");
            }
        }
        for endpoint in &self.endpoints {
            if endpoint.path.is_empty() {
                bail!("endpoints entries need a non-empty path");
            }
            if !endpoint.weight.is_finite() || endpoint.weight <= 0.0 || endpoint.weight > 1.0 {
                bail!("weight for '{}' must be in (0, 1]", endpoint.path);
            }
        }
        Ok(())
    }
}
