//! Named load scenarios
//!
//! Presets pair a target aggregate request rate with a worker count. An
//! unrecognized name substitutes `normal` with a warning rather than
//! failing the run.

/// One load scenario preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub name: &'static str,
    pub requests_per_second: f64,
    pub worker_count: usize,
}

const BASELINE: Scenario = Scenario { name: "baseline", requests_per_second: 5.0, worker_count: 3 };
const NORMAL: Scenario = Scenario { name: "normal", requests_per_second: 10.0, worker_count: 5 };
const HIGH: Scenario = Scenario { name: "high", requests_per_second: 20.0, worker_count: 10 };
const STRESS: Scenario = Scenario { name: "stress", requests_per_second: 50.0, worker_count: 20 };

/// All presets, mildest first
pub const SCENARIOS: &[Scenario] = &[BASELINE, NORMAL, HIGH, STRESS];

/// Look up a preset by name
///
/// Unknown names warn and fall back to `normal`; a bad scenario name is a
/// configuration warning, not a startup failure.
pub fn resolve(name: &str) -> Scenario {
    match SCENARIOS.iter().find(|s| s.name == name) {
        Some(scenario) => *scenario,
        None => {
            tracing::warn!(scenario = name, "unknown scenario, using 'normal'");
            NORMAL
        }
    }
}
