//! Weighted endpoint selection
//!
//! Each worker owns its own selector, so concurrent draws never share RNG
//! state and cannot bias the distribution.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::EndpointWeightTable;

/// Weighted random draw over an endpoint table
///
/// Selection is total: every call returns a path from the table. The
/// cumulative walk normalizes weights, and the table's fallback entry
/// covers the floating-point boundary case where the final cumulative sum
/// lands fractionally below the drawn value.
pub struct EndpointSelector {
    paths: Vec<String>,
    /// Normalized cumulative weights; the last entry is 1.0 up to rounding
    cumulative: Vec<f64>,
    rng: SmallRng,
}

impl EndpointSelector {
    /// Create a selector with an entropy-based seed
    pub fn new(table: &EndpointWeightTable) -> Self {
        Self::with_seed(table, None)
    }

    /// Create a selector with an explicit seed for reproducibility
    pub fn with_seed(table: &EndpointWeightTable, seed: Option<u64>) -> Self {
        let total: f64 = table.entries().iter().map(|e| e.weight).sum();
        let mut cumulative = Vec::with_capacity(table.len());
        let mut running = 0.0;
        for entry in table.entries() {
            running += entry.weight / total;
            cumulative.push(running);
        }
        let paths = table.entries().iter().map(|e| e.path.clone()).collect();
        let rng = match seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_os_rng(),
        };
        Self { paths, cumulative, rng }
    }

    /// Draw the next endpoint path
    pub fn select(&mut self) -> &str {
        let r: f64 = self.rng.random();
        &self.paths[self.index_for(r)]
    }

    /// First entry whose cumulative sum reaches `r`, falling back to the
    /// first entry when rounding exhausts the walk
    fn index_for(&self, r: f64) -> usize {
        self.cumulative.iter().position(|&c| c >= r).unwrap_or(0)
    }
}
