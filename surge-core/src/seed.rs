//! Seed derivation for reproducible runs
//!
//! A single master seed (e.g. from `--seed`) fans out into independent
//! per-component seeds via SHA-256, so every worker's selector draws from
//! its own deterministic stream.

use sha2::{Digest, Sha256};

/// Derive a component-specific seed from a master seed
///
/// Same master + component always yields the same seed; different
/// components get independent, uniformly distributed seeds.
pub fn derive_seed(master_seed: u64, component: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(master_seed.to_be_bytes());
    hasher.update(component.as_bytes());
    let digest = hasher.finalize();

    u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

/// Component name for a worker's endpoint selector
pub fn worker_component(worker_id: usize) -> String {
    format!("worker-selector-{worker_id}")
}
