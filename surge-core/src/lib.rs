//! Surge core library
//!
//! This crate provides the load-generation engine behind the `surge` CLI:
//! weighted endpoint selection, paced request workers running on native
//! threads, and a coordinator that owns the run lifecycle (health probe,
//! worker fan-out, result aggregation, summary).

pub mod config;
pub mod coordinator;
pub mod error;
pub mod result;
pub mod seed;
pub mod select;
pub mod signal;
pub mod stats;
pub mod worker;

pub use config::{EndpointWeight, EndpointWeightTable, RunConfig};
pub use coordinator::LoadCoordinator;
pub use error::{Error, Result};
pub use result::RequestResult;
pub use select::EndpointSelector;
pub use signal::StopSignal;
pub use stats::{RunStats, RunSummary};
pub use worker::Worker;
