//! Gravitational-wave injection generation library
//!
//! This library generates synthetic gravitational-wave signal injections
//! over a fixed time segment, projects them onto a detector network,
//! filters them by network signal-to-noise ratio, and persists the
//! accepted and rejected parameter sets to disk.

pub mod campaign;
pub mod config;
pub mod ledger;
pub mod network;
pub mod priors;
pub mod schedule;
pub mod waveforms;
pub mod writer;

// Re-exports for easier access
pub use campaign::{accumulate, generate_segment, CampaignError};
pub use config::Config;
pub use ledger::{InjectionParameterSet, ResponseSet};
pub use priors::{CbcPrior, ParameterBatch, ParameterPrior};
pub use waveforms::{Approximant, WaveformGenerator};
