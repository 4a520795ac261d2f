// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Detector network response
//!
//! Detector geometry and antenna patterns, power-spectral-density
//! estimation from background strain, and projection of polarization
//! waveforms into per-detector strain with its network SNR statistic.

pub mod geometry;
pub mod psd;
pub mod snr;

#[cfg(test)]
mod network_test;

pub use geometry::{detectors_by_name, Detector};
pub use psd::{load_background, load_psds, BackgroundFile};
pub use snr::{network_snr, project};
