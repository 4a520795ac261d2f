// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Waveform generation
//!
//! Turns batches of source parameters into time-domain cross/plus
//! polarization waveforms of fixed duration and sample rate. The
//! coalescence is placed at the center of the window so that downstream
//! consumers can slice symmetric context around the merger.

pub mod chirp;

#[cfg(test)]
mod chirp_test;

use crate::priors::ParameterBatch;
use anyhow::{bail, Result};
use ndarray::Array3;
use std::str::FromStr;

/// Supported waveform approximants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approximant {
    /// Leading-order (Newtonian) chirp
    TaylorT0,
    /// Chirp with the first post-Newtonian phase and frequency corrections
    TaylorT2,
}

impl FromStr for Approximant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "TaylorT0" => Ok(Approximant::TaylorT0),
            "TaylorT2" => Ok(Approximant::TaylorT2),
            other => bail!("Unknown waveform approximant: {}", other),
        }
    }
}

/// Generator of time-domain polarization waveforms.
pub struct WaveformGenerator {
    waveform_duration: f64,
    sample_rate: f64,
    minimum_frequency: f64,
    reference_frequency: f64,
    approximant: Approximant,
    coalescence_time: f64,
}

impl WaveformGenerator {
    /// Create a new generator.
    ///
    /// The coalescence is placed at `waveform_duration / 2`; use
    /// [`with_coalescence_time`](Self::with_coalescence_time) to move it.
    pub fn new(
        waveform_duration: f64,
        sample_rate: f64,
        minimum_frequency: f64,
        reference_frequency: f64,
        approximant: Approximant,
    ) -> Self {
        Self {
            waveform_duration,
            sample_rate,
            minimum_frequency,
            reference_frequency,
            approximant,
            coalescence_time: waveform_duration / 2.0,
        }
    }

    /// Place the coalescence at a specific offset into the window.
    pub fn with_coalescence_time(mut self, coalescence_time: f64) -> Result<Self> {
        if coalescence_time > self.waveform_duration {
            bail!(
                "Cannot place coalescence at {} seconds because the waveform duration is {} seconds",
                coalescence_time,
                self.waveform_duration
            );
        }
        self.coalescence_time = coalescence_time;
        Ok(self)
    }

    /// Number of samples in each generated waveform.
    pub fn waveform_size(&self) -> usize {
        (self.sample_rate * self.waveform_duration) as usize
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn waveform_duration(&self) -> f64 {
        self.waveform_duration
    }

    /// Generate polarization waveforms for every draw in the batch.
    ///
    /// Parameters are expected in the detector frame. Returns an array of
    /// shape `(k, 2, waveform_size)`: index 0 of the middle axis is the
    /// cross polarization, index 1 the plus polarization.
    pub fn generate(&self, params: &ParameterBatch) -> Array3<f64> {
        let size = self.waveform_size();
        let k = params.len();
        let mut signals = Array3::<f64>::zeros((k, 2, size));

        let coalescence_index = (self.coalescence_time * self.sample_rate) as usize;
        for i in 0..k {
            let source = chirp::ChirpSource {
                mass_1: params.mass_1[i],
                mass_2: params.mass_2[i],
                distance: params.distance[i],
                phase: params.phase[i],
                inclination: params.inclination[i],
            };
            let (cross, plus) = chirp::synthesize(
                &source,
                self.approximant,
                self.sample_rate,
                size,
                coalescence_index,
                self.minimum_frequency,
                self.reference_frequency,
            );
            for (j, v) in cross.into_iter().enumerate() {
                signals[[i, 0, j]] = v;
            }
            for (j, v) in plus.into_iter().enumerate() {
                signals[[i, 1, j]] = v;
            }
        }

        signals
    }
}
