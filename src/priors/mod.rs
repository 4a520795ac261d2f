// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Source-parameter priors
//!
//! This module defines the fixed parameter schema shared by the sampling,
//! projection and ledger code, and the `ParameterPrior` seam behind which
//! concrete priors live. The schema is deliberately an explicit record type
//! rather than a keyed mapping: every physical field is a named column, and
//! anything a prior produces beyond the schema goes into `extras`, where it
//! can be stripped before the batch reaches the output ledgers.

pub mod cbc;

pub use cbc::CbcPrior;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A batch of source-parameter draws in struct-of-arrays form.
///
/// All columns have the same length (one entry per draw). The `snr` column
/// is zero-length until the detectability statistic has been evaluated for
/// the batch; the accumulation loop fills it before partitioning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterBatch {
    /// Primary component mass in solar masses
    pub mass_1: Vec<f64>,
    /// Secondary component mass in solar masses
    pub mass_2: Vec<f64>,
    /// Primary dimensionless spin magnitude
    pub a_1: Vec<f64>,
    /// Secondary dimensionless spin magnitude
    pub a_2: Vec<f64>,
    /// Cosmological redshift
    pub redshift: Vec<f64>,
    /// Luminosity distance in Mpc
    pub distance: Vec<f64>,
    /// Right ascension in radians
    pub ra: Vec<f64>,
    /// Declination in radians
    pub dec: Vec<f64>,
    /// Polarization angle in radians
    pub psi: Vec<f64>,
    /// Coalescence phase in radians
    pub phase: Vec<f64>,
    /// Inclination of the orbital plane in radians
    pub inclination: Vec<f64>,
    /// Network SNR, filled once the batch has been evaluated
    pub snr: Vec<f64>,
    /// Derived fields a prior implementation may attach beyond the schema
    pub extras: BTreeMap<String, Vec<f64>>,
}

impl ParameterBatch {
    /// Number of draws in the batch.
    pub fn len(&self) -> usize {
        self.mass_1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass_1.is_empty()
    }

    /// Drop every field that is not part of the declared schema.
    ///
    /// Schema fields are the source of truth: whatever derived keys a prior
    /// happens to attach (some do for single-sample draws) must not leak
    /// into the output ledgers.
    pub fn restrict_to_schema(&mut self) {
        self.extras.clear();
    }

    /// Convert source-frame masses to the detector frame in place.
    ///
    /// Detector-frame masses are redshifted: `m_det = m_src * (1 + z)`.
    pub fn to_detector_frame(&mut self) {
        for i in 0..self.len() {
            let scale = 1.0 + self.redshift[i];
            self.mass_1[i] *= scale;
            self.mass_2[i] *= scale;
        }
    }

    /// Select the rows for which `mask[i] == keep`, preserving draw order.
    ///
    /// The mask must be as long as the batch. Together with the inverted
    /// call this forms a total, disjoint partition of the batch.
    pub fn select(&self, mask: &[bool], keep: bool) -> ParameterBatch {
        assert_eq!(mask.len(), self.len(), "mask length mismatch");
        let pick = |col: &[f64]| -> Vec<f64> {
            col.iter()
                .zip(mask)
                .filter(|(_, &m)| m == keep)
                .map(|(&v, _)| v)
                .collect()
        };
        let snr = if self.snr.len() == self.len() {
            pick(&self.snr)
        } else {
            Vec::new()
        };
        ParameterBatch {
            mass_1: pick(&self.mass_1),
            mass_2: pick(&self.mass_2),
            a_1: pick(&self.a_1),
            a_2: pick(&self.a_2),
            redshift: pick(&self.redshift),
            distance: pick(&self.distance),
            ra: pick(&self.ra),
            dec: pick(&self.dec),
            psi: pick(&self.psi),
            phase: pick(&self.phase),
            inclination: pick(&self.inclination),
            snr,
            extras: self
                .extras
                .iter()
                .map(|(k, col)| (k.clone(), pick(col)))
                .collect(),
        }
    }
}

/// Seam behind which concrete source-parameter priors live.
///
/// `sample(k)` must return exactly `k` independent draws. Priors that
/// already sample masses in the detector frame report it through
/// `detector_frame`, in which case the accumulation loop skips the
/// source-to-detector conversion.
pub trait ParameterPrior: Send {
    /// Draw `k` independent parameter sets.
    fn sample(&mut self, k: usize) -> ParameterBatch;

    /// Whether the sampled masses are already in the detector frame.
    fn detector_frame(&self) -> bool {
        false
    }
}
