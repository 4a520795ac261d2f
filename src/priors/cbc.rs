// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Compact-binary-coalescence prior
//!
//! A seeded sampler over the standard CBC parameter space: uniform component
//! masses, uniform spin magnitudes, isotropic sky location and orientation,
//! and a distance distribution uniform in Euclidean volume.

use super::{ParameterBatch, ParameterPrior};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Prior over compact-binary-coalescence source parameters.
///
/// Sampling is reproducible: two priors built with the same seed produce
/// identical draw sequences. Ranges can be adjusted with the builder
/// methods; defaults cover stellar-mass binary black holes.
pub struct CbcPrior {
    rng: StdRng,
    mass_range: (f64, f64),
    spin_max: f64,
    redshift_max: f64,
    distance_max: f64,
}

impl CbcPrior {
    /// Create a new prior seeded with the given value.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            mass_range: (5.0, 100.0),
            spin_max: 0.99,
            redshift_max: 1.0,
            distance_max: 3000.0,
        }
    }

    /// Set the component mass range in solar masses.
    pub fn with_mass_range(mut self, low: f64, high: f64) -> Self {
        assert!(low > 0.0 && high > low, "invalid mass range");
        self.mass_range = (low, high);
        self
    }

    /// Set the maximum luminosity distance in Mpc.
    pub fn with_distance_max(mut self, distance_max: f64) -> Self {
        assert!(distance_max > 0.0, "invalid maximum distance");
        self.distance_max = distance_max;
        self
    }
}

impl ParameterPrior for CbcPrior {
    fn sample(&mut self, k: usize) -> ParameterBatch {
        let mut batch = ParameterBatch {
            extras: BTreeMap::new(),
            ..Default::default()
        };

        let (m_lo, m_hi) = self.mass_range;
        for _ in 0..k {
            let ma = self.rng.random_range(m_lo..m_hi);
            let mb = self.rng.random_range(m_lo..m_hi);
            // convention: mass_1 is the heavier component
            batch.mass_1.push(ma.max(mb));
            batch.mass_2.push(ma.min(mb));

            batch.a_1.push(self.rng.random_range(0.0..self.spin_max));
            batch.a_2.push(self.rng.random_range(0.0..self.spin_max));

            batch
                .redshift
                .push(self.rng.random_range(0.0..self.redshift_max));
            // uniform in Euclidean volume: p(d) proportional to d^2
            let u: f64 = self.rng.random_range(0.0..1.0f64);
            batch.distance.push(self.distance_max * u.cbrt());

            batch.ra.push(self.rng.random_range(0.0..2.0 * PI));
            let v: f64 = self.rng.random_range(-1.0..1.0f64);
            batch.dec.push(v.asin());
            batch.psi.push(self.rng.random_range(0.0..PI));
            batch.phase.push(self.rng.random_range(0.0..2.0 * PI));
            let w: f64 = self.rng.random_range(-1.0..1.0f64);
            batch.inclination.push(w.acos());
        }

        batch
    }

    fn detector_frame(&self) -> bool {
        // masses are sampled in the source frame
        false
    }
}
