// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Time-domain inspiral chirp synthesis
//!
//! Post-Newtonian frequency and phase evolution of a quasi-circular
//! compact-binary inspiral, evaluated sample by sample up to the innermost
//! stable circular orbit. Everything is computed in geometrized units where
//! masses and distances carry dimensions of seconds.

use super::Approximant;

/// Geometrized solar mass, G * M_sun / c^3, in seconds.
pub const MSUN_SECONDS: f64 = 4.925490947641267e-6;

/// One megaparsec divided by the speed of light, in seconds.
pub const MPC_SECONDS: f64 = 1.0292712503e14;

/// The subset of source parameters the chirp model depends on.
///
/// Masses are detector-frame, in solar masses; distance is the luminosity
/// distance in Mpc.
pub struct ChirpSource {
    pub mass_1: f64,
    pub mass_2: f64,
    pub distance: f64,
    pub phase: f64,
    pub inclination: f64,
}

impl ChirpSource {
    /// Chirp mass in seconds.
    fn chirp_mass(&self) -> f64 {
        let m1 = self.mass_1;
        let m2 = self.mass_2;
        (m1 * m2).powf(0.6) / (m1 + m2).powf(0.2) * MSUN_SECONDS
    }

    /// Total mass in seconds.
    fn total_mass(&self) -> f64 {
        (self.mass_1 + self.mass_2) * MSUN_SECONDS
    }

    /// Symmetric mass ratio.
    fn eta(&self) -> f64 {
        let m = self.mass_1 + self.mass_2;
        self.mass_1 * self.mass_2 / (m * m)
    }

    /// Innermost-stable-circular-orbit gravitational-wave frequency in Hz.
    fn isco_frequency(&self) -> f64 {
        1.0 / (6.0f64.powf(1.5) * std::f64::consts::PI * self.total_mass())
    }
}

/// Time to coalescence at a given gravitational-wave frequency, in seconds.
///
/// Leading-order relation, used to anchor the phase at the reference
/// frequency and in tests to predict the in-band duration.
pub fn time_to_coalescence(chirp_mass_seconds: f64, frequency: f64) -> f64 {
    let pf = std::f64::consts::PI * frequency;
    5.0 / 256.0 * chirp_mass_seconds.powf(-5.0 / 3.0) * pf.powf(-8.0 / 3.0)
}

/// Instantaneous GW frequency and phase at time-to-coalescence `tau`.
///
/// `phi_c` is the phase at coalescence. The `TaylorT2` variant includes the
/// first post-Newtonian correction terms; `TaylorT0` is the leading-order
/// evolution.
fn frequency_and_phase(
    source: &ChirpSource,
    approximant: Approximant,
    tau: f64,
    phi_c: f64,
) -> (f64, f64) {
    let m = source.total_mass();
    let eta = source.eta();
    // dimensionless time variable of the post-Newtonian expansion
    let theta = eta * tau / (5.0 * m);
    let t38 = theta.powf(-3.0 / 8.0);
    let t58 = theta.powf(5.0 / 8.0);
    let t14 = theta.powf(-1.0 / 4.0);

    match approximant {
        Approximant::TaylorT0 => {
            let f = t38 / (8.0 * std::f64::consts::PI * m);
            let phi = phi_c - 2.0 / eta * t58;
            (f, phi)
        }
        Approximant::TaylorT2 => {
            let f_corr = 1.0 + (743.0 / 2688.0 + 11.0 * eta / 32.0) * t14;
            let phi_corr = 1.0 + (3715.0 / 8064.0 + 55.0 * eta / 96.0) * t14;
            let f = t38 / (8.0 * std::f64::consts::PI * m) * f_corr;
            let phi = phi_c - 2.0 / eta * t58 * phi_corr;
            (f, phi)
        }
    }
}

/// Synthesize one cross/plus polarization pair.
///
/// The waveform occupies samples `[0, coalescence_index)`; everything at and
/// after the coalescence index is zero (ringdown is not modeled), as are
/// samples where the instantaneous frequency is still below
/// `minimum_frequency` or already past the ISCO. The coalescence phase is
/// anchored so that the sampled `phase` parameter is realized at
/// `reference_frequency`.
pub fn synthesize(
    source: &ChirpSource,
    approximant: Approximant,
    sample_rate: f64,
    size: usize,
    coalescence_index: usize,
    minimum_frequency: f64,
    reference_frequency: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut cross = vec![0.0; size];
    let mut plus = vec![0.0; size];

    let mc = source.chirp_mass();
    let f_isco = source.isco_frequency();
    let distance_seconds = source.distance * MPC_SECONDS;

    // anchor the phase at the reference frequency
    let tau_ref = time_to_coalescence(mc, reference_frequency);
    let (_, phi_at_ref) = frequency_and_phase(source, approximant, tau_ref, 0.0);
    let phi_c = source.phase - phi_at_ref;

    let ci = source.inclination.cos();
    let plus_factor = (1.0 + ci * ci) / 2.0;

    let limit = coalescence_index.min(size);
    for i in 0..limit {
        let tau = (coalescence_index - i) as f64 / sample_rate;
        let (f, phi) = frequency_and_phase(source, approximant, tau, phi_c);
        if f < minimum_frequency {
            continue;
        }
        if f >= f_isco {
            break;
        }
        let amplitude = 4.0 / distance_seconds
            * mc.powf(5.0 / 3.0)
            * (std::f64::consts::PI * f).powf(2.0 / 3.0);
        plus[i] = amplitude * plus_factor * phi.cos();
        cross[i] = amplitude * ci * phi.sin();
    }

    (cross, plus)
}
