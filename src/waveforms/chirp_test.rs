// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use super::chirp::{self, ChirpSource, MSUN_SECONDS};
use super::{Approximant, WaveformGenerator};
use crate::priors::{ParameterPrior, CbcPrior};

fn test_source() -> ChirpSource {
    ChirpSource {
        mass_1: 36.0,
        mass_2: 29.0,
        distance: 400.0,
        phase: 0.0,
        inclination: 0.0,
    }
}

#[test]
fn test_waveform_is_silent_after_coalescence() {
    let source = test_source();
    let sample_rate = 2048.0;
    let size = 8 * 2048;
    let coalescence_index = size / 2;
    let (cross, plus) = chirp::synthesize(
        &source,
        Approximant::TaylorT0,
        sample_rate,
        size,
        coalescence_index,
        20.0,
        50.0,
    );

    for i in coalescence_index..size {
        assert_eq!(cross[i], 0.0);
        assert_eq!(plus[i], 0.0);
    }
    // and loud shortly before it
    let band: f64 = plus[coalescence_index - 256..coalescence_index]
        .iter()
        .map(|v| v.abs())
        .fold(0.0, f64::max);
    assert!(band > 0.0, "no signal in the late inspiral");
}

#[test]
fn test_waveform_onset_matches_minimum_frequency() {
    let source = test_source();
    let sample_rate = 2048.0;
    let size = 16 * 2048;
    let coalescence_index = size / 2;
    let minimum_frequency = 30.0;
    let (_, plus) = chirp::synthesize(
        &source,
        Approximant::TaylorT0,
        sample_rate,
        size,
        coalescence_index,
        minimum_frequency,
        50.0,
    );

    // leading-order prediction of the in-band duration
    let mc = (36.0f64 * 29.0).powf(0.6) / 65.0f64.powf(0.2) * MSUN_SECONDS;
    let tau = chirp::time_to_coalescence(mc, minimum_frequency);
    let onset = coalescence_index - (tau * sample_rate) as usize;

    // silence well before onset, signal shortly after
    for &v in &plus[..onset.saturating_sub(16)] {
        assert_eq!(v, 0.0);
    }
    let after: f64 = plus[onset..onset + 64].iter().map(|v| v.abs()).fold(0.0, f64::max);
    assert!(after > 0.0, "no signal after the predicted onset");
}

#[test]
fn test_face_on_cross_and_plus_have_equal_envelope() {
    // at zero inclination both polarizations carry the full amplitude,
    // ninety degrees out of phase
    let source = test_source();
    let (cross, plus) = chirp::synthesize(
        &source,
        Approximant::TaylorT2,
        2048.0,
        8 * 2048,
        4 * 2048,
        20.0,
        50.0,
    );
    let peak_cross = cross.iter().map(|v| v.abs()).fold(0.0, f64::max);
    let peak_plus = plus.iter().map(|v| v.abs()).fold(0.0, f64::max);
    assert!(peak_cross > 0.0);
    let ratio = peak_cross / peak_plus;
    assert!((ratio - 1.0).abs() < 0.05, "envelope ratio {}", ratio);
}

#[test]
fn test_amplitude_scales_inversely_with_distance() {
    let near = ChirpSource {
        distance: 200.0,
        ..test_source()
    };
    let far = ChirpSource {
        distance: 800.0,
        ..test_source()
    };
    let (_, plus_near) =
        chirp::synthesize(&near, Approximant::TaylorT0, 2048.0, 4096, 2048, 20.0, 50.0);
    let (_, plus_far) =
        chirp::synthesize(&far, Approximant::TaylorT0, 2048.0, 4096, 2048, 20.0, 50.0);

    let peak_near = plus_near.iter().map(|v| v.abs()).fold(0.0, f64::max);
    let peak_far = plus_far.iter().map(|v| v.abs()).fold(0.0, f64::max);
    let ratio = peak_near / peak_far;
    assert!((ratio - 4.0).abs() < 0.1, "distance scaling ratio {}", ratio);
}

#[test]
fn test_generator_output_shape() {
    let mut prior = CbcPrior::new(42);
    let batch = prior.sample(3);
    let generator = WaveformGenerator::new(8.0, 2048.0, 20.0, 50.0, Approximant::TaylorT0);
    let signals = generator.generate(&batch);
    assert_eq!(signals.shape(), &[3, 2, 8 * 2048]);
}

#[test]
fn test_generator_rejects_late_coalescence() {
    let generator = WaveformGenerator::new(8.0, 2048.0, 20.0, 50.0, Approximant::TaylorT0);
    assert!(generator.with_coalescence_time(9.0).is_err());
}

#[test]
fn test_approximant_parsing() {
    assert_eq!(
        "TaylorT2".parse::<Approximant>().unwrap(),
        Approximant::TaylorT2
    );
    assert!("IMRPhenomQ".parse::<Approximant>().is_err());
}
