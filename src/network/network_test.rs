// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use super::geometry::detectors_by_name;
use super::psd::{welch_psd, BackgroundFile};
use super::snr::{network_snr, project};
use crate::priors::{CbcPrior, ParameterPrior};
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::f64::consts::PI;

#[test]
fn test_unknown_ifo_is_rejected() {
    let err = detectors_by_name(&["H1".to_string(), "K2".to_string()]);
    assert!(err.is_err());
}

#[test]
fn test_antenna_pattern_bounds() {
    let detectors = detectors_by_name(&["H1".to_string(), "L1".to_string(), "V1".to_string()])
        .unwrap();
    for detector in &detectors {
        for i in 0..12 {
            for j in 0..6 {
                let ra = 2.0 * PI * i as f64 / 12.0;
                let dec = -PI / 2.0 + PI * (j as f64 + 0.5) / 6.0;
                let (fp, fc) = detector.antenna_pattern(ra, dec, 0.3, 0.0);
                assert!(fp.abs() <= 1.0 + 1e-12);
                assert!(fc.abs() <= 1.0 + 1e-12);
            }
        }
    }
}

#[test]
fn test_geocenter_delay_within_light_travel_time() {
    // no point on Earth is more than one Earth radius from the geocenter
    let max_delay = 6.5e6 / super::geometry::C_M_PER_S;
    let detectors = detectors_by_name(&["H1".to_string(), "L1".to_string()]).unwrap();
    let mut different = false;
    for i in 0..16 {
        let ra = 2.0 * PI * i as f64 / 16.0;
        let dec = 0.4;
        let d0 = detectors[0].geocenter_delay(ra, dec, 0.0);
        let d1 = detectors[1].geocenter_delay(ra, dec, 0.0);
        assert!(d0.abs() <= max_delay);
        assert!(d1.abs() <= max_delay);
        if (d0 - d1).abs() > 1e-4 {
            different = true;
        }
    }
    assert!(different, "H1 and L1 delays never differ");
}

#[test]
fn test_welch_psd_of_white_noise_is_flat() {
    // uniform white noise in [-1, 1]: variance 1/3, one-sided level 2/(3 fs)
    let sample_rate = 1024.0;
    let mut rng = StdRng::seed_from_u64(99);
    let data: Vec<f64> = (0..1 << 16).map(|_| rng.random_range(-1.0..1.0)).collect();

    let psd = welch_psd(&data, sample_rate, 2.0).unwrap();
    assert_eq!(psd.len(), 512 / 2 + 1);

    let expected = 2.0 / (3.0 * sample_rate);
    let mid = &psd[10..psd.len() - 10];
    let mean: f64 = mid.iter().sum::<f64>() / mid.len() as f64;
    assert!(
        (mean / expected - 1.0).abs() < 0.1,
        "white-noise PSD level {} vs expected {}",
        mean,
        expected
    );
}

#[test]
fn test_welch_psd_rejects_short_data() {
    assert!(welch_psd(&[0.0; 100], 1024.0, 2.0).is_err());
}

#[test]
fn test_network_snr_of_sinusoid_matches_analytic_value() {
    // rho = A * sqrt(T / S0) for a sinusoid at a bin center in flat noise
    let sample_rate = 1024.0;
    let duration = 4.0;
    let size = (sample_rate * duration) as usize;
    let amplitude = 3.0e-3;
    let f0 = 64.0; // exactly bin 256

    let mut projected = Array3::<f64>::zeros((1, 1, size));
    for t in 0..size {
        projected[[0, 0, t]] =
            amplitude * (2.0 * PI * f0 * t as f64 / sample_rate).sin();
    }

    let s0 = 1.0e-6;
    let detectors = detectors_by_name(&["H1".to_string()]).unwrap();
    let mut psds = BTreeMap::new();
    psds.insert("H1".to_string(), vec![s0; size / 2 + 1]);

    let snrs = network_snr(&projected, &psds, &detectors, sample_rate, 20.0).unwrap();
    let expected = amplitude * (duration / s0).sqrt();
    assert!(
        (snrs[0] / expected - 1.0).abs() < 0.01,
        "snr {} vs expected {}",
        snrs[0],
        expected
    );

    // a highpass above the signal frequency removes all the SNR
    let silent = network_snr(&projected, &psds, &detectors, sample_rate, 128.0).unwrap();
    assert!(silent[0] < expected * 1e-6);
}

#[test]
fn test_projection_shape_and_energy() {
    let mut prior = CbcPrior::new(5);
    let batch = prior.sample(2);
    let size = 2048;
    let mut signals = Array3::<f64>::zeros((2, 2, size));
    for i in 0..2 {
        for t in 0..size {
            signals[[i, 1, t]] = (2.0 * PI * 50.0 * t as f64 / 2048.0).sin();
        }
    }

    let detectors = detectors_by_name(&["H1".to_string(), "L1".to_string()]).unwrap();
    let projected = project(&signals, &batch, &detectors, 2048.0);
    assert_eq!(projected.shape(), &[2, 2, size]);

    // the circular shift must preserve signal energy
    for i in 0..2 {
        for j in 0..2 {
            let (fp, _) = detectors[j].antenna_pattern(batch.ra[i], batch.dec[i], batch.psi[i], 0.0);
            let in_energy: f64 = (0..size).map(|t| signals[[i, 1, t]].powi(2)).sum();
            let out_energy: f64 = (0..size).map(|t| projected[[i, j, t]].powi(2)).sum();
            assert!(
                (out_energy - fp * fp * in_energy).abs() < 1e-9 * in_energy.max(1.0),
                "energy not preserved through projection"
            );
        }
    }
}

#[test]
fn test_background_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("background-0.bin");

    let mut strain = BTreeMap::new();
    strain.insert("H1".to_string(), vec![1.0e-21; 4096]);
    let file = BackgroundFile {
        sample_rate: 2048.0,
        strain,
    };
    file.write(&path).unwrap();

    let loaded = BackgroundFile::read(&path).unwrap();
    assert_eq!(loaded.sample_rate, 2048.0);
    assert_eq!(loaded.strain["H1"].len(), 4096);
}
