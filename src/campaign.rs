// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Injection campaign orchestration
//!
//! The rejection-sampling accumulation loop at the heart of the generator,
//! and the segment-level orchestration around it: seeding, scheduling, PSD
//! preparation, and persistence of the accepted and rejected ledgers.
//!
//! The loop draws exactly as many candidates as accepted rows are still
//! missing, evaluates their network SNR, partitions by the threshold, and
//! writes accepted rows into preallocated storage at a monotonically
//! advancing offset. It terminates exactly when the accepted storage is
//! full. Acceptance rates can be arbitrarily low; by default the loop
//! retries forever, which is the intended semantics for astrophysical
//! priors. An optional iteration cap turns a runaway campaign into a typed
//! error instead.

use crate::config::Config;
use crate::ledger::{InjectionParameterSet, ResponseSet};
use crate::network::geometry::Detector;
use crate::network::{detectors_by_name, load_background, load_psds, network_snr, project};
use crate::priors::{CbcPrior, ParameterPrior};
use crate::schedule::injection_times;
use crate::waveforms::WaveformGenerator;
use crate::writer::write_ledger;
use anyhow::{bail, Result};
use log::{debug, info};
use ndarray::{Array3, Axis};
use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure taxonomy of an injection campaign.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// No background strain is available, so no PSD can be computed.
    /// Raised before any sampling occurs.
    #[error("No files in background data directory {0:?}")]
    EmptyBackgroundDir(PathBuf),

    /// The optional safety cap on accumulation iterations was reached
    /// before the accepted storage filled up.
    #[error(
        "Accumulation hit the iteration cap of {cap} with {remaining} of {target} rows unfilled"
    )]
    IterationCapExceeded {
        cap: u64,
        target: usize,
        remaining: usize,
    },
}

/// Run the rejection-sampling accumulation loop.
///
/// Fills `response` with exactly `response.n_samples()` accepted rows
/// (network SNR at or above `snr_threshold`) and returns the rejected
/// parameter set together with the total number of candidates drawn.
///
/// Guarantees, independent of the acceptance rate:
/// * rows are written once each, in increasing offset order, never past
///   the preallocated bound;
/// * within an iteration, accepted rows keep their draw order;
/// * every candidate lands in exactly one of the two ledgers, including
///   the candidates of iterations that accept nothing.
#[allow(clippy::too_many_arguments)]
pub fn accumulate(
    prior: &mut dyn ParameterPrior,
    generator: &WaveformGenerator,
    detectors: &[Detector],
    psds: &BTreeMap<String, Vec<f64>>,
    highpass: f64,
    snr_threshold: f64,
    response: &mut ResponseSet,
    max_iterations: Option<u64>,
) -> Result<(InjectionParameterSet, u64)> {
    let n_samples = response.n_samples();
    let sample_rate = generator.sample_rate();

    let mut remaining = n_samples;
    let mut offset = 0usize;
    let mut total_drawn = 0u64;
    let mut iterations = 0u64;
    let mut rejected = InjectionParameterSet::default();

    while remaining > 0 {
        if let Some(cap) = max_iterations {
            if iterations >= cap {
                return Err(CampaignError::IterationCapExceeded {
                    cap,
                    target: n_samples,
                    remaining,
                }
                .into());
            }
        }
        iterations += 1;

        // draw exactly the remaining deficit, never more
        let mut params = prior.sample(remaining);
        if params.len() != remaining {
            bail!(
                "Prior returned {} draws, requested {}",
                params.len(),
                remaining
            );
        }
        if !prior.detector_frame() {
            params.to_detector_frame();
        }
        // single-sample draws can pick up derived fields from conversion
        // side effects; the declared schema is the source of truth
        if remaining == 1 {
            params.restrict_to_schema();
        }

        let signals = generator.generate(&params);
        let projected = project(&signals, &params, detectors, sample_rate);
        params.snr = network_snr(&projected, psds, detectors, sample_rate, highpass)?;
        total_drawn += params.len() as u64;

        let mask: Vec<bool> = params.snr.iter().map(|&s| s >= snr_threshold).collect();

        // rejects are recorded first, even when the whole batch is rejected
        let below = params.select(&mask, false);
        rejected.append(InjectionParameterSet::from_batch(&below)?);

        let num_accepted = mask.iter().filter(|&&m| m).count();
        if num_accepted == 0 {
            debug!(
                "Iteration {} accepted nothing ({} rejected), retrying",
                iterations, remaining
            );
            continue;
        }

        let accepted = params.select(&mask, true);
        let accepted_rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|(_, &m)| m)
            .map(|(i, _)| i)
            .collect();
        let accepted_strain = projected.select(Axis(0), &accepted_rows);
        response.write_rows(offset, &accepted, &accepted_strain)?;

        // subtracting exactly the accepted count prevents both overshoot
        // and undershoot of the preallocated storage
        offset += num_accepted;
        remaining -= num_accepted;
        debug!(
            "Iteration {}: accepted {}, {} rows remaining",
            iterations, num_accepted, remaining
        );
    }

    info!(
        "Accumulated {} injections from {} candidates over {} iterations",
        n_samples, total_drawn, iterations
    );
    Ok((rejected, total_drawn))
}

/// Derive a per-worker RNG seed from the segment identity.
///
/// Mixing the segment boundaries and the time slides into the seed keeps
/// concurrent segment workers decorrelated even when launched with the
/// same base seed.
pub fn derive_worker_seed(start: f64, stop: f64, shifts: &[f64], seed: Option<u64>) -> u64 {
    let mut hasher = DefaultHasher::new();
    start.to_bits().hash(&mut hasher);
    stop.to_bits().hash(&mut hasher);
    for shift in shifts {
        shift.to_bits().hash(&mut hasher);
    }
    match seed {
        Some(seed) => seed.hash(&mut hasher),
        None => rand::random::<u64>().hash(&mut hasher),
    }
    hasher.finish()
}

/// Generate the injections for a single segment and persist them.
///
/// Returns the paths of the accepted-waveform file and the
/// rejected-parameter file. Setup errors (invalid configuration, missing
/// background data) abort before anything is written; there is no
/// partial-success mode.
pub fn generate_segment(config: &Config) -> Result<(PathBuf, PathBuf)> {
    config.validate()?;

    let segment = &config.segment;
    let waveform = &config.waveform;
    let injection = &config.injection;

    let seed = derive_worker_seed(segment.start, segment.stop, &segment.shifts, config.seed);
    let max_shift = segment.shifts.iter().cloned().fold(0.0, f64::max);
    let times = injection_times(
        segment.start,
        segment.stop - max_shift,
        injection.spacing,
        injection.buffer,
        waveform.duration,
    );
    info!(
        "Scheduled {} injections in segment [{}, {})",
        times.len(),
        segment.start,
        segment.stop
    );

    let detectors = detectors_by_name(&segment.ifos)?;
    // fatal before any sampling: nothing downstream can proceed without PSDs
    let (_, background) = load_background(&config.background_dir)?;
    let df = 1.0 / waveform.duration;
    let psds = load_psds(&background, &segment.ifos, df, waveform.sample_rate)?;

    let approximant = waveform.approximant.parse()?;
    let generator = WaveformGenerator::new(
        waveform.duration,
        waveform.sample_rate,
        waveform.minimum_frequency,
        waveform.reference_frequency,
        approximant,
    );
    let mut prior = CbcPrior::new(seed);

    let mut response = ResponseSet::preallocate(
        times,
        &segment.shifts,
        &segment.ifos,
        generator.waveform_size(),
    );
    let (rejected, total_drawn) = accumulate(
        &mut prior,
        &generator,
        &detectors,
        &psds,
        injection.highpass,
        injection.snr_threshold,
        &mut response,
        injection.max_iterations,
    )?;
    response.finalize(waveform.sample_rate, waveform.duration, total_drawn);

    let output_dir: &Path = config.output.output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    let waveform_path = write_ledger(&response, &output_dir.join("waveforms.bin"))?;
    let rejected_path = write_ledger(&rejected, &output_dir.join("rejected-parameters.bin"))?;
    info!(
        "Wrote {} accepted and {} rejected parameter sets",
        response.n_samples(),
        rejected.len()
    );
    Ok((waveform_path, rejected_path))
}
