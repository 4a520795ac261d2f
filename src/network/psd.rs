// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Power-spectral-density estimation
//!
//! Loads background strain from disk and produces one Welch PSD estimate
//! per detector at the frequency resolution of the injection waveforms.

use crate::campaign::CampaignError;
use anyhow::{bail, Context, Result};
use log::info;
use rustfft::{num_complex::Complex64, FftPlanner};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk background strain file.
///
/// One contiguous stretch of strain per detector, all channels sampled at
/// the same rate. Serialized with bincode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundFile {
    /// Sample rate of every channel, in Hz
    pub sample_rate: f64,
    /// Strain time series keyed by detector prefix
    pub strain: BTreeMap<String, Vec<f64>>,
}

impl BackgroundFile {
    /// Read a background file from disk.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).with_context(|| {
            format!("Failed to read background file at {:?}", path.as_ref())
        })?;
        bincode::deserialize(&bytes).with_context(|| {
            format!("Failed to decode background file at {:?}", path.as_ref())
        })
    }

    /// Write a background file to disk.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self).context("Failed to encode background file")?;
        fs::write(path.as_ref(), bytes).with_context(|| {
            format!("Failed to write background file at {:?}", path.as_ref())
        })?;
        Ok(())
    }
}

/// Pick the background file to use for PSD estimation.
///
/// Takes the first file in the directory in sorted order. An empty
/// directory is fatal: no PSD can be computed and nothing downstream can
/// proceed.
pub fn load_background<P: AsRef<Path>>(background_dir: P) -> Result<(PathBuf, BackgroundFile)> {
    let dir = background_dir.as_ref();
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list background data directory {:?}", dir))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let Some(path) = entries.into_iter().next() else {
        return Err(CampaignError::EmptyBackgroundDir(dir.to_path_buf()).into());
    };
    info!("Using background file {:?} for psd calculation", path);
    let background = BackgroundFile::read(&path)?;
    Ok((path, background))
}

/// Welch PSD estimate of a strain time series.
///
/// Hann-windowed segments of `sample_rate / df` samples with 50% overlap,
/// averaged periodograms, one-sided normalization. Returns
/// `nperseg / 2 + 1` bins spaced `df` apart starting at DC.
pub fn welch_psd(data: &[f64], sample_rate: f64, df: f64) -> Result<Vec<f64>> {
    let nperseg = (sample_rate / df).round() as usize;
    if nperseg == 0 {
        bail!("PSD resolution {} Hz is too coarse for {} Hz data", df, sample_rate);
    }
    if data.len() < nperseg {
        bail!(
            "Background strain too short for PSD estimation: {} samples (need {})",
            data.len(),
            nperseg
        );
    }

    let window: Vec<f64> = (0..nperseg)
        .map(|i| {
            0.5 * (1.0
                - (2.0 * std::f64::consts::PI * i as f64 / (nperseg - 1) as f64).cos())
        })
        .collect();
    let window_power: f64 = window.iter().map(|w| w * w).sum();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(nperseg);

    let n_bins = nperseg / 2 + 1;
    let mut psd = vec![0.0; n_bins];
    let step = nperseg / 2;
    let mut n_segments = 0usize;

    let mut start = 0;
    while start + nperseg <= data.len() {
        let mut buffer: Vec<Complex64> = data[start..start + nperseg]
            .iter()
            .zip(&window)
            .map(|(&x, &w)| Complex64::new(x * w, 0.0))
            .collect();
        fft.process(&mut buffer);

        for (bin, value) in buffer.iter().take(n_bins).enumerate() {
            // one-sided: double everything except DC and Nyquist
            let fold = if bin == 0 || bin == n_bins - 1 { 1.0 } else { 2.0 };
            psd[bin] += fold * value.norm_sqr() / (sample_rate * window_power);
        }
        n_segments += 1;
        start += step;
    }

    for value in &mut psd {
        *value /= n_segments as f64;
    }
    Ok(psd)
}

/// Compute one PSD per requested detector from a background file.
///
/// The background must contain a channel for every detector and must be
/// sampled at the waveform sample rate, so that the PSD bins line up with
/// the SNR integration bins without interpolation.
pub fn load_psds(
    background: &BackgroundFile,
    ifos: &[String],
    df: f64,
    sample_rate: f64,
) -> Result<BTreeMap<String, Vec<f64>>> {
    if (background.sample_rate - sample_rate).abs() > f64::EPSILON {
        bail!(
            "Background sample rate {} Hz does not match waveform sample rate {} Hz",
            background.sample_rate,
            sample_rate
        );
    }

    let mut psds = BTreeMap::new();
    for ifo in ifos {
        let strain = background
            .strain
            .get(ifo)
            .with_context(|| format!("Background file has no channel for {}", ifo))?;
        let psd = welch_psd(strain, sample_rate, df)
            .with_context(|| format!("PSD estimation failed for {}", ifo))?;
        psds.insert(ifo.clone(), psd);
    }
    Ok(psds)
}
