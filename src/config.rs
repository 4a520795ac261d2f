// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Configuration Management
//!
//! Configuration handling for the injection generator. Settings are loaded
//! from YAML files, validated with explicit rules, and can be overridden
//! from the command line.
//!
//! ## Configuration Structure
//!
//! The configuration is organized as nested sections:
//! - `segment`: the time segment and detector network to generate for
//! - `waveform`: waveform synthesis parameters
//! - `injection`: scheduling, thresholding and loop-safety parameters
//! - `output`: destination directory and logging
//!
//! ## Usage
//!
//! ```no_run
//! use gw_injection::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some("out/run-1".into()), // Output directory
//!     Some(1234),               // Random seed
//!     true,                     // Verbose logging
//!     None,                     // Log file
//! );
//! ```

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

/// The time segment to generate injections for and the detector network
/// observing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// GPS time of the beginning of the segment, in seconds
    pub start: f64,

    /// GPS time of the end of the segment, in seconds
    pub stop: f64,

    /// Interferometers to project onto, by prefix, e.g. "H1" for Hanford.
    /// Must be the same length as `shifts`.
    pub ifos: Vec<String>,

    /// Seconds by which each interferometer's timeseries is slid,
    /// one entry per interferometer
    pub shifts: Vec<f64>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            stop: 4096.0,
            ifos: vec!["H1".to_string(), "L1".to_string()],
            shifts: vec![0.0, 1.0],
        }
    }
}

/// Waveform synthesis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformConfig {
    /// Sample rate of the generated strain, in Hz
    pub sample_rate: f64,

    /// Duration of each waveform, in seconds
    pub duration: f64,

    /// Frequency below which no signal content is generated, in Hz
    pub minimum_frequency: f64,

    /// Frequency at which the coalescence phase is referenced, in Hz
    pub reference_frequency: f64,

    /// Name of the waveform approximant to use
    pub approximant: String,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            sample_rate: 2048.0,
            duration: 8.0,
            minimum_frequency: 20.0,
            reference_frequency: 50.0,
            approximant: "TaylorT2".to_string(),
        }
    }
}

/// Scheduling and acceptance parameters for the accumulation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionConfig {
    /// Seconds between the end of one signal and the start of the next
    pub spacing: f64,

    /// Seconds on either side of the segment within which no injection
    /// is placed
    pub buffer: f64,

    /// Highpass cutoff of the SNR integration, in Hz
    pub highpass: f64,

    /// Minimum network SNR of accepted injections. Candidates below this
    /// threshold are rejected but saved for later use.
    pub snr_threshold: f64,

    /// Optional cap on accumulation-loop iterations. Unset reproduces the
    /// unbounded-retry behavior: with a prior whose acceptance rate is
    /// near zero the loop runs until it succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u64>,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            spacing: 16.0,
            buffer: 8.0,
            highpass: 32.0,
            snr_threshold: 4.0,
            max_iterations: None,
        }
    }
}

/// Output destination and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the waveform file and rejected-parameter file are
    /// written into
    pub output_dir: PathBuf,

    /// Optional file the log output is directed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Log at DEBUG verbosity instead of INFO
    #[serde(default)]
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            log_file: None,
            verbose: false,
        }
    }
}

/// Root configuration for one injection-generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Segment and detector network settings.
    #[serde(default)]
    pub segment: SegmentConfig,

    /// Waveform synthesis settings.
    #[serde(default)]
    pub waveform: WaveformConfig,

    /// Scheduling and acceptance settings.
    #[serde(default)]
    pub injection: InjectionConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Directory containing background strain for PSD calculation
    pub background_dir: PathBuf,

    /// Base random seed; unset draws a fresh seed per run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            segment: SegmentConfig::default(),
            waveform: WaveformConfig::default(),
            injection: InjectionConfig::default(),
            output: OutputConfig::default(),
            background_dir: PathBuf::from("background"),
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// A missing file is not an error: a default configuration is written
    /// to the requested path and returned, so a first run leaves an
    /// editable template behind.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;
        let config: Config = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.exists() && !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory for config at {:?}", parent)
                })?;
            }
        }
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;
        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only values that are explicitly provided override the existing
    /// configuration.
    pub fn apply_args(
        &mut self,
        output_dir: Option<PathBuf>,
        seed: Option<u64>,
        verbose: bool,
        log_file: Option<PathBuf>,
    ) {
        if let Some(dir) = output_dir {
            debug!("Overriding output directory from command line: {:?}", dir);
            self.output.output_dir = dir;
        }
        if let Some(seed) = seed {
            debug!("Overriding seed from command line: {}", seed);
            self.seed = Some(seed);
        }
        if verbose {
            self.output.verbose = true;
        }
        if let Some(file) = log_file {
            debug!("Overriding log file from command line: {:?}", file);
            self.output.log_file = Some(file);
        }
    }

    /// Validate rules that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        debug!("Performing configuration validation checks");

        if self.segment.stop <= self.segment.start {
            anyhow::bail!(
                "Segment stop {} is not after start {}",
                self.segment.stop,
                self.segment.start
            );
        }
        if self.segment.ifos.is_empty() {
            anyhow::bail!("At least one interferometer must be configured");
        }
        if self.segment.shifts.len() != self.segment.ifos.len() {
            anyhow::bail!(
                "Got {} shifts for {} interferometers",
                self.segment.shifts.len(),
                self.segment.ifos.len()
            );
        }
        if self.waveform.sample_rate <= 0.0 {
            anyhow::bail!("Sample rate must be positive");
        }
        if self.waveform.duration <= 0.0 {
            anyhow::bail!("Waveform duration must be positive");
        }
        if self.waveform.minimum_frequency <= 0.0 {
            anyhow::bail!("Minimum frequency must be positive");
        }
        let nyquist = self.waveform.sample_rate / 2.0;
        if self.injection.highpass >= nyquist {
            anyhow::bail!(
                "Highpass frequency {} Hz is at or above Nyquist ({} Hz)",
                self.injection.highpass,
                nyquist
            );
        }
        if self.injection.snr_threshold < 0.0 {
            anyhow::bail!("SNR threshold cannot be negative");
        }
        if self.injection.spacing < 0.0 || self.injection.buffer < 0.0 {
            anyhow::bail!("Spacing and buffer must be non-negative");
        }
        Ok(())
    }
}
