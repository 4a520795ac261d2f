// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the gravitational-wave injection generator

use anyhow::Result;
use clap::Parser;
use gw_injection::campaign::generate_segment;
use gw_injection::config::Config;
use std::fs::File;
use std::path::PathBuf;

/// Generate synthetic gravitational-wave injections for one segment
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (YAML); a default is created if missing
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Directory to write the waveform and rejected-parameter files to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Base random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// File to direct log output to instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at DEBUG verbosity
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    if let Some(path) = log_file {
        let target = Box::new(File::create(path)?);
        builder.target(env_logger::Target::Pipe(target));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_file(&args.config)?;
    config.apply_args(args.output_dir, args.seed, args.verbose, args.log_file);
    init_logging(config.output.verbose, config.output.log_file.as_ref())?;

    let (waveform_file, rejected_file) = generate_segment(&config)?;

    println!("{}", waveform_file.display());
    println!("{}", rejected_file.display());
    Ok(())
}
