use anyhow::Result;
use gw_injection::config::Config;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_config_load_and_save() -> Result<()> {
    // Create a temporary directory
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    // Create a custom config
    let mut config = Config::default();
    config.segment.start = 1_000_000.0;
    config.segment.stop = 1_004_096.0;
    config.segment.ifos = vec!["H1".to_string(), "L1".to_string(), "V1".to_string()];
    config.segment.shifts = vec![0.0, 1.0, 2.0];
    config.injection.snr_threshold = 6.0;
    config.background_dir = PathBuf::from("data/background");

    // Save config to file
    config.save_to_file(&config_path)?;

    // Load config from file
    let loaded_config = Config::from_file(&config_path)?;

    // Verify loaded config matches original
    assert_eq!(loaded_config.segment.start, 1_000_000.0);
    assert_eq!(loaded_config.segment.ifos.len(), 3);
    assert_eq!(loaded_config.segment.shifts, vec![0.0, 1.0, 2.0]);
    assert_eq!(loaded_config.injection.snr_threshold, 6.0);
    assert_eq!(loaded_config.background_dir, PathBuf::from("data/background"));
    assert_eq!(loaded_config.injection.max_iterations, None);

    // Test loading default config for non-existent file
    let non_existent_path = temp_dir.path().join("non_existent.yaml");
    let default_config = Config::from_file(&non_existent_path)?;

    // Verify default config was created
    assert!(non_existent_path.exists());
    assert_eq!(default_config.waveform.sample_rate, 2048.0);
    assert_eq!(default_config.injection.snr_threshold, 4.0);
    assert_eq!(default_config.segment.ifos, vec!["H1", "L1"]);

    // Test apply_args method
    let mut config = Config::default();
    assert_eq!(config.seed, None);
    assert!(!config.output.verbose);

    // Apply command-line arguments
    config.apply_args(
        Some(PathBuf::from("out/run-7")),
        Some(4321),
        true,
        Some(PathBuf::from("run.log")),
    );

    // Verify values were overridden
    assert_eq!(config.output.output_dir, PathBuf::from("out/run-7"));
    assert_eq!(config.seed, Some(4321));
    assert!(config.output.verbose);
    assert_eq!(config.output.log_file, Some(PathBuf::from("run.log")));

    Ok(())
}

#[test]
fn test_config_validation() -> Result<()> {
    // Valid config
    let valid_config = Config::default();
    assert!(valid_config.validate().is_ok());

    // Segment that ends before it starts
    let mut inverted_segment = Config::default();
    inverted_segment.segment.start = 100.0;
    inverted_segment.segment.stop = 50.0;
    assert!(inverted_segment.validate().is_err());

    // One shift per interferometer is required
    let mut mismatched_shifts = Config::default();
    mismatched_shifts.segment.ifos = vec!["H1".to_string(), "L1".to_string()];
    mismatched_shifts.segment.shifts = vec![0.0];
    assert!(mismatched_shifts.validate().is_err());

    // No interferometers at all
    let mut no_ifos = Config::default();
    no_ifos.segment.ifos.clear();
    no_ifos.segment.shifts.clear();
    assert!(no_ifos.validate().is_err());

    // Highpass at or above Nyquist
    let mut highpass_too_high = Config::default();
    highpass_too_high.injection.highpass = highpass_too_high.waveform.sample_rate / 2.0;
    assert!(highpass_too_high.validate().is_err());

    // Negative SNR threshold
    let mut negative_threshold = Config::default();
    negative_threshold.injection.snr_threshold = -1.0;
    assert!(negative_threshold.validate().is_err());

    // Non-positive waveform duration
    let mut zero_duration = Config::default();
    zero_duration.waveform.duration = 0.0;
    assert!(zero_duration.validate().is_err());

    Ok(())
}

#[test]
fn test_from_file_rejects_invalid_config() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    let mut config = Config::default();
    config.segment.shifts = vec![0.0];
    config.save_to_file(&config_path)?;

    // save_to_file does not validate, from_file must
    assert!(Config::from_file(&config_path).is_err());
    Ok(())
}
