// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Ledger persistence
//!
//! Blocking, retry-safe writes of parameter ledgers. The serialized bytes
//! go to a temporary file in the destination directory first and are
//! renamed over the final path, so a failure mid-write never corrupts a
//! previously written file.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;

/// How often a failed write is retried before giving up.
const WRITE_ATTEMPTS: u32 = 5;

/// Pause between write attempts.
const RETRY_DELAY: Duration = Duration::from_millis(200);

/// Serialize a ledger and write it atomically to `path`.
///
/// Returns the final path. Transient I/O failures are retried a bounded
/// number of times with a short pause; the last error is propagated if
/// every attempt fails.
pub fn write_ledger<T: Serialize>(ledger: &T, path: &Path) -> Result<PathBuf> {
    let bytes = bincode::serialize(ledger)
        .with_context(|| format!("Failed to encode ledger for {:?}", path))?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));

    let mut attempt = 0;
    loop {
        attempt += 1;
        match write_atomic(&bytes, dir, path) {
            Ok(()) => {
                debug!("Wrote {} bytes to {:?}", bytes.len(), path);
                return Ok(path.to_path_buf());
            }
            Err(err) if attempt < WRITE_ATTEMPTS => {
                warn!(
                    "Write attempt {} of {} for {:?} failed: {}",
                    attempt, WRITE_ATTEMPTS, path, err
                );
                thread::sleep(RETRY_DELAY);
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to write ledger to {:?}", path));
            }
        }
    }
}

fn write_atomic(bytes: &[u8], dir: &Path, path: &Path) -> Result<()> {
    // temp file in the same directory so the rename stays on one filesystem
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InjectionParameterSet;
    use std::fs;

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rejected-parameters.bin");

        let mut set = InjectionParameterSet::default();
        set.mass_1.push(30.0);
        set.mass_2.push(25.0);
        set.a_1.push(0.1);
        set.a_2.push(0.2);
        set.redshift.push(0.3);
        set.distance.push(500.0);
        set.ra.push(1.0);
        set.dec.push(0.5);
        set.psi.push(0.2);
        set.phase.push(0.9);
        set.inclination.push(1.5);
        set.snr.push(3.5);

        let written = write_ledger(&set, &path).unwrap();
        assert_eq!(written, path);

        let bytes = fs::read(&path).unwrap();
        let decoded: InjectionParameterSet = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.snr[0], 3.5);
    }

    #[test]
    fn test_overwrite_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waveforms.bin");

        let mut first = InjectionParameterSet::default();
        first.mass_1.push(10.0);
        write_ledger(&first, &path).unwrap();

        let second = InjectionParameterSet::default();
        write_ledger(&second, &path).unwrap();

        let decoded: InjectionParameterSet =
            bincode::deserialize(&fs::read(&path).unwrap()).unwrap();
        assert!(decoded.is_empty());
    }
}
