// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Accepted and rejected injection record structures

use crate::priors::ParameterBatch;
use anyhow::{bail, Result};
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Growable set of rejected injection parameters.
///
/// Holds the scalar physical parameters and the SNR of every candidate
/// that fell below the detectability threshold. No projected strain is
/// kept for rejected candidates. May be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InjectionParameterSet {
    pub mass_1: Vec<f64>,
    pub mass_2: Vec<f64>,
    pub a_1: Vec<f64>,
    pub a_2: Vec<f64>,
    pub redshift: Vec<f64>,
    pub distance: Vec<f64>,
    pub ra: Vec<f64>,
    pub dec: Vec<f64>,
    pub psi: Vec<f64>,
    pub phase: Vec<f64>,
    pub inclination: Vec<f64>,
    pub snr: Vec<f64>,
}

impl InjectionParameterSet {
    pub fn len(&self) -> usize {
        self.mass_1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass_1.is_empty()
    }

    /// Build a rejected-parameter set from a batch whose SNR column has
    /// been filled.
    pub fn from_batch(batch: &ParameterBatch) -> Result<Self> {
        if batch.snr.len() != batch.len() {
            bail!("Batch SNR column has not been evaluated");
        }
        Ok(Self {
            mass_1: batch.mass_1.clone(),
            mass_2: batch.mass_2.clone(),
            a_1: batch.a_1.clone(),
            a_2: batch.a_2.clone(),
            redshift: batch.redshift.clone(),
            distance: batch.distance.clone(),
            ra: batch.ra.clone(),
            dec: batch.dec.clone(),
            psi: batch.psi.clone(),
            phase: batch.phase.clone(),
            inclination: batch.inclination.clone(),
            snr: batch.snr.clone(),
        })
    }

    /// Append another set, preserving its row order after the existing rows.
    pub fn append(&mut self, mut other: InjectionParameterSet) {
        self.mass_1.append(&mut other.mass_1);
        self.mass_2.append(&mut other.mass_2);
        self.a_1.append(&mut other.a_1);
        self.a_2.append(&mut other.a_2);
        self.redshift.append(&mut other.redshift);
        self.distance.append(&mut other.distance);
        self.ra.append(&mut other.ra);
        self.dec.append(&mut other.dec);
        self.psi.append(&mut other.psi);
        self.phase.append(&mut other.phase);
        self.inclination.append(&mut other.inclination);
        self.snr.append(&mut other.snr);
    }
}

/// Fixed-size set of accepted injections with their detector responses.
///
/// Preallocated to exactly the number of scheduled injections. Scalar
/// columns start zero-filled; `gps_time` and `shift` are known up front
/// from the schedule and the segment configuration. Rows are written
/// exactly once each, in increasing offset order, by
/// [`write_rows`](Self::write_rows).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSet {
    pub mass_1: Vec<f64>,
    pub mass_2: Vec<f64>,
    pub a_1: Vec<f64>,
    pub a_2: Vec<f64>,
    pub redshift: Vec<f64>,
    pub distance: Vec<f64>,
    pub ra: Vec<f64>,
    pub dec: Vec<f64>,
    pub psi: Vec<f64>,
    pub phase: Vec<f64>,
    pub inclination: Vec<f64>,
    pub snr: Vec<f64>,
    /// Scheduled injection center times, one per row
    pub gps_time: Vec<f64>,
    /// Per-detector time slides, `(n_samples, n_ifos)`, identical rows
    pub shift: Array2<f64>,
    /// Projected strain per detector, keyed by lower-cased prefix,
    /// each `(n_samples, waveform_size)`
    pub strain: BTreeMap<String, Array2<f64>>,
    /// Detector prefixes in projection order
    pub ifos: Vec<String>,
    /// Sample rate of the strain rows, in Hz
    pub sample_rate: f64,
    /// Duration of each strain row, in seconds
    pub duration: f64,
    /// Total candidates drawn across the campaign, accepted and rejected
    pub num_injections: u64,
}

impl ResponseSet {
    /// Preallocate storage for `times.len()` accepted injections.
    pub fn preallocate(
        times: Vec<f64>,
        shifts: &[f64],
        ifos: &[String],
        waveform_size: usize,
    ) -> Self {
        let n = times.len();
        let zeros = || vec![0.0; n];
        let mut strain = BTreeMap::new();
        for ifo in ifos {
            strain.insert(ifo.to_lowercase(), Array2::zeros((n, waveform_size)));
        }
        let mut shift = Array2::zeros((n, shifts.len()));
        for mut row in shift.rows_mut() {
            for (j, &s) in shifts.iter().enumerate() {
                row[j] = s;
            }
        }
        Self {
            mass_1: zeros(),
            mass_2: zeros(),
            a_1: zeros(),
            a_2: zeros(),
            redshift: zeros(),
            distance: zeros(),
            ra: zeros(),
            dec: zeros(),
            psi: zeros(),
            phase: zeros(),
            inclination: zeros(),
            snr: zeros(),
            gps_time: times,
            shift,
            strain,
            ifos: ifos.to_vec(),
            sample_rate: 0.0,
            duration: 0.0,
            num_injections: 0,
        }
    }

    /// Number of rows this set was preallocated for.
    pub fn n_samples(&self) -> usize {
        self.gps_time.len()
    }

    /// Write an accepted batch into rows `[offset, offset + batch.len())`.
    ///
    /// `projected` has shape `(batch.len(), n_ifos, waveform_size)` with
    /// detectors in the order of `self.ifos`. Row order within the batch is
    /// preserved. Writing past the preallocated bound is an error, never a
    /// silent truncation.
    pub fn write_rows(
        &mut self,
        offset: usize,
        batch: &ParameterBatch,
        projected: &Array3<f64>,
    ) -> Result<()> {
        let m = batch.len();
        if offset + m > self.n_samples() {
            bail!(
                "Writing {} rows at offset {} would overflow {} preallocated rows",
                m,
                offset,
                self.n_samples()
            );
        }
        if batch.snr.len() != m {
            bail!("Batch SNR column has not been evaluated");
        }
        if projected.shape()[0] != m || projected.shape()[1] != self.ifos.len() {
            bail!(
                "Projected strain shape {:?} does not match batch of {} rows over {} detectors",
                projected.shape(),
                m,
                self.ifos.len()
            );
        }

        for r in 0..m {
            let row = offset + r;
            self.mass_1[row] = batch.mass_1[r];
            self.mass_2[row] = batch.mass_2[r];
            self.a_1[row] = batch.a_1[r];
            self.a_2[row] = batch.a_2[r];
            self.redshift[row] = batch.redshift[r];
            self.distance[row] = batch.distance[r];
            self.ra[row] = batch.ra[r];
            self.dec[row] = batch.dec[r];
            self.psi[row] = batch.psi[r];
            self.phase[row] = batch.phase[r];
            self.inclination[row] = batch.inclination[r];
            self.snr[row] = batch.snr[r];
        }

        let size = projected.shape()[2];
        for (j, ifo) in self.ifos.clone().iter().enumerate() {
            let block = self
                .strain
                .get_mut(&ifo.to_lowercase())
                .expect("strain block preallocated for every ifo");
            for r in 0..m {
                for t in 0..size {
                    block[[offset + r, t]] = projected[[r, j, t]];
                }
            }
        }
        Ok(())
    }

    /// Attach the run-level metadata after the accumulation loop finishes.
    pub fn finalize(&mut self, sample_rate: f64, duration: f64, num_injections: u64) {
        self.sample_rate = sample_rate;
        self.duration = duration;
        self.num_injections = num_injections;
    }
}
