// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Interferometer geometry and antenna response
//!
//! Earth-fixed vertex positions and arm orientations for the supported
//! interferometers, the detector response tensor derived from them, and
//! the plus/cross antenna pattern functions.

use anyhow::{bail, Result};

/// Speed of light in m/s.
pub const C_M_PER_S: f64 = 299_792_458.0;

/// An interferometric detector in the Earth-fixed frame.
#[derive(Debug, Clone)]
pub struct Detector {
    /// Detector prefix, e.g. "H1"
    pub name: &'static str,
    /// Vertex position in meters
    pub vertex: [f64; 3],
    /// Unit vector along the x arm
    pub x_arm: [f64; 3],
    /// Unit vector along the y arm
    pub y_arm: [f64; 3],
}

/// LIGO Hanford.
const H1: Detector = Detector {
    name: "H1",
    vertex: [-2.16141492636e6, -3.83469517889e6, 4.60035022664e6],
    x_arm: [-0.22389266154, 0.79983062746, 0.55690487831],
    y_arm: [-0.91397818574, 0.02609403989, -0.40492342125],
};

/// LIGO Livingston.
const L1: Detector = Detector {
    name: "L1",
    vertex: [-7.42760447238e4, -5.49628371971e6, 3.22425701744e6],
    x_arm: [-0.95457412153, -0.14158077340, -0.26218911324],
    y_arm: [0.29774156894, -0.48791033647, -0.82054461286],
};

/// Virgo.
const V1: Detector = Detector {
    name: "V1",
    vertex: [4.54637409900e6, 8.42989697626e5, 4.37857696241e6],
    x_arm: [-0.70045821479, 0.20848948619, 0.68256166277],
    y_arm: [-0.05379255368, -0.96908180549, 0.24080451708],
};

/// Resolve a list of detector prefixes into geometry records.
///
/// Unknown prefixes are a configuration error.
pub fn detectors_by_name(ifos: &[String]) -> Result<Vec<Detector>> {
    ifos.iter()
        .map(|name| match name.as_str() {
            "H1" => Ok(H1.clone()),
            "L1" => Ok(L1.clone()),
            "V1" => Ok(V1.clone()),
            other => bail!("Unknown interferometer prefix: {}", other),
        })
        .collect()
}

impl Detector {
    /// Detector response tensor, `(x ⊗ x - y ⊗ y) / 2`.
    pub fn response_tensor(&self) -> [[f64; 3]; 3] {
        let mut d = [[0.0; 3]; 3];
        for (i, row) in d.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = (self.x_arm[i] * self.x_arm[j] - self.y_arm[i] * self.y_arm[j]) / 2.0;
            }
        }
        d
    }

    /// Plus and cross antenna pattern functions.
    ///
    /// `gmst` is the Greenwich mean sidereal angle in radians. The batch
    /// pipeline samples right ascension uniformly, so the sidereal phase is
    /// degenerate with it and callers pass zero, treating `ra` as an
    /// Earth-fixed longitude.
    pub fn antenna_pattern(&self, ra: f64, dec: f64, psi: f64, gmst: f64) -> (f64, f64) {
        let gha = gmst - ra;
        let (sin_gha, cos_gha) = gha.sin_cos();
        let (sin_dec, cos_dec) = dec.sin_cos();
        let (sin_psi, cos_psi) = psi.sin_cos();

        // wave-frame basis vectors in the Earth-fixed frame
        let x = [
            -cos_psi * sin_gha - sin_psi * cos_gha * sin_dec,
            -cos_psi * cos_gha + sin_psi * sin_gha * sin_dec,
            sin_psi * cos_dec,
        ];
        let y = [
            sin_psi * sin_gha - cos_psi * cos_gha * sin_dec,
            sin_psi * cos_gha + cos_psi * sin_gha * sin_dec,
            cos_psi * cos_dec,
        ];

        let d = self.response_tensor();
        let mut f_plus = 0.0;
        let mut f_cross = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                f_plus += d[i][j] * (x[i] * x[j] - y[i] * y[j]);
                f_cross += d[i][j] * (x[i] * y[j] + y[i] * x[j]);
            }
        }
        (f_plus, f_cross)
    }

    /// Arrival-time delay relative to the geocenter, in seconds.
    ///
    /// Negative when the wavefront reaches this detector before the
    /// geocenter.
    pub fn geocenter_delay(&self, ra: f64, dec: f64, gmst: f64) -> f64 {
        let gha = gmst - ra;
        // unit vector toward the source
        let source = [
            dec.cos() * gha.cos(),
            -dec.cos() * gha.sin(),
            dec.sin(),
        ];
        let dot: f64 = self
            .vertex
            .iter()
            .zip(&source)
            .map(|(v, s)| v * s)
            .sum();
        -dot / C_M_PER_S
    }
}
