// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Injection-time scheduling
//!
//! Computes the ordered sequence of GPS times at which injections will be
//! centered within a segment. The length of this sequence fixes the number
//! of accepted samples the accumulation loop must produce.

/// Compute the injection center times for a segment.
///
/// Times are strictly increasing, separated by `spacing + waveform_duration`
/// seconds, and every waveform fits entirely inside
/// `[start + buffer, stop - buffer]`. The caller is expected to pass
/// `stop - max_shift` when detector time slides are in play, so that a
/// shifted waveform cannot spill past the end of the segment.
///
/// # Arguments
///
/// * `start` - GPS time of the beginning of the segment
/// * `stop` - GPS time of the end of the segment
/// * `spacing` - Seconds to leave between the end of one signal and the
///   start of the next
/// * `buffer` - Seconds on either side of the segment within which no
///   injection is placed
/// * `waveform_duration` - Duration of each injected waveform in seconds
///
/// # Returns
///
/// The ordered list of injection center times. Empty when the segment is
/// too short to hold a single buffered waveform.
pub fn injection_times(
    start: f64,
    stop: f64,
    spacing: f64,
    buffer: f64,
    waveform_duration: f64,
) -> Vec<f64> {
    let half = waveform_duration / 2.0;
    let step = spacing + waveform_duration;
    let last_allowed = stop - buffer - half;

    let mut times = Vec::new();
    let mut t = start + buffer + half;
    while t <= last_allowed {
        times.push(t);
        t += step;
    }
    times
}
