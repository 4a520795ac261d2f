// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the gw-injection project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Parameter ledgers
//!
//! The two persistent record structures produced by an injection campaign:
//! the preallocated accepted-parameter set (with projected strain) and the
//! growable rejected-parameter set.

pub mod injections;

pub use injections::{InjectionParameterSet, ResponseSet};
