// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host-side services: file locations, settings loading, simulated replies.

pub mod data_dir;
pub mod inputs;
pub mod simulate;
