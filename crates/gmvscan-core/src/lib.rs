// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gmvscan — Scan settings, symbology encoding, and outcome types shared by
// the bridge crates.

pub mod config;
pub mod error;
pub mod outcome;
pub mod request;
pub mod symbology;
pub mod types;

pub use config::BridgeConfig;
pub use error::GmvScanError;
pub use outcome::{ScanError, ScanErrorInfo, ScanOutcome};
pub use request::ScanRequest;
pub use symbology::{ALL_SYMBOLOGIES, Symbology};
pub use types::*;
