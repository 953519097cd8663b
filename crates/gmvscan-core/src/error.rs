// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for gmvscan.
//
// These are errors raised on the Rust side of the bridge, returned
// synchronously to the caller. Outcomes reported by the native scanner
// (cancellation, scanner already open, raw native errors) are not errors of
// this kind; they travel through `outcome::ScanError`.

use thiserror::Error;

/// Top-level error type for all gmvscan operations.
#[derive(Debug, Error)]
pub enum GmvScanError {
    // -- Configuration errors --
    #[error("settings can't be omitted; use get_default_settings() to get a new settings value")]
    MissingSettings,

    #[error("detector size out of range: width {width}, height {height} (each must be in (0, 1])")]
    InvalidDetectorSize { width: f64, height: f64 },

    #[error("malformed scan request: {0}")]
    MalformedRequest(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GmvScanError>;
