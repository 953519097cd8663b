// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Positional request handed to the native scanner.
//
// The native side reads its arguments by index, not by name:
//
//   [0] detector types bitmask (integer)
//   [1] detector width fraction (float)
//   [2] detector height fraction (float)
//
// Changing the order requires a matching change in the native plugin.

use serde_json::Value;

use crate::error::{GmvScanError, Result};
use crate::types::{DetectorSize, Settings};

/// Number of positional arguments in a scan request.
pub const SCAN_REQUEST_ARITY: usize = 3;

/// Encoded scan request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanRequest {
    pub bitmask: u32,
    pub width: f64,
    pub height: f64,
}

impl ScanRequest {
    pub fn new(bitmask: u32, detector_size: DetectorSize) -> Self {
        Self {
            bitmask,
            width: detector_size.width,
            height: detector_size.height,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.barcode_types.bitmask(), settings.detector_size)
    }

    /// `[bitmask, width, height]` as JSON values for the native bridge.
    pub fn to_args(&self) -> Vec<Value> {
        vec![
            Value::from(self.bitmask),
            Value::from(self.width),
            Value::from(self.height),
        ]
    }

    /// Decode the positional array back into a request.
    ///
    /// Used by bridge implementations that have to unpack the arguments
    /// before forwarding them to platform APIs.
    pub fn from_args(args: &[Value]) -> Result<Self> {
        if args.len() != SCAN_REQUEST_ARITY {
            return Err(GmvScanError::MalformedRequest(format!(
                "expected {SCAN_REQUEST_ARITY} arguments, got {}",
                args.len()
            )));
        }
        let bitmask = args[0]
            .as_u64()
            .and_then(|m| u32::try_from(m).ok())
            .ok_or_else(|| {
                GmvScanError::MalformedRequest(format!("bitmask is not an unsigned integer: {}", args[0]))
            })?;
        let fraction = |index: usize, label: &str| {
            args[index].as_f64().ok_or_else(|| {
                GmvScanError::MalformedRequest(format!("{label} is not a number: {}", args[index]))
            })
        };
        Ok(Self {
            bitmask,
            width: fraction(1, "width")?,
            height: fraction(2, "height")?,
        })
    }
}
