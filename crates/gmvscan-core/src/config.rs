// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Plugin identifier the native scanner registers under.
pub const DEFAULT_PLUGIN_ID: &str = "cordova-plugin-google-mobile-vision-barcode-scanner";

/// Native operation that opens the scanning screen.
pub const START_SCAN_ACTION: &str = "startScan";

pub const DEFAULT_CANCELLED_MESSAGE: &str = "The scan was cancelled.";
pub const DEFAULT_SCANNER_OPEN_MESSAGE: &str = "Scanner already open.";

/// How the bridge addresses the native plugin and words its outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Plugin identifier passed with every native call.
    pub plugin_id: String,
    /// Operation name passed with every native call.
    pub action: String,
    /// Message reported when the user cancels the scan.
    pub cancelled_message: String,
    /// Message reported when another scan is already in progress.
    pub scanner_open_message: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            plugin_id: DEFAULT_PLUGIN_ID.into(),
            action: START_SCAN_ACTION.into(),
            cancelled_message: DEFAULT_CANCELLED_MESSAGE.into(),
            scanner_open_message: DEFAULT_SCANNER_OPEN_MESSAGE.into(),
        }
    }
}

impl BridgeConfig {
    /// Read a JSON config file. Missing keys take their default.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Like [`BridgeConfig::load`], falling back to defaults when the file is
    /// absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %e, "bridge config unreadable, using defaults");
                }
                Self::default()
            }
        }
    }
}
