// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Build scan settings from a settings file and command-line flags.

use std::path::Path;

use gmvscan_core::error::Result;
use gmvscan_core::symbology::encode_named;
use gmvscan_core::{BarcodeTypes, DetectorSize, Settings, SettingsOverride, get_default_settings};

/// Defaults, merged with the partial settings document at `path` if given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(get_default_settings());
    };
    let data = std::fs::read_to_string(path)?;
    let settings = Settings::from_override_json(&data)?;
    tracing::info!(path = %path.display(), "settings loaded");
    Ok(settings)
}

/// Comma-separated symbology names, e.g. `QRCode,EAN13`. Unknown names are
/// skipped, matching how settings documents are treated.
pub fn parse_types(list: &str) -> BarcodeTypes {
    let names = list.split(',').map(str::trim).filter(|n| !n.is_empty());
    BarcodeTypes::from_bitmask(encode_named(names.map(|n| (n, true))))
}

/// Override built from `--types`, `--width` and `--height`.
///
/// A lone `--width` or `--height` keeps the other dimension of `current`.
pub fn flag_override(
    current: &Settings,
    types: Option<&str>,
    width: Option<f64>,
    height: Option<f64>,
) -> SettingsOverride {
    let detector_size = (width.is_some() || height.is_some()).then(|| {
        DetectorSize::new(
            width.unwrap_or(current.detector_size.width),
            height.unwrap_or(current.detector_size.height),
        )
    });
    SettingsOverride {
        barcode_types: types.map(parse_types),
        detector_size,
    }
}
