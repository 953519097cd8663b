// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caller-facing scan settings.
//
// The serde shape matches the settings documents used by hybrid app hosts:
//
// ```json
// { "barcodeTypes": { "QRCode": true, "EAN13": false, ... },
//   "detectorSize": { "width": 0.5, "height": 0.7 } }
// ```

use serde::{Deserialize, Serialize};

use crate::error::{GmvScanError, Result};
use crate::symbology::{ALL_SYMBOLOGIES, Symbology, symbologies_in};

/// Which symbologies the detector should look for.
///
/// Missing keys in a settings document deserialize as disabled; unknown keys
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeTypes {
    #[serde(rename = "Aztec", default)]
    pub aztec: bool,
    #[serde(rename = "CodaBar", default)]
    pub coda_bar: bool,
    #[serde(rename = "Code39", default)]
    pub code39: bool,
    #[serde(rename = "Code93", default)]
    pub code93: bool,
    #[serde(rename = "Code128", default)]
    pub code128: bool,
    #[serde(rename = "DataMatrix", default)]
    pub data_matrix: bool,
    #[serde(rename = "EAN8", default)]
    pub ean8: bool,
    #[serde(rename = "EAN13", default)]
    pub ean13: bool,
    #[serde(rename = "ITF", default)]
    pub itf: bool,
    #[serde(rename = "PDF417", default)]
    pub pdf417: bool,
    #[serde(rename = "QRCode", default)]
    pub qr_code: bool,
    #[serde(rename = "UPCA", default)]
    pub upca: bool,
    #[serde(rename = "UPCE", default)]
    pub upce: bool,
}

impl BarcodeTypes {
    /// Every symbology enabled.
    pub const fn all() -> Self {
        Self {
            aztec: true,
            coda_bar: true,
            code39: true,
            code93: true,
            code128: true,
            data_matrix: true,
            ean8: true,
            ean13: true,
            itf: true,
            pdf417: true,
            qr_code: true,
            upca: true,
            upce: true,
        }
    }

    /// Every symbology disabled. Encodes to 0 ("detect nothing").
    pub const fn none() -> Self {
        Self {
            aztec: false,
            coda_bar: false,
            code39: false,
            code93: false,
            code128: false,
            data_matrix: false,
            ean8: false,
            ean13: false,
            itf: false,
            pdf417: false,
            qr_code: false,
            upca: false,
            upce: false,
        }
    }

    /// Only the listed symbologies enabled.
    pub fn only(symbologies: &[Symbology]) -> Self {
        let mut types = Self::none();
        for &symbology in symbologies {
            types.set(symbology, true);
        }
        types
    }

    pub fn is_enabled(&self, symbology: Symbology) -> bool {
        *self.flag(symbology)
    }

    pub fn set(&mut self, symbology: Symbology, enabled: bool) {
        *self.flag_mut(symbology) = enabled;
    }

    /// Enabled symbologies in ascending bit order.
    pub fn enabled(&self) -> impl Iterator<Item = Symbology> + '_ {
        ALL_SYMBOLOGIES
            .into_iter()
            .filter(move |&s| self.is_enabled(s))
    }

    /// Detector bitmask: sum of the bit values of every enabled symbology.
    pub fn bitmask(&self) -> u32 {
        self.enabled().map(Symbology::bit).sum()
    }

    /// Inverse of [`BarcodeTypes::bitmask`]. Unknown high bits are dropped.
    pub fn from_bitmask(mask: u32) -> Self {
        Self::only(&symbologies_in(mask).collect::<Vec<_>>())
    }

    fn flag(&self, symbology: Symbology) -> &bool {
        match symbology {
            Symbology::Aztec => &self.aztec,
            Symbology::CodaBar => &self.coda_bar,
            Symbology::Code39 => &self.code39,
            Symbology::Code93 => &self.code93,
            Symbology::Code128 => &self.code128,
            Symbology::DataMatrix => &self.data_matrix,
            Symbology::Ean8 => &self.ean8,
            Symbology::Ean13 => &self.ean13,
            Symbology::Itf => &self.itf,
            Symbology::Pdf417 => &self.pdf417,
            Symbology::QrCode => &self.qr_code,
            Symbology::Upca => &self.upca,
            Symbology::Upce => &self.upce,
        }
    }

    fn flag_mut(&mut self, symbology: Symbology) -> &mut bool {
        match symbology {
            Symbology::Aztec => &mut self.aztec,
            Symbology::CodaBar => &mut self.coda_bar,
            Symbology::Code39 => &mut self.code39,
            Symbology::Code93 => &mut self.code93,
            Symbology::Code128 => &mut self.code128,
            Symbology::DataMatrix => &mut self.data_matrix,
            Symbology::Ean8 => &mut self.ean8,
            Symbology::Ean13 => &mut self.ean13,
            Symbology::Itf => &mut self.itf,
            Symbology::Pdf417 => &mut self.pdf417,
            Symbology::QrCode => &mut self.qr_code,
            Symbology::Upca => &mut self.upca,
            Symbology::Upce => &mut self.upce,
        }
    }
}

impl Default for BarcodeTypes {
    fn default() -> Self {
        Self::all()
    }
}

/// Detection region as a fraction of the capture frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorSize {
    pub width: f64,
    pub height: f64,
}

impl DetectorSize {
    pub const DEFAULT_WIDTH: f64 = 0.5;
    pub const DEFAULT_HEIGHT: f64 = 0.7;

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both fractions must be finite and in (0, 1].
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| v.is_finite() && v > 0.0 && v <= 1.0;
        if in_range(self.width) && in_range(self.height) {
            Ok(())
        } else {
            Err(GmvScanError::InvalidDetectorSize {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Default for DetectorSize {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

/// Settings for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub barcode_types: BarcodeTypes,
    pub detector_size: DetectorSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            barcode_types: BarcodeTypes::all(),
            detector_size: DetectorSize::default(),
        }
    }
}

impl Settings {
    /// Apply `overrides` on top of `self`. Each present field replaces the
    /// current one wholesale; nested values are never merged.
    pub fn merge(self, overrides: SettingsOverride) -> Self {
        Self {
            barcode_types: overrides.barcode_types.unwrap_or(self.barcode_types),
            detector_size: overrides.detector_size.unwrap_or(self.detector_size),
        }
    }

    /// Parse a partial settings document and merge it over the defaults.
    pub fn from_override_json(json: &str) -> Result<Self> {
        Ok(get_default_settings().merge(SettingsOverride::from_json(json)?))
    }
}

/// Partial settings supplied by a caller. Absent fields keep their base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode_types: Option<BarcodeTypes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detector_size: Option<DetectorSize>,
}

impl SettingsOverride {
    /// Parse a partial settings document. Unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A fresh settings value: every symbology enabled, detector 0.5 x 0.7.
///
/// Every call returns an independent value the caller may mutate freely.
pub fn get_default_settings() -> Settings {
    Settings::default()
}
