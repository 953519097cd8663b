// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Barcode symbologies and their detector bit values.
//
// The native detector takes the enabled symbologies as one integer: the sum
// of the bit values below. The bit assignment is shared with the native
// plugin and must not change on this side alone.

use serde::{Deserialize, Serialize};

/// A barcode symbology the native detector can be asked to recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbology {
    #[serde(rename = "Code128")]
    Code128,
    #[serde(rename = "Code39")]
    Code39,
    #[serde(rename = "Code93")]
    Code93,
    #[serde(rename = "CodaBar")]
    CodaBar,
    #[serde(rename = "DataMatrix")]
    DataMatrix,
    #[serde(rename = "EAN13")]
    Ean13,
    #[serde(rename = "EAN8")]
    Ean8,
    #[serde(rename = "ITF")]
    Itf,
    #[serde(rename = "QRCode")]
    QrCode,
    #[serde(rename = "UPCA")]
    Upca,
    #[serde(rename = "UPCE")]
    Upce,
    #[serde(rename = "PDF417")]
    Pdf417,
    #[serde(rename = "Aztec")]
    Aztec,
}

/// Every symbology, in ascending bit order.
pub const ALL_SYMBOLOGIES: [Symbology; 13] = [
    Symbology::Code128,
    Symbology::Code39,
    Symbology::Code93,
    Symbology::CodaBar,
    Symbology::DataMatrix,
    Symbology::Ean13,
    Symbology::Ean8,
    Symbology::Itf,
    Symbology::QrCode,
    Symbology::Upca,
    Symbology::Upce,
    Symbology::Pdf417,
    Symbology::Aztec,
];

/// Mask with every known symbology bit set (8191).
pub const ALL_SYMBOLOGIES_MASK: u32 = (1 << ALL_SYMBOLOGIES.len()) - 1;

impl Symbology {
    /// Detector bit value understood by the native scanner.
    pub const fn bit(self) -> u32 {
        match self {
            Self::Code128 => 1,
            Self::Code39 => 2,
            Self::Code93 => 4,
            Self::CodaBar => 8,
            Self::DataMatrix => 16,
            Self::Ean13 => 32,
            Self::Ean8 => 64,
            Self::Itf => 128,
            Self::QrCode => 256,
            Self::Upca => 512,
            Self::Upce => 1024,
            Self::Pdf417 => 2048,
            Self::Aztec => 4096,
        }
    }

    /// Key used for this symbology in settings documents (`"QRCode"`, `"EAN13"`, ...).
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Code128 => "Code128",
            Self::Code39 => "Code39",
            Self::Code93 => "Code93",
            Self::CodaBar => "CodaBar",
            Self::DataMatrix => "DataMatrix",
            Self::Ean13 => "EAN13",
            Self::Ean8 => "EAN8",
            Self::Itf => "ITF",
            Self::QrCode => "QRCode",
            Self::Upca => "UPCA",
            Self::Upce => "UPCE",
            Self::Pdf417 => "PDF417",
            Self::Aztec => "Aztec",
        }
    }

    /// Exact, case-sensitive lookup by settings key. Unknown names yield `None`.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        ALL_SYMBOLOGIES.iter().copied().find(|s| s.wire_name() == name)
    }
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Sum the bit values of every enabled, known entry of a name-keyed map.
///
/// Names outside the symbology table are skipped, as are disabled entries.
/// A name listed twice counts once.
pub fn encode_named<'a, I>(entries: I) -> u32
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    entries
        .into_iter()
        .filter(|&(_, enabled)| enabled)
        .filter_map(|(name, _)| match Symbology::from_wire_name(name) {
            Some(symbology) => Some(symbology),
            None => {
                tracing::debug!(name, "ignoring unknown barcode type");
                None
            }
        })
        .fold(0, |mask, symbology| mask | symbology.bit())
}

/// Symbologies whose bit is set in `mask`, in ascending bit order.
///
/// Bits above the known table are ignored.
pub fn symbologies_in(mask: u32) -> impl Iterator<Item = Symbology> {
    ALL_SYMBOLOGIES
        .into_iter()
        .filter(move |s| mask & s.bit() != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_distinct_powers_of_two() {
        let mut seen = 0u32;
        for (position, symbology) in ALL_SYMBOLOGIES.iter().enumerate() {
            assert_eq!(symbology.bit(), 1 << position);
            assert_eq!(seen & symbology.bit(), 0);
            seen |= symbology.bit();
        }
        assert_eq!(seen, ALL_SYMBOLOGIES_MASK);
        assert_eq!(ALL_SYMBOLOGIES_MASK, 8191);
    }

    #[test]
    fn wire_names_round_trip() {
        for symbology in ALL_SYMBOLOGIES {
            assert_eq!(Symbology::from_wire_name(symbology.wire_name()), Some(symbology));
        }
        assert_eq!(Symbology::from_wire_name("qrcode"), None);
        assert_eq!(Symbology::from_wire_name("MaxiCode"), None);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Symbology::QrCode).unwrap();
        assert_eq!(json, "\"QRCode\"");
        let back: Symbology = serde_json::from_str("\"EAN13\"").unwrap();
        assert_eq!(back, Symbology::Ean13);
    }

    #[test]
    fn encode_named_skips_unknown_and_disabled() {
        let mask = encode_named([
            ("QRCode", true),
            ("EAN13", true),
            ("UPCA", false),
            ("MaxiCode", true),
        ]);
        assert_eq!(mask, 288);
    }

    #[test]
    fn encode_named_empty_is_zero() {
        assert_eq!(encode_named(std::iter::empty()), 0);
        assert_eq!(encode_named([("Aztec", false)]), 0);
    }

    #[test]
    fn symbologies_in_ignores_high_bits() {
        let found: Vec<_> = symbologies_in(0x1_0000 | 256 | 1).collect();
        assert_eq!(found, vec![Symbology::Code128, Symbology::QrCode]);
    }
}
