// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal scan outcomes as reported by the native scanner.
//
// The native side finishes a scan by calling exactly one of two callbacks,
// each with an array of values. A result array carries the decoded payload
// in its first element. An error array carries a code in its first element,
// which is mapped onto a small taxonomy that drives what the caller shows:
//
//   absent / null / "USER_CANCELLED"  -> Cancelled
//   "SCANNER_OPEN"                    -> ScannerOpen
//   anything else                     -> Native(raw)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::BridgeConfig;

/// Error code the native scanner reports when the user backs out.
pub const USER_CANCELLED_CODE: &str = "USER_CANCELLED";

/// Error code the native scanner reports when a scan is already running.
pub const SCANNER_OPEN_CODE: &str = "SCANNER_OPEN";

/// Why a scan ended without a payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("The scan was cancelled.")]
    Cancelled,

    #[error("Scanner already open.")]
    ScannerOpen,

    /// Unclassified native error, passed through untouched.
    #[error("native scanner error: {0}")]
    Native(Value),
}

/// Result of one scan: the decoded payload, or why there is none.
pub type ScanOutcome = std::result::Result<String, ScanError>;

/// Normalised error shape handed to error callbacks.
///
/// `message` is a string for the classified cases and the raw native value
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanErrorInfo {
    pub cancelled: bool,
    pub message: Value,
}

impl ScanError {
    /// Classify a native error array by its first element.
    pub fn classify(error_args: &[Value]) -> Self {
        match error_args.first() {
            None | Some(Value::Null) => Self::Cancelled,
            Some(Value::String(code)) if code == USER_CANCELLED_CODE => Self::Cancelled,
            Some(Value::String(code)) if code == SCANNER_OPEN_CODE => Self::ScannerOpen,
            Some(raw) => Self::Native(raw.clone()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Caller-facing shape, worded per `config`.
    pub fn to_info(&self, config: &BridgeConfig) -> ScanErrorInfo {
        match self {
            Self::Cancelled => ScanErrorInfo {
                cancelled: true,
                message: Value::String(config.cancelled_message.clone()),
            },
            Self::ScannerOpen => ScanErrorInfo {
                cancelled: false,
                message: Value::String(config.scanner_open_message.clone()),
            },
            Self::Native(raw) => ScanErrorInfo {
                cancelled: false,
                message: raw.clone(),
            },
        }
    }
}

impl From<&ScanError> for ScanErrorInfo {
    fn from(err: &ScanError) -> Self {
        err.to_info(&BridgeConfig::default())
    }
}

/// Extract the decoded payload from a native result array.
///
/// The payload is the first element; a string is taken as-is, any other
/// scalar is rendered as JSON text. An empty array or a null payload means
/// the native side finished without a value, which is reported as a native
/// error rather than a silent empty success.
pub fn payload_from_result(result_args: &[Value]) -> ScanOutcome {
    match result_args.first() {
        Some(Value::String(payload)) => Ok(payload.clone()),
        Some(Value::Null) | None => Err(ScanError::Native(Value::String(
            "native scanner returned no payload".into(),
        ))),
        Some(other) => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_cancelled_is_cancelled() {
        let err = ScanError::classify(&[json!("USER_CANCELLED")]);
        assert_eq!(err, ScanError::Cancelled);
        assert_eq!(
            ScanErrorInfo::from(&err),
            ScanErrorInfo { cancelled: true, message: json!("The scan was cancelled.") }
        );
    }

    #[test]
    fn null_or_missing_code_is_cancelled() {
        assert!(ScanError::classify(&[Value::Null]).is_cancelled());
        assert!(ScanError::classify(&[]).is_cancelled());
    }

    #[test]
    fn scanner_open_is_not_cancelled() {
        let err = ScanError::classify(&[json!("SCANNER_OPEN")]);
        assert_eq!(err, ScanError::ScannerOpen);
        let info = ScanErrorInfo::from(&err);
        assert!(!info.cancelled);
        assert_eq!(info.message, json!("Scanner already open."));
    }

    #[test]
    fn other_codes_pass_through() {
        let err = ScanError::classify(&[json!("X")]);
        assert_eq!(
            ScanErrorInfo::from(&err),
            ScanErrorInfo { cancelled: false, message: json!("X") }
        );

        let structured = json!({"code": 17, "detail": "camera busy"});
        let err = ScanError::classify(&[structured.clone(), json!("ignored")]);
        assert_eq!(ScanErrorInfo::from(&err).message, structured);
    }

    #[test]
    fn codes_are_case_sensitive() {
        assert_eq!(
            ScanError::classify(&[json!("user_cancelled")]),
            ScanError::Native(json!("user_cancelled"))
        );
    }

    #[test]
    fn configured_messages() {
        let config = BridgeConfig {
            cancelled_message: "Abgebrochen.".into(),
            ..Default::default()
        };
        assert_eq!(ScanError::Cancelled.to_info(&config).message, json!("Abgebrochen."));
    }

    #[test]
    fn payload_is_first_element() {
        assert_eq!(payload_from_result(&[json!("ABC123")]), Ok("ABC123".to_string()));
        assert_eq!(
            payload_from_result(&[json!("first"), json!("second")]),
            Ok("first".to_string())
        );
        assert_eq!(payload_from_result(&[json!(4006381333931u64)]), Ok("4006381333931".to_string()));
    }

    #[test]
    fn empty_result_is_native_error() {
        assert!(matches!(payload_from_result(&[]), Err(ScanError::Native(_))));
        assert!(matches!(payload_from_result(&[Value::Null]), Err(ScanError::Native(_))));
    }

    #[test]
    fn display_uses_default_messages() {
        assert_eq!(ScanError::Cancelled.to_string(), "The scan was cancelled.");
        assert_eq!(ScanError::ScannerOpen.to_string(), "Scanner already open.");
    }
}
