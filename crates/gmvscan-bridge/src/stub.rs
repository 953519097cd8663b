// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where no native scanner exists.
//
// Every call completes immediately through the error callback with
// `PLATFORM_UNAVAILABLE`; the real implementation lives in `android`.

use serde_json::Value;

use crate::traits::{NativeBridge, NativeCallback};

/// Error code the stub reports for every native call.
pub const PLATFORM_UNAVAILABLE_CODE: &str = "PLATFORM_UNAVAILABLE";

/// No-op bridge returned on non-mobile platforms.
pub struct StubBridge;

impl NativeBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn exec(
        &self,
        plugin: &str,
        action: &str,
        _args: Vec<Value>,
        _on_result: NativeCallback,
        on_error: NativeCallback,
    ) {
        tracing::warn!(plugin, action, "NativeBridge::exec called on stub bridge");
        on_error(vec![Value::String(PLATFORM_UNAVAILABLE_CODE.into())]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn reports_platform_unavailable() {
        let (tx, rx) = mpsc::channel();
        let tx_ok = tx.clone();
        StubBridge.exec(
            "plugin",
            "startScan",
            vec![],
            Box::new(move |v| tx_ok.send(("result", v)).unwrap()),
            Box::new(move |v| tx.send(("error", v)).unwrap()),
        );
        let (kind, values) = rx.recv().unwrap();
        assert_eq!(kind, "error");
        assert_eq!(values, vec![Value::String("PLATFORM_UNAVAILABLE".into())]);
    }
}
