// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan call adapter.
//
// Turns settings into the positional request, issues the single native
// call, and maps whichever native callback fires onto one `ScanOutcome`.
// The outcome can be consumed through a callback pair, a single completion,
// a blocking channel, or a future; every path shares the same guarantee:
// exactly one outcome, delivered exactly once. A platform that drops both
// callbacks without calling either still produces a `Native` error.

use std::sync::{Arc, Mutex, PoisonError, mpsc};

use gmvscan_core::error::{GmvScanError, Result};
use gmvscan_core::outcome::payload_from_result;
use gmvscan_core::{
    BridgeConfig, ScanError, ScanErrorInfo, ScanOutcome, ScanRequest, Settings, SettingsOverride,
    get_default_settings,
};
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::traits::{NativeBridge, NativeCallback};

/// Error callback of the callback-pair API.
pub type ErrorCallback = Box<dyn FnOnce(ScanErrorInfo) + Send + 'static>;

/// Node-style callback: `(error, payload)`, exactly one of them `Some`.
pub type LegacyCallback = Box<dyn FnOnce(Option<ScanErrorInfo>, Option<String>) + Send + 'static>;

type Completion = Box<dyn FnOnce(ScanOutcome) + Send + 'static>;

/// Barcode scanner reached through a native bridge.
pub struct Scanner<B> {
    bridge: B,
    config: BridgeConfig,
}

impl<B: NativeBridge> Scanner<B> {
    pub fn new(bridge: B) -> Self {
        Self::with_config(bridge, BridgeConfig::default())
    }

    pub fn with_config(bridge: B, config: BridgeConfig) -> Self {
        Self { bridge, config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Start a scan and report the outcome to `completion`.
    ///
    /// Configuration problems (no settings, detector size out of range) are
    /// returned immediately and `completion` is never called. Otherwise the
    /// native call is issued and `completion` runs exactly once, on whatever
    /// thread the platform finishes on.
    pub fn scan_with<F>(&self, settings: Option<Settings>, completion: F) -> Result<()>
    where
        F: FnOnce(ScanOutcome) + Send + 'static,
    {
        let request = encode(settings)?;
        self.dispatch(request, Box::new(completion));
        Ok(())
    }

    /// Callback-pair form. A missing `on_error` is replaced by a no-op.
    pub fn scan<S>(
        &self,
        on_success: S,
        on_error: Option<ErrorCallback>,
        settings: Option<Settings>,
    ) -> Result<()>
    where
        S: FnOnce(String) + Send + 'static,
    {
        let on_error: ErrorCallback = on_error.unwrap_or_else(|| Box::new(|_: ScanErrorInfo| {}));
        let config = self.config.clone();
        self.scan_with(settings, move |outcome| match outcome {
            Ok(payload) => on_success(payload),
            Err(err) => on_error(err.to_info(&config)),
        })
    }

    /// Start a scan and block the calling thread until it finishes.
    ///
    /// Must not be called from the thread the platform delivers results on.
    pub fn scan_blocking(&self, settings: Option<Settings>) -> Result<ScanOutcome> {
        let (tx, rx) = mpsc::channel();
        self.scan_with(settings, move |outcome| {
            let _ = tx.send(outcome);
        })?;
        Ok(rx.recv().unwrap_or_else(|_| Err(dropped_outcome())))
    }

    /// Start a scan and return a handle whose `outcome()` resolves when it finishes.
    pub fn scan_async(&self, settings: Option<Settings>) -> Result<PendingScan> {
        let (tx, rx) = oneshot::channel();
        self.scan_with(settings, move |outcome| {
            let _ = tx.send(outcome);
        })?;
        Ok(PendingScan { rx })
    }

    /// Node-style form: merges `overrides` over the defaults and reports
    /// through a single `(error, payload)` callback. A missing callback is
    /// replaced by a no-op.
    pub fn scan_legacy(
        &self,
        overrides: Option<SettingsOverride>,
        callback: Option<LegacyCallback>,
    ) -> Result<()> {
        let settings = get_default_settings().merge(overrides.unwrap_or_default());
        let callback: LegacyCallback =
            callback.unwrap_or_else(|| Box::new(|_: Option<ScanErrorInfo>, _: Option<String>| {}));
        let config = self.config.clone();
        self.scan_with(Some(settings), move |outcome| match outcome {
            Ok(payload) => callback(None, Some(payload)),
            Err(err) => callback(Some(err.to_info(&config)), None),
        })
    }

    fn dispatch(&self, request: ScanRequest, completion: Completion) {
        let slot = Arc::new(CompletionSlot::new(completion));
        let result_slot = Arc::clone(&slot);

        let on_result: NativeCallback = Box::new(move |values: Vec<Value>| {
            result_slot.complete(payload_from_result(&values));
        });
        let on_error: NativeCallback = Box::new(move |values: Vec<Value>| {
            slot.complete(Err(ScanError::classify(&values)));
        });

        info!(
            platform = self.bridge.platform_name(),
            plugin = %self.config.plugin_id,
            action = %self.config.action,
            "starting barcode scan"
        );
        debug!(
            bitmask = request.bitmask,
            width = request.width,
            height = request.height,
            "encoded scan request"
        );

        self.bridge.exec(
            &self.config.plugin_id,
            &self.config.action,
            request.to_args(),
            on_result,
            on_error,
        );
    }
}

/// A scan in flight, awaiting its outcome.
#[derive(Debug)]
pub struct PendingScan {
    rx: oneshot::Receiver<ScanOutcome>,
}

impl PendingScan {
    pub async fn outcome(self) -> ScanOutcome {
        self.rx.await.unwrap_or_else(|_| Err(dropped_outcome()))
    }
}

/// Validate settings and build the positional request.
fn encode(settings: Option<Settings>) -> Result<ScanRequest> {
    let settings = settings.ok_or_else(|| {
        warn!("scan requested without settings");
        GmvScanError::MissingSettings
    })?;
    settings.detector_size.validate()?;
    Ok(ScanRequest::from_settings(&settings))
}

/// Completion shared by the two native callbacks.
///
/// The first callback to fire takes the completion; later ones find the slot
/// empty. If both callbacks are dropped unused, the last `Arc` going away
/// delivers the dropped-scan error instead.
struct CompletionSlot(Mutex<Option<Completion>>);

impl CompletionSlot {
    fn new(completion: Completion) -> Self {
        Self(Mutex::new(Some(completion)))
    }

    /// Run the completion if no outcome has been delivered yet.
    fn complete(&self, outcome: ScanOutcome) {
        let completion = self.0.lock().expect("completion lock poisoned").take();
        match completion {
            Some(completion) => {
                match &outcome {
                    Ok(_) => info!("scan finished with a payload"),
                    Err(err) => info!(cancelled = err.is_cancelled(), error = %err, "scan finished without a payload"),
                }
                completion(outcome);
            }
            None => warn!(?outcome, "native bridge reported a second outcome; ignoring"),
        }
    }
}

impl Drop for CompletionSlot {
    fn drop(&mut self) {
        let completion = self
            .0
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(completion) = completion {
            warn!("native bridge dropped the scan callbacks without reporting an outcome");
            completion(Err(dropped_outcome()));
        }
    }
}

fn dropped_outcome() -> ScanError {
    ScanError::Native(Value::String(
        "native bridge dropped the scan without reporting an outcome".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::{ScriptedBridge, ScriptedReply};
    use gmvscan_core::{BarcodeTypes, DetectorSize, Symbology};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn qr_and_ean13() -> Settings {
        Settings {
            barcode_types: BarcodeTypes::only(&[Symbology::QrCode, Symbology::Ean13]),
            detector_size: DetectorSize::new(0.5, 0.7),
        }
    }

    #[test]
    fn sends_positional_request_to_start_scan() {
        let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Success(vec![json!("x")]));
        let scanner = Scanner::new(&bridge);
        scanner.scan(|_| {}, None, Some(qr_and_ean13())).unwrap();

        let calls = bridge.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].plugin, "cordova-plugin-google-mobile-vision-barcode-scanner");
        assert_eq!(calls[0].action, "startScan");
        assert_eq!(calls[0].args, vec![json!(288), json!(0.5), json!(0.7)]);
    }

    #[test]
    fn missing_settings_fails_without_callbacks() {
        let bridge = ScriptedBridge::new();
        let scanner = Scanner::new(&bridge);
        let fired = Arc::new(AtomicUsize::new(0));
        let (f1, f2) = (Arc::clone(&fired), Arc::clone(&fired));

        let err = scanner
            .scan(
                move |_| {
                    f1.fetch_add(1, Ordering::SeqCst);
                },
                Some(Box::new(move |_: ScanErrorInfo| {
                    f2.fetch_add(1, Ordering::SeqCst);
                })),
                None,
            )
            .unwrap_err();

        assert!(matches!(err, GmvScanError::MissingSettings));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(bridge.calls().is_empty());
    }

    #[test]
    fn invalid_detector_size_is_rejected_before_dispatch() {
        let bridge = ScriptedBridge::new();
        let scanner = Scanner::new(&bridge);
        let mut settings = get_default_settings();
        settings.detector_size = DetectorSize::new(1.5, 0.7);

        let err = scanner.scan_with(Some(settings), |_| {}).unwrap_err();
        assert!(matches!(err, GmvScanError::InvalidDetectorSize { .. }));
        assert!(bridge.calls().is_empty());
    }

    #[test]
    fn success_unwraps_first_element() {
        let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Success(vec![json!("ABC123")]));
        let scanner = Scanner::new(&bridge);
        let (tx, rx) = mpsc::channel();

        scanner
            .scan(
                move |payload| tx.send(payload).unwrap(),
                None,
                Some(get_default_settings()),
            )
            .unwrap();

        assert_eq!(rx.recv().unwrap(), "ABC123");
    }

    #[test]
    fn error_callback_gets_normalised_info() {
        let cases = [
            (json!("USER_CANCELLED"), true, json!("The scan was cancelled.")),
            (json!("SCANNER_OPEN"), false, json!("Scanner already open.")),
            (json!("X"), false, json!("X")),
        ];
        for (code, cancelled, message) in cases {
            let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Error(vec![code]));
            let scanner = Scanner::new(&bridge);
            let (tx, rx) = mpsc::channel();

            scanner
                .scan(
                    |_| panic!("success callback must not fire"),
                    Some(Box::new(move |info: ScanErrorInfo| tx.send(info).unwrap())),
                    Some(get_default_settings()),
                )
                .unwrap();

            assert_eq!(rx.recv().unwrap(), ScanErrorInfo { cancelled, message });
        }
    }

    #[test]
    fn missing_error_callback_is_a_no_op() {
        let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Error(vec![json!("SCANNER_OPEN")]));
        let scanner = Scanner::new(&bridge);
        scanner
            .scan(|_| panic!("success callback must not fire"), None, Some(get_default_settings()))
            .unwrap();
        assert_eq!(bridge.calls().len(), 1);
    }

    #[test]
    fn second_native_outcome_is_dropped() {
        let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Both {
            result: vec![json!("first")],
            error: vec![json!("USER_CANCELLED")],
        });
        let scanner = Scanner::new(&bridge);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let (tx, rx) = mpsc::channel();

        scanner
            .scan_with(Some(get_default_settings()), move |outcome| {
                counter.fetch_add(1, Ordering::SeqCst);
                tx.send(outcome).unwrap();
            })
            .unwrap();

        assert_eq!(rx.recv().unwrap(), Ok("first".to_string()));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn blocking_scan_waits_for_threaded_reply() {
        let bridge = ScriptedBridge::threaded().with_reply(ScriptedReply::Success(vec![json!("4006381333931")]));
        let scanner = Scanner::new(&bridge);
        let outcome = scanner.scan_blocking(Some(get_default_settings())).unwrap();
        assert_eq!(outcome, Ok("4006381333931".to_string()));
    }

    #[test]
    fn blocking_scan_reports_dropped_completion() {
        let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Silent);
        let scanner = Scanner::new(&bridge);
        let outcome = scanner.scan_blocking(Some(get_default_settings())).unwrap();
        assert!(matches!(outcome, Err(ScanError::Native(_))));
    }

    #[test]
    fn callback_pair_reports_dropped_callbacks() {
        let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Silent);
        let scanner = Scanner::new(&bridge);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let (tx, rx) = mpsc::channel();

        scanner
            .scan(
                |_| panic!("success callback must not fire"),
                Some(Box::new(move |info: ScanErrorInfo| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tx.send(info).unwrap();
                })),
                Some(get_default_settings()),
            )
            .unwrap();

        let info = rx.recv().unwrap();
        assert!(!info.cancelled);
        assert_eq!(info.message, json!("native bridge dropped the scan without reporting an outcome"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn legacy_scan_reports_dropped_callbacks_from_another_thread() {
        let bridge = ScriptedBridge::threaded().with_reply(ScriptedReply::Silent);
        let scanner = Scanner::new(&bridge);
        let (tx, rx) = mpsc::channel();

        scanner
            .scan_legacy(None, Some(Box::new(move |err: Option<ScanErrorInfo>, payload: Option<String>| {
                    tx.send((err, payload)).unwrap()
                })))
            .unwrap();

        let (err, payload) = rx.recv().unwrap();
        assert!(!err.unwrap().cancelled);
        assert_eq!(payload, None);
    }

    #[test]
    fn delivered_outcome_is_not_followed_by_dropped_error() {
        let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Success(vec![json!("ABC")]));
        let scanner = Scanner::new(&bridge);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        scanner
            .scan_with(Some(get_default_settings()), move |outcome| {
                assert_eq!(outcome, Ok("ABC".to_string()));
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn async_scan_resolves() {
        let bridge = ScriptedBridge::threaded().with_reply(ScriptedReply::Error(vec![Value::Null]));
        let scanner = Scanner::new(&bridge);
        let pending = scanner.scan_async(Some(get_default_settings())).unwrap();
        assert_eq!(pending.outcome().await, Err(ScanError::Cancelled));
    }

    #[tokio::test]
    async fn async_scan_without_settings_fails_synchronously() {
        let bridge = ScriptedBridge::new();
        let scanner = Scanner::new(&bridge);
        assert!(scanner.scan_async(None).is_err());
        assert!(bridge.calls().is_empty());
    }

    #[test]
    fn legacy_scan_merges_overrides() {
        let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Success(vec![json!("ABC")]));
        let scanner = Scanner::new(&bridge);
        let (tx, rx) = mpsc::channel();

        scanner
            .scan_legacy(
                Some(SettingsOverride {
                    detector_size: Some(DetectorSize::new(0.3, 0.9)),
                    ..Default::default()
                }),
                Some(Box::new(move |err: Option<ScanErrorInfo>, payload: Option<String>| {
                    tx.send((err, payload)).unwrap()
                })),
            )
            .unwrap();

        assert_eq!(rx.recv().unwrap(), (None, Some("ABC".to_string())));
        assert_eq!(bridge.calls()[0].args, vec![json!(8191), json!(0.3), json!(0.9)]);
    }

    #[test]
    fn legacy_scan_reports_errors_first() {
        let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Error(vec![json!("USER_CANCELLED")]));
        let scanner = Scanner::new(&bridge);
        let (tx, rx) = mpsc::channel();

        scanner
            .scan_legacy(None, Some(Box::new(move |err: Option<ScanErrorInfo>, payload: Option<String>| {
                    tx.send((err, payload)).unwrap()
                })))
            .unwrap();

        let (err, payload) = rx.recv().unwrap();
        assert!(err.unwrap().cancelled);
        assert_eq!(payload, None);
    }

    #[test]
    fn configured_plugin_and_messages() {
        let config = BridgeConfig {
            plugin_id: "com.example.scanner".into(),
            scanner_open_message: "Busy.".into(),
            ..Default::default()
        };
        let bridge = ScriptedBridge::new().with_reply(ScriptedReply::Error(vec![json!("SCANNER_OPEN")]));
        let scanner = Scanner::with_config(&bridge, config);
        let (tx, rx) = mpsc::channel();

        scanner
            .scan(|_| {}, Some(Box::new(move |info: ScanErrorInfo| tx.send(info).unwrap())), Some(get_default_settings()))
            .unwrap();

        assert_eq!(rx.recv().unwrap().message, json!("Busy."));
        assert_eq!(bridge.calls()[0].plugin, "com.example.scanner");
    }
}
