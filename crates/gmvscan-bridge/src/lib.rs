// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! gmvscan — Native barcode scanner bridge.
//!
//! Application code builds [`Settings`], hands them to a [`Scanner`], and
//! receives exactly one outcome: the decoded payload or a classified error.
//! The scanner talks to the platform through the [`NativeBridge`] trait; the
//! platform implementation is picked at compile time by [`platform_bridge`].

pub mod pending;
pub mod scanner;
pub mod scripted;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

pub use gmvscan_core::{
    BridgeConfig, GmvScanError, ScanError, ScanErrorInfo, ScanOutcome, Settings, SettingsOverride,
    get_default_settings,
};
pub use scanner::{ErrorCallback, LegacyCallback, PendingScan, Scanner};
pub use traits::{NativeBridge, NativeCallback};

/// Retrieves the bridge implementation for the target operating system.
///
/// RETURNS: A boxed trait object (`dyn NativeBridge`) that abstracts away
/// the underlying native SDK details.
pub fn platform_bridge() -> Box<dyn NativeBridge> {
    #[cfg(target_os = "android")]
    {
        // Android: Uses `jni-rs` to call into the host's scanner glue.
        Box::new(android::AndroidBridge::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: Every scan reports PLATFORM_UNAVAILABLE.
        Box::new(stub::StubBridge)
    }
}

/// Start a scan through `bridge` with the default bridge configuration.
///
/// Fails immediately, without invoking either callback, when `settings` is
/// `None` or its detector size is out of range. Otherwise exactly one of
/// `on_success` / `on_error` runs once the native side finishes; a missing
/// `on_error` is replaced by a no-op.
pub fn scan<S>(
    bridge: &dyn NativeBridge,
    on_success: S,
    on_error: Option<ErrorCallback>,
    settings: Option<Settings>,
) -> gmvscan_core::error::Result<()>
where
    S: FnOnce(String) + Send + 'static,
{
    Scanner::new(bridge).scan(on_success, on_error, settings)
}
