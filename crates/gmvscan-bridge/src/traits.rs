// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait for reaching native plugin code.

use std::sync::Arc;

use serde_json::Value;

/// Completion handed to the native side. Receives the native value array.
pub type NativeCallback = Box<dyn FnOnce(Vec<Value>) + Send + 'static>;

/// Call-style entry into native plugin code.
///
/// An implementation marshals `plugin`, `action` and the positional `args`
/// to the platform and later invokes `on_result` or `on_error` with the
/// native value array. Both callbacks are `Send`: the platform may finish on
/// any thread, and `exec` may return before either fires.
///
/// Implementations should invoke exactly one of the two callbacks. The scan
/// adapter tolerates a misbehaving platform that calls both, and reports a
/// `Native` error when the platform drops both without calling either.
pub trait NativeBridge: Send + Sync {
    /// Human-readable platform name (e.g. "Android", "Desktop (stub)").
    fn platform_name(&self) -> &str;

    /// Dispatch one native call.
    fn exec(
        &self,
        plugin: &str,
        action: &str,
        args: Vec<Value>,
        on_result: NativeCallback,
        on_error: NativeCallback,
    );
}

impl<T: NativeBridge + ?Sized> NativeBridge for &T {
    fn platform_name(&self) -> &str {
        (**self).platform_name()
    }

    fn exec(
        &self,
        plugin: &str,
        action: &str,
        args: Vec<Value>,
        on_result: NativeCallback,
        on_error: NativeCallback,
    ) {
        (**self).exec(plugin, action, args, on_result, on_error)
    }
}

impl<T: NativeBridge + ?Sized> NativeBridge for Box<T> {
    fn platform_name(&self) -> &str {
        (**self).platform_name()
    }

    fn exec(
        &self,
        plugin: &str,
        action: &str,
        args: Vec<Value>,
        on_result: NativeCallback,
        on_error: NativeCallback,
    ) {
        (**self).exec(plugin, action, args, on_result, on_error)
    }
}

impl<T: NativeBridge + ?Sized> NativeBridge for Arc<T> {
    fn platform_name(&self) -> &str {
        (**self).platform_name()
    }

    fn exec(
        &self,
        plugin: &str,
        action: &str,
        args: Vec<Value>,
        on_result: NativeCallback,
        on_error: NativeCallback,
    ) {
        (**self).exec(plugin, action, args, on_result, on_error)
    }
}
