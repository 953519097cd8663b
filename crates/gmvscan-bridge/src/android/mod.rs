// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. The scanner itself (camera preview, Mobile
// Vision detectors, the scanning Activity) lives on the Java side; this
// module only hands it the positional request and collects the outcome.
//
// ## Host contract
//
// The host app ships a class `org.hyperpolymath.gmvscan.ScannerHost` with
//
//   static void exec(Activity activity, String plugin, String action,
//                    int detectorTypes, double width, double height,
//                    long token)
//
// which launches the scanning Activity and returns immediately. When the
// Activity finishes, the host calls exactly one of the native methods
//
//   static native void nativeOnScanResult(long token, String payload)
//   static native void nativeOnScanError(long token, String code)
//
// with the same token. `code` may be null, which reads as a cancellation.
// A host that gives up on a scan without an outcome (for example because the
// scanning Activity was destroyed) calls
//
//   static native void nativeOnScanAbandoned(long token)
//   static native void nativeOnHostDestroyed()
//
// and the affected scans finish with a `Native` error.
//
// `ScannerHost` is loaded through the Activity's class loader, so scans may
// start from threads the JVM did not create.

#![cfg(target_os = "android")]

use std::sync::LazyLock;

use jni::JNIEnv;
use jni::objects::{JClass, JObject, JString, JValue};
use jni::sys::jlong;
use serde_json::Value;

use gmvscan_core::ScanRequest;
use gmvscan_core::error::{GmvScanError, Result};

use crate::pending::PendingCalls;
use crate::traits::{NativeBridge, NativeCallback};

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Java class implementing the host contract, as a binary name for
/// `ClassLoader.loadClass`.
pub const HOST_CLASS: &str = "org.hyperpolymath.gmvscan.ScannerHost";

/// JNI signature of `ScannerHost.exec`.
const EXEC_SIGNATURE: &str =
    "(Landroid/app/Activity;Ljava/lang/String;Ljava/lang/String;IDDJ)V";

/// Run `f` with a [`JNIEnv`] attached to the current thread and the hosting
/// Activity.
///
/// Uses `ndk_context::android_context()` for the `JavaVM*` and the Activity
/// `jobject` set by `android_main` or `ANativeActivity_onCreate`.
fn with_activity<T>(f: impl FnOnce(&mut JNIEnv, &JObject) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| GmvScanError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| GmvScanError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(GmvScanError::Bridge(
            "Android context is null — native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    let activity = unsafe { JObject::from_raw(ptr.cast()) };

    f(&mut *env, &activity)
}

/// Convenience: map any `jni::errors::Error` into `GmvScanError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> GmvScanError {
    GmvScanError::Bridge(format!("{context}: {e}"))
}

/// Load the host class through the Activity's class loader.
///
/// `FindClass` on a thread attached from native code only sees the system
/// class loader, which cannot resolve application classes.
fn host_class<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject,
) -> jni::errors::Result<JClass<'local>> {
    let loader = env
        .call_method(activity, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])?
        .l()?;
    let name = env.new_string(HOST_CLASS)?;
    let class = env
        .call_method(
            &loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&name)],
        )?
        .l()?;
    Ok(JClass::from(class))
}

// ---------------------------------------------------------------------------
// Pending scans
// ---------------------------------------------------------------------------

/// Scans dispatched to Java and not yet finished, keyed by token.
static PENDING: LazyLock<PendingCalls> = LazyLock::new(PendingCalls::new);

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the native bridge.
///
/// The struct is zero-sized; in-flight scans live in a process-wide table
/// because their completions arrive through static JNI entry points.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge.
    ///
    /// This does **not** touch JNI — the first JNI call happens lazily when
    /// a scan is started.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }

    fn exec(
        &self,
        plugin: &str,
        action: &str,
        args: Vec<Value>,
        on_result: NativeCallback,
        on_error: NativeCallback,
    ) {
        let request = match ScanRequest::from_args(&args) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(error = %e, "Android: refusing malformed scan request");
                on_error(vec![Value::String(e.to_string())]);
                return;
            }
        };

        let token = PENDING.register(on_result, on_error);

        tracing::info!(
            token,
            plugin,
            action,
            bitmask = request.bitmask,
            "Android: dispatching scan to host"
        );

        let dispatched = with_activity(|env, activity| {
            let detector_types = i32::try_from(request.bitmask).map_err(|_| {
                GmvScanError::MalformedRequest(format!("bitmask {} exceeds jint", request.bitmask))
            })?;
            let j_plugin: JString = env
                .new_string(plugin)
                .map_err(|e| jni_err("new_string(plugin)", e))?;
            let j_action: JString = env
                .new_string(action)
                .map_err(|e| jni_err("new_string(action)", e))?;

            let called = host_class(env, activity).and_then(|class| {
                env.call_static_method(
                    &class,
                    "exec",
                    EXEC_SIGNATURE,
                    &[
                        JValue::Object(activity),
                        JValue::Object(&j_plugin),
                        JValue::Object(&j_action),
                        JValue::Int(detector_types),
                        JValue::Double(request.width),
                        JValue::Double(request.height),
                        JValue::Long(token),
                    ],
                )
            });
            if let Err(e) = called {
                // A pending Java exception would poison every later JNI call
                // on this thread.
                let _ = env.exception_clear();
                return Err(jni_err("ScannerHost.exec", e));
            }
            Ok(())
        });

        if let Err(e) = dispatched {
            tracing::error!(token, error = %e, "Android: scan dispatch failed");
            if let Some(call) = PENDING.take(token) {
                (call.on_error)(vec![Value::String(e.to_string())]);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JNI entry points called by ScannerHost
// ---------------------------------------------------------------------------

/// Read a possibly-null Java string as a JSON value (`null` when absent).
fn string_value(env: &mut JNIEnv, s: &JString) -> Value {
    if s.is_null() {
        return Value::Null;
    }
    match env.get_string(s) {
        Ok(java_str) => Value::String(java_str.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Android: unreadable string from host");
            let _ = env.exception_clear();
            Value::Null
        }
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_gmvscan_ScannerHost_nativeOnScanResult<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    token: jlong,
    payload: JString<'local>,
) {
    let payload = string_value(&mut env, &payload);
    match PENDING.take(token) {
        Some(call) => (call.on_result)(vec![payload]),
        None => tracing::warn!(token, "Android: result for unknown or finished scan"),
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_gmvscan_ScannerHost_nativeOnScanError<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    token: jlong,
    code: JString<'local>,
) {
    let code = string_value(&mut env, &code);
    match PENDING.take(token) {
        Some(call) => (call.on_error)(vec![code]),
        None => tracing::warn!(token, "Android: error for unknown or finished scan"),
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_gmvscan_ScannerHost_nativeOnScanAbandoned<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    token: jlong,
) {
    if !PENDING.abandon(token) {
        tracing::warn!(token, "Android: abandon for unknown or finished scan");
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_gmvscan_ScannerHost_nativeOnHostDestroyed<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    let abandoned = PENDING.abandon_all();
    tracing::info!(abandoned, "Android: host destroyed");
}
