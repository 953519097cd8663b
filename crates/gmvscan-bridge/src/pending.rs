// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Token-keyed table of native calls awaiting their completion.
//
// Used by bridges whose outcomes come back through static entry points
// (JNI `native` methods) that can only carry a numeric token. Every entry
// leaves the table exactly once: resolved by the host, or abandoned.
// Abandoning drops both callbacks, which the scan adapter reports as a
// `Native` "dropped" error.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::traits::NativeCallback;

/// The callback pair of one dispatched call.
pub struct PendingCall {
    pub on_result: NativeCallback,
    pub on_error: NativeCallback,
}

/// Calls dispatched to the platform and not yet finished.
#[derive(Default)]
pub struct PendingCalls {
    calls: Mutex<HashMap<i64, PendingCall>>,
    next_token: AtomicI64,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a call and return its token. Tokens start at 1 and never repeat.
    pub fn register(&self, on_result: NativeCallback, on_error: NativeCallback) -> i64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        self.lock().insert(token, PendingCall { on_result, on_error });
        token
    }

    /// Remove a call so it can be resolved. A token is only ever taken once.
    pub fn take(&self, token: i64) -> Option<PendingCall> {
        self.lock().remove(&token)
    }

    /// Drop a call the host will never finish. Returns whether it was pending.
    pub fn abandon(&self, token: i64) -> bool {
        // The callbacks are dropped outside the lock.
        let call = self.take(token);
        if call.is_some() {
            tracing::warn!(token, "abandoning pending native call");
        }
        call.is_some()
    }

    /// Drop every pending call. Returns how many were abandoned.
    pub fn abandon_all(&self) -> usize {
        let drained: Vec<(i64, PendingCall)> = self.lock().drain().collect();
        if !drained.is_empty() {
            tracing::warn!(count = drained.len(), "abandoning all pending native calls");
        }
        drained.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, PendingCall>> {
        self.calls.lock().expect("pending calls lock poisoned")
    }
}
