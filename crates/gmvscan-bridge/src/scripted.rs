// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory bridge that replays queued native replies.
//
// Records every call it receives so the positional arguments can be
// inspected, and answers each call with the next queued reply. Used by the
// adapter tests and by the app's `--simulate` mode.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::traits::{NativeBridge, NativeCallback};

/// Error code reported when a call arrives with no reply queued.
pub const NO_SCRIPTED_REPLY_CODE: &str = "NO_SCRIPTED_REPLY";

/// How the simulated native side finishes one call.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedReply {
    /// Invoke the result callback with these values.
    Success(Vec<Value>),
    /// Invoke the error callback with these values.
    Error(Vec<Value>),
    /// Misbehave: invoke the result callback, then the error callback.
    Both { result: Vec<Value>, error: Vec<Value> },
    /// Drop both callbacks without invoking either.
    Silent,
}

/// One call observed by the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub plugin: String,
    pub action: String,
    pub args: Vec<Value>,
}

/// Scriptable bridge for tests and simulation.
#[derive(Default)]
pub struct ScriptedBridge {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<RecordedCall>>,
    threaded: bool,
}

impl ScriptedBridge {
    /// Bridge that answers synchronously, inside `exec`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bridge that answers from a separate thread after `exec` returns,
    /// the way a real platform does.
    pub fn threaded() -> Self {
        Self {
            threaded: true,
            ..Self::default()
        }
    }

    /// Queue a reply for a future call.
    pub fn push_reply(&self, reply: ScriptedReply) {
        self.replies
            .lock()
            .expect("replies lock poisoned")
            .push_back(reply);
    }

    /// Builder form of [`ScriptedBridge::push_reply`].
    pub fn with_reply(self, reply: ScriptedReply) -> Self {
        self.push_reply(reply);
        self
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

impl NativeBridge for ScriptedBridge {
    fn platform_name(&self) -> &str {
        "Scripted"
    }

    fn exec(
        &self,
        plugin: &str,
        action: &str,
        args: Vec<Value>,
        on_result: NativeCallback,
        on_error: NativeCallback,
    ) {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(RecordedCall {
                plugin: plugin.to_string(),
                action: action.to_string(),
                args,
            });

        let reply = self
            .replies
            .lock()
            .expect("replies lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                tracing::warn!(plugin, action, "no scripted reply queued");
                ScriptedReply::Error(vec![Value::String(NO_SCRIPTED_REPLY_CODE.into())])
            });

        let deliver = move || match reply {
            ScriptedReply::Success(values) => on_result(values),
            ScriptedReply::Error(values) => on_error(values),
            ScriptedReply::Both { result, error } => {
                on_result(result);
                on_error(error);
            }
            ScriptedReply::Silent => {}
        };

        if self.threaded {
            std::thread::spawn(deliver);
        } else {
            deliver();
        }
    }
}
