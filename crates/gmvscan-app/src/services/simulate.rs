// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `--simulate` reply parsing.
//
//   result:<payload>   native success with <payload>
//   error:<code>       native error with <code> (`error:null` or `error` for a null code)
//   silent             native side never answers

use gmvscan_bridge::scripted::ScriptedReply;
use serde_json::Value;

pub fn parse_reply(spec: &str) -> Result<ScriptedReply, String> {
    let (kind, arg) = match spec.split_once(':') {
        Some((kind, arg)) => (kind, Some(arg)),
        None => (spec, None),
    };
    match (kind, arg) {
        ("result", Some(payload)) => Ok(ScriptedReply::Success(vec![Value::String(payload.into())])),
        ("error", None) | ("error", Some("null")) => Ok(ScriptedReply::Error(vec![Value::Null])),
        ("error", Some(code)) => Ok(ScriptedReply::Error(vec![Value::String(code.into())])),
        ("silent", None) => Ok(ScriptedReply::Silent),
        _ => Err(format!(
            "unknown simulated reply '{spec}' (expected result:<payload>, error:<code>, or silent)"
        )),
    }
}
