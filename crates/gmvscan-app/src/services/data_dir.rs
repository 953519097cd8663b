// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

/// File name of the bridge config inside the data directory.
pub const CONFIG_FILE: &str = "bridge.json";

/// Return the application data directory. Nothing is created on disk; the
/// host only ever reads from it.
pub fn data_dir() -> PathBuf {
    dirs_fallback().join("gmvscan")
}

/// Default location of the bridge config file.
pub fn default_config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE)
}

fn dirs_fallback() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from("/tmp")
}
