// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

/// Client configuration shared by the CLI and the library defaults.
#[derive(Debug, Clone, clap::Args)]
pub struct Config {
    /// Base URL of the backend API.
    #[arg(long, env = "STOREFRONT_API_URL", default_value = "http://localhost:8080/api/v1")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "STOREFRONT_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Path of the session file. Defaults to `session.json` in the state dir.
    #[arg(long, env = "STOREFRONT_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Default page size for list queries.
    #[arg(long, env = "STOREFRONT_PAGE_SIZE", default_value_t = 12)]
    pub page_size: u32,

    /// Log format (json or text).
    #[arg(long, env = "STOREFRONT_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "STOREFRONT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolved session file path.
    pub fn session_path(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| state_dir().join("session.json"))
    }
}

/// Resolve the state directory for persisted client data.
///
/// Checks `STOREFRONT_STATE_DIR`, then `$XDG_STATE_HOME/storefront`,
/// then `$HOME/.local/state/storefront`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STOREFRONT_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("storefront");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/storefront");
    }
    PathBuf::from(".storefront")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
