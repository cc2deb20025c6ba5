//! CLI command implementations for `hookgrade`.
//!
//! - [`serve`] -- HTTP API.
//! - [`grade`] -- One-off grading from the terminal.
//! - [`config_cmd`] -- Resolved configuration display.

pub mod config_cmd;
pub mod grade;
pub mod serve;

use std::path::Path;

use hookgrade_types::config::{Config, discover_config_path};
use tracing::debug;

/// Load configuration from the given path override or via auto-discovery.
///
/// If `config_override` is provided, loads from that path. Otherwise:
/// 1. `HOOKGRADE_CONFIG` env var
/// 2. `~/.hookgrade/config.json`
///
/// Returns a default `Config` if no config file is found.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<Config> {
    let path = match config_override {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!("config file not found: {path_str}");
            }
            path.to_path_buf()
        }
        None => match discover_config_path() {
            Some(path) => path,
            None => {
                debug!("no config file found, using defaults");
                return Ok(Config::default());
            }
        },
    };

    debug!(path = %path.display(), "loading config");
    Config::from_file(&path)
        .map_err(|e| anyhow::anyhow!("failed to load config {}: {e}", path.display()))
}
