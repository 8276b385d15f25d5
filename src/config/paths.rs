use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::{Config, CONFIG_PATH_ENV, DEFAULT_PORT};

impl Config {
    /// Base URL of the drive server, e.g. `http://127.0.0.1:8888`.
    /// Accepts `{host}[:{port}]` as well as full URLs
    pub fn base_url(&self) -> String {
        let address = self.server_address.trim().trim_end_matches('/');
        let (scheme, rest) = match address.split_once("://") {
            Some((scheme, rest)) => (scheme, rest),
            None => ("http", address),
        };

        let (host, path) = match rest.find('/') {
            Some(ix) => rest.split_at(ix),
            None => (rest, ""),
        };
        let host = if host.is_empty() { "127.0.0.1" } else { host };
        // Skip the brackets of an IPv6 literal when looking for a port.
        let has_port = host
            .rsplit_once(']')
            .map_or(host, |(_, tail)| tail)
            .contains(':');

        if let Some(port) = host.strip_prefix(':') {
            format!("{scheme}://127.0.0.1:{port}{path}")
        } else if has_port {
            format!("{scheme}://{host}{path}")
        } else {
            format!("{scheme}://{host}:{DEFAULT_PORT}{path}")
        }
    }
}

/// Get the path to the config.json file
/// Looks for config.json next to the executable unless overridden
pub(super) fn get_config_path() -> PathBuf {
    if let Ok(custom) = env::var(CONFIG_PATH_ENV) {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        debug!(path = %exe_path.display(), "Executable path detected");

        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.json");
            if config_path.exists() {
                debug!(path = %config_path.display(), "Using config next to executable");
                return config_path;
            }
        }
    }

    // Fallback: look in current directory
    warn!("Using fallback: looking for config.json in current directory");
    PathBuf::from("config.json")
}
