use std::time::Duration;

use serde::{Deserialize, Serialize};

const MIN_BACKOFF_MS: u64 = 100;

/// Configuration for the drive mirror client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_server_address")]
    pub server_address: String,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    #[serde(default = "default_action_timeout_secs")]
    pub action_timeout_secs: u64,

    #[serde(default)]
    pub watch_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: default_server_address(),
            backoff_ms: default_backoff_ms(),
            action_timeout_secs: default_action_timeout_secs(),
            watch_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms.max(MIN_BACKOFF_MS))
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_secs(self.action_timeout_secs.max(1))
    }
}

fn default_server_address() -> String {
    "127.0.0.1:8888".to_string()
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_action_timeout_secs() -> u64 {
    30
}
