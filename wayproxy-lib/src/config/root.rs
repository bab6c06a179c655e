use serde::Deserialize;

use super::logging::LoggingConfig;

/// Connection timeouts, in milliseconds.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TimeoutConfig {
    /// How long to wait for the initial connection to either socket.
    #[serde(default = "default_connect_ms")]
    pub connect_ms: u64,
    /// How long a direction loop may sit idle before the connection is
    /// considered dead.
    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,
}

fn default_connect_ms() -> u64 {
    5_000
}

fn default_idle_ms() -> u64 {
    60_000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { connect_ms: default_connect_ms(), idle_ms: default_idle_ms() }
    }
}

fn default_merge_margin() -> i32 {
    1024
}

/// Top-level proxy configuration, loaded from TOML.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Unix socket path this process listens on for incoming client
    /// connections (the proxy stands in as the compositor from the
    /// client's point of view). At least one of `listen`/`connect` must be
    /// set.
    #[serde(default)]
    pub listen: Option<String>,
    /// Unix socket path of the real compositor this process connects to
    /// and relays traffic toward.
    #[serde(default)]
    pub connect: Option<String>,
    /// Coalescing slack for the damage-interval merge algorithm, in bytes.
    /// Must be strictly greater than 8.
    #[serde(default = "default_merge_margin")]
    pub merge_margin: i32,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
