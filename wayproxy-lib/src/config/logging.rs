use serde::Deserialize;

/// Logging configuration: application-level structured logging via
/// `tracing`, not the proxied protocol's own `wl_display.error` events.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string, e.g. `"info"` or
    /// `"wayproxy_lib=debug,wayproxy=info"`. Overridable at runtime via
    /// `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Show the module path (target) in log messages.
    #[serde(default)]
    pub show_target: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
