//! Process-wide `tracing` subscriber setup: an `EnvFilter` plus a plain
//! formatting layer, without an OpenTelemetry exporter this proxy has no
//! use for.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Install the global `tracing` subscriber for the process.
///
/// `log_level` is an `EnvFilter` directive string (e.g. `"info"` or
/// `"wayproxy_lib=debug,wayproxy=info"`); `RUST_LOG`, if set, overrides it.
pub fn init_tracing(log_level: &str, show_target: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.to_string()));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(show_target);

    let subscriber = Registry::default().with(env_filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("failed to set global tracing subscriber: {e}"))?;

    Ok(())
}

/// Flush buffered output on shutdown.
pub fn shutdown_tracing() {
    use std::io::Write;
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
}
