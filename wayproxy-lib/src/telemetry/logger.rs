//! The logger handle threaded through dispatch (§9 design note): the core
//! protocol layer never calls `tracing::*` macros directly, only through
//! this trait, so that a caller embedding the dispatcher somewhere without
//! a global `tracing` subscriber installed (e.g. a fuzz harness) can supply
//! its own sink instead.

use std::fmt;

/// Severity of a logged event, mirroring the reference implementation's
/// `WP_ERROR`/`WP_DEBUG` levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Warn,
    Error,
}

/// A sink for protocol-layer log events.
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>);
}

/// The default logger, forwarding every call to the `tracing` crate at the
/// appropriate level. This is the only place in the crate that binds the
/// core's logging needs to a concrete backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!("{}", message),
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Warn => tracing::warn!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
        }
    }
}

/// Convenience macro mirroring `tracing::warn!` call sites but routed
/// through a `&dyn Logger` handle instead of the global subscriber.
#[macro_export]
macro_rules! log_via {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger.log($level, format_args!($($arg)*))
    };
}
