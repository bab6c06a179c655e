//! Lightweight atomic counters for messages dispatched, bytes forwarded,
//! and damage bytes recorded. Deliberately simpler than an exported metrics
//! endpoint: this proxy has no HTTP surface to serve `/metrics` from, so the
//! counters exist for `tracing` spans and tests to read, not for scraping.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-connection dispatch counters, safe to share across the two direction
/// tasks via an `Arc`.
#[derive(Debug, Default)]
pub struct Metrics {
    pub messages_dispatched: AtomicU64,
    pub bytes_forwarded: AtomicU64,
    pub damage_bytes_recorded: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_message(&self, byte_len: u64) {
        self.messages_dispatched.fetch_add(1, Ordering::Relaxed);
        self.bytes_forwarded.fetch_add(byte_len, Ordering::Relaxed);
    }

    pub fn record_damage(&self, bytes: u64) {
        self.damage_bytes_recorded.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_dispatched: self.messages_dispatched.load(Ordering::Relaxed),
            bytes_forwarded: self.bytes_forwarded.load(Ordering::Relaxed),
            damage_bytes_recorded: self.damage_bytes_recorded.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time read of [`Metrics`], convenient for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub messages_dispatched: u64,
    pub bytes_forwarded: u64,
    pub damage_bytes_recorded: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let m = Metrics::new();
        m.record_message(32);
        m.record_message(16);
        m.record_damage(100);
        let snap = m.snapshot();
        assert_eq!(snap.messages_dispatched, 2);
        assert_eq!(snap.bytes_forwarded, 48);
        assert_eq!(snap.damage_bytes_recorded, 100);
    }
}
