//! Process-wide logging setup shared by every fleetdesk binary and test.

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, LogSettings};

/// Initialize JSON logging filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(LogSettings::default());
}

/// Initialize logging with explicit settings.
pub fn init_with(settings: LogSettings) {
    tracing::init(settings);
}
