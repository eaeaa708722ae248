//! Structured logging utilities for the scenario client.
//!
//! Helper functions for recurring events, so that every call site logs them
//! with the same fields through the `tracing` crate.

use std::fmt::Display;

/// Log targets of this package: the library and the `skip-client` binary.
pub const TARGETS: [&str; 2] = ["skip_scenario_client", "skip_client"];

/// `EnvFilter` directives used when `RUST_LOG` is unset: `level` for every
/// target of this package, nothing from dependencies.
pub fn default_filter(level: &str) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Log a configuration file that could not be used.
pub fn log_config_fallback(error: &dyn Display) {
    tracing::warn!("Failed to load config: {}. Using defaults.", error);
}

/// Log configuration file loading.
pub fn log_config_loaded(path: &str) {
    tracing::debug!(path, "Configuration loaded");
}

/// Log scenario file loading.
pub fn log_scenarios_loaded(source: &str, count: usize) {
    tracing::info!(source, count, "Scenarios loaded");
}

/// Log a step handed to the step sink.
pub fn log_step_dispatched(position: usize, kind: &str) {
    tracing::debug!(step = position, kind, "Step dispatched");
}

/// Log a settled write or delete batch.
pub fn log_batch_settled(kind: &str, calls: usize, rejected: usize) {
    if rejected > 0 {
        tracing::warn!(kind, calls, rejected, "Batch settled with failures");
    } else {
        tracing::debug!(kind, calls, "Batch settled");
    }
}

/// Log a newly opened subscription.
pub fn log_subscription_opened(resource: &str, uuid: &str) {
    tracing::info!(resource, uuid, "Subscription opened");
}

/// Log a released subscription.
pub fn log_subscription_closed(resource: &str, uuid: &str) {
    tracing::info!(resource, uuid, "Subscription closed");
}

/// Log an event received on a subscription.
pub fn log_stream_event(resource: &str, event: &str, entries: usize) {
    tracing::debug!(resource, event, entries, "Stream event");
}

/// Log interactive mode start.
pub fn log_repl_started(scenarios: usize) {
    tracing::info!(scenarios, "Interactive console started");
}
