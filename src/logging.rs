//! Tracing subscriber setup for the server binary.

use tracing_subscriber::EnvFilter;

/// Installs a JSON `tracing` subscriber filtered by `RUST_LOG`
/// (default `info`). Call once at startup.
pub fn init(service_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .init();

    tracing::info!(service = service_name, "logging initialized");
}
