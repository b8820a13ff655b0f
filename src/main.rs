//! Attendance server entrypoint.
//!
//! Reads the configuration path from `ATTENDANCE_CONFIG`
//! (default `./config/attendance.yaml`) and serves the API until Ctrl-C.

use std::net::SocketAddr;

use attendance_engine::api::{AppState, create_router};
use attendance_engine::config::ConfigLoader;
use attendance_engine::logging;
use tokio::net::TcpListener;

const DEFAULT_CONFIG_PATH: &str = "./config/attendance.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("attendance-server");

    let config_path =
        std::env::var("ATTENDANCE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let loader = ConfigLoader::load_or_default(&config_path)?;
    tracing::info!(
        config_path = %config_path,
        utc_offset = %loader.utc_offset(),
        "configuration loaded"
    );

    let addr: SocketAddr = loader.config().server.bind_address.parse()?;
    let router = create_router(AppState::with_system_clock(loader.utc_offset()));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown requested");
    }
}
