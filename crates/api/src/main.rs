//! Vitals Monitor - Main Entry Point

use api::{init_logging, run_server, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config file path from the first argument or VITALS_CONFIG
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VITALS_CONFIG").ok());
    let config = ServiceConfig::load(path.as_deref())?;

    init_logging(config.log_format);

    info!("=== Vitals Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Alert cooldown {} minutes, sink timeout {}ms",
        config.alerting.cooldown_minutes, config.alerting.sink_timeout_ms
    );

    run_server(config).await
}
