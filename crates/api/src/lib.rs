//! Vitals Monitor API Server
//!
//! REST service in front of the vitals alert engine: synchronous evaluation,
//! queued ingest for the background monitor, and alert management.

use alerting::{run_monitor, AlertOrchestrator, MonitorStats, PatientReading};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use storage::AlertStore;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, Level};
use vital_signs::ThresholdTable;

pub mod config;
mod error;
pub mod rate_limit;
mod routes;

pub use crate::config::{ConfigError, LogFormat, ServiceConfig};
pub use error::ApiError;

/// Application state shared across handlers
pub struct AppState {
    pub orchestrator: AlertOrchestrator,
    pub store: Arc<AlertStore>,
    pub table: Arc<ThresholdTable>,
    /// Queue feeding the background monitor
    pub ingest: mpsc::Sender<PatientReading>,
    /// Prometheus exporter, when installed
    pub metrics: Option<PrometheusHandle>,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the engine together; returns the state and the ingest receiver
    pub fn new(
        config: &ServiceConfig,
        table: ThresholdTable,
    ) -> (Self, mpsc::Receiver<PatientReading>) {
        let table = Arc::new(table);
        let store = Arc::new(AlertStore::with_retention(config.retention));
        let orchestrator =
            AlertOrchestrator::new(Arc::clone(&table), store.clone(), &config.alerting);
        let (ingest, rx) = mpsc::channel(config.ingest_queue.max(1));

        let state = Self {
            orchestrator,
            store,
            table,
            ingest,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        };
        (state, rx)
    }
}

/// Health response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub alert_count: usize,
    pub unacknowledged_count: usize,
    pub vitals_tracked: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/vitals/evaluate", post(routes::vitals::evaluate))
        .route("/api/v1/vitals/ingest", post(routes::vitals::ingest))
        .route("/api/v1/alerts", get(routes::alerts::get_alerts))
        .route("/api/v1/alerts/:id/acknowledge", post(routes::alerts::acknowledge))
        .route("/api/v1/thresholds", get(routes::thresholds::get_thresholds))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        alert_count: state.store.len(),
        unacknowledged_count: state.store.unacknowledged_count(),
        vitals_tracked: state.table.len(),
    })
}

/// Prometheus scrape endpoint
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics exporter not installed".to_string()),
    }
}

/// Run the monitor loop over the ingest queue until every sender is dropped
pub fn spawn_monitor(
    mut rx: mpsc::Receiver<PatientReading>,
    orchestrator: AlertOrchestrator,
) -> JoinHandle<MonitorStats> {
    tokio::spawn(async move { run_monitor(&mut rx, &orchestrator).await })
}

/// Initialize logging
pub fn init_logging(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        debug!("Tracing subscriber already installed");
    }
}

/// Run the server
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let table = config.threshold_table()?;
    let governor = rate_limit::create_governor_config(&config.rate_limit)?;

    let (mut state, rx) = AppState::new(&config, table);
    state.metrics = Some(PrometheusBuilder::new().install_recorder()?);

    let monitor = spawn_monitor(rx, state.orchestrator.clone());
    let app = create_router(Arc::new(state))
        .layer(GovernorLayer { config: governor })
        .layer(TraceLayer::new_for_http());

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    monitor.abort();
    Ok(())
}
