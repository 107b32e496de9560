//! Status HTTP server using Axum

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::config::ConfigStore;
use crate::metrics::Metrics;
use crate::signals::SignalTracker;
use crate::subscribers::SubscriberStore;

pub const SERVICE_NAME: &str = "rsi-signal-bot";

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub config: ConfigStore,
    pub tracker: SignalTracker,
    pub subscribers: SubscriberStore,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Symbols whose last alert has not been cleared by a neutral reading yet
async fn list_signals(State(state): State<AppState>) -> Json<Value> {
    let signals: BTreeMap<String, String> = state
        .tracker
        .snapshot()
        .await
        .into_iter()
        .map(|(symbol, kind)| (symbol, kind.label().to_string()))
        .collect();

    Json(json!({
        "count": signals.len(),
        "signals": signals,
    }))
}

/// Current scan parameters; the bot token is never exposed
async fn current_config(State(state): State<AppState>) -> Json<Value> {
    let config = state.config.run_config().await;
    let subscribers = state.subscribers.len().await;
    Json(json!({
        "timeframe": config.timeframe,
        "limit": config.limit,
        "rsi_period": config.rsi_period,
        "overbought": config.thresholds.overbought,
        "oversold": config.thresholds.oversold,
        "subscribers": subscribers,
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals", get(list_signals))
        .route("/api/config", get(current_config))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
