//! RSI Signal Bot
//!
//! Runs two long-lived tasks: the market scanner, and the Telegram update
//! poller that manages subscriptions and settings. Optionally serves a status
//! HTTP API when `PORT` is set.

use dotenvy::dotenv;
use rsi_signal_bot::alerts::AlertDispatcher;
use rsi_signal_bot::bot::{BotHandler, UpdatePoller};
use rsi_signal_bot::config::{self, ConfigStore};
use rsi_signal_bot::core::http::{start_server, AppState, HealthStatus};
use rsi_signal_bot::core::{restart_channel, MarketScanner};
use rsi_signal_bot::logging;
use rsi_signal_bot::metrics::Metrics;
use rsi_signal_bot::services::{BybitClient, MarketDataProvider, TelegramClient};
use rsi_signal_bot::signals::SignalTracker;
use rsi_signal_bot::subscribers::SubscriberStore;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let env = config::get_environment();
    info!("Starting RSI Signal Bot");
    info!(environment = %env, "Environment");

    let config_path = config::get_config_path();
    let config = ConfigStore::load(&config_path)
        .await
        .map_err(|e| format!("Failed to load config {}: {}", config_path.display(), e))?;

    let mut settings = config.snapshot().await;
    settings.apply_env_overrides();
    settings.validate()?;
    config.set_token(settings.telegram_token.clone()).await;

    let subscribers = match SubscriberStore::load(&settings.subscribers_file).await {
        Ok(store) => store,
        Err(e) => {
            warn!(
                path = %settings.subscribers_file,
                error = %e,
                "Failed to load subscribers, starting with an empty list"
            );
            SubscriberStore::with_path(&settings.subscribers_file)
        }
    };

    let metrics = Arc::new(Metrics::new()?);
    metrics.subscribers.set(subscribers.len().await as i64);

    let telegram = TelegramClient::with_base_url(
        &config::get_telegram_url(),
        settings.telegram_token.clone(),
    );
    let provider: Arc<dyn MarketDataProvider> =
        Arc::new(BybitClient::with_base_url(&config::get_bybit_url()));

    let tracker = SignalTracker::new();
    let (restart_handle, restart_receiver) = restart_channel();

    let dispatcher = Arc::new(
        AlertDispatcher::new(Arc::new(telegram.clone()), subscribers.clone())
            .with_metrics(metrics.clone()),
    );

    info!(
        timeframe = %settings.timeframe,
        limit = settings.limit,
        rsi_period = settings.rsi_period,
        overbought = settings.overbought,
        oversold = settings.oversold,
        "Scan parameters"
    );

    if let Some(port) = config::get_http_port() {
        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            config: config.clone(),
            tracker: tracker.clone(),
            subscribers: subscribers.clone(),
        };
        tokio::spawn(async move {
            if let Err(e) = start_server(port, state).await {
                error!(error = %e, "HTTP server error");
            }
        });
    }

    let handler = BotHandler::new(
        telegram.clone(),
        config.clone(),
        subscribers.clone(),
        restart_handle,
    );
    let poller = UpdatePoller::new(telegram, handler);
    let poller_handle = tokio::spawn(poller.run());

    let scanner = MarketScanner::new(provider, config, tracker, dispatcher, restart_receiver)
        .with_metrics(metrics);
    let scanner_handle = tokio::spawn(scanner.run());

    info!("Bot started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
        }
        result = scanner_handle => {
            error!(result = ?result, "Scanner task exited");
        }
        result = poller_handle => {
            error!(result = ?result, "Update poller task exited");
        }
    }

    Ok(())
}
