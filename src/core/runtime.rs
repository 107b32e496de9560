//! Market scan loop
//!
//! One cycle fetches the symbol universe, then evaluates each symbol in turn:
//! fresh config snapshot, candles, RSI, threshold zone, duplicate filter,
//! alert. A pending restart request is checked before every symbol and
//! abandons the rest of the cycle. The loop runs until the process exits.

use crate::alerts::dispatcher::AlertDispatcher;
use crate::config::ConfigStore;
use crate::core::restart::RestartReceiver;
use crate::error::Result;
use crate::indicators::calculate_rsi;
use crate::metrics::Metrics;
use crate::models::indicators::closes;
use crate::models::signal::{SignalEvent, SignalKind};
use crate::services::market_data::MarketDataProvider;
use crate::signals::{classify, SignalTracker};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Pauses of the scan loop
///
/// `symbol_pause` throttles requests against the exchange quota and must not
/// be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTiming {
    pub symbol_pause: Duration,
    pub cycle_pause: Duration,
    pub retry_backoff: Duration,
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self {
            symbol_pause: Duration::from_millis(100),
            cycle_pause: Duration::from_secs(60),
            retry_backoff: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Universe fetch failed or returned no symbols
    UniverseUnavailable,
    /// A restart request arrived after `processed` symbols
    Restarted { processed: usize },
    Completed { processed: usize, failed: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolOutcome {
    Emitted(SignalKind),
    Suppressed(SignalKind),
    Cleared,
    InsufficientData,
}

pub struct MarketScanner {
    provider: Arc<dyn MarketDataProvider>,
    config: ConfigStore,
    tracker: SignalTracker,
    dispatcher: Arc<AlertDispatcher>,
    restart: RestartReceiver,
    timing: ScanTiming,
    metrics: Option<Arc<Metrics>>,
}

impl MarketScanner {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        config: ConfigStore,
        tracker: SignalTracker,
        dispatcher: Arc<AlertDispatcher>,
        restart: RestartReceiver,
    ) -> Self {
        Self {
            provider,
            config,
            tracker,
            dispatcher,
            restart,
            timing: ScanTiming::default(),
            metrics: None,
        }
    }

    pub fn with_timing(mut self, timing: ScanTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Scan forever
    pub async fn run(mut self) {
        info!(
            symbol_pause_ms = self.timing.symbol_pause.as_millis() as u64,
            cycle_pause_secs = self.timing.cycle_pause.as_secs(),
            "MarketScanner: started"
        );

        loop {
            match self.run_cycle().await {
                CycleOutcome::UniverseUnavailable => {
                    tokio::time::sleep(self.timing.retry_backoff).await;
                }
                CycleOutcome::Restarted { .. } => {}
                CycleOutcome::Completed { processed, failed } => {
                    info!(
                        processed,
                        failed,
                        "Scan finished, next run in {}s",
                        self.timing.cycle_pause.as_secs()
                    );
                    tokio::time::sleep(self.timing.cycle_pause).await;
                }
            }
        }
    }

    /// One pass over the current universe
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        info!("Starting market scan");

        let universe = match self.provider.get_universe().await {
            Ok(symbols) if !symbols.is_empty() => symbols,
            Ok(_) => {
                warn!(
                    "Symbol universe is empty, retrying in {}s",
                    self.timing.retry_backoff.as_secs()
                );
                return CycleOutcome::UniverseUnavailable;
            }
            Err(e) => {
                error!(
                    error = %e,
                    "Failed to fetch symbol universe, retrying in {}s",
                    self.timing.retry_backoff.as_secs()
                );
                return CycleOutcome::UniverseUnavailable;
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.universe_size.set(universe.len() as i64);
        }

        let mut processed = 0;
        let mut failed = 0;
        for symbol in &universe {
            if self.restart.take_pending() {
                info!(
                    processed,
                    remaining = universe.len() - processed,
                    "Restarting scan: timeframe or candle count changed"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.scan_restarts_total.inc();
                }
                return CycleOutcome::Restarted { processed };
            }

            if let Err(e) = self.process_symbol(symbol).await {
                warn!(symbol = %symbol, error = %e, "Skipping {}: {}", symbol, e);
                failed += 1;
                if let Some(metrics) = &self.metrics {
                    metrics.symbol_failures_total.inc();
                }
            }
            processed += 1;
            if let Some(metrics) = &self.metrics {
                metrics.symbols_processed_total.inc();
            }

            tokio::time::sleep(self.timing.symbol_pause).await;
        }

        if let Some(metrics) = &self.metrics {
            metrics.scan_cycles_total.inc();
        }
        CycleOutcome::Completed { processed, failed }
    }

    /// Evaluate one symbol against a fresh config snapshot
    pub async fn process_symbol(&self, symbol: &str) -> Result<SymbolOutcome> {
        let config = self.config.run_config().await;

        let candles = self
            .provider
            .get_candles(symbol, &config.timeframe, config.limit)
            .await?;

        let Some(rsi) = calculate_rsi(&closes(&candles), config.rsi_period) else {
            debug!(
                symbol = %symbol,
                candles = candles.len(),
                period = config.rsi_period,
                "Not enough candles for RSI"
            );
            return Ok(SymbolOutcome::InsufficientData);
        };

        debug!(symbol = %symbol, rsi = rsi.value, "{} RSI={:.2}", symbol, rsi.value);

        let Some(kind) = classify(rsi.value, &config.thresholds).signal_kind() else {
            self.tracker.clear(symbol).await;
            return Ok(SymbolOutcome::Cleared);
        };

        if !self.tracker.should_emit(symbol, &kind).await {
            return Ok(SymbolOutcome::Suppressed(kind));
        }

        if let Some(metrics) = &self.metrics {
            metrics.alerts_emitted_total.inc();
        }
        let event = SignalEvent::new(
            symbol,
            kind.clone(),
            rsi.value,
            config.timeframe,
            config.limit,
        );
        self.dispatcher.dispatch(&event).await;

        Ok(SymbolOutcome::Emitted(kind))
    }
}
