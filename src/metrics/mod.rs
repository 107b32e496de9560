//! Prometheus metrics for the scan loop and alert fan-out

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub scan_cycles_total: IntCounter,
    pub scan_restarts_total: IntCounter,
    pub symbols_processed_total: IntCounter,
    pub symbol_failures_total: IntCounter,
    pub alerts_emitted_total: IntCounter,
    pub alert_deliveries_failed_total: IntCounter,
    pub universe_size: IntGauge,
    pub subscribers: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let scan_cycles_total =
            IntCounter::new("scan_cycles_total", "Completed passes over the symbol universe")?;
        let scan_restarts_total = IntCounter::new(
            "scan_restarts_total",
            "Scans abandoned because of a reconfiguration request",
        )?;
        let symbols_processed_total =
            IntCounter::new("symbols_processed_total", "Symbols evaluated")?;
        let symbol_failures_total = IntCounter::new(
            "symbol_failures_total",
            "Symbols skipped because candles could not be fetched",
        )?;
        let alerts_emitted_total =
            IntCounter::new("alerts_emitted_total", "Signals that passed the duplicate filter")?;
        let alert_deliveries_failed_total = IntCounter::new(
            "alert_deliveries_failed_total",
            "Alert messages that could not be delivered to a subscriber",
        )?;
        let universe_size = IntGauge::new("universe_size", "Symbols in the latest universe")?;
        let subscribers = IntGauge::new("subscribers", "Current subscriber count")?;

        registry.register(Box::new(scan_cycles_total.clone()))?;
        registry.register(Box::new(scan_restarts_total.clone()))?;
        registry.register(Box::new(symbols_processed_total.clone()))?;
        registry.register(Box::new(symbol_failures_total.clone()))?;
        registry.register(Box::new(alerts_emitted_total.clone()))?;
        registry.register(Box::new(alert_deliveries_failed_total.clone()))?;
        registry.register(Box::new(universe_size.clone()))?;
        registry.register(Box::new(subscribers.clone()))?;

        Ok(Self {
            registry,
            scan_cycles_total,
            scan_restarts_total,
            symbols_processed_total,
            symbol_failures_total,
            alerts_emitted_total,
            alert_deliveries_failed_total,
            universe_size,
            subscribers,
        })
    }

    /// Render all metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
