//! Fake collaborators shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use rsi_signal_bot::alerts::{MessageSender, RenderedMessage};
use rsi_signal_bot::core::RestartHandle;
use rsi_signal_bot::models::Candle;
use rsi_signal_bot::services::MarketDataProvider;
use rsi_signal_bot::{BotError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Candles built from close prices, one minute apart, oldest first
pub fn candles(closes: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let timestamp = start + Duration::minutes(i as i64);
            Candle::new(*close, *close, *close, *close, 1.0, timestamp)
        })
        .collect()
}

/// Strictly rising prices: RSI 100
pub fn rising(len: usize) -> Vec<f64> {
    (0..len).map(|i| 100.0 + i as f64).collect()
}

/// Strictly falling prices: RSI 0
pub fn falling(len: usize) -> Vec<f64> {
    (0..len).map(|i| 200.0 - i as f64).collect()
}

/// Alternating 10/11: RSI 50
pub fn neutral(len: usize) -> Vec<f64> {
    (0..len).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect()
}

pub fn symbols(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("S{}", i)).collect()
}

pub struct FakeProvider {
    universe: Mutex<std::result::Result<Vec<String>, String>>,
    series: Mutex<HashMap<String, Vec<f64>>>,
    failing: Mutex<HashSet<String>>,
    restart_on: Mutex<Option<(String, RestartHandle)>>,
    fetched: Mutex<Vec<(String, String, u32)>>,
    pub universe_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(universe: Vec<String>) -> Self {
        Self {
            universe: Mutex::new(Ok(universe)),
            series: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            restart_on: Mutex::new(None),
            fetched: Mutex::new(Vec::new()),
            universe_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_universe(message: &str) -> Self {
        let provider = Self::new(Vec::new());
        *provider.universe.lock().unwrap() = Err(message.to_string());
        provider
    }

    /// Closes returned for `symbol`; unknown symbols get a neutral series
    pub fn set_series(&self, symbol: &str, closes: Vec<f64>) {
        self.series.lock().unwrap().insert(symbol.to_string(), closes);
    }

    pub fn fail_symbol(&self, symbol: &str) {
        self.failing.lock().unwrap().insert(symbol.to_string());
    }

    /// Request a restart the first time `symbol` is fetched
    pub fn restart_on(&self, symbol: &str, handle: RestartHandle) {
        *self.restart_on.lock().unwrap() = Some((symbol.to_string(), handle));
    }

    /// (symbol, timeframe, limit) of every candle request, in order
    pub fn fetched(&self) -> Vec<(String, String, u32)> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn fetched_symbols(&self) -> Vec<String> {
        self.fetched().into_iter().map(|(symbol, _, _)| symbol).collect()
    }

    pub fn universe_calls(&self) -> usize {
        self.universe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    async fn get_universe(&self) -> Result<Vec<String>> {
        self.universe_calls.fetch_add(1, Ordering::SeqCst);
        self.universe
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| BotError::Exchange { code: 10001, message })
    }

    async fn get_candles(&self, symbol: &str, timeframe: &str, limit: u32) -> Result<Vec<Candle>> {
        self.fetched
            .lock()
            .unwrap()
            .push((symbol.to_string(), timeframe.to_string(), limit));

        {
            let mut restart_on = self.restart_on.lock().unwrap();
            if restart_on.as_ref().is_some_and(|(trigger, _)| trigger == symbol) {
                if let Some((_, handle)) = restart_on.take() {
                    handle.request();
                }
            }
        }

        if self.failing.lock().unwrap().contains(symbol) {
            return Err(BotError::Exchange {
                code: 10006,
                message: "Too many visits".to_string(),
            });
        }

        let closes = self
            .series
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| neutral(30));
        Ok(candles(&closes))
    }
}

/// Records every delivered message; configured chats always fail
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(i64, RenderedMessage)>>,
    failing: Mutex<HashSet<i64>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, chat_id: i64) {
        self.failing.lock().unwrap().insert(chat_id);
    }

    pub fn sent(&self) -> Vec<(i64, RenderedMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn recipients(&self) -> Vec<i64> {
        self.sent().into_iter().map(|(chat_id, _)| chat_id).collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, chat_id: i64, message: &RenderedMessage) -> Result<()> {
        if self.failing.lock().unwrap().contains(&chat_id) {
            return Err(BotError::Telegram("Forbidden: bot was blocked by the user".to_string()));
        }
        self.sent.lock().unwrap().push((chat_id, message.clone()));
        Ok(())
    }
}
