use crate::config::DEFAULT_BYBIT_URL;
use crate::error::{BotError, Result};
use crate::models::indicators::Candle;
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const INSTRUMENTS_PAGE_SIZE: &str = "1000";
const TRADING_STATUS: &str = "Trading";

#[derive(Debug, Deserialize)]
struct InstrumentsResponse {
    #[serde(rename = "retCode")]
    ret_code: i64,
    #[serde(rename = "retMsg", default)]
    ret_msg: String,
    #[serde(default)]
    result: InstrumentsResult,
}

#[derive(Debug, Default, Deserialize)]
struct InstrumentsResult {
    #[serde(default)]
    list: Vec<Instrument>,
    #[serde(rename = "nextPageCursor", default)]
    next_page_cursor: String,
}

#[derive(Debug, Deserialize)]
struct Instrument {
    symbol: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct KlineResponse {
    #[serde(rename = "retCode")]
    ret_code: i64,
    #[serde(rename = "retMsg", default)]
    ret_msg: String,
    #[serde(default)]
    result: KlineResult,
}

#[derive(Debug, Default, Deserialize)]
struct KlineResult {
    /// Newest first: [startTime, open, high, low, close, volume, turnover]
    #[serde(default)]
    list: Vec<Vec<String>>,
}

/// Bybit API client
#[derive(Debug, Clone)]
pub struct BybitClient {
    base_url: String,
    category: String,
    client: reqwest::Client,
}

impl BybitClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BYBIT_URL)
    }

    /// Client against a custom base URL (tests, proxies)
    pub fn with_base_url(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            category: "linear".to_string(),
            client,
        }
    }

    /// Symbols currently in `Trading` status, following pagination
    pub async fn fetch_trading_symbols(&self) -> Result<Vec<String>> {
        let url = format!("{}/v5/market/instruments-info", self.base_url);
        let mut symbols = Vec::new();
        let mut cursor = String::new();

        loop {
            let mut query = vec![
                ("category", self.category.as_str()),
                ("limit", INSTRUMENTS_PAGE_SIZE),
            ];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.as_str()));
            }

            let response: InstrumentsResponse = self
                .client
                .get(&url)
                .query(&query)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if response.ret_code != 0 {
                return Err(BotError::Exchange {
                    code: response.ret_code,
                    message: response.ret_msg,
                });
            }

            symbols.extend(
                response
                    .result
                    .list
                    .into_iter()
                    .filter(|i| i.status == TRADING_STATUS)
                    .map(|i| i.symbol),
            );

            let next = response.result.next_page_cursor;
            if next.is_empty() || next == cursor {
                break;
            }
            cursor = next;
        }

        debug!(count = symbols.len(), "Fetched {} trading symbols", symbols.len());
        Ok(symbols)
    }

    /// Candles for `symbol`, oldest first
    ///
    /// `interval` is Bybit's interval code: minutes ("1", "5", "60", ...) or "D"/"W"/"M".
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        let url = format!("{}/v5/market/kline", self.base_url);
        let limit = limit.to_string();

        let response: KlineResponse = self
            .client
            .get(&url)
            .query(&[
                ("category", self.category.as_str()),
                ("symbol", symbol),
                ("interval", interval),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.ret_code != 0 {
            return Err(BotError::Exchange {
                code: response.ret_code,
                message: response.ret_msg,
            });
        }

        let mut candles: Vec<Candle> = response
            .result
            .list
            .iter()
            .filter_map(|row| parse_kline_row(row))
            .collect();
        candles.sort_by_key(|c| c.timestamp);

        Ok(candles)
    }
}

impl Default for BybitClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows with a missing or unparsable field are skipped
fn parse_kline_row(row: &[String]) -> Option<Candle> {
    if row.len() < 6 {
        return None;
    }
    let start_ms: i64 = row[0].parse().ok()?;
    Some(Candle::new(
        row[1].parse().ok()?,
        row[2].parse().ok()?,
        row[3].parse().ok()?,
        row[4].parse().ok()?,
        row[5].parse().ok()?,
        DateTime::from_timestamp_millis(start_ms)?,
    ))
}

#[async_trait]
impl MarketDataProvider for BybitClient {
    async fn get_universe(&self) -> Result<Vec<String>> {
        self.fetch_trading_symbols().await
    }

    async fn get_candles(&self, symbol: &str, timeframe: &str, limit: u32) -> Result<Vec<Candle>> {
        self.fetch_klines(symbol, timeframe, limit).await
    }
}
