//! Market data provider interface consumed by the scanner.

use crate::error::Result;
use crate::models::indicators::Candle;
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Tradable symbols, in a stable order for the duration of one scan
    async fn get_universe(&self) -> Result<Vec<String>>;

    /// Historical candles for a symbol, oldest first
    async fn get_candles(&self, symbol: &str, timeframe: &str, limit: u32) -> Result<Vec<Candle>>;
}
