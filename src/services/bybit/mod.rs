//! Bybit v5 REST market data (linear perpetuals)

mod client;

pub use client::BybitClient;
