//! RSI signal bot: scans exchange markets, computes RSI per symbol and
//! pushes overbought/oversold alerts to chat subscribers.

pub mod alerts;
pub mod bot;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod subscribers;

pub use error::{BotError, Result};
