//! Crate-wide error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("exchange error (code {code}): {message}")]
    Exchange { code: i64, message: String },
    #[error("telegram error: {0}")]
    Telegram(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
