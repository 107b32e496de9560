//! Runtime configuration: the JSON settings file, its in-memory store and
//! environment lookups.
//!
//! The scan loop never holds the config lock across I/O. It takes a
//! [`RunConfig`] snapshot per symbol and works on the copy.

use crate::error::{BotError, Result};
use crate::indicators::momentum::rsi::DEFAULT_RSI_PERIOD;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_BYBIT_URL: &str = "https://api.bybit.com";
pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";

/// Settings persisted in `config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Candle interval in minutes ("5", "15", "60", ...)
    pub timeframe: String,
    /// Number of candles requested per symbol
    pub limit: u32,
    pub rsi_period: u32,
    /// RSI at or above this emits SHORT
    pub overbought: f64,
    /// RSI at or below this emits LONG
    pub oversold: f64,
    pub telegram_token: String,
    pub subscribers_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeframe: "5".to_string(),
            limit: 100,
            rsi_period: DEFAULT_RSI_PERIOD,
            overbought: 80.0,
            oversold: 20.0,
            telegram_token: String::new(),
            subscribers_file: "subscribers.json".to_string(),
        }
    }
}

impl AppConfig {
    /// Apply environment overrides (`TELEGRAM_TOKEN`)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = env::var("TELEGRAM_TOKEN") {
            if !token.trim().is_empty() {
                self.telegram_token = token.trim().to_string();
            }
        }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            timeframe: self.timeframe.clone(),
            limit: self.limit,
            rsi_period: self.rsi_period,
            thresholds: Thresholds {
                overbought: self.overbought,
                oversold: self.oversold,
            },
        }
    }

    /// Fail fast on settings the process cannot run without
    pub fn validate(&self) -> Result<()> {
        if self.telegram_token.is_empty() {
            return Err(BotError::Config(
                "telegram_token is empty (set it in the config file or TELEGRAM_TOKEN)".to_string(),
            ));
        }
        if self.limit == 0 || self.rsi_period == 0 {
            return Err(BotError::Config(
                "limit and rsi_period must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub overbought: f64,
    pub oversold: f64,
}

/// Snapshot of the parameters one symbol evaluation runs with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub timeframe: String,
    pub limit: u32,
    pub rsi_period: u32,
    pub thresholds: Thresholds,
}

/// A single settings change coming from the chat surface
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigUpdate {
    Timeframe(String),
    Limit(u32),
    RsiPeriod(u32),
    Overbought(f64),
    Oversold(f64),
}

impl ConfigUpdate {
    /// Timeframe and candle count change what gets fetched, so the running
    /// scan has to start over. Period and thresholds are read per symbol.
    pub fn requires_restart(&self) -> bool {
        matches!(self, ConfigUpdate::Timeframe(_) | ConfigUpdate::Limit(_))
    }

    pub fn apply(&self, config: &mut AppConfig) {
        match self {
            ConfigUpdate::Timeframe(tf) => config.timeframe = tf.clone(),
            ConfigUpdate::Limit(limit) => config.limit = *limit,
            ConfigUpdate::RsiPeriod(period) => config.rsi_period = *period,
            ConfigUpdate::Overbought(value) => config.overbought = *value,
            ConfigUpdate::Oversold(value) => config.oversold = *value,
        }
    }
}

/// File contents plus the in-memory token override
struct StoreState {
    file: AppConfig,
    token_override: Option<String>,
}

impl StoreState {
    fn new(file: AppConfig) -> Self {
        Self {
            file,
            token_override: None,
        }
    }

    fn effective(&self) -> AppConfig {
        let mut config = self.file.clone();
        if let Some(token) = &self.token_override {
            config.telegram_token = token.clone();
        }
        config
    }
}

/// Shared, file-backed configuration
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<StoreState>>,
    path: Option<PathBuf>,
    persist_lock: Arc<Mutex<()>>,
}

impl ConfigStore {
    /// Load from `path`. A missing file is created with defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let config = match tokio::fs::read(&path).await {
            Ok(data) => serde_json::from_slice::<AppConfig>(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Config file not found, writing defaults");
                let config = AppConfig::default();
                write_json(&path, &config).await?;
                config
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(StoreState::new(config))),
            path: Some(path),
            persist_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Store without a backing file
    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreState::new(config))),
            path: None,
            persist_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Effective settings, token override included
    pub async fn snapshot(&self) -> AppConfig {
        self.inner.read().await.effective()
    }

    pub async fn run_config(&self) -> RunConfig {
        self.inner.read().await.file.run_config()
    }

    /// Override the token in memory only; the file keeps its own value.
    pub async fn set_token(&self, token: String) {
        self.inner.write().await.token_override = Some(token);
    }

    /// Apply `update` and rewrite the file. Persistence failures are logged;
    /// the in-memory change stays in effect either way.
    pub async fn apply(&self, update: &ConfigUpdate) -> AppConfig {
        let _guard = self.persist_lock.lock().await;
        let (file, effective) = {
            let mut state = self.inner.write().await;
            update.apply(&mut state.file);
            (state.file.clone(), state.effective())
        };

        if let Some(path) = &self.path {
            if let Err(e) = write_json(path, &file).await {
                warn!(path = %path.display(), error = %e, "Failed to persist config");
            }
        }

        info!(update = ?update, "Config updated");
        effective
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, data).await?;
    Ok(())
}

/// Deployment environment, selects the log format
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "sandbox".to_string())
        .to_lowercase()
}

pub fn get_config_path() -> PathBuf {
    env::var("CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Port for the status HTTP server; unset means no server
pub fn get_http_port() -> Option<u16> {
    env::var("PORT").ok().and_then(|p| p.parse().ok())
}

pub fn get_bybit_url() -> String {
    env::var("BYBIT_BASE_URL").unwrap_or_else(|_| DEFAULT_BYBIT_URL.to_string())
}

pub fn get_telegram_url() -> String {
    env::var("TELEGRAM_API_URL").unwrap_or_else(|_| DEFAULT_TELEGRAM_URL.to_string())
}
