use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of alert raised for a symbol.
///
/// `Other` carries labels for kinds added later; they render with the
/// generic template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Short,
    Long,
    Other(String),
}

impl SignalKind {
    pub fn label(&self) -> &str {
        match self {
            SignalKind::Short => "SHORT",
            SignalKind::Long => "LONG",
            SignalKind::Other(label) => label,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A new signal confirmed by the tracker, ready to be broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub symbol: String,
    pub kind: SignalKind,
    pub value: f64,
    pub timeframe: String,
    pub limit: u32,
    pub timestamp: DateTime<Utc>,
}

impl SignalEvent {
    pub fn new(
        symbol: impl Into<String>,
        kind: SignalKind,
        value: f64,
        timeframe: impl Into<String>,
        limit: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            value,
            timeframe: timeframe.into(),
            limit,
            timestamp: Utc::now(),
        }
    }
}
