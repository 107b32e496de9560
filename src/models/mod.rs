//! Shared data models spanning the scanner, tracker and dispatcher.

pub mod indicators;
pub mod signal;

pub use indicators::{closes, Candle, RsiIndicator};
pub use signal::{SignalEvent, SignalKind};
