//! Core application primitives: the scan loop, its restart signal and the
//! status HTTP surface

pub mod http;
pub mod restart;
pub mod runtime;

pub use restart::{restart_channel, RestartHandle, RestartReceiver};
pub use runtime::{CycleOutcome, MarketScanner, ScanTiming, SymbolOutcome};
