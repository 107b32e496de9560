//! Threshold evaluation and per-symbol duplicate suppression.

pub mod evaluation;
pub mod tracker;

pub use evaluation::{classify, ThresholdZone};
pub use tracker::SignalTracker;
