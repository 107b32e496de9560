//! Mapping an RSI value onto the configured thresholds

use crate::config::Thresholds;
use crate::models::signal::SignalKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdZone {
    Overbought,
    Oversold,
    Neutral,
}

impl ThresholdZone {
    /// Signal raised while in this zone, if any
    pub fn signal_kind(self) -> Option<SignalKind> {
        match self {
            ThresholdZone::Overbought => Some(SignalKind::Short),
            ThresholdZone::Oversold => Some(SignalKind::Long),
            ThresholdZone::Neutral => None,
        }
    }
}

/// Both bounds are inclusive; overbought wins if the thresholds overlap.
pub fn classify(value: f64, thresholds: &Thresholds) -> ThresholdZone {
    if value >= thresholds.overbought {
        ThresholdZone::Overbought
    } else if value <= thresholds.oversold {
        ThresholdZone::Oversold
    } else {
        ThresholdZone::Neutral
    }
}
