//! RSI (Relative Strength Index) indicator

use crate::models::indicators::RsiIndicator;

pub const DEFAULT_RSI_PERIOD: u32 = 14;

/// Calculate RSI over the first `period` price changes of `closes`
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Averages are simple means over the window, not Wilder smoothing.
/// `closes` must be oldest first. Returns `None` when there are fewer than
/// `period + 1` prices, so "no data" is never mistaken for an RSI of 0.
pub fn calculate_rsi(closes: &[f64], period: u32) -> Option<RsiIndicator> {
    let window = period as usize;
    if window == 0 || closes.len() < window + 1 {
        return None;
    }

    let mut gain = 0.0;
    let mut loss = 0.0;
    for pair in closes[..=window].windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gain += change;
        } else {
            loss -= change;
        }
    }

    let avg_gain = gain / period as f64;
    let avg_loss = loss / period as f64;

    if avg_loss == 0.0 {
        return Some(RsiIndicator {
            value: 100.0,
            period,
        });
    }

    let rs = avg_gain / avg_loss;
    Some(RsiIndicator {
        value: 100.0 - (100.0 / (1.0 + rs)),
        period,
    })
}
