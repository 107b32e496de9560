//! Unit tests for threshold classification

use rsi_signal_bot::config::Thresholds;
use rsi_signal_bot::models::SignalKind;
use rsi_signal_bot::signals::{classify, SignalTracker, ThresholdZone};

fn thresholds() -> Thresholds {
    Thresholds {
        overbought: 80.0,
        oversold: 20.0,
    }
}

#[test]
fn test_bounds_are_inclusive() {
    assert_eq!(classify(80.0, &thresholds()), ThresholdZone::Overbought);
    assert_eq!(classify(20.0, &thresholds()), ThresholdZone::Oversold);
    assert_eq!(classify(79.99, &thresholds()), ThresholdZone::Neutral);
    assert_eq!(classify(20.01, &thresholds()), ThresholdZone::Neutral);
}

#[test]
fn test_zone_signal_kinds() {
    assert_eq!(ThresholdZone::Overbought.signal_kind(), Some(SignalKind::Short));
    assert_eq!(ThresholdZone::Oversold.signal_kind(), Some(SignalKind::Long));
    assert_eq!(ThresholdZone::Neutral.signal_kind(), None);
}

#[test]
fn test_overlapping_thresholds_prefer_overbought() {
    let t = Thresholds {
        overbought: 40.0,
        oversold: 60.0,
    };
    assert_eq!(classify(50.0, &t), ThresholdZone::Overbought);
}

/// Evaluate one reading the way the scanner does
async fn scan(tracker: &SignalTracker, value: f64) -> Option<SignalKind> {
    match classify(value, &thresholds()).signal_kind() {
        Some(kind) => tracker.should_emit("BTCUSDT", &kind).await.then_some(kind),
        None => {
            tracker.clear("BTCUSDT").await;
            None
        }
    }
}

#[tokio::test]
async fn test_overbought_fires_once_until_neutral() {
    let tracker = SignalTracker::new();

    assert_eq!(scan(&tracker, 85.0).await, Some(SignalKind::Short));
    assert_eq!(scan(&tracker, 85.0).await, None);
    assert_eq!(scan(&tracker, 50.0).await, None);
    assert_eq!(tracker.last_signal("BTCUSDT").await, None);
    assert_eq!(scan(&tracker, 85.0).await, Some(SignalKind::Short));
}

#[tokio::test]
async fn test_direct_flip_fires_without_neutral() {
    let tracker = SignalTracker::new();

    assert_eq!(scan(&tracker, 90.0).await, Some(SignalKind::Short));
    assert_eq!(scan(&tracker, 10.0).await, Some(SignalKind::Long));
    assert_eq!(scan(&tracker, 95.0).await, Some(SignalKind::Short));
}
