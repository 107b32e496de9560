//! Unit tests for scan timing defaults

use rsi_signal_bot::core::ScanTiming;
use std::time::Duration;

#[test]
fn test_scan_timing_default() {
    let timing = ScanTiming::default();
    assert_eq!(timing.symbol_pause, Duration::from_millis(100));
    assert_eq!(timing.cycle_pause, Duration::from_secs(60));
    assert_eq!(timing.retry_backoff, Duration::from_secs(60));
}
