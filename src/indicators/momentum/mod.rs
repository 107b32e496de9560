//! Momentum oscillators

pub mod rsi;
