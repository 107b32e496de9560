pub mod momentum;

pub use momentum::rsi::calculate_rsi;
