// Technical indicators module
// RSI over simple moving averages of gains and losses

pub mod moving_average;
pub mod rsi;

pub use moving_average::calculate_sma;
pub use rsi::{calculate_rsi, calculate_rsi_series, rsi_from_averages, NEUTRAL_RSI};
