// Trading strategy module
pub mod rsi_reversion;
pub mod signals;

pub use rsi_reversion::RsiStrategy;
pub use signals::{generate_signal, SignalThresholds};

use crate::models::{Candle, Signal};

/// What a strategy concluded from the latest candles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub rsi: f64,
    pub signal: Signal,
    /// Close of the most recent candle
    pub price: f64,
}

/// Base trait for all trading strategies
pub trait Strategy: Send + Sync {
    /// Evaluate the most recent candle, `None` if there is not enough history
    fn evaluate(&self, candles: &[Candle]) -> Option<Evaluation>;

    /// Get strategy name
    fn name(&self) -> &str;

    /// Minimum candles required for this strategy
    fn min_candles_required(&self) -> usize;
}
