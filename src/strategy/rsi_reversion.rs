use super::signals::{generate_signal, SignalThresholds};
use super::{Evaluation, Strategy};
use crate::indicators::calculate_rsi;
use crate::models::Candle;

/// Buy oversold, sell overbought, on a single RSI
#[derive(Debug, Clone)]
pub struct RsiStrategy {
    rsi_period: usize,
    thresholds: SignalThresholds,
}

impl RsiStrategy {
    pub fn new(rsi_period: usize, thresholds: SignalThresholds) -> Self {
        Self {
            rsi_period,
            thresholds,
        }
    }
}

impl Default for RsiStrategy {
    fn default() -> Self {
        Self::new(14, SignalThresholds::default())
    }
}

impl Strategy for RsiStrategy {
    fn evaluate(&self, candles: &[Candle]) -> Option<Evaluation> {
        if candles.len() < self.min_candles_required() {
            return None;
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let rsi = calculate_rsi(&closes, self.rsi_period)?;
        let price = *closes.last()?;
        let signal = generate_signal(rsi, &self.thresholds);

        tracing::debug!(rsi = %format!("{:.2}", rsi), price, ?signal, "RSI evaluated");

        Some(Evaluation { rsi, signal, price })
    }

    fn name(&self) -> &str {
        "RSI Reversion"
    }

    fn min_candles_required(&self) -> usize {
        self.rsi_period + 1
    }
}
