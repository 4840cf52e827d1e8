use crate::models::Signal;

/// RSI levels that trigger a trade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

/// Map the latest RSI to a signal
///
/// Strictly below `rsi_oversold` buys, strictly above `rsi_overbought`
/// sells. Values on a threshold, between them, or NaN hold.
pub fn generate_signal(rsi: f64, thresholds: &SignalThresholds) -> Signal {
    if rsi < thresholds.rsi_oversold {
        Signal::Buy
    } else if rsi > thresholds.rsi_overbought {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversold_buys() {
        let thresholds = SignalThresholds::default();
        assert_eq!(generate_signal(0.0, &thresholds), Signal::Buy);
        assert_eq!(generate_signal(29.99, &thresholds), Signal::Buy);
    }

    #[test]
    fn test_overbought_sells() {
        let thresholds = SignalThresholds::default();
        assert_eq!(generate_signal(70.01, &thresholds), Signal::Sell);
        assert_eq!(generate_signal(100.0, &thresholds), Signal::Sell);
    }

    #[test]
    fn test_threshold_values_hold() {
        let thresholds = SignalThresholds::default();
        assert_eq!(generate_signal(30.0, &thresholds), Signal::Hold);
        assert_eq!(generate_signal(70.0, &thresholds), Signal::Hold);
        assert_eq!(generate_signal(50.0, &thresholds), Signal::Hold);
    }

    #[test]
    fn test_nan_holds() {
        assert_eq!(
            generate_signal(f64::NAN, &SignalThresholds::default()),
            Signal::Hold
        );
    }

    #[test]
    fn test_sweep_is_total_and_ordered() {
        let pairs = [(30.0, 70.0), (20.0, 80.0), (45.0, 55.0), (50.0, 50.0)];

        for (oversold, overbought) in pairs {
            let thresholds = SignalThresholds {
                rsi_oversold: oversold,
                rsi_overbought: overbought,
            };

            for step in 0..=1000 {
                let rsi = step as f64 / 10.0;
                let expected = if rsi < oversold {
                    Signal::Buy
                } else if rsi > overbought {
                    Signal::Sell
                } else {
                    Signal::Hold
                };
                assert_eq!(generate_signal(rsi, &thresholds), expected, "rsi={rsi}");
            }

            assert_eq!(generate_signal(oversold, &thresholds), Signal::Hold);
            assert_eq!(generate_signal(overbought, &thresholds), Signal::Hold);
        }
    }
}
