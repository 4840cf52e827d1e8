use super::moving_average::calculate_sma;

/// RSI reported for a perfectly flat window
pub const NEUTRAL_RSI: f64 = 50.0;

/// Calculate Relative Strength Index (RSI) for the most recent price
///
/// RSI measures the magnitude of recent price changes to evaluate
/// overbought or oversold conditions.
///
/// Values:
/// - RSI > 70: Overbought
/// - RSI < 30: Oversold
///
/// Returns `None` until `period` price changes exist (`period + 1` prices).
pub fn calculate_rsi(prices: &[f64], period: usize) -> Option<f64> {
    calculate_rsi_series(prices, period).last().copied().flatten()
}

/// RSI for every price, aligned 1:1 with `prices`
///
/// The first `period` entries are `None`. Averages are simple moving
/// averages of the trailing `period` gains and losses.
pub fn calculate_rsi_series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut series = vec![None; prices.len()];
    if period == 0 || prices.len() < period + 1 {
        return series;
    }

    let mut gains = Vec::with_capacity(prices.len() - 1);
    let mut losses = Vec::with_capacity(prices.len() - 1);

    for pair in prices.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    // gains[j] is the change into prices[j + 1]
    for (i, slot) in series.iter_mut().enumerate().skip(period) {
        let avg_gain = calculate_sma(&gains[..i], period);
        let avg_loss = calculate_sma(&losses[..i], period);

        if let (Some(avg_gain), Some(avg_loss)) = (avg_gain, avg_loss) {
            *slot = Some(rsi_from_averages(avg_gain, avg_loss));
        }
    }

    series
}

/// Turn average gain/loss into RSI
///
/// A window with no losses saturates at 100, unless it also has no gains,
/// in which case it is neutral (50).
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return NEUTRAL_RSI;
        }
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_calculation() {
        // Test with known values
        let prices = vec![
            44.0, 44.25, 44.5, 43.75, 44.0, 44.5, 45.0, 45.5, 45.25, 45.5,
            46.0, 46.5, 46.25, 46.0, 46.5,
        ];

        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi.is_some());

        let rsi_value = rsi.unwrap();
        assert!(rsi_value > 0.0 && rsi_value < 100.0);
    }

    #[test]
    fn test_rsi_known_value() {
        // 3 up moves of 1.0, 1 down move of 1.0 -> RS = 3, RSI = 75
        let prices = vec![10.0, 11.0, 12.0, 11.0, 12.0];
        let rsi = calculate_rsi(&prices, 4).unwrap();
        assert!((rsi - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let prices = vec![100.0, 102.0, 101.0];
        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi.is_none());
    }

    #[test]
    fn test_rsi_zero_period() {
        let prices = vec![100.0, 102.0, 101.0];
        assert!(calculate_rsi(&prices, 0).is_none());
        assert!(calculate_rsi_series(&prices, 0).iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_all_gains() {
        let prices = vec![100.0, 101.0, 102.0, 103.0, 104.0, 105.0];
        let rsi = calculate_rsi(&prices, 5);
        assert!(rsi.is_some());
        assert_eq!(rsi.unwrap(), 100.0);  // All gains = RSI 100
    }

    #[test]
    fn test_rsi_all_losses() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        assert_eq!(calculate_rsi(&prices, 14), Some(0.0));
    }

    #[test]
    fn test_rsi_flat_market_is_neutral() {
        for price in [0.5, 86.0, 42_000.0] {
            let prices = vec![price; 30];
            let series = calculate_rsi_series(&prices, 14);

            assert!(series[..14].iter().all(Option::is_none));
            assert!(series[14..].iter().all(|v| *v == Some(NEUTRAL_RSI)));
        }
    }

    #[test]
    fn test_rsi_both_averages_zero() {
        assert_eq!(rsi_from_averages(0.0, 0.0), 50.0);
        assert_eq!(rsi_from_averages(1.5, 0.0), 100.0);
        assert_eq!(rsi_from_averages(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_rsi_series_alignment() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + (i % 3) as f64).collect();
        let series = calculate_rsi_series(&prices, 14);

        assert_eq!(series.len(), prices.len());
        assert!(series[..14].iter().all(Option::is_none));
        assert!(series[14..].iter().all(Option::is_some));
        assert_eq!(series.last().copied().flatten(), calculate_rsi(&prices, 14));
    }

    #[test]
    fn test_rsi_window_slides() {
        // Old losses fall out of the window, leaving only gains
        let mut prices: Vec<f64> = (0..5).map(|i| 100.0 - i as f64).collect();
        prices.extend((1..=5).map(|i| 96.0 + i as f64));

        let series = calculate_rsi_series(&prices, 4);
        assert_eq!(series[9], Some(100.0));
        assert_eq!(series[4], Some(0.0));
    }

    #[test]
    fn test_rsi_bounded() {
        let prices = vec![
            10.0, 13.0, 9.0, 15.0, 14.0, 2.0, 20.0, 19.5, 19.7, 30.0, 1.0, 8.0, 8.0,
            7.0, 12.0, 11.0,
        ];
        for value in calculate_rsi_series(&prices, 3).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
