/// Calculate Simple Moving Average (SMA) of the trailing `period` values
pub fn calculate_sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let sum: f64 = values.iter().rev().take(period).sum();
    Some(sum / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let prices = vec![100.0, 102.0, 104.0, 106.0, 108.0];
        let sma = calculate_sma(&prices, 5);
        assert_eq!(sma, Some(104.0));
    }

    #[test]
    fn test_sma_uses_trailing_values() {
        let prices = vec![1.0, 1.0, 4.0, 6.0];
        assert_eq!(calculate_sma(&prices, 2), Some(5.0));
    }

    #[test]
    fn test_sma_insufficient_data() {
        let prices = vec![100.0, 102.0];
        let sma = calculate_sma(&prices, 5);
        assert!(sma.is_none());
    }

    #[test]
    fn test_sma_zero_period() {
        assert!(calculate_sma(&[1.0, 2.0], 0).is_none());
    }
}
