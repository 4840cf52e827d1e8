use crate::api::MarketDataSource;
use crate::error::DataFetchError;
use crate::models::Candle;

/// Latest window of candles for the traded symbol
///
/// Every fetch replaces the whole window; nothing is merged or cached
/// between calls.
pub struct CandleStore<S> {
    source: S,
    latest: Vec<Candle>,
}

impl<S: MarketDataSource> CandleStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            latest: Vec::new(),
        }
    }

    /// Fetch up to `limit` candles, oldest first, and validate them
    pub async fn fetch(
        &mut self,
        symbol: &str,
        timeframe: &str,
        limit: u32,
    ) -> Result<&[Candle], DataFetchError> {
        let mut candles = self
            .source
            .fetch_candles(symbol, timeframe, limit)
            .await
            .map_err(DataFetchError::Connector)?;

        let limit = limit as usize;
        if candles.len() > limit {
            tracing::debug!(
                received = candles.len(),
                limit,
                "Source returned more candles than requested, keeping most recent"
            );
            candles.drain(..candles.len() - limit);
        }

        validate_candles(&candles)?;

        self.latest = candles;
        Ok(&self.latest)
    }

    /// Candles from the last successful fetch
    pub fn latest(&self) -> &[Candle] {
        &self.latest
    }
}

/// Check candles are usable: non-empty, sane prices, strictly increasing time
pub fn validate_candles(candles: &[Candle]) -> Result<(), DataFetchError> {
    if candles.is_empty() {
        return Err(DataFetchError::Empty);
    }

    for (i, candle) in candles.iter().enumerate() {
        let prices = [candle.open, candle.high, candle.low, candle.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(DataFetchError::Malformed(format!(
                "candle {} at {} has a non-positive or non-finite price",
                i, candle.timestamp
            )));
        }
        if !candle.volume.is_finite() || candle.volume < 0.0 {
            return Err(DataFetchError::Malformed(format!(
                "candle {} at {} has invalid volume {}",
                i, candle.timestamp, candle.volume
            )));
        }
    }

    for (i, pair) in candles.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(DataFetchError::NonMonotonic { index: i + 1 });
        }
    }

    Ok(())
}
