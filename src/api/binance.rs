use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use governor::{Quota, RateLimiter};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;
use std::num::NonZeroU32;
use std::sync::Arc;

use super::{MarketDataSource, OrderVenue};
use crate::config::Credentials;
use crate::models::{Candle, OrderConfirmation, OrderRequest};

pub const BINANCE_API_BASE: &str = "https://api.binance.com";
/// Tolerated clock drift for signed requests (ms)
const RECV_WINDOW: u64 = 5000;
const RATE_LIMIT_RPM: u32 = 600;
const REQUEST_TIMEOUT_SECS: u64 = 10;

type HmacSha256 = Hmac<Sha256>;

type BinanceRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Binance spot REST client
///
/// Klines are public; orders need credentials and are HMAC-SHA256 signed.
/// The secret key is never logged.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    rate_limiter: Arc<BinanceRateLimiter>,
}

/// Response from POST /api/v3/order
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewOrderResponse {
    order_id: u64,
    client_order_id: String,
    status: String,
    executed_qty: String,
}

impl BinanceClient {
    pub fn new(base_url: impl Into<String>, credentials: Option<Credentials>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        let quota = Quota::per_minute(
            NonZeroU32::new(RATE_LIMIT_RPM).context("rate limit must be non-zero")?,
        );

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// `BTC/USDT` -> `BTCUSDT`
    pub fn normalize_symbol(symbol: &str) -> String {
        symbol
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase()
    }

    /// GET /api/v3/klines (public)
    ///
    /// Array indices:
    ///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume, ...
    pub async fn get_klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            Self::normalize_symbol(symbol),
            interval,
            limit
        );

        self.rate_limiter.until_ready().await;

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /api/v3/klines request failed")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("failed to read klines response")?;

        if !status.is_success() {
            anyhow::bail!("Binance GET /api/v3/klines returned {}: {}", status, text);
        }

        let body: serde_json::Value =
            serde_json::from_str(&text).context("failed to parse klines response")?;

        let raw = body.as_array().context("klines response is not an array")?;

        let candles = raw
            .iter()
            .enumerate()
            .map(|(i, entry)| Self::parse_kline(entry).with_context(|| format!("kline {i}")))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(symbol, interval, count = candles.len(), "klines fetched");
        Ok(candles)
    }

    fn parse_kline(entry: &serde_json::Value) -> Result<Candle> {
        let arr = entry.as_array().context("kline entry is not an array")?;
        if arr.len() < 6 {
            anyhow::bail!("kline entry has {} fields, expected at least 6", arr.len());
        }

        let open_time = arr[0].as_i64().context("kline open time is not an integer")?;
        let timestamp = DateTime::<Utc>::from_timestamp_millis(open_time)
            .with_context(|| format!("kline open time {open_time} out of range"))?;

        Ok(Candle {
            timestamp,
            open: Self::parse_str_f64(&arr[1]).context("open")?,
            high: Self::parse_str_f64(&arr[2]).context("high")?,
            low: Self::parse_str_f64(&arr[3]).context("low")?,
            close: Self::parse_str_f64(&arr[4]).context("close")?,
            volume: Self::parse_str_f64(&arr[5]).context("volume")?,
        })
    }

    /// Binance sends decimals as JSON strings
    fn parse_str_f64(value: &serde_json::Value) -> Result<f64> {
        match value {
            serde_json::Value::String(s) => s
                .parse::<f64>()
                .with_context(|| format!("not a number: {s:?}")),
            serde_json::Value::Number(n) => n.as_f64().context("number out of range"),
            other => anyhow::bail!("expected a decimal string, got {other}"),
        }
    }

    /// POST /api/v3/order (signed), MARKET type only
    pub async fn place_market_order(&self, request: &OrderRequest) -> Result<OrderConfirmation> {
        let params = format!(
            "symbol={}&side={}&type={}&quantity={}&newClientOrderId={}",
            Self::normalize_symbol(&request.symbol),
            request.side.as_str(),
            request.kind.as_str(),
            format_quantity(request.quantity),
            request.client_order_id
        );

        let (qs, api_key) = self.signed_query(&params)?;
        let url = format!("{}/api/v3/order?{}", self.base_url, qs);

        self.rate_limiter.until_ready().await;

        tracing::debug!(
            symbol = %request.symbol,
            side = request.side.as_str(),
            quantity = request.quantity,
            "placing market order"
        );

        let resp = self
            .client
            .post(&url)
            .header("X-MBX-APIKEY", api_key)
            .send()
            .await
            .context("POST /api/v3/order request failed")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("failed to read order response")?;

        if !status.is_success() {
            anyhow::bail!("Binance POST /api/v3/order returned {}: {}", status, text);
        }

        let body: serde_json::Value =
            serde_json::from_str(&text).context("failed to parse order response")?;

        let parsed: NewOrderResponse =
            serde_json::from_value(body.clone()).context("unexpected order response shape")?;

        Ok(OrderConfirmation {
            order_id: parsed.order_id.to_string(),
            client_order_id: parsed.client_order_id,
            status: parsed.status,
            executed_quantity: parsed.executed_qty.parse::<f64>().with_context(|| {
                format!("executedQty is not a number: {:?}", parsed.executed_qty)
            })?,
            raw: body,
        })
    }

    /// HMAC-SHA256 hex signature of `query`
    fn sign(secret: &str, query: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid signing key: {e}"))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Append timestamp, recvWindow and signature; returns the query and API key
    fn signed_query(&self, params: &str) -> Result<(String, &str)> {
        let credentials = self
            .credentials
            .as_ref()
            .context("signed endpoint called without credentials")?;

        let ts = Utc::now().timestamp_millis();
        let base = format!("{params}&timestamp={ts}&recvWindow={RECV_WINDOW}");
        let sig = Self::sign(&credentials.secret_key, &base)?;

        Ok((format!("{base}&signature={sig}"), credentials.api_key.as_str()))
    }
}

/// Plain decimal, no trailing zeros
fn format_quantity(quantity: f64) -> String {
    let s = format!("{quantity:.8}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl MarketDataSource for BinanceClient {
    async fn fetch_candles(&self, symbol: &str, timeframe: &str, limit: u32) -> Result<Vec<Candle>> {
        self.get_klines(symbol, timeframe, limit).await
    }
}

impl OrderVenue for BinanceClient {
    async fn submit_market_order(&self, request: &OrderRequest) -> Result<OrderConfirmation> {
        self.place_market_order(request).await
    }
}
