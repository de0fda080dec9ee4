//! Gate.io USDT-margined futures candlestick client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::CandleSource;
use crate::error::{AppError, Result};
use crate::types::{Candle, CandleSeries};

const GATEIO_API_URL: &str = "https://api.gateio.ws/api/v4";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Gate.io candlestick entry. Prices arrive as strings.
#[derive(Debug, Deserialize)]
struct GateIoCandle {
    t: i64,
    #[serde(default)]
    v: Option<f64>,
    o: String,
    h: String,
    l: String,
    c: String,
}

impl GateIoCandle {
    fn into_candle(self) -> Result<Candle> {
        let parse = |field: &str, value: &str| -> Result<f64> {
            value.parse::<f64>().map_err(|_| {
                AppError::ExternalApi(format!("Gate.io {} is not a number: {:?}", field, value))
            })
        };

        Ok(Candle {
            timestamp: self.t,
            open: parse("open", &self.o)?,
            high: parse("high", &self.h)?,
            low: parse("low", &self.l)?,
            close: parse("close", &self.c)?,
            volume: self.v.unwrap_or(0.0),
        })
    }
}

/// Gate.io REST client.
#[derive(Clone)]
pub struct GateIoClient {
    client: Client,
    base_url: String,
}

impl GateIoClient {
    /// Create a new Gate.io client.
    pub fn new(base_url: Option<String>) -> Self {
        let client = Client::builder()
            .user_agent("Trendwatch/1.0")
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| GATEIO_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Turn a raw response body into an ordered candle series.
    ///
    /// Sorts by timestamp and drops repeated timestamps (keeping the last).
    pub fn parse_candles(body: &str) -> Result<CandleSeries> {
        let raw: Vec<GateIoCandle> = serde_json::from_str(body)?;

        let mut candles = raw
            .into_iter()
            .map(GateIoCandle::into_candle)
            .collect::<Result<Vec<_>>>()?;

        candles.sort_by_key(|c| c.timestamp);
        let before = candles.len();
        // dedup_by keeps the first of a run; reverse so the latest copy wins
        candles.reverse();
        candles.dedup_by_key(|c| c.timestamp);
        candles.reverse();
        if candles.len() < before {
            debug!("Dropped {} duplicate Gate.io candles", before - candles.len());
        }

        Ok(CandleSeries::new(candles)?)
    }
}

#[async_trait]
impl CandleSource for GateIoClient {
    fn name(&self) -> &'static str {
        "gateio"
    }

    async fn fetch_candles(
        &self,
        instrument: &str,
        interval: &str,
        limit: usize,
    ) -> Result<CandleSeries> {
        let url = format!("{}/futures/usdt/candlesticks", self.base_url);
        let limit = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("contract", instrument),
                ("interval", interval),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Gate.io API returned {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            );
            return Err(AppError::ExternalApi(format!("Gate.io API error: {}", status)));
        }

        let body = response.text().await?;
        Self::parse_candles(&body)
    }
}
