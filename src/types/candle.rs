use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// A single OHLCV candlestick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Exchange epoch timestamp of the candle open.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check the OHLC invariants of this candle in isolation.
    pub fn validate(&self) -> Result<(), String> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() {
                return Err(format!("{} is not finite", field));
            }
            if value <= 0.0 {
                return Err(format!("{} must be positive, got {}", field, value));
            }
        }

        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(format!("volume must be non-negative, got {}", self.volume));
        }

        if self.high < self.low {
            return Err(format!("high {} below low {}", self.high, self.low));
        }

        if self.open > self.high || self.open < self.low {
            return Err(format!(
                "open {} outside range [{}, {}]",
                self.open, self.low, self.high
            ));
        }

        if self.close > self.high || self.close < self.low {
            return Err(format!(
                "close {} outside range [{}, {}]",
                self.close, self.low, self.high
            ));
        }

        Ok(())
    }
}

/// Ordered, validated, append-only sequence of candles for one instrument.
///
/// Every candle satisfies the OHLC invariants and timestamps are strictly
/// increasing. Exchange continuity (missing intervals) is not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Candle>", into = "Vec<Candle>")]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a series, rejecting malformed or out-of-order candles.
    pub fn new(candles: Vec<Candle>) -> Result<Self, SignalError> {
        for (index, candle) in candles.iter().enumerate() {
            candle
                .validate()
                .map_err(|reason| SignalError::InvalidCandle { index, reason })?;

            if index > 0 && candle.timestamp <= candles[index - 1].timestamp {
                return Err(SignalError::InvalidCandle {
                    index,
                    reason: format!(
                        "timestamp {} not after previous {}",
                        candle.timestamp,
                        candles[index - 1].timestamp
                    ),
                });
            }
        }

        Ok(Self { candles })
    }

    /// Append a newly closed candle.
    pub fn push(&mut self, candle: Candle) -> Result<(), SignalError> {
        let index = self.candles.len();
        candle
            .validate()
            .map_err(|reason| SignalError::InvalidCandle { index, reason })?;

        if let Some(last) = self.candles.last() {
            if candle.timestamp <= last.timestamp {
                return Err(SignalError::InvalidCandle {
                    index,
                    reason: format!(
                        "timestamp {} not after previous {}",
                        candle.timestamp, last.timestamp
                    ),
                });
            }
        }

        self.candles.push(candle);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Closing prices in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}

impl TryFrom<Vec<Candle>> for CandleSeries {
    type Error = SignalError;

    fn try_from(candles: Vec<Candle>) -> Result<Self, Self::Error> {
        Self::new(candles)
    }
}

impl From<CandleSeries> for Vec<Candle> {
    fn from(series: CandleSeries) -> Self {
        series.candles
    }
}

impl AsRef<[Candle]> for CandleSeries {
    fn as_ref(&self) -> &[Candle] {
        &self.candles
    }
}
