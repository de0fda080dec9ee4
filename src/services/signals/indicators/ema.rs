//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::Indicator;
use crate::types::{Candle, SignalCategory};

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. Seeded with the simple
/// average of the first `period` closes, then
/// `ema = close * k + ema_prev * (1 - k)` with `k = 2 / (period + 1)`.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// EMA over an arbitrary value series.
///
/// Element `i` of the result belongs to `values[period - 1 + i]`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema = Vec::with_capacity(values.len() - period + 1);

    // First EMA is SMA
    let sma: f64 = values.iter().take(period).sum::<f64>() / period as f64;
    ema.push(sma);

    let mut prev = sma;
    for value in values.iter().skip(period) {
        prev = value * multiplier + prev * (1.0 - multiplier);
        ema.push(prev);
    }

    ema
}

impl Indicator for Ema {
    type Output = f64;

    fn id(&self) -> &str {
        "ema"
    }

    fn name(&self) -> String {
        format!("EMA ({})", self.period)
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Trend
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        ema_series(&closes, self.period)
    }
}
