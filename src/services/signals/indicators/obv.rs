//! On-Balance Volume (OBV) indicator.

use crate::services::signals::Indicator;
use crate::types::{Candle, SignalCategory};

/// OBV (On-Balance Volume) indicator.
///
/// Cumulative volume indicator seeded at zero on the first candle:
/// - If close > previous close: OBV += volume
/// - If close < previous close: OBV -= volume
/// - Otherwise unchanged
///
/// Depends on the whole history, so it is always recomputed from the
/// start of the series.
#[derive(Default)]
pub struct Obv;

impl Obv {
    pub fn new() -> Self {
        Self
    }

    /// Advance the running accumulator by one candle.
    pub fn step(obv: f64, current: &Candle, previous: &Candle) -> f64 {
        if current.close > previous.close {
            obv + current.volume
        } else if current.close < previous.close {
            obv - current.volume
        } else {
            obv
        }
    }
}

impl Indicator for Obv {
    type Output = f64;

    fn id(&self) -> &str {
        "obv"
    }

    fn name(&self) -> String {
        "OBV".to_string()
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Volume
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        if candles.is_empty() {
            return Vec::new();
        }

        let mut obv = 0.0;
        let mut values = Vec::with_capacity(candles.len());
        values.push(obv);

        for pair in candles.windows(2) {
            obv = Self::step(obv, &pair[1], &pair[0]);
            values.push(obv);
        }

        values
    }
}
