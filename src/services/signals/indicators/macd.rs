//! MACD (Moving Average Convergence Divergence) indicator.

use crate::services::signals::indicators::ema::ema_series;
use crate::services::signals::Indicator;
use crate::types::{Candle, SignalCategory};

/// MACD values for one candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        // The "slow" leg is whichever EMA is longer.
        let (fast_period, slow_period) = if fast_period <= slow_period {
            (fast_period, slow_period)
        } else {
            (slow_period, fast_period)
        };
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }
}

impl Indicator for Macd {
    type Output = MacdValue;

    fn id(&self) -> &str {
        "macd"
    }

    fn name(&self) -> String {
        format!(
            "MACD ({}, {}, {})",
            self.fast_period, self.slow_period, self.signal_period
        )
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Momentum
    }

    fn min_periods(&self) -> usize {
        (self.slow_period + self.signal_period).saturating_sub(1)
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<MacdValue> {
        if self.signal_period == 0 || candles.len() < self.min_periods() {
            return Vec::new();
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        let fast_ema = ema_series(&closes, self.fast_period);
        let slow_ema = ema_series(&closes, self.slow_period);

        // Align the EMAs (fast starts earlier)
        let offset = self.slow_period - self.fast_period;
        let macd_line: Vec<f64> = fast_ema
            .iter()
            .skip(offset)
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = ema_series(&macd_line, self.signal_period);

        // Signal line starts signal_period - 1 values into the MACD line
        macd_line
            .iter()
            .skip(self.signal_period - 1)
            .zip(signal_line.iter())
            .map(|(&line, &signal)| MacdValue {
                line,
                signal,
                histogram: line - signal,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle::new(i as i64, close, close + 1.0, close - 1.0, close, 1000.0))
            .collect()
    }

    #[test]
    fn test_macd_min_periods() {
        assert_eq!(Macd::default().min_periods(), 34);
    }

    #[test]
    fn test_macd_insufficient_data() {
        let candles = candles_from_closes(&vec![100.0; 33]);
        assert!(Macd::default().calculate(&candles).is_empty());
    }

    #[test]
    fn test_macd_series_alignment() {
        let candles = candles_from_closes(&vec![100.0; 40]);
        let macd = Macd::default().calculate(&candles);
        // One value per candle from index 33 onwards
        assert_eq!(macd.len(), 40 - 33);
    }

    #[test]
    fn test_macd_flat_series_has_zero_histogram() {
        let candles = candles_from_closes(&vec![250.0; 60]);
        let last = *Macd::default().calculate(&candles).last().unwrap();
        assert!(last.line.abs() < 1e-9);
        assert!(last.signal.abs() < 1e-9);
        assert!(last.histogram.abs() < 1e-9);
    }

    #[test]
    fn test_macd_uptrend_positive_line() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let last = *Macd::default()
            .calculate(&candles_from_closes(&closes))
            .last()
            .unwrap();
        assert!(last.line > 0.0, "MACD line should be positive, got {}", last.line);
        assert!((last.histogram - (last.line - last.signal)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_new_orders_periods() {
        let macd = Macd::new(26, 12, 9);
        assert_eq!(macd.name(), "MACD (12, 26, 9)");
    }
}
