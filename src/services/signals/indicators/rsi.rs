//! Relative Strength Index (RSI) indicator.

use crate::services::signals::Indicator;
use crate::types::{Candle, SignalCategory};

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// RSI from Wilder-smoothed averages.
    ///
    /// Zero average loss yields 100, except on a series with no movement at
    /// all, which has no directional bias and yields 50.
    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                return 50.0;
            }
            return 100.0;
        }

        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn id(&self) -> &str {
        "rsi"
    }

    fn name(&self) -> String {
        format!("RSI ({})", self.period)
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Momentum
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        if self.period == 0 || candles.len() < self.min_periods() {
            return Vec::new();
        }

        let mut gains = Vec::with_capacity(candles.len() - 1);
        let mut losses = Vec::with_capacity(candles.len() - 1);

        for pair in candles.windows(2) {
            let change = pair[1].close - pair[0].close;
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        let period = self.period as f64;

        // Calculate initial averages
        let mut avg_gain: f64 = gains.iter().take(self.period).sum::<f64>() / period;
        let mut avg_loss: f64 = losses.iter().take(self.period).sum::<f64>() / period;

        let mut values = Vec::with_capacity(gains.len() - self.period + 1);
        values.push(Self::rsi_from_averages(avg_gain, avg_loss));

        // Wilder smoothing for remaining data
        for (gain, loss) in gains.iter().zip(losses.iter()).skip(self.period) {
            avg_gain = (avg_gain * (period - 1.0) + gain) / period;
            avg_loss = (avg_loss * (period - 1.0) + loss) / period;
            values.push(Self::rsi_from_averages(avg_gain, avg_loss));
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_uptrend_candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * 1.5;
                Candle::new(1000000 + i as i64 * 60000, base, base + 2.0, base - 1.0, base + 1.0, 1000.0)
            })
            .collect()
    }

    fn create_downtrend_candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let base = 200.0 - i as f64 * 1.5;
                Candle::new(1000000 + i as i64 * 60000, base, base + 1.0, base - 2.0, base - 1.0, 1000.0)
            })
            .collect()
    }

    fn create_zigzag_candles(count: usize) -> Vec<Candle> {
        let mut close = 100.0;
        (0..count)
            .map(|i| {
                if i > 0 {
                    close += if i % 2 == 1 { 2.0 } else { -1.0 };
                }
                Candle::new(i as i64, close, close + 0.5, close - 0.5, close, 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_rsi_id_and_name() {
        let rsi = Rsi::default();
        assert_eq!(rsi.id(), "rsi");
        assert_eq!(rsi.name(), "RSI (14)");
    }

    #[test]
    fn test_rsi_min_periods() {
        let rsi = Rsi::default();
        assert_eq!(rsi.min_periods(), 15);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let rsi = Rsi::default();
        let candles = create_uptrend_candles(10);
        assert!(rsi.calculate(&candles).is_empty());
    }

    #[test]
    fn test_rsi_no_losses_is_100() {
        let rsi = Rsi::default();
        let values = rsi.calculate(&create_uptrend_candles(50));
        assert_eq!(*values.last().unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_downtrend_low_value() {
        let rsi = Rsi::default();
        let values = rsi.calculate(&create_downtrend_candles(50));
        let last = *values.last().unwrap();
        assert!(last < 50.0, "RSI in downtrend should be < 50, got {}", last);
    }

    #[test]
    fn test_rsi_flat_series_is_neutral() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| Candle::new(i, 10.0, 10.0, 10.0, 10.0, 5.0))
            .collect();
        let values = Rsi::default().calculate(&candles);
        assert!(values.iter().all(|v| *v == 50.0));
    }

    #[test]
    fn test_rsi_zigzag_uptrend_not_overbought() {
        let values = Rsi::default().calculate(&create_zigzag_candles(60));
        let last = *values.last().unwrap();
        assert!(last > 50.0 && last <= 70.0, "got {}", last);
    }

    #[test]
    fn test_rsi_value_range() {
        let rsi = Rsi::default();
        for candles in [
            create_uptrend_candles(50),
            create_downtrend_candles(50),
            create_zigzag_candles(50),
        ] {
            for value in rsi.calculate(&candles) {
                assert!((0.0..=100.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_rsi_custom_period() {
        let rsi = Rsi::new(7);
        assert_eq!(rsi.min_periods(), 8);
        let candles = create_uptrend_candles(20);
        assert_eq!(rsi.calculate(&candles).len(), 20 - 7);
    }
}
