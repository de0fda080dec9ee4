//! Average True Range (ATR) indicator.

use crate::services::signals::Indicator;
use crate::types::{Candle, SignalCategory};

/// ATR (Average True Range) indicator.
///
/// Measures market volatility by calculating the average of true ranges:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// Higher ATR = higher volatility
/// Lower ATR = lower volatility
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate True Range.
    pub fn true_range(current: &Candle, previous: &Candle) -> f64 {
        let hl = current.high - current.low;
        let hc = (current.high - previous.close).abs();
        let lc = (current.low - previous.close).abs();
        hl.max(hc).max(lc)
    }
}

impl Indicator for Atr {
    type Output = f64;

    fn id(&self) -> &str {
        "atr"
    }

    fn name(&self) -> String {
        format!("ATR ({})", self.period)
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Volatility
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        if self.period == 0 || candles.len() < self.min_periods() {
            return Vec::new();
        }

        let true_ranges: Vec<f64> = candles
            .windows(2)
            .map(|pair| Self::true_range(&pair[1], &pair[0]))
            .collect();

        let period = self.period as f64;

        // Calculate ATR using Wilder's smoothing
        let mut atr: f64 = true_ranges.iter().take(self.period).sum::<f64>() / period;
        let mut values = Vec::with_capacity(true_ranges.len() - self.period + 1);
        values.push(atr);

        for tr in true_ranges.iter().skip(self.period) {
            atr = (atr * (period - 1.0) + tr) / period;
            values.push(atr);
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

    #[test]
    fn test_atr_id_and_name() {
        let atr = Atr::default();
        assert_eq!(atr.id(), "atr");
        assert_eq!(atr.name(), "ATR (14)");
    }

    #[test]
    fn test_atr_category() {
        let atr = Atr::default();
        assert_eq!(atr.category(), SignalCategory::Volatility);
    }

    #[test]
    fn test_atr_min_periods() {
        let atr = Atr::default();
        assert_eq!(atr.min_periods(), 15);
    }

    #[test]
    fn test_atr_insufficient_data() {
        let atr = Atr::default();
        let candles = create_uptrend_candles(10);
        assert!(atr.calculate(&candles).is_empty());
    }

    #[test]
    fn test_atr_true_range_uses_gap() {
        let prev = Candle::new(0, 10.0, 10.5, 9.5, 10.0, 1.0);
        let gap_up = Candle::new(1, 14.0, 15.0, 13.5, 14.5, 1.0);
        // |high - prev_close| dominates the 1.5 intrabar range
        assert_eq!(Atr::true_range(&gap_up, &prev), 5.0);
    }

    #[test]
    fn test_atr_constant_range() {
        // Every candle: high - low = 3, no gaps beyond that
        let values = Atr::default().calculate(&create_uptrend_candles(30));
        assert_eq!(values.len(), 30 - 14);
        assert!(values.iter().all(|v| (v - 3.0).abs() < 1e-9));
    }

    #[test]
    fn test_atr_non_negative() {
        let candles: Vec<Candle> = (0..40)
            .map(|i| {
                let close = 50.0 + ((i * 7) % 11) as f64;
                Candle::new(i, close, close + 0.3, close - 0.2, close, 10.0)
            })
            .collect();
        assert!(Atr::default().calculate(&candles).iter().all(|v| *v >= 0.0));
    }
}
