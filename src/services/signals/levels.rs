//! Trade level suggestions and market summaries built from a snapshot.

use crate::config::EngineConfig;
use crate::types::{CandleSeries, IndicatorSnapshot, MarketSummary, SignalDirection, TradeLevels};

/// Stop distance used when ATR is zero: 1% of price.
const FALLBACK_RISK_PCT: f64 = 0.01;

impl TradeLevels {
    /// ATR-based entry, stop and target. `None` for HOLD.
    pub fn suggest(
        direction: SignalDirection,
        snapshot: &IndicatorSnapshot,
        config: &EngineConfig,
    ) -> Option<Self> {
        let entry = snapshot.close;
        let risk = if snapshot.atr > 0.0 {
            snapshot.atr * config.stop_atr_multiplier
        } else {
            entry * FALLBACK_RISK_PCT
        };
        let reward = risk * config.reward_risk_ratio;

        let (stop_loss, take_profit) = match direction {
            SignalDirection::Buy => (entry - risk, entry + reward),
            SignalDirection::Sell => (entry + risk, entry - reward),
            SignalDirection::Hold => return None,
        };

        Some(Self {
            direction,
            entry,
            stop_loss,
            take_profit,
            risk_reward: config.reward_risk_ratio,
        })
    }
}

impl MarketSummary {
    /// Summary of the latest candle against the previous one.
    pub fn from_series(series: &CandleSeries, snapshot: &IndicatorSnapshot) -> Option<Self> {
        let latest = series.last()?;

        let price_change = snapshot.close - snapshot.prev_close;
        let price_change_pct = if snapshot.prev_close > 0.0 {
            price_change / snapshot.prev_close * 100.0
        } else {
            0.0
        };

        Some(Self {
            current_price: snapshot.close,
            price_change,
            price_change_pct,
            volume: latest.volume,
            rsi: snapshot.rsi,
            macd: snapshot.macd_line,
            macd_signal: snapshot.macd_signal,
            ema_fast: snapshot.ema_fast,
            ema_slow: snapshot.ema_slow,
            atr: snapshot.atr,
            obv: snapshot.obv,
            timestamp: latest.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candle;

    fn snapshot(close: f64, atr: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            ema_fast: close,
            ema_slow: close,
            ema_fast_prev: None,
            ema_slow_prev: None,
            macd_line: 0.0,
            macd_signal: 0.0,
            macd_hist: 0.0,
            rsi: 50.0,
            atr,
            atr_average: atr,
            obv: 0.0,
            obv_prev: 0.0,
            close,
            prev_close: close - 2.0,
        }
    }

    #[test]
    fn test_buy_levels() {
        let levels =
            TradeLevels::suggest(SignalDirection::Buy, &snapshot(100.0, 2.0), &EngineConfig::default())
                .unwrap();
        assert_eq!(levels.entry, 100.0);
        assert!((levels.stop_loss - 97.0).abs() < 1e-9);
        assert!((levels.take_profit - 106.0).abs() < 1e-9);
        assert_eq!(levels.risk_reward, 2.0);
    }

    #[test]
    fn test_sell_levels_mirror() {
        let levels =
            TradeLevels::suggest(SignalDirection::Sell, &snapshot(100.0, 2.0), &EngineConfig::default())
                .unwrap();
        assert!((levels.stop_loss - 103.0).abs() < 1e-9);
        assert!((levels.take_profit - 94.0).abs() < 1e-9);
    }

    #[test]
    fn test_hold_has_no_levels() {
        assert!(TradeLevels::suggest(
            SignalDirection::Hold,
            &snapshot(100.0, 2.0),
            &EngineConfig::default()
        )
        .is_none());
    }

    #[test]
    fn test_zero_atr_falls_back_to_percent() {
        let levels =
            TradeLevels::suggest(SignalDirection::Buy, &snapshot(200.0, 0.0), &EngineConfig::default())
                .unwrap();
        assert!((levels.stop_loss - 198.0).abs() < 1e-9);
    }

    #[test]
    fn test_market_summary() {
        let series = CandleSeries::new(vec![
            Candle::new(1, 98.0, 99.0, 97.0, 98.0, 10.0),
            Candle::new(2, 98.0, 101.0, 97.5, 100.0, 25.0),
        ])
        .unwrap();
        let summary = MarketSummary::from_series(&series, &snapshot(100.0, 1.0)).unwrap();
        assert_eq!(summary.current_price, 100.0);
        assert!((summary.price_change - 2.0).abs() < 1e-9);
        assert!((summary.price_change_pct - 2.0 / 98.0 * 100.0).abs() < 1e-9);
        assert_eq!(summary.volume, 25.0);
        assert_eq!(summary.timestamp, 2);
    }
}
