//! Sub-signal evaluators.
//!
//! Each evaluator is a pure function of an [`IndicatorSnapshot`] that
//! returns a score in {-1, 0, +1} with human-readable reasons.

use crate::config::EngineConfig;
use crate::types::{IndicatorSnapshot, SignalCategory, SubSignal, VolatilityRegime};

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_MIDLINE: f64 = 50.0;

/// EMA trend state with a relative dead band around equality.
pub fn trend(snapshot: &IndicatorSnapshot, epsilon: f64) -> SubSignal {
    let fast = snapshot.ema_fast;
    let slow = snapshot.ema_slow;

    let mut signal = if (fast - slow).abs() <= epsilon * slow.abs() {
        SubSignal::new(
            SignalCategory::Trend,
            0,
            format!("Trend: fast EMA {:.4} ~ slow EMA {:.4} (flat)", fast, slow),
        )
    } else if fast > slow {
        SubSignal::new(
            SignalCategory::Trend,
            1,
            format!("Trend: fast EMA {:.4} above slow EMA {:.4} (bullish)", fast, slow),
        )
    } else {
        SubSignal::new(
            SignalCategory::Trend,
            -1,
            format!("Trend: fast EMA {:.4} below slow EMA {:.4} (bearish)", fast, slow),
        )
    };

    // Only a scored trend reports a crossover
    if let (Some(prev_fast), Some(prev_slow)) = (snapshot.ema_fast_prev, snapshot.ema_slow_prev) {
        if signal.score > 0 && prev_fast <= prev_slow {
            signal = signal.with_note("Fresh bullish EMA crossover on the latest candle");
        } else if signal.score < 0 && prev_fast >= prev_slow {
            signal = signal.with_note("Fresh bearish EMA crossover on the latest candle");
        }
    }

    signal
}

/// MACD direction confirmed by RSI on the same side of the midline.
///
/// Overbought and oversold RSI never flip the sign; they zero the score and
/// add a cautionary note.
pub fn momentum(snapshot: &IndicatorSnapshot) -> SubSignal {
    let macd = snapshot.macd_line;
    let signal_line = snapshot.macd_signal;
    let rsi = snapshot.rsi;

    let score = if macd > signal_line && rsi > RSI_MIDLINE && rsi <= RSI_OVERBOUGHT {
        1
    } else if macd < signal_line && (RSI_OVERSOLD..RSI_MIDLINE).contains(&rsi) {
        -1
    } else {
        0
    };

    let macd_relation = if macd > signal_line {
        "above"
    } else if macd < signal_line {
        "below"
    } else {
        "at"
    };
    let label = match score {
        1 => "bullish",
        -1 => "bearish",
        _ => "neutral",
    };

    let mut sub = SubSignal::new(
        SignalCategory::Momentum,
        score,
        format!(
            "Momentum: MACD {:.4} {} signal {:.4}, RSI {:.1} ({})",
            macd, macd_relation, signal_line, rsi, label
        ),
    );

    if rsi > RSI_OVERBOUGHT {
        sub = sub.with_note(format!("Caution: RSI {:.1} overbought", rsi));
    } else if rsi < RSI_OVERSOLD {
        sub = sub.with_note(format!("Caution: RSI {:.1} oversold", rsi));
    }

    sub
}

/// ATR relative to its trailing average; 1.0 when there is no baseline.
pub fn volatility_ratio(snapshot: &IndicatorSnapshot) -> f64 {
    if snapshot.atr_average > 0.0 {
        snapshot.atr / snapshot.atr_average
    } else {
        1.0
    }
}

/// Non-directional volatility regime. The score is always 0.
pub fn volatility(snapshot: &IndicatorSnapshot, config: &EngineConfig) -> (VolatilityRegime, SubSignal) {
    let ratio = volatility_ratio(snapshot);

    let regime = if ratio >= config.high_volatility_ratio {
        VolatilityRegime::High
    } else if ratio < config.low_volatility_ratio {
        VolatilityRegime::Low
    } else {
        VolatilityRegime::Normal
    };

    let sub = SubSignal::new(
        SignalCategory::Volatility,
        0,
        format!(
            "Volatility: ATR {:.4} is {:.2}x its average ({})",
            snapshot.atr,
            ratio,
            regime.label()
        ),
    );

    (regime, sub)
}

/// OBV direction as confirmation of the price trend.
///
/// `price_trend` is the trend evaluator's score.
pub fn volume(snapshot: &IndicatorSnapshot, price_trend: i8) -> SubSignal {
    let obv_delta = snapshot.obv - snapshot.obv_prev;

    let (score, reason) = match (price_trend.signum(), obv_delta) {
        (1, d) if d > 0.0 => (1, "Volume: OBV rising confirms uptrend".to_string()),
        (-1, d) if d < 0.0 => (-1, "Volume: OBV falling confirms downtrend".to_string()),
        (1, d) if d < 0.0 => (0, "Volume: price up / OBV down: weak rally".to_string()),
        (-1, d) if d > 0.0 => (0, "Volume: price down / OBV up: weak selloff".to_string()),
        (_, d) if d == 0.0 => (0, "Volume: OBV flat, no confirmation".to_string()),
        (_, d) if d > 0.0 => (0, "Volume: OBV rising without a price trend".to_string()),
        _ => (0, "Volume: OBV falling without a price trend".to_string()),
    };

    SubSignal::new(SignalCategory::Volume, score, reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            ema_fast: 105.0,
            ema_slow: 100.0,
            ema_fast_prev: Some(104.0),
            ema_slow_prev: Some(99.0),
            macd_line: 1.2,
            macd_signal: 1.0,
            macd_hist: 0.2,
            rsi: 60.0,
            atr: 2.0,
            atr_average: 2.0,
            obv: 5000.0,
            obv_prev: 4000.0,
            close: 106.0,
            prev_close: 105.0,
        }
    }

    #[test]
    fn test_trend_bullish_and_bearish() {
        assert_eq!(trend(&snapshot(), 1e-4).score, 1);

        let bearish = IndicatorSnapshot {
            ema_fast: 95.0,
            ema_fast_prev: Some(94.0),
            ..snapshot()
        };
        assert_eq!(trend(&bearish, 1e-4).score, -1);
    }

    #[test]
    fn test_trend_near_equality_is_flat() {
        let flat = IndicatorSnapshot {
            ema_fast: 100.005,
            ..snapshot()
        };
        let sub = trend(&flat, 1e-4);
        assert_eq!(sub.score, 0);
        assert!(sub.reasons[0].contains("flat"));
    }

    #[test]
    fn test_trend_fresh_crossover_note() {
        let crossing = IndicatorSnapshot {
            ema_fast_prev: Some(98.0),
            ..snapshot()
        };
        let sub = trend(&crossing, 1e-4);
        assert_eq!(sub.score, 1);
        assert_eq!(sub.reasons.len(), 2);
        assert!(sub.reasons[1].contains("bullish EMA crossover"));

        // No history, no crossover note
        let no_history = IndicatorSnapshot {
            ema_fast_prev: None,
            ema_slow_prev: None,
            ..snapshot()
        };
        assert_eq!(trend(&no_history, 1e-4).reasons.len(), 1);
    }

    #[test]
    fn test_crossover_inside_dead_band_is_not_noted() {
        let barely_crossed = IndicatorSnapshot {
            ema_fast: 100.005,
            ema_fast_prev: Some(99.9),
            ema_slow_prev: Some(100.0),
            ..snapshot()
        };
        let sub = trend(&barely_crossed, 1e-4);
        assert_eq!(sub.score, 0);
        assert_eq!(sub.reasons.len(), 1);
        assert!(!sub.reasons[0].contains("crossover"));
    }

    #[test]
    fn test_trend_fresh_bearish_crossover_note() {
        let crossing = IndicatorSnapshot {
            ema_fast: 95.0,
            ema_fast_prev: Some(100.5),
            ema_slow_prev: Some(100.0),
            ..snapshot()
        };
        let sub = trend(&crossing, 1e-4);
        assert_eq!(sub.score, -1);
        assert!(sub.reasons[1].contains("bearish EMA crossover"));
    }

    #[test]
    fn test_momentum_bullish_window() {
        assert_eq!(momentum(&snapshot()).score, 1);

        let at_upper_bound = IndicatorSnapshot {
            rsi: 70.0,
            ..snapshot()
        };
        assert_eq!(momentum(&at_upper_bound).score, 1);

        let at_midline = IndicatorSnapshot {
            rsi: 50.0,
            ..snapshot()
        };
        assert_eq!(momentum(&at_midline).score, 0);
    }

    #[test]
    fn test_momentum_bearish_window() {
        let bearish = IndicatorSnapshot {
            macd_line: 0.5,
            rsi: 30.0,
            ..snapshot()
        };
        assert_eq!(momentum(&bearish).score, -1);

        let at_midline = IndicatorSnapshot {
            macd_line: 0.5,
            rsi: 50.0,
            ..snapshot()
        };
        assert_eq!(momentum(&at_midline).score, 0);
    }

    #[test]
    fn test_momentum_overbought_is_cautionary() {
        let overbought = IndicatorSnapshot {
            rsi: 78.0,
            ..snapshot()
        };
        let sub = momentum(&overbought);
        assert_eq!(sub.score, 0);
        assert_eq!(sub.reasons.len(), 2);
        assert!(sub.reasons[1].contains("overbought"));
    }

    #[test]
    fn test_momentum_oversold_is_cautionary() {
        let oversold = IndicatorSnapshot {
            macd_line: 0.5,
            rsi: 22.0,
            ..snapshot()
        };
        let sub = momentum(&oversold);
        assert_eq!(sub.score, 0);
        assert!(sub.reasons[1].contains("oversold"));
    }

    #[test]
    fn test_volatility_regimes() {
        let config = EngineConfig::default();
        assert_eq!(volatility(&snapshot(), &config).0, VolatilityRegime::Normal);

        let high = IndicatorSnapshot {
            atr: 3.2,
            ..snapshot()
        };
        assert_eq!(volatility(&high, &config).0, VolatilityRegime::High);

        let low = IndicatorSnapshot {
            atr: 0.5,
            ..snapshot()
        };
        let (regime, sub) = volatility(&low, &config);
        assert_eq!(regime, VolatilityRegime::Low);
        assert_eq!(sub.score, 0);
    }

    #[test]
    fn test_volatility_high_threshold_is_inclusive() {
        let at_threshold = IndicatorSnapshot {
            atr: 3.0,
            atr_average: 2.0,
            ..snapshot()
        };
        assert_eq!(
            volatility(&at_threshold, &EngineConfig::default()).0,
            VolatilityRegime::High
        );

        let just_below = IndicatorSnapshot {
            atr: 2.999,
            atr_average: 2.0,
            ..snapshot()
        };
        assert_eq!(
            volatility(&just_below, &EngineConfig::default()).0,
            VolatilityRegime::Normal
        );
    }

    #[test]
    fn test_volatility_without_baseline_is_normal() {
        let flat = IndicatorSnapshot {
            atr: 0.0,
            atr_average: 0.0,
            ..snapshot()
        };
        assert_eq!(volatility(&flat, &EngineConfig::default()).0, VolatilityRegime::Normal);
    }

    #[test]
    fn test_volume_confirmation() {
        assert_eq!(volume(&snapshot(), 1).score, 1);

        let falling = IndicatorSnapshot {
            obv: 3000.0,
            ..snapshot()
        };
        assert_eq!(volume(&falling, -1).score, -1);
    }

    #[test]
    fn test_volume_divergence() {
        let falling = IndicatorSnapshot {
            obv: 3000.0,
            ..snapshot()
        };
        let sub = volume(&falling, 1);
        assert_eq!(sub.score, 0);
        assert!(sub.reasons[0].contains("weak rally"));

        let sub = volume(&snapshot(), -1);
        assert_eq!(sub.score, 0);
        assert!(sub.reasons[0].contains("weak selloff"));
    }

    #[test]
    fn test_volume_flat_obv() {
        let flat = IndicatorSnapshot {
            obv_prev: 5000.0,
            ..snapshot()
        };
        assert_eq!(volume(&flat, 1).score, 0);
    }

    #[test]
    fn test_volume_without_price_trend() {
        let sub = volume(&snapshot(), 0);
        assert_eq!(sub.score, 0);
        assert!(sub.reasons[0].contains("OBV rising without a price trend"));

        let falling = IndicatorSnapshot {
            obv: 3000.0,
            ..snapshot()
        };
        let sub = volume(&falling, 0);
        assert_eq!(sub.score, 0);
        assert!(sub.reasons[0].contains("OBV falling without a price trend"));
    }
}
