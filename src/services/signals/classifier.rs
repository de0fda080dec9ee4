//! Combines evaluator sub-signals into a final decision.

use crate::config::EngineConfig;
use crate::types::{Signal, SignalDirection, SubSignal, VolatilityRegime};

/// Weighted vote over the directional sub-signals.
///
/// Direction comes from the total score alone; confidence is the total's
/// magnitude damped by the volatility regime, so two BUYs can carry very
/// different confidence.
pub struct SignalClassifier {
    weight_trend: f64,
    weight_momentum: f64,
    weight_volume: f64,
    decision_threshold: f64,
    high_volatility_scale: f64,
}

impl SignalClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            weight_trend: config.weight_trend,
            weight_momentum: config.weight_momentum,
            weight_volume: config.weight_volume,
            decision_threshold: config.decision_threshold,
            high_volatility_scale: config.high_volatility_scale,
        }
    }

    /// Weighted sum of trend, momentum and volume scores.
    pub fn total_score(&self, trend: &SubSignal, momentum: &SubSignal, volume: &SubSignal) -> f64 {
        self.weight_trend * trend.score as f64
            + self.weight_momentum * momentum.score as f64
            + self.weight_volume * volume.score as f64
    }

    pub fn volatility_scale(&self, regime: VolatilityRegime) -> f64 {
        match regime {
            VolatilityRegime::High => self.high_volatility_scale,
            VolatilityRegime::Low | VolatilityRegime::Normal => 1.0,
        }
    }

    pub fn direction(&self, total: f64) -> SignalDirection {
        if total >= self.decision_threshold {
            SignalDirection::Buy
        } else if total <= -self.decision_threshold {
            SignalDirection::Sell
        } else {
            SignalDirection::Hold
        }
    }

    /// Classify one cycle. Reasons keep evaluator order: trend, momentum, volatility, volume.
    pub fn classify(
        &self,
        trend: &SubSignal,
        momentum: &SubSignal,
        volatility: &SubSignal,
        regime: VolatilityRegime,
        volume: &SubSignal,
    ) -> Signal {
        let total = self.total_score(trend, momentum, volume);
        let direction = self.direction(total);
        let confidence = (total.abs().min(1.0) * self.volatility_scale(regime)).clamp(0.0, 1.0);

        let reasons = [trend, momentum, volatility, volume]
            .into_iter()
            .flat_map(|sub| sub.reasons.iter().cloned())
            .collect();

        Signal {
            direction,
            confidence,
            reasons,
        }
    }
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
