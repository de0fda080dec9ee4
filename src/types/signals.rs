use serde::{Deserialize, Serialize};

use crate::types::TradeLevels;

/// Discrete trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl SignalDirection {
    /// Get display label for this direction.
    pub fn label(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
            SignalDirection::Hold => "HOLD",
        }
    }
}

impl std::fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category of an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Trend,
    Momentum,
    Volatility,
    Volume,
}

impl SignalCategory {
    /// Get display name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            SignalCategory::Trend => "Trend",
            SignalCategory::Momentum => "Momentum",
            SignalCategory::Volatility => "Volatility",
            SignalCategory::Volume => "Volume",
        }
    }
}

/// Indicator values for the latest candle of one evaluation cycle.
///
/// Recomputed from the full series every cycle, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub ema_fast: f64,
    pub ema_slow: f64,
    /// Fast EMA at the previous candle, when the slow EMA was also warm there.
    pub ema_fast_prev: Option<f64>,
    pub ema_slow_prev: Option<f64>,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub rsi: f64,
    pub atr: f64,
    /// Trailing average of the ATR series, the volatility baseline.
    pub atr_average: f64,
    pub obv: f64,
    pub obv_prev: f64,
    pub close: f64,
    pub prev_close: f64,
}

impl IndicatorSnapshot {
    /// Name of the first non-finite field, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        let fields = [
            ("ema_fast", Some(self.ema_fast)),
            ("ema_slow", Some(self.ema_slow)),
            ("ema_fast_prev", self.ema_fast_prev),
            ("ema_slow_prev", self.ema_slow_prev),
            ("macd_line", Some(self.macd_line)),
            ("macd_signal", Some(self.macd_signal)),
            ("macd_hist", Some(self.macd_hist)),
            ("rsi", Some(self.rsi)),
            ("atr", Some(self.atr)),
            ("atr_average", Some(self.atr_average)),
            ("obv", Some(self.obv)),
            ("obv_prev", Some(self.obv_prev)),
            ("close", Some(self.close)),
            ("prev_close", Some(self.prev_close)),
        ];

        fields
            .into_iter()
            .find(|(_, value)| value.map_or(false, |v| !v.is_finite()))
            .map(|(name, _)| name)
    }
}

/// Volatility regime from ATR relative to its own trailing average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolatilityRegime {
    Low,
    Normal,
    High,
}

impl VolatilityRegime {
    pub fn label(&self) -> &'static str {
        match self {
            VolatilityRegime::Low => "LOW",
            VolatilityRegime::Normal => "NORMAL",
            VolatilityRegime::High => "HIGH",
        }
    }
}

/// Output of one evaluator: a signed score in {-1, 0, +1} with reasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubSignal {
    pub category: SignalCategory,
    pub score: i8,
    /// Primary reason first, cautionary notes after.
    pub reasons: Vec<String>,
}

impl SubSignal {
    pub fn new(category: SignalCategory, score: i8, reason: impl Into<String>) -> Self {
        Self {
            category,
            score,
            reasons: vec![reason.into()],
        }
    }

    /// Append a cautionary reason that does not change the score.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.reasons.push(note.into());
        self
    }
}

/// Final decision of one evaluation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub direction: SignalDirection,
    /// Confidence in [0, 1], independent of direction.
    pub confidence: f64,
    /// Evaluator reasons in order: trend, momentum, volatility, volume.
    pub reasons: Vec<String>,
}

impl Signal {
    /// Reasons joined one per line, ready for a plain-text message.
    pub fn rationale(&self) -> String {
        self.reasons.join("\n")
    }
}

/// Last emitted alert for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertState {
    pub last_direction: SignalDirection,
    pub last_confidence: f64,
    /// Timestamp of the candle that triggered the last emission; `None` before the first one.
    pub last_emit_timestamp: Option<i64>,
}

impl Default for AlertState {
    fn default() -> Self {
        Self {
            last_direction: SignalDirection::Hold,
            last_confidence: 0.0,
            last_emit_timestamp: None,
        }
    }
}

/// Result of a successful evaluation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub signal: Signal,
    pub snapshot: IndicatorSnapshot,
    pub regime: VolatilityRegime,
    /// Alert state after this cycle; equal to the prior state unless `emit`.
    pub state: AlertState,
    /// Whether the signal should be forwarded to the notification channel.
    pub emit: bool,
    /// Suggested entry/stop/target for BUY and SELL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<TradeLevels>,
}
