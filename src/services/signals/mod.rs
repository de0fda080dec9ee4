//! Trading signals service module.
//!
//! Computes technical indicators from a candle series, scores them with
//! the trend, momentum, volatility and volume evaluators, classifies the
//! result into BUY / SELL / HOLD and decides whether to alert.

pub mod alerts;
pub mod classifier;
pub mod evaluators;
pub mod indicators;
pub mod levels;

pub use alerts::{AlertDeduplicator, AlertRegistry};
pub use classifier::SignalClassifier;
pub use indicators::IndicatorBank;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::SignalError;
use crate::types::{AlertState, CandleSeries, Candle, Evaluation, SignalCategory, TradeLevels};

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Value produced for each candle.
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> String;

    /// Category this indicator belongs to.
    fn category(&self) -> SignalCategory;

    /// Minimum number of candles required for one value.
    fn min_periods(&self) -> usize;

    /// Values aligned to the end of `candles`: the last element belongs to
    /// the last candle. Empty when there is not enough data.
    fn calculate(&self, candles: &[Candle]) -> Vec<Self::Output>;
}

/// Stateless evaluation pipeline for one instrument's candles.
///
/// Deterministic: the same series and prior state always give the same
/// result. The only state is the [`AlertState`] passed in and returned.
pub struct SignalEngine {
    config: EngineConfig,
    bank: IndicatorBank,
    classifier: SignalClassifier,
    dedup: AlertDeduplicator,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            bank: IndicatorBank::new(&config),
            classifier: SignalClassifier::new(&config),
            dedup: AlertDeduplicator::new(config.escalation_threshold),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Minimum number of candles `evaluate` accepts.
    pub fn required_lookback(&self) -> usize {
        self.bank.required_lookback()
    }

    /// Run one evaluation cycle.
    ///
    /// On error no signal is produced and the caller's state stays as it was.
    pub fn evaluate(
        &self,
        series: &CandleSeries,
        prior_state: &AlertState,
    ) -> Result<Evaluation, SignalError> {
        let snapshot = self.bank.snapshot(series)?;

        let trend = evaluators::trend(&snapshot, self.config.trend_epsilon);
        let momentum = evaluators::momentum(&snapshot);
        let (regime, mut volatility) = evaluators::volatility(&snapshot, &self.config);
        let volume = evaluators::volume(&snapshot, trend.score);

        let gated = self
            .config
            .extreme_volatility_ratio
            .map_or(false, |limit| evaluators::volatility_ratio(&snapshot) >= limit);
        if gated {
            volatility = volatility.with_note("Volatility gate: alerts paused in extreme regime");
        }

        let signal = self
            .classifier
            .classify(&trend, &momentum, &volatility, regime, &volume);

        // Timestamp of the last candle keeps the cycle free of wall-clock reads
        let now = series.last().map(|c| c.timestamp).unwrap_or_default();
        let (state, emit) = if gated {
            (prior_state.clone(), false)
        } else {
            self.dedup.apply(&signal, prior_state, now)
        };

        debug!(
            "Classified {} with confidence {:.2} in {} volatility (emit: {})",
            signal.direction,
            signal.confidence,
            regime.label(),
            emit
        );

        let levels = TradeLevels::suggest(signal.direction, &snapshot, &self.config);

        Ok(Evaluation {
            signal,
            snapshot,
            regime,
            state,
            emit,
            levels,
        })
    }

    /// Evaluate against the instrument's state in `registry`.
    ///
    /// The registry is not updated here: once the alert is delivered the
    /// caller stores `evaluation.state` with [`AlertRegistry::commit`], so a
    /// failed delivery is retried on the next cycle.
    pub fn evaluate_instrument(
        &self,
        registry: &AlertRegistry,
        instrument: &str,
        series: &CandleSeries,
    ) -> Result<Evaluation, SignalError> {
        let prior = registry.get(instrument);
        let evaluation = self.evaluate(series, &prior)?;

        if evaluation.emit {
            info!(
                "{} alert for {}: confidence {:.2}",
                evaluation.signal.direction, instrument, evaluation.signal.confidence
            );
        }

        Ok(evaluation)
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
