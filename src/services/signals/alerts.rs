//! Alert deduplication.
//!
//! Only direction changes and meaningful confidence escalations of a held
//! BUY/SELL are forwarded; repeated HOLD is always silent.

use dashmap::DashMap;
use tracing::debug;

use crate::types::{AlertState, Signal, SignalDirection};

/// Absorbs float noise in confidence differences (0.8 - 0.6 etc).
const CONFIDENCE_TOLERANCE: f64 = 1e-9;

/// Emission rule over [`AlertState`].
#[derive(Debug, Clone, Copy)]
pub struct AlertDeduplicator {
    escalation_threshold: f64,
}

impl AlertDeduplicator {
    pub fn new(escalation_threshold: f64) -> Self {
        Self {
            escalation_threshold,
        }
    }

    /// Whether `signal` should be forwarded given the last emitted state.
    pub fn should_emit(&self, signal: &Signal, prior: &AlertState) -> bool {
        if signal.direction != prior.last_direction {
            return true;
        }

        signal.direction != SignalDirection::Hold
            && signal.confidence - prior.last_confidence
                >= self.escalation_threshold - CONFIDENCE_TOLERANCE
    }

    /// Apply the rule. Returns the next state and whether to emit; the state
    /// only changes on emission.
    pub fn apply(&self, signal: &Signal, prior: &AlertState, now: i64) -> (AlertState, bool) {
        if !self.should_emit(signal, prior) {
            debug!(
                "Suppressing {} ({:.2}); last emitted {} ({:.2})",
                signal.direction, signal.confidence, prior.last_direction, prior.last_confidence
            );
            return (prior.clone(), false);
        }

        let next = AlertState {
            last_direction: signal.direction,
            last_confidence: signal.confidence,
            last_emit_timestamp: Some(now),
        };
        (next, true)
    }
}

impl Default for AlertDeduplicator {
    fn default() -> Self {
        Self::new(0.2)
    }
}

/// One [`AlertState`] per instrument key, never shared between keys.
#[derive(Debug, Default)]
pub struct AlertRegistry {
    states: DashMap<String, AlertState>,
}

impl AlertRegistry {
    pub fn new() -> Self {
        Self {
            states: DashMap::new(),
        }
    }

    fn key(instrument: &str) -> String {
        instrument.to_uppercase()
    }

    /// Current state for an instrument (initial state if never emitted).
    pub fn get(&self, instrument: &str) -> AlertState {
        self.states
            .get(&Self::key(instrument))
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Store the state produced by an emitted cycle.
    pub fn commit(&self, instrument: &str, state: AlertState) {
        self.states.insert(Self::key(instrument), state);
    }

    /// Forget the last emission so the next non-HOLD signal is sent again.
    pub fn reset(&self, instrument: &str) -> Option<AlertState> {
        self.states
            .remove(&Self::key(instrument))
            .map(|(_, state)| state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
