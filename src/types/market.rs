use serde::{Deserialize, Serialize};

use crate::types::SignalDirection;

/// Suggested entry, stop loss and take profit for a directional signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeLevels {
    pub direction: SignalDirection,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Reward divided by risk.
    pub risk_reward: f64,
}

/// Snapshot of the market for status lines and update messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub current_price: f64,
    pub price_change: f64,
    pub price_change_pct: f64,
    pub volume: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub atr: f64,
    pub obv: f64,
    /// Timestamp of the latest candle.
    pub timestamp: i64,
}
