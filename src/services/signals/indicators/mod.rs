//! Technical indicator implementations and the indicator bank.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;

pub use atr::Atr;
pub use ema::Ema;
pub use macd::{Macd, MacdValue};
pub use obv::Obv;
pub use rsi::Rsi;

use tracing::debug;

use super::Indicator;
use crate::config::EngineConfig;
use crate::error::SignalError;
use crate::types::{CandleSeries, IndicatorSnapshot};

/// Computes every indicator the evaluators need from one candle series.
pub struct IndicatorBank {
    ema_fast: Ema,
    ema_slow: Ema,
    macd: Macd,
    rsi: Rsi,
    atr: Atr,
    obv: Obv,
    atr_average_period: usize,
}

impl IndicatorBank {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ema_fast: Ema::new(config.ema_fast_period),
            ema_slow: Ema::new(config.ema_slow_period),
            macd: Macd::new(config.macd_fast, config.macd_slow, config.macd_signal),
            rsi: Rsi::new(config.rsi_period),
            atr: Atr::new(config.atr_period),
            obv: Obv::new(),
            atr_average_period: config.atr_average_period.max(1),
        }
    }

    /// Longest lookback over all indicators, plus one candle for the OBV delta.
    pub fn required_lookback(&self) -> usize {
        [
            self.ema_fast.min_periods(),
            self.ema_slow.min_periods(),
            self.macd.min_periods(),
            self.rsi.min_periods(),
            self.atr.min_periods(),
            self.obv.min_periods() + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(2)
    }

    /// Indicator values for the latest candle of `series`.
    pub fn snapshot(&self, series: &CandleSeries) -> Result<IndicatorSnapshot, SignalError> {
        let required = self.required_lookback();
        let actual = series.len();
        if actual < required {
            return Err(SignalError::InsufficientData { required, actual });
        }

        let candles = series.as_slice();
        let insufficient = || SignalError::InsufficientData { required, actual };

        let ema_fast = self.ema_fast.calculate(candles);
        let ema_slow = self.ema_slow.calculate(candles);
        let macd = self.macd.calculate(candles);
        let rsi = self.rsi.calculate(candles);
        let atr = self.atr.calculate(candles);
        let obv = self.obv.calculate(candles);

        let macd_last = *macd.last().ok_or_else(insufficient)?;
        let atr_last = *atr.last().ok_or_else(insufficient)?;

        let window = self.atr_average_period.min(atr.len());
        let atr_average = atr.iter().rev().take(window).sum::<f64>() / window as f64;

        let (ema_fast_prev, ema_slow_prev) = if ema_slow.len() >= 2 && ema_fast.len() >= 2 {
            (
                Some(ema_fast[ema_fast.len() - 2]),
                Some(ema_slow[ema_slow.len() - 2]),
            )
        } else {
            (None, None)
        };

        let snapshot = IndicatorSnapshot {
            ema_fast: *ema_fast.last().ok_or_else(insufficient)?,
            ema_slow: *ema_slow.last().ok_or_else(insufficient)?,
            ema_fast_prev,
            ema_slow_prev,
            macd_line: macd_last.line,
            macd_signal: macd_last.signal,
            macd_hist: macd_last.histogram,
            rsi: *rsi.last().ok_or_else(insufficient)?,
            atr: atr_last,
            atr_average,
            obv: *obv.last().ok_or_else(insufficient)?,
            obv_prev: obv[obv.len() - 2],
            close: candles[actual - 1].close,
            prev_close: candles[actual - 2].close,
        };

        if let Some(field) = snapshot.non_finite_field() {
            return Err(SignalError::NumericInstability {
                field: field.to_string(),
            });
        }

        debug!(
            "Indicators over {} candles: ema {:.4}/{:.4}, macd {:.4}/{:.4}, rsi {:.2}, atr {:.4}, obv {:.2}",
            actual,
            snapshot.ema_fast,
            snapshot.ema_slow,
            snapshot.macd_line,
            snapshot.macd_signal,
            snapshot.rsi,
            snapshot.atr,
            snapshot.obv
        );

        Ok(snapshot)
    }
}

impl Default for IndicatorBank {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
