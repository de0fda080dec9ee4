//! Market data sources.

pub mod gateio;

pub use gateio::GateIoClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::CandleSeries;

/// Supplies candle series to the evaluation loop.
///
/// Implementations return candles in ascending timestamp order with no
/// duplicates; retries and backoff are their own concern.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the latest `limit` candles of `interval` for `instrument`.
    async fn fetch_candles(
        &self,
        instrument: &str,
        interval: &str,
        limit: usize,
    ) -> Result<CandleSeries>;
}
