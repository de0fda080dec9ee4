//! Alert delivery.

pub mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::Result;
use crate::types::Evaluation;

/// Delivers emitted signals to a third party.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Forward an emitted evaluation for `instrument`.
    async fn notify(&self, instrument: &str, evaluation: &Evaluation) -> Result<()>;

    /// Free-form status message (startup, shutdown).
    async fn send_text(&self, text: &str) -> Result<()>;
}

/// Startup notice. Delivery failures are logged, never fatal.
pub async fn announce_startup(notifier: &dyn Notifier, instrument: &str) {
    let text = format!("Trading system started - monitoring {} signals", instrument);
    if let Err(e) = notifier.send_text(&text).await {
        error!("Failed to send startup message: {}", e);
    }
}

/// Shutdown notice, sent on Ctrl-C.
pub async fn announce_shutdown(notifier: &dyn Notifier) {
    if let Err(e) = notifier.send_text("Trading system stopped").await {
        error!("Failed to send shutdown message: {}", e);
    }
}

/// Writes alerts to the log when no external channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, instrument: &str, evaluation: &Evaluation) -> Result<()> {
        info!(
            "ALERT {} {} (confidence {:.2})\n{}",
            instrument,
            evaluation.signal.direction,
            evaluation.signal.confidence,
            evaluation.signal.rationale()
        );
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        info!("{}", text);
        Ok(())
    }
}
