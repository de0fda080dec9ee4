use thiserror::Error;

/// Failures of a single evaluation cycle.
///
/// None of these touch the alert state: a failed cycle leaves it exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("Insufficient data: need {required} candles, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: String },

    #[error("Numeric instability: {field} is not finite")]
    NumericInstability { field: String },
}

impl SignalError {
    /// Whether waiting for more candles can resolve this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SignalError::InsufficientData { .. })
    }
}

/// Application error types for the collaborators around the engine.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
