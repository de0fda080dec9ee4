//! Trendwatch - candlestick signal engine with deduplicated alerts

pub mod config;
pub mod error;
pub mod notify;
pub mod services;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use config::{Config, EngineConfig};
pub use error::{AppError, SignalError};
pub use services::{AlertRegistry, SignalEngine};
pub use types::*;
