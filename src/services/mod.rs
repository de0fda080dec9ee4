pub mod signals;

pub use signals::{
    AlertDeduplicator, AlertRegistry, IndicatorBank, SignalClassifier, SignalEngine,
};
