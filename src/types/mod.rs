pub mod candle;
pub mod market;
pub mod signals;

pub use candle::*;
pub use market::*;
pub use signals::*;
