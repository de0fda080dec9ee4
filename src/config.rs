use std::env;

/// Parse an environment variable, falling back to a default when unset or malformed.
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Indicator periods, evaluator thresholds and classifier weights.
///
/// Defaults are the production starting point; every value can be tuned
/// through the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Fast EMA period for the trend evaluator.
    pub ema_fast_period: usize,
    /// Slow EMA period for the trend evaluator.
    pub ema_slow_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    /// Number of ATR values averaged for the volatility baseline.
    pub atr_average_period: usize,
    /// Relative distance between the EMAs treated as "no trend".
    pub trend_epsilon: f64,
    pub weight_trend: f64,
    pub weight_momentum: f64,
    pub weight_volume: f64,
    /// Absolute total score needed for BUY or SELL.
    pub decision_threshold: f64,
    /// ATR / average at or above which the regime is HIGH.
    pub high_volatility_ratio: f64,
    /// ATR / average below which the regime is LOW.
    pub low_volatility_ratio: f64,
    /// Confidence multiplier applied in the HIGH regime.
    pub high_volatility_scale: f64,
    /// ATR / average at or above which emission is suppressed (None = never).
    pub extreme_volatility_ratio: Option<f64>,
    /// Confidence increase that re-emits a sustained BUY or SELL.
    pub escalation_threshold: f64,
    /// Stop distance in ATRs for suggested trade levels.
    pub stop_atr_multiplier: f64,
    /// Take-profit distance as a multiple of the stop distance.
    pub reward_risk_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ema_fast_period: 20,
            ema_slow_period: 50,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            atr_period: 14,
            atr_average_period: 20,
            trend_epsilon: 1e-4,
            weight_trend: 0.4,
            weight_momentum: 0.4,
            weight_volume: 0.2,
            decision_threshold: 0.5,
            high_volatility_ratio: 1.5,
            low_volatility_ratio: 0.5,
            high_volatility_scale: 0.6,
            extreme_volatility_ratio: None,
            escalation_threshold: 0.2,
            stop_atr_multiplier: 1.5,
            reward_risk_ratio: 2.0,
        }
    }
}

impl EngineConfig {
    /// Load engine parameters from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ema_fast_period: env_parse("EMA_FAST_PERIOD", defaults.ema_fast_period),
            ema_slow_period: env_parse("EMA_SLOW_PERIOD", defaults.ema_slow_period),
            macd_fast: env_parse("MACD_FAST", defaults.macd_fast),
            macd_slow: env_parse("MACD_SLOW", defaults.macd_slow),
            macd_signal: env_parse("MACD_SIGNAL", defaults.macd_signal),
            rsi_period: env_parse("RSI_PERIOD", defaults.rsi_period),
            atr_period: env_parse("ATR_PERIOD", defaults.atr_period),
            atr_average_period: env_parse("ATR_AVERAGE_PERIOD", defaults.atr_average_period),
            trend_epsilon: env_parse("TREND_EPSILON", defaults.trend_epsilon),
            weight_trend: env_parse("WEIGHT_TREND", defaults.weight_trend),
            weight_momentum: env_parse("WEIGHT_MOMENTUM", defaults.weight_momentum),
            weight_volume: env_parse("WEIGHT_VOLUME", defaults.weight_volume),
            decision_threshold: env_parse("DECISION_THRESHOLD", defaults.decision_threshold),
            high_volatility_ratio: env_parse(
                "HIGH_VOLATILITY_RATIO",
                defaults.high_volatility_ratio,
            ),
            low_volatility_ratio: env_parse("LOW_VOLATILITY_RATIO", defaults.low_volatility_ratio),
            high_volatility_scale: env_parse(
                "HIGH_VOLATILITY_SCALE",
                defaults.high_volatility_scale,
            ),
            extreme_volatility_ratio: env::var("EXTREME_VOLATILITY_RATIO")
                .ok()
                .and_then(|v| v.parse().ok()),
            escalation_threshold: env_parse(
                "ESCALATION_THRESHOLD",
                defaults.escalation_threshold,
            ),
            stop_atr_multiplier: env_parse("STOP_ATR_MULTIPLIER", defaults.stop_atr_multiplier),
            reward_risk_ratio: env_parse("REWARD_RISK_RATIO", defaults.reward_risk_ratio),
        }
    }
}

/// Telegram bot credentials.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Monitored contract, e.g. "ETH_USDT".
    pub instrument: String,
    /// Candle interval, e.g. "5m".
    pub interval: String,
    /// Number of candles fetched per cycle.
    pub candle_limit: usize,
    /// Delay between evaluation cycles (seconds).
    pub poll_interval_secs: u64,
    /// Gate.io REST API base URL.
    pub gateio_api_url: String,
    /// Telegram alerts (disabled when credentials are missing).
    pub telegram: Option<TelegramConfig>,
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let telegram = match (env::var("TELEGRAM_BOT_TOKEN"), env::var("TELEGRAM_CHAT_ID")) {
            (Ok(bot_token), Ok(chat_id)) if !bot_token.is_empty() && !chat_id.is_empty() => {
                Some(TelegramConfig { bot_token, chat_id })
            }
            _ => None,
        };

        Self {
            instrument: env::var("INSTRUMENT").unwrap_or_else(|_| "ETH_USDT".to_string()),
            interval: env::var("CANDLE_INTERVAL").unwrap_or_else(|_| "5m".to_string()),
            candle_limit: env_parse("CANDLE_LIMIT", 100),
            poll_interval_secs: env_parse("POLL_INTERVAL_SECS", 30),
            gateio_api_url: env::var("GATEIO_API_URL")
                .unwrap_or_else(|_| "https://api.gateio.ws/api/v4".to_string()),
            telegram,
            engine: EngineConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instrument: "ETH_USDT".to_string(),
            interval: "5m".to_string(),
            candle_limit: 100,
            poll_interval_secs: 30,
            gateio_api_url: "https://api.gateio.ws/api/v4".to_string(),
            telegram: None,
            engine: EngineConfig::default(),
        }
    }
}
