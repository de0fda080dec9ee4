use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trendwatch::notify::{self, LogNotifier, Notifier, TelegramNotifier};
use trendwatch::sources::{CandleSource, GateIoClient};
use trendwatch::{AlertRegistry, AppError, Config, MarketSummary, SignalEngine};

/// Pick Telegram when configured and reachable, the log otherwise.
async fn build_notifier(config: &Config) -> Box<dyn Notifier> {
    let Some(telegram) = &config.telegram else {
        warn!("Telegram credentials not found - alerts go to the log only");
        return Box::new(LogNotifier);
    };

    if let Err(e) = TelegramNotifier::validate_config(&telegram.bot_token, &telegram.chat_id) {
        warn!("Telegram configuration invalid ({}) - alerts go to the log only", e);
        return Box::new(LogNotifier);
    }

    let notifier = TelegramNotifier::new(telegram);
    match notifier.test_connection().await {
        Ok(_) => Box::new(notifier),
        Err(e) => {
            error!("Telegram bot connection failed: {}", e);
            Box::new(LogNotifier)
        }
    }
}

/// One fetch → evaluate → notify pass. Returns whether an alert went out.
async fn run_cycle(
    config: &Config,
    source: &dyn CandleSource,
    notifier: &dyn Notifier,
    engine: &SignalEngine,
    registry: &AlertRegistry,
) -> Result<bool, AppError> {
    let series = source
        .fetch_candles(&config.instrument, &config.interval, config.candle_limit)
        .await?;
    debug!(
        "Fetched {} candles for {} from {}",
        series.len(),
        config.instrument,
        source.name()
    );

    let evaluation = engine.evaluate_instrument(registry, &config.instrument, &series)?;

    if let Some(summary) = MarketSummary::from_series(&series, &evaluation.snapshot) {
        info!(
            "[{}] ${:.2} ({:+.2}%) | RSI {:.1} | Signal: {} ({:.2})",
            config.instrument,
            summary.current_price,
            summary.price_change_pct,
            summary.rsi,
            evaluation.signal.direction,
            evaluation.signal.confidence
        );
    }

    if !evaluation.emit {
        return Ok(false);
    }

    // Stored only after delivery so a failed send is retried next cycle
    notifier.notify(&config.instrument, &evaluation).await?;
    registry.commit(&config.instrument, evaluation.state);
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trendwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Starting trendwatch for {} ({} candles, polling every {}s)",
        config.instrument, config.interval, config.poll_interval_secs
    );

    let source = GateIoClient::new(Some(config.gateio_api_url.clone()));
    let engine = SignalEngine::new(config.engine.clone());
    let registry = AlertRegistry::new();

    if config.candle_limit < engine.required_lookback() {
        warn!(
            "CANDLE_LIMIT {} is below the {} candles the indicators need; every cycle will be skipped",
            config.candle_limit,
            engine.required_lookback()
        );
    }

    let notifier = build_notifier(&config).await;
    notify::announce_startup(notifier.as_ref(), &config.instrument).await;

    let mut ticker = tokio::time::interval(Duration::from_secs(config.poll_interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut signal_count: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match run_cycle(&config, &source, notifier.as_ref(), &engine, &registry).await {
                    Ok(true) => {
                        signal_count += 1;
                        info!("Alert #{} sent for {}", signal_count, config.instrument);
                    }
                    Ok(false) => {}
                    Err(AppError::Signal(e)) if e.is_recoverable() => {
                        warn!("Skipping cycle: {}", e);
                    }
                    Err(e) => {
                        error!("Evaluation cycle failed: {}", e);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down after {} alerts", signal_count);
                notify::announce_shutdown(notifier.as_ref()).await;
                break;
            }
        }
    }

    Ok(())
}
