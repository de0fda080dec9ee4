//! Telegram Bot API notifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::Notifier;
use crate::config::TelegramConfig;
use crate::error::{AppError, Result};
use crate::types::{Evaluation, SignalDirection};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Telegram API envelope.
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

/// Sends formatted alerts to one Telegram chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    base_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: format!("{}/bot{}", TELEGRAM_API_URL, config.bot_token),
            chat_id: config.chat_id.clone(),
        }
    }

    /// Check credential shape before talking to the API.
    pub fn validate_config(token: &str, chat_id: &str) -> std::result::Result<(), String> {
        if token.trim().is_empty() {
            return Err("Bot token is required".to_string());
        }
        if chat_id.trim().is_empty() {
            return Err("Chat ID is required".to_string());
        }
        if !token.contains(':') {
            return Err("Invalid bot token format".to_string());
        }
        // Numeric for users and groups, @name for channels
        if chat_id.parse::<i64>().is_err() && !chat_id.starts_with('@') {
            return Err("Invalid chat ID format".to_string());
        }
        Ok(())
    }

    /// Verify the token with `getMe`.
    pub async fn test_connection(&self) -> Result<String> {
        let url = format!("{}/getMe", self.base_url);
        let response: TelegramResponse = self.client.get(&url).send().await?.json().await?;

        if !response.ok {
            return Err(AppError::ExternalApi(format!(
                "Telegram getMe failed: {}",
                response.description.unwrap_or_else(|| "Unknown error".to_string())
            )));
        }

        let bot_name = response
            .result
            .as_ref()
            .and_then(|r| r.get("first_name"))
            .and_then(|n| n.as_str())
            .unwrap_or("Unknown")
            .to_string();
        info!("Telegram bot connection successful. Bot: {}", bot_name);
        Ok(bot_name)
    }

    async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/sendMessage", self.base_url);
        let body = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let response: TelegramResponse = self.client.post(&url).json(&body).send().await?.json().await?;

        if response.ok {
            info!("Telegram message sent successfully");
            Ok(())
        } else {
            let description = response
                .description
                .unwrap_or_else(|| "Unknown error".to_string());
            error!("Telegram API error: {}", description);
            Err(AppError::ExternalApi(format!("Telegram API error: {}", description)))
        }
    }

    /// HTML alert body for one emitted evaluation.
    pub fn format_alert(instrument: &str, evaluation: &Evaluation) -> String {
        let signal = &evaluation.signal;
        let marker = match signal.direction {
            SignalDirection::Buy => "🟢",
            SignalDirection::Sell => "🔴",
            SignalDirection::Hold => "⚪",
        };

        let mut message = format!(
            "{marker} <b>Trading Signal Alert</b> {marker}\n\n\
             <b>Instrument:</b> {}\n\
             <b>Signal:</b> {}\n\
             <b>Confidence:</b> {:.0}%\n\
             <b>Volatility:</b> {}\n",
            escape_html(instrument),
            signal.direction,
            signal.confidence * 100.0,
            evaluation.regime.label(),
        );

        if let Some(levels) = &evaluation.levels {
            message.push_str(&format!(
                "<b>Entry Price:</b> ${:.2}\n\
                 <b>Stop Loss:</b> ${:.2}\n\
                 <b>Take Profit:</b> ${:.2}\n\
                 <b>Risk/Reward:</b> {:.2}:1\n",
                levels.entry, levels.stop_loss, levels.take_profit, levels.risk_reward
            ));
        }

        message.push_str("\n<b>Reasons:</b>\n");
        for reason in &signal.reasons {
            message.push_str(&format!("• {}\n", escape_html(reason)));
        }

        message.push_str(&format!(
            "\n<i>Generated at: {}</i>",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));

        message
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, instrument: &str, evaluation: &Evaluation) -> Result<()> {
        self.send_message(&Self::format_alert(instrument, evaluation))
            .await
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        self.send_message(&escape_html(text)).await
    }
}
