//! Telegram notification sink
//!
//! Delivers release notifications through the Telegram Bot API:
//! POST {api_url}/bot{token}/sendMessage with a JSON body carrying the
//! chat id, text and parse mode. Messages use HTML parse mode so titles
//! can be bolded.

use crate::{
    error::{AppError, AppResult},
    services::notifier::NotificationSink,
};
use reqwest::Client as HttpClient;
use serde_json::json;

pub struct TelegramNotifier {
    http_client: HttpClient,
    bot_token: String,
    chat_id: String,
    api_url: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            bot_token,
            chat_id,
            api_url,
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.bot_token)
    }

    fn message_payload(&self, text: &str) -> serde_json::Value {
        json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
        })
    }
}

#[async_trait::async_trait]
impl NotificationSink for TelegramNotifier {
    async fn send(&self, text: &str) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.send_message_url())
            .json(&self.message_payload(text))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "Telegram API returned status {}: {}",
                status, body
            )));
        }

        tracing::info!("Telegram notification delivered");

        Ok(())
    }
}
