//! Telegram notification for newly published pages.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument};
use url::Url;

use pagesmith_shared::{PagesmithError, Result, TelegramConfig, TelegramSecrets};

/// User-Agent string for bot API requests.
const USER_AGENT: &str = concat!("Pagesmith/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Format the announcement for a published page (Telegram Markdown).
pub fn page_message(topic: &str, page_url: &Url) -> String {
    format!("New page generated!\n\n*{topic}*\n\n[{page_url}]({page_url})")
}

/// Posts messages to one chat through the bot API.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    send_url: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, secrets: &TelegramSecrets) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PagesmithError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            send_url: format!(
                "{}/bot{}/sendMessage",
                config.api_base.trim_end_matches('/'),
                secrets.bot_token
            ),
            chat_id: secrets.chat_id.clone(),
        })
    }

    /// Announce a newly published page.
    #[instrument(skip_all, fields(topic = %topic, url = %page_url))]
    pub async fn send_page(&self, topic: &str, page_url: &Url) -> Result<()> {
        self.send(&page_message(topic, page_url)).await?;
        info!("telegram notification sent");
        Ok(())
    }

    /// Send a Markdown message to the configured chat.
    pub async fn send(&self, text: &str) -> Result<()> {
        let body = SendMessageBody {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let res = self
            .client
            .post(&self.send_url)
            .json(&body)
            .send()
            .await
            // The URL embeds the bot token.
            .map_err(|e| PagesmithError::Notification(e.without_url().to_string()))?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }

        let body = res.text().await.unwrap_or_default();
        let description = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("description").and_then(|d| d.as_str()).map(String::from))
            .unwrap_or(body);

        Err(PagesmithError::Notification(format!(
            "Telegram API error {status}: {description}"
        )))
    }
}
