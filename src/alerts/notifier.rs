//! Webhook delivery for alert messages

use std::future::Future;

use serde::{Deserialize, Serialize};

use super::message::AlertMessage;

/// Anything that can deliver an [`AlertMessage`]
pub trait MessageSink {
    fn send(&self, message: &AlertMessage) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Markdown webhook payload
#[derive(Debug, Serialize)]
struct MarkdownPayload<'a> {
    msgtype: &'static str,
    markdown: MarkdownBody<'a>,
}

#[derive(Debug, Serialize)]
struct MarkdownBody<'a> {
    content: &'a str,
}

/// Reply body of WeCom-style bots; other webhooks may return anything
#[derive(Debug, Deserialize)]
struct WebhookReply {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// Notifier posting markdown messages to a chat webhook
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl Notifier {
    /// Create a new notifier
    pub fn new(client: reqwest::Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }

    /// Render and deliver a message. Messages with nothing to report are skipped.
    pub async fn send(&self, message: &AlertMessage) -> Result<(), NotifyError> {
        let Some(content) = message.render() else {
            tracing::debug!("Nothing to deliver");
            return Ok(());
        };

        self.send_markdown(&content).await?;

        tracing::info!(
            category = %message.category,
            alerts = message.alerts.len(),
            "Webhook notification sent"
        );

        Ok(())
    }

    /// Send webhook notification
    async fn send_markdown(&self, content: &str) -> Result<(), NotifyError> {
        let payload = MarkdownPayload {
            msgtype: "markdown",
            markdown: MarkdownBody { content },
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                // the webhook URL embeds the bot key
                NotifyError::Webhook(format!("Failed to send webhook: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        // Non-JSON replies are accepted as long as the status was 2xx
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e.without_url(), "Failed to read webhook reply");
                String::new()
            }
        };
        if let Ok(reply) = serde_json::from_str::<WebhookReply>(&body) {
            if reply.errcode != 0 {
                return Err(NotifyError::Rejected {
                    errcode: reply.errcode,
                    errmsg: reply.errmsg,
                });
            }
        }

        Ok(())
    }
}

impl MessageSink for Notifier {
    async fn send(&self, message: &AlertMessage) -> Result<(), NotifyError> {
        Notifier::send(self, message).await
    }
}

/// Notifier errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("Webhook returned status {0}")]
    Status(u16),

    #[error("Webhook rejected message (errcode {errcode}): {errmsg}")]
    Rejected { errcode: i64, errmsg: String },
}
