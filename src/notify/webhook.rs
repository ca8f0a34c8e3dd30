use async_trait::async_trait;
use chrono::Utc;

use super::embed::build_payload;
use crate::config::{EmbedStyle, SectionSpec};
use crate::error::NotifyError;
use crate::stock::StockSnapshot;

/// Delivery target for change notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, snapshot: &StockSnapshot) -> Result<(), NotifyError>;
}

pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    sections: Vec<SectionSpec>,
    style: EmbedStyle,
}

impl WebhookNotifier {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        sections: Vec<SectionSpec>,
        style: EmbedStyle,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            sections,
            style,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, snapshot: &StockSnapshot) -> Result<(), NotifyError> {
        let payload = build_payload(snapshot, &self.sections, &self.style, Utc::now());

        // .json() sets Content-Type: application/json
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(NotifyError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }
        Ok(())
    }
}
