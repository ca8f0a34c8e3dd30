use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::config::{EmbedStyle, SectionSpec};
use crate::stock::StockSnapshot;

/// Body POSTed to the webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub avatar_url: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub footer: EmbedFooter,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Renders a snapshot into a single-embed payload.
///
/// Each configured section found in the snapshot contributes one summary
/// field followed by one inline field per item, in configuration order.
/// Sections without an item list are skipped.
pub fn build_payload(
    snapshot: &StockSnapshot,
    sections: &[SectionSpec],
    style: &EmbedStyle,
    now: DateTime<Utc>,
) -> WebhookPayload {
    let mut fields = Vec::new();

    for section in sections {
        let Some(items) = snapshot.section_items(&section.key) else {
            continue;
        };

        fields.push(EmbedField {
            name: format!("{} {}", section.header_icon, section.label),
            value: match items.len() {
                1 => "1 item in stock".to_string(),
                n => format!("{n} items in stock"),
            },
            inline: false,
        });

        for item in &items {
            fields.push(EmbedField {
                name: format!("{} {}", section.item_icon, item.name()),
                value: format!(
                    "💰 **USD price:** {}\n💎 **Robux price:** {}",
                    item.usd_price(),
                    item.robux_price()
                ),
                inline: true,
            });
        }
    }

    WebhookPayload {
        username: style.username.clone(),
        avatar_url: style.avatar_url.clone(),
        embeds: vec![Embed {
            title: style.title.clone(),
            description: style.description.clone(),
            color: style.color,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            footer: EmbedFooter {
                text: style.footer_text.clone(),
                icon_url: style.footer_icon_url.clone(),
            },
            fields,
        }],
    }
}
