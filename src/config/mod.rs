use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::error::ConfigError;

/// Points at an optional TOML file layered under the environment.
pub const CONFIG_PATH_VAR: &str = "STOCK_MONITOR_CONFIG";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_ICON_URL: &str = "https://cdn.discordapp.com/emojis/123456789.png";

/// One stock category rendered into the notification, in list order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionSpec {
    /// Top-level key in the snapshot, e.g. `normal_stock`.
    pub key: String,
    pub label: String,
    #[serde(default = "default_header_icon")]
    pub header_icon: String,
    #[serde(default = "default_item_icon")]
    pub item_icon: String,
}

impl SectionSpec {
    pub fn new(key: &str, label: &str, header_icon: &str, item_icon: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            header_icon: header_icon.to_string(),
            item_icon: item_icon.to_string(),
        }
    }
}

fn default_header_icon() -> String {
    "🔹".to_string()
}

fn default_item_icon() -> String {
    "🔸".to_string()
}

pub fn default_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec::new("normal_stock", "Normal Stock", "🔹", "🍇"),
        SectionSpec::new("mirage_stock", "Mirage Stock", "✨", "⭐"),
    ]
}

/// Static parts of the webhook embed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmbedStyle {
    pub username: String,
    pub avatar_url: String,
    pub title: String,
    pub description: String,
    /// 0xRRGGBB
    pub color: u32,
    pub footer_text: String,
    pub footer_icon_url: String,
}

impl Default for EmbedStyle {
    fn default() -> Self {
        Self {
            username: "Stock Monitor".to_string(),
            avatar_url: DEFAULT_ICON_URL.to_string(),
            title: "🍎 Stock Update".to_string(),
            description: "🔄 Stock has been updated! New changes are available.".to_string(),
            color: 0x00ff00,
            footer_text: "Stock Monitor Bot • Automatic updates".to_string(),
            footer_icon_url: DEFAULT_ICON_URL.to_string(),
        }
    }
}

/// Shape of the optional TOML file. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint_url: Option<String>,
    pub webhook_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub metrics_port: Option<u16>,
    pub embed: Option<EmbedStyle>,
    pub sections: Option<Vec<SectionSpec>>,
}

impl FileConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint_url: String,
    pub webhook_url: String,
    pub poll_interval: Duration,
    pub sections: Vec<SectionSpec>,
    pub embed: EmbedStyle,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // dotenvy loads .env, but doesn't override already-set env vars
        dotenvy::dotenv().ok();

        Ok(Self::resolve(|key| std::env::var(key).ok())?)
    }

    /// Builds the config from a variable lookup, reading the TOML file named
    /// by [`CONFIG_PATH_VAR`] if present. Environment values win over the file.
    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup(CONFIG_PATH_VAR) {
            Some(path) => FileConfig::load(&path)?,
            None => FileConfig::default(),
        };
        Self::from_parts(file, lookup)
    }

    pub fn from_parts<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_url = lookup("STOCK_ENDPOINT_URL")
            .or(file.endpoint_url)
            .ok_or(ConfigError::Missing("STOCK_ENDPOINT_URL"))?;
        validate_url("STOCK_ENDPOINT_URL", &endpoint_url)?;

        let webhook_url = lookup("WEBHOOK_URL")
            .or(file.webhook_url)
            .ok_or(ConfigError::Missing("WEBHOOK_URL"))?;
        validate_url("WEBHOOK_URL", &webhook_url)?;

        let poll_interval_secs = match lookup("POLL_INTERVAL_SECS") {
            Some(raw) => parse_number("POLL_INTERVAL_SECS", &raw)?,
            None => file.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        };
        if poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_SECS",
                reason: "must be at least 1 second".to_string(),
            });
        }

        let metrics_port = match lookup("METRICS_PORT") {
            Some(raw) => Some(parse_number("METRICS_PORT", &raw)?),
            None => file.metrics_port,
        };

        let sections = file.sections.unwrap_or_else(default_sections);
        validate_sections(&sections)?;

        Ok(Self {
            endpoint_url,
            webhook_url,
            poll_interval: Duration::from_secs(poll_interval_secs),
            sections,
            embed: file.embed.unwrap_or_default(),
            metrics_port,
        })
    }
}

fn validate_url(key: &'static str, raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

fn parse_number<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn validate_sections(sections: &[SectionSpec]) -> Result<(), ConfigError> {
    for (i, section) in sections.iter().enumerate() {
        if section.key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "sections",
                reason: format!("entry {i} has an empty key"),
            });
        }
        if sections[..i].iter().any(|s| s.key == section.key) {
            return Err(ConfigError::Invalid {
                key: "sections",
                reason: format!("duplicate key `{}`", section.key),
            });
        }
    }
    Ok(())
}
