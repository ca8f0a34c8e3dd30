//! Error types for the monitor.

use thiserror::Error;

/// Inbound call against the stock endpoint failed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid JSON body: {0}")]
    Parse(#[source] reqwest::Error),
}

/// Outbound webhook delivery failed.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("webhook returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
