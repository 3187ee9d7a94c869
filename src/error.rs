use thiserror::Error;

pub type Result<T> = anyhow::Result<T>;

/// Failures surfaced by [`crate::client::TenstorrentClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("base URL is required")]
    MissingBaseUrl,

    #[error("configuration `{key}` is required for the base URL")]
    MissingConfig { key: String },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// True for errors raised before any request was attempted.
    pub fn is_config(&self) -> bool {
        !matches!(self, ClientError::Transport(_))
    }
}
