//! Configuration keys, defaults, and the settings structs built from them.
//!
//! Values come from a key→string lookup (the process environment in the
//! binary, plain maps in tests) and are read once at startup.

use std::net::SocketAddr;
use std::time::Duration;

use crate::cards::WormholeModels;
use crate::error::ClientError;

pub const BASE_URL_KEY: &str = "KOYEB_TT_BASE_URL";
pub const API_KEY_KEY: &str = "KOYEB_TT_API_KEY";
pub const SERVER_PORT_KEY: &str = "TT_SERVER_PORT";
pub const LOG_LEVEL_KEY: &str = "TT_LOG_LEVEL";
pub const WORMHOLE_MODELS_KEY: &str = "TT_WORMHOLE_SUPPORTED_MODELS";
pub const MODEL_KEY: &str = "TT_MODEL";

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL: &str = "local-tenstorrent";
pub const PLACEHOLDER_API_KEY: &str = "fake";

/// Reads a key from the process environment, treating non-UTF-8 as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Everything the stub server needs, fixed before it accepts connections.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub default_model: String,
    pub wormhole_models: WormholeModels,
}

impl ServerConfig {
    pub fn new(port: u16, default_model: Option<&str>, wormhole_models: Option<&str>) -> Self {
        let default_model = default_model
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(DEFAULT_MODEL)
            .to_owned();
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], port)),
            default_model,
            wormhole_models: WormholeModels::load(wormhole_models),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, None, None)
    }
}

/// Resolved client connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Option<Duration>,
}

impl ClientSettings {
    /// Resolves settings from `lookup`. A missing or blank base URL is a
    /// configuration error; a missing or blank API key is replaced by
    /// `default_api_key`.
    pub fn from_lookup<F>(
        lookup: F,
        base_url_key: &str,
        api_key_key: &str,
        default_api_key: &str,
    ) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(base_url_key)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ClientError::MissingConfig {
                key: base_url_key.to_owned(),
            })?;
        let api_key = lookup(api_key_key)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_api_key.to_owned());

        Ok(Self {
            base_url,
            api_key,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
