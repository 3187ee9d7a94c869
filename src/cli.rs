use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context as AnyhowContext, Result};
use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{self, ClientSettings, ServerConfig};
use crate::error::ClientError;

/// Endpoint targeted by a one-shot client request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Endpoint {
    Chat,
    Completion,
    Embedding,
}

/// Command-line options for the stub server and its client.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Tenstorrent OpenAI-compatible stub server and client", long_about = None)]
pub struct CliArgs {
    /// Run the stub HTTP server instead of sending a single request.
    #[arg(long = "serve", action = ArgAction::SetTrue)]
    pub serve: bool,

    /// Port the stub server listens on.
    #[arg(long = "port", env = config::SERVER_PORT_KEY, default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// Log verbosity (TRACE, DEBUG, INFO, WARN, ERROR and common synonyms).
    #[arg(long = "log-level", env = config::LOG_LEVEL_KEY)]
    pub log_level: Option<String>,

    /// Model name: the server's fallback for requests without one, or the model the client asks for.
    #[arg(long = "model", env = config::MODEL_KEY)]
    pub model: Option<String>,

    /// Comma-separated model prefixes served on wormhole cards.
    #[arg(long = "wormhole-models", value_name = "PREFIXES", env = config::WORMHOLE_MODELS_KEY)]
    pub wormhole_models: Option<String>,

    /// Base URL of the endpoint the client talks to.
    #[arg(long = "base-url", value_name = "URL", env = config::BASE_URL_KEY)]
    pub base_url: Option<String>,

    /// Bearer token forwarded by the client.
    #[arg(long = "api-key", env = config::API_KEY_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Endpoint for the one-shot client request.
    #[arg(long = "endpoint", value_enum, default_value_t = Endpoint::Chat)]
    pub endpoint: Endpoint,

    /// Prompt text to send.
    #[arg(long = "text", conflicts_with_all = ["prompt_file", "stdin_prompt"])]
    pub prompt: Option<String>,

    /// Read the prompt from the specified file.
    #[arg(long = "prompt-file", value_name = "PATH", conflicts_with_all = ["prompt", "stdin_prompt"])]
    pub prompt_file: Option<PathBuf>,

    /// Read the prompt from STDIN (until EOF).
    #[arg(long = "stdin-prompt", action = ArgAction::SetTrue, conflicts_with_all = ["prompt", "prompt_file"])]
    pub stdin_prompt: bool,

    /// System message placed before the prompt in chat requests.
    #[arg(long = "system")]
    pub system: Option<String>,

    #[arg(long = "max-tokens")]
    pub max_tokens: Option<u32>,

    #[arg(long = "temperature")]
    pub temperature: Option<f64>,

    /// Ask for a streamed response (the stub server answers in one body regardless).
    #[arg(long = "stream", action = ArgAction::SetTrue)]
    pub stream: bool,

    /// Requested embedding dimensions.
    #[arg(long = "dimensions")]
    pub dimensions: Option<u32>,

    /// Connect timeout (seconds) for client requests.
    #[arg(long = "timeout", value_parser = clap::value_parser!(u64).range(1..=300))]
    timeout_secs: Option<u64>,
}

impl CliArgs {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Resolve the prompt text based on CLI inputs.
    pub fn resolve_prompt(&self) -> Result<String> {
        if let Some(prompt) = &self.prompt {
            return Ok(prompt.clone());
        }
        if let Some(path) = &self.prompt_file {
            return fs::read_to_string(path)
                .with_context(|| format!("reading prompt file {}", path.display()));
        }
        if self.stdin_prompt {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading prompt from stdin")?;
            if buf.is_empty() {
                return Err(anyhow!("stdin prompt was empty"));
            }
            return Ok(buf);
        }
        Ok("hello".to_owned())
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(
            self.port,
            self.model.as_deref(),
            self.wormhole_models.as_deref(),
        )
    }

    /// Client settings with the same fallbacks as the environment lookup.
    pub fn client_settings(&self) -> std::result::Result<ClientSettings, ClientError> {
        let lookup = |key: &str| match key {
            config::BASE_URL_KEY => self.base_url.clone(),
            config::API_KEY_KEY => self.api_key.clone(),
            _ => None,
        };
        ClientSettings::from_lookup(
            lookup,
            config::BASE_URL_KEY,
            config::API_KEY_KEY,
            config::PLACEHOLDER_API_KEY,
        )
        .map(|settings| settings.with_timeout(self.timeout()))
    }

    pub fn client_model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| config::DEFAULT_MODEL.to_owned())
    }
}
