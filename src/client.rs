use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

use crate::config::{self, ClientSettings};
use crate::error::ClientError;
use crate::json::{encode, JsonValue, Map};

/// A single chat turn sent to `/v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    fn to_json(&self) -> JsonValue {
        Map::new()
            .with("role", &self.role)
            .with("content", &self.content)
            .into()
    }
}

/// Response exactly as received, whatever the status.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Client for an OpenAI-compatible inference endpoint.
#[derive(Debug, Clone)]
pub struct TenstorrentClient {
    http: Client,
    base: Url,
    api_key: String,
    model: String,
}

impl TenstorrentClient {
    /// Builds a client for `{base_url}/v1/`. `timeout` bounds connection
    /// establishment only.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(ClientError::MissingBaseUrl);
        }
        let base = Url::parse(&format!("{}/v1/", base_url.trim_end_matches('/')))?;

        let mut builder = ClientBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn from_settings(
        settings: &ClientSettings,
        model: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Self::new(
            &settings.base_url,
            settings.api_key.clone(),
            model,
            settings.timeout,
        )
    }

    /// Resolves base URL and API key from the environment using the default
    /// keys and placeholder key.
    pub fn from_env(model: impl Into<String>) -> Result<Self, ClientError> {
        let settings = ClientSettings::from_lookup(
            config::env_lookup,
            config::BASE_URL_KEY,
            config::API_KEY_KEY,
            config::PLACEHOLDER_API_KEY,
        )?;
        Self::from_settings(&settings, model)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn create_chat_completion(
        &self,
        messages: &[ChatMessage],
        max_tokens: Option<u32>,
        temperature: Option<f64>,
        stream: bool,
    ) -> Result<RawResponse, ClientError> {
        let payload = chat_payload(&self.model, messages, max_tokens, temperature, stream);
        self.post("chat/completions", &payload).await
    }

    pub async fn create_completion(
        &self,
        prompt: &str,
        max_tokens: Option<u32>,
        temperature: Option<f64>,
        stream: bool,
    ) -> Result<RawResponse, ClientError> {
        let payload = completion_payload(&self.model, prompt, max_tokens, temperature, stream);
        self.post("completions", &payload).await
    }

    pub async fn create_embeddings(
        &self,
        input: &[String],
        dimensions: Option<u32>,
    ) -> Result<RawResponse, ClientError> {
        let payload = embeddings_payload(&self.model, input, dimensions);
        self.post("embeddings", &payload).await
    }

    async fn post(&self, path: &str, payload: &JsonValue) -> Result<RawResponse, ClientError> {
        let url = self.base.join(path)?;
        let body = encode(payload);
        debug!(%url, body_len = body.len(), "sending request");

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;
        debug!(status, body_len = body.len(), "received response");

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

fn chat_payload(
    model: &str,
    messages: &[ChatMessage],
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    stream: bool,
) -> JsonValue {
    let messages: Vec<JsonValue> = messages.iter().map(ChatMessage::to_json).collect();
    let mut payload = Map::new()
        .with("model", model)
        .with("stream", stream)
        .with("messages", messages);
    payload.insert_opt("max_tokens", max_tokens);
    payload.insert_opt("temperature", temperature);
    payload.into()
}

fn completion_payload(
    model: &str,
    prompt: &str,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    stream: bool,
) -> JsonValue {
    let mut payload = Map::new()
        .with("model", model)
        .with("prompt", prompt)
        .with("stream", stream);
    payload.insert_opt("max_tokens", max_tokens);
    payload.insert_opt("temperature", temperature);
    payload.into()
}

fn embeddings_payload(model: &str, input: &[String], dimensions: Option<u32>) -> JsonValue {
    let mut payload = Map::new()
        .with("model", model)
        .with("input", input.to_vec());
    payload.insert_opt("dimensions", dimensions);
    payload.into()
}
