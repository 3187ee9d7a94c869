use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context as AnyhowContext;
use axum::{
    body::Bytes,
    debug_handler,
    extract::{DefaultBodyLimit, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;

use crate::{
    cards::CardPlan,
    config::ServerConfig,
    error::Result,
    inference,
    json::{encode, extract_model, JsonValue, Map},
};

const CHAT_COMPLETION_ID: &str = "chatcmpl-local-stub";
const TEXT_COMPLETION_ID: &str = "cmpl-local-stub";

#[derive(Clone)]
struct ServerState {
    config: Arc<ServerConfig>,
}

/// Inputs shared by every endpoint once the body has been read.
struct StubRequest {
    body: String,
    model: String,
    plan: CardPlan,
}

impl ServerState {
    fn accept(&self, body: &[u8]) -> StubRequest {
        let body = String::from_utf8_lossy(body).into_owned();
        let model = extract_model(&body, &self.config.default_model);
        let plan = self.config.wormhole_models.resolve(Some(model.as_str()));
        StubRequest { body, model, plan }
    }
}

/// Routes for the three stub endpoints. Request bodies are not size-limited.
pub fn router(config: ServerConfig) -> Router {
    let state = ServerState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/completions", post(completions))
        .route("/v1/embeddings", post(embeddings))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: ServerConfig, log_level: LevelFilter) -> Result<()> {
    let addr = config.listen;
    tracing::info!(
        %addr,
        level = %log_level,
        default_model = %config.default_model,
        wormhole_models = %config.wormhole_models,
        "starting Tenstorrent stub server"
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding stub server address `{addr}`"))?;
    println!(
        "Tenstorrent stub server listening on http://{}",
        listener.local_addr().unwrap_or(addr)
    );

    axum::serve(listener, router(config))
        .with_graceful_shutdown(async {
            if let Err(err) = signal::ctrl_c().await {
                tracing::warn!("failed to listen for shutdown signal: {err:?}");
            }
            println!("Shutdown signal received; stopping server…");
        })
        .await
        .context("running stub server")?;

    Ok(())
}

#[debug_handler]
async fn chat_completions(State(state): State<ServerState>, body: Bytes) -> Response {
    let request = state.accept(&body);
    tracing::debug!(
        model = %request.model,
        payload_len = request.body.len(),
        cards = %request.plan,
        "handling chat completion"
    );

    let content = inference::generate_chat(&request.model, &request.body, &request.plan);
    json_response(&chat_completion_body(
        &request.model,
        &content,
        current_unix_time(),
    ))
}

#[debug_handler]
async fn completions(State(state): State<ServerState>, body: Bytes) -> Response {
    let request = state.accept(&body);
    tracing::debug!(
        model = %request.model,
        payload_len = request.body.len(),
        cards = %request.plan,
        "handling text completion"
    );

    let text = inference::generate_completion(&request.model, &request.body, &request.plan);
    json_response(&text_completion_body(
        &request.model,
        &text,
        current_unix_time(),
    ))
}

#[debug_handler]
async fn embeddings(State(state): State<ServerState>, body: Bytes) -> Response {
    let request = state.accept(&body);
    tracing::debug!(
        model = %request.model,
        payload_len = request.body.len(),
        cards = %request.plan,
        "handling embeddings"
    );

    let vector = inference::generate_embedding(&request.model, &request.body, &request.plan);
    json_response(&embedding_list_body(&request.model, vector))
}

fn json_response(value: &JsonValue) -> Response {
    ([(CONTENT_TYPE, "application/json")], encode(value)).into_response()
}

fn chat_completion_body(model: &str, content: &str, created: u64) -> JsonValue {
    let message = Map::new()
        .with("role", "assistant")
        .with("content", content);
    let choice = Map::new()
        .with("index", 0u32)
        .with("message", message)
        .with("finish_reason", "stop");

    Map::new()
        .with("id", CHAT_COMPLETION_ID)
        .with("object", "chat.completion")
        .with("created", created)
        .with("model", model)
        .with("choices", vec![choice])
        .with("usage", completion_usage())
        .into()
}

fn text_completion_body(model: &str, text: &str, created: u64) -> JsonValue {
    let choice = Map::new()
        .with("index", 0u32)
        .with("text", text)
        .with("finish_reason", "stop");

    Map::new()
        .with("id", TEXT_COMPLETION_ID)
        .with("object", "text_completion")
        .with("created", created)
        .with("model", model)
        .with("choices", vec![choice])
        .with("usage", completion_usage())
        .into()
}

fn embedding_list_body(model: &str, embedding: Vec<f64>) -> JsonValue {
    let item = Map::new()
        .with("object", "embedding")
        .with("index", 0u32)
        .with("embedding", embedding);
    let usage = Map::new()
        .with("prompt_tokens", 0u32)
        .with("total_tokens", 0u32);

    Map::new()
        .with("object", "list")
        .with("data", vec![item])
        .with("model", model)
        .with("usage", usage)
        .into()
}

fn completion_usage() -> Map {
    Map::new()
        .with("prompt_tokens", 0u32)
        .with("completion_tokens", 0u32)
        .with("total_tokens", 0u32)
}

fn current_unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}
