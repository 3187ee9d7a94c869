//! Client against a live stub server on an ephemeral port.

use std::net::SocketAddr;

use serde_json::Value;
use tokio::net::TcpListener;
use tt_stub::client::{ChatMessage, TenstorrentClient};
use tt_stub::config::ServerConfig;
use tt_stub::server::router;

async fn spawn_server(config: ServerConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router(config)).await.expect("serve");
    });
    addr
}

fn client_for(addr: SocketAddr, model: &str) -> TenstorrentClient {
    TenstorrentClient::new(&format!("http://{addr}/"), "fake", model, None).expect("client")
}

#[tokio::test]
async fn chat_round_trip_through_stub() {
    let addr = spawn_server(ServerConfig::default()).await;
    let client = client_for(addr, "meta-llama/llama-3.1-8b-instruct-q4");

    let response = client
        .create_chat_completion(&[ChatMessage::user("hi")], Some(8), Some(0.1), false)
        .await
        .expect("chat response");

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    let json: Value = serde_json::from_str(&response.body).expect("json body");
    assert_eq!(json["object"], "chat.completion");
    assert_eq!(json["model"], "meta-llama/llama-3.1-8b-instruct-q4");
    let content = json["choices"][0]["message"]["content"].as_str().unwrap();
    assert!(content.contains("using wormhole + blackhole"), "{content}");
}

#[tokio::test]
async fn completion_and_embeddings_through_stub() {
    let addr = spawn_server(ServerConfig::new(0, Some("fallback"), Some("tiny"))).await;
    let client = client_for(addr, "tiny-llm");

    let completion = client
        .create_completion("once upon a time", None, None, true)
        .await
        .expect("completion response");
    let json: Value = serde_json::from_str(&completion.body).expect("json body");
    assert_eq!(json["object"], "text_completion");
    assert!(json["choices"][0]["text"]
        .as_str()
        .unwrap()
        .contains("tiny-llm using wormhole + blackhole"));

    let embeddings = client
        .create_embeddings(&["a".to_owned(), "b".to_owned()], Some(4))
        .await
        .expect("embedding response");
    let json: Value = serde_json::from_str(&embeddings.body).expect("json body");
    assert_eq!(json["object"], "list");
    assert_eq!(json["model"], "tiny-llm");
    assert_eq!(json["data"][0]["embedding"].as_array().unwrap().len(), 16);
}
