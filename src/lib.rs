//! Local stand-in for an OpenAI-compatible inference provider.
//!
//! The server answers `/v1/chat/completions`, `/v1/completions` and
//! `/v1/embeddings` with deterministic stub output routed to a simulated
//! card plan; the client builds the same requests for a stub or real backend.

pub mod cards;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod inference;
pub mod json;
pub mod logging;
pub mod server;
