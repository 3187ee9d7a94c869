//! Deterministic stand-ins for on-device inference.
//!
//! Every function here takes the model name, the raw request body and the
//! resolved card plan so that a real backend can replace the stubs without
//! changing callers.

use crate::cards::CardPlan;

/// Number of request characters echoed back in stub text.
pub const REQUEST_PREVIEW_CHARS: usize = 160;
pub const EMBEDDING_DIMENSIONS: usize = 16;

pub fn generate_chat(model: &str, raw_request: &str, plan: &CardPlan) -> String {
    format!(
        "[stub] Replace with Tenstorrent chat inference for {model} using {plan}. Request={}",
        truncate_request(raw_request)
    )
}

pub fn generate_completion(model: &str, raw_request: &str, plan: &CardPlan) -> String {
    format!(
        "[stub] Replace with Tenstorrent completion for {model} using {plan}. Request={}",
        truncate_request(raw_request)
    )
}

/// Always a zero vector; inputs are ignored until real embeddings exist.
pub fn generate_embedding(_model: &str, _raw_request: &str, _plan: &CardPlan) -> Vec<f64> {
    vec![0.0; EMBEDDING_DIMENSIONS]
}

/// Keeps the first 160 characters, appending `...` only when something was cut.
pub fn truncate_request(raw_request: &str) -> String {
    match raw_request.char_indices().nth(REQUEST_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &raw_request[..cut]),
        None => raw_request.to_owned(),
    }
}
