//! Unified client schema for hosted LLM inference backends.
//!
//! This crate provides the canonical types shared across all backend
//! adapters: `ChatMessage`, the request envelopes, the response envelopes
//! and their streaming chunk counterparts, the prompt [`Template`] registry,
//! the parameter normalizer, and the [`Provider`] trait. Adapters for the
//! individual backends live in their own crates (`unillm-huggingface`,
//! `unillm-sagemaker`, `unillm-bedrock`).

pub use error::{Error, Result};
pub use message::{ChatMessage, Role};
pub use noop::NoopProvider;
pub use normalize::{
    PROBABILITY_EPSILON, SamplingParams, TOP_P_MAX, ensure_streamable, merge_stop,
    normalize_temperature, normalize_top_p,
};
pub use prompt::Template;
pub use provider::Provider;
pub use request::{
    ChatCompletionRequest, CompletionRequest, EmbeddingInput, EmbeddingsRequest, Stop,
};
pub use response::{
    ChatChoice, ChatCompletionChunk, ChatCompletionResponse, ChatStreamChoice, CompletionChoice,
    CompletionChunk, CompletionResponse, CompletionStreamChoice, Delta, Embedding,
    EmbeddingsResponse, FinishReason, Usage, generate_id, unix_timestamp,
};
#[cfg(feature = "http")]
pub use reqwest::{self, Client};
pub use tokens::{CharEstimator, TokenEstimator, estimate_tokens};

mod error;
mod message;
mod noop;
mod normalize;
pub mod prompt;
mod provider;
mod request;
mod response;
mod tokens;
