//! Provider abstraction for the unified LLM interface.

use crate::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, CompletionChunk,
    CompletionRequest, CompletionResponse, EmbeddingsRequest, EmbeddingsResponse, Result,
};
use futures_core::Stream;

/// A backend adapter.
///
/// Non-streaming operations issue one backend call per requested choice,
/// strictly sequentially, and aggregate the results into a single envelope.
/// Streaming operations are only valid for `n == 1` and produce a finite,
/// non-restartable chunk sequence; backends without streaming support yield
/// a single unsupported-capability error before any call.
pub trait Provider: Clone {
    /// Create a chat completion.
    fn chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> impl Future<Output = Result<ChatCompletionResponse>> + Send;

    /// Stream a chat completion as an ordered sequence of chunks.
    fn chat_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> impl Stream<Item = Result<ChatCompletionChunk>> + Send;

    /// Create a text completion.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse>> + Send;

    /// Stream a text completion as an ordered sequence of chunks.
    fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> impl Stream<Item = Result<CompletionChunk>> + Send;

    /// Embed the request input, one vector per input element.
    fn embed(
        &self,
        request: &EmbeddingsRequest,
    ) -> impl Future<Output = Result<EmbeddingsResponse>> + Send;
}
