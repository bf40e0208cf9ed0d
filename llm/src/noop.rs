//! No-op provider for testing.
//!
//! Implements [`Provider`] but panics on every operation that would reach a
//! backend. Request validation still runs first, so unit tests can exercise
//! validation failures without making real backend calls.

use crate::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, CompletionChunk,
    CompletionRequest, CompletionResponse, EmbeddingsRequest, EmbeddingsResponse, Provider, Result,
};
use futures_core::Stream;

/// A provider that validates requests, then panics instead of calling a
/// backend.
///
/// # Panics
///
/// Every method panics once validation passes. Only use this provider in
/// tests that never reach a backend.
#[derive(Clone, Copy)]
pub struct NoopProvider;

impl Provider for NoopProvider {
    async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        request.sampling(&[])?;
        panic!("NoopProvider::chat called: not intended for real backend calls");
    }

    fn chat_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> impl Stream<Item = Result<ChatCompletionChunk>> + Send {
        async_stream::try_stream! {
            request.sampling(&[])?;
            panic!("NoopProvider::chat_stream called: not intended for real backend calls");
            #[allow(unreachable_code)]
            {
                yield ChatCompletionChunk::default();
            }
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        request.sampling(&[])?;
        panic!("NoopProvider::complete called: not intended for real backend calls");
    }

    fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> impl Stream<Item = Result<CompletionChunk>> + Send {
        async_stream::try_stream! {
            request.sampling(&[])?;
            panic!("NoopProvider::complete_stream called: not intended for real backend calls");
            #[allow(unreachable_code)]
            {
                yield CompletionChunk::default();
            }
        }
    }

    async fn embed(&self, _request: &EmbeddingsRequest) -> Result<EmbeddingsResponse> {
        panic!("NoopProvider::embed called: not intended for real backend calls");
    }
}
