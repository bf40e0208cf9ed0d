//! The provider implementation.

use crate::{Bedrock, wire};
use async_stream::try_stream;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::types::ResponseStream;
use aws_smithy_types::error::display::DisplayErrorContext;
use futures_core::Stream;
use futures_util::stream;
use llm::{
    ChatChoice, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    CompletionChunk, CompletionRequest, CompletionResponse, EmbeddingsRequest, EmbeddingsResponse,
    Error, Provider, Result, Usage, generate_id,
};

const PROVIDER: &str = "bedrock";
const CONTENT_TYPE: &str = "application/json";

fn sdk_error(err: impl std::error::Error) -> Error {
    Error::Backend(DisplayErrorContext(err).to_string())
}

impl Bedrock {
    async fn invoke(
        &self,
        model: &str,
        body: &wire::InvocationBody<'_>,
    ) -> Result<wire::InvocationResponse> {
        tracing::debug!(request = %serde_json::to_string(body)?, "backend request");
        let output = self
            .client
            .invoke_model()
            .model_id(model)
            .content_type(CONTENT_TYPE)
            .accept(CONTENT_TYPE)
            .body(Blob::new(serde_json::to_vec(body)?))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(serde_json::from_slice(output.body.as_ref())?)
    }
}

impl Provider for Bedrock {
    async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let (model, version) = self.model_version(request.model.as_deref())?;
        let params = request.sampling(&self.default_stop)?;
        let prompt = self.render_messages(&request.messages)?;
        let body = wire::InvocationBody::new(&prompt, &params, version);

        let mut choices = Vec::with_capacity(request.n as usize);
        let mut completion_tokens = 0;
        for index in 0..request.n {
            let response = self.invoke(model, &body).await?;
            let content = response.completion.trim().to_owned();
            completion_tokens += self.estimator.estimate(&content);
            choices.push(ChatChoice {
                index,
                message: ChatMessage::assistant(content),
                finish_reason: response.stop_reason,
            });
        }

        let usage = Usage::completion(self.estimator.estimate(&prompt), completion_tokens);
        Ok(ChatCompletionResponse::new(
            request.model.clone(),
            choices,
            usage,
        ))
    }

    fn chat_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> impl Stream<Item = Result<ChatCompletionChunk>> + Send {
        try_stream! {
            let (model, version) = self.model_version(request.model.as_deref())?;
            let params = request.sampling(&self.default_stop)?;
            let prompt = self.render_messages(&request.messages)?;
            let body = wire::InvocationBody::new(&prompt, &params, version);
            let id = generate_id("chatcmpl");

            let body_json = serde_json::to_string(&body)?;
            tracing::debug!(request = %body_json, "backend request");
            let output = self
                .client
                .invoke_model_with_response_stream()
                .model_id(model)
                .content_type(CONTENT_TYPE)
                .accept(CONTENT_TYPE)
                .body(Blob::new(serde_json::to_vec(&body)?))
                .send()
                .await
                .map_err(sdk_error)?;

            yield ChatCompletionChunk::role(&id, Some(model));

            let mut events = output.body;
            while let Some(event) = events.recv().await.map_err(sdk_error)? {
                if let ResponseStream::Chunk(part) = event
                    && let Some(bytes) = part.bytes()
                {
                    let payload: wire::ChunkPayload = serde_json::from_slice(bytes.as_ref())?;
                    yield ChatCompletionChunk::content(&id, Some(model), &payload.completion);
                }
            }

            yield ChatCompletionChunk::finish(&id, Some(model), None);
        }
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
        Err(Error::Unsupported {
            provider: PROVIDER,
            capability: "text completion",
        })
    }

    fn complete_stream(
        &self,
        _request: CompletionRequest,
    ) -> impl Stream<Item = Result<CompletionChunk>> + Send {
        stream::iter([Err(Error::Unsupported {
            provider: PROVIDER,
            capability: "text completion",
        })])
    }

    async fn embed(&self, _request: &EmbeddingsRequest) -> Result<EmbeddingsResponse> {
        Err(Error::Unsupported {
            provider: PROVIDER,
            capability: "embeddings",
        })
    }
}
