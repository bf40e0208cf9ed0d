//! The provider implementation.

use crate::{SageMaker, sign, wire};
use futures_core::Stream;
use futures_util::stream;
use llm::{
    ChatChoice, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    CompletionChoice, CompletionChunk, CompletionRequest, CompletionResponse, Embedding,
    EmbeddingInput, EmbeddingsRequest, EmbeddingsResponse, Error, Provider, Result, SamplingParams,
    Usage, reqwest,
};

const PROVIDER: &str = "sagemaker";

impl SageMaker {
    async fn invoke(&self, url: &str, body: Vec<u8>) -> Result<String> {
        let mut request = http::Request::builder()
            .method("POST")
            .uri(url)
            .header("content-type", "application/json")
            .body(body)
            .map_err(|e| Error::Backend(format!("request build: {e}")))?;
        sign::sign_request(&mut request, &self.credentials, &self.region)?;

        let response = self.client.execute(reqwest::Request::try_from(request)?).await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::BackendStatus {
                status: status.as_u16(),
                detail: text,
            });
        }
        Ok(text)
    }

    async fn generate(
        &self,
        url: &str,
        inputs: &str,
        params: &SamplingParams,
        echo: bool,
    ) -> Result<wire::Generation> {
        let body = wire::InvocationRequest::new(inputs, params, echo);
        tracing::debug!(request = %serde_json::to_string(&body)?, "backend request");
        let text = self.invoke(url, serde_json::to_vec(&body)?).await?;
        tracing::debug!(response = %text, "backend response");
        let generations: Vec<wire::Generation> = serde_json::from_str(&text)?;
        generations
            .into_iter()
            .next()
            .ok_or_else(|| Error::Backend("empty invocation response".to_owned()))
    }

    fn completion_tokens(&self, generation: &wire::Generation) -> u32 {
        match &generation.details {
            Some(details) => details.generated_tokens,
            None => self.estimator.estimate(&generation.generated_text),
        }
    }
}

impl Provider for SageMaker {
    async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let params = request.sampling(&self.default_stop)?;
        let prompt = self.render_messages(&request.messages)?;
        let url = self.invocation_url(request.model.as_deref());
        tracing::debug!(%url, stop = ?params.stop, "chat completion");

        let mut choices = Vec::with_capacity(request.n as usize);
        let mut completion_tokens = 0;
        for index in 0..request.n {
            let generation = self.generate(&url, &prompt, &params, false).await?;
            completion_tokens += self.completion_tokens(&generation);
            let wire::Generation {
                generated_text,
                details,
            } = generation;
            choices.push(ChatChoice {
                index,
                message: ChatMessage::assistant(generated_text),
                finish_reason: details.map(|d| d.finish_reason),
            });
        }

        let usage = Usage::completion(self.estimator.estimate(&prompt), completion_tokens);
        Ok(ChatCompletionResponse::new(
            request.model.clone(),
            choices,
            usage,
        ))
    }

    /// The runtime endpoint offers no token stream; the stream's only item
    /// is the unsupported-capability error, produced before any call.
    fn chat_stream(
        &self,
        _request: ChatCompletionRequest,
    ) -> impl Stream<Item = Result<ChatCompletionChunk>> + Send {
        stream::iter([Err(Error::Unsupported {
            provider: PROVIDER,
            capability: "streaming",
        })])
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let params = request.sampling(&self.default_stop)?;
        let prompt = self.render_text(&request.prompt_with_suffix())?;
        let url = self.invocation_url(request.model.as_deref());
        tracing::debug!(%url, stop = ?params.stop, "text completion");

        let mut choices = Vec::with_capacity(request.n as usize);
        let mut completion_tokens = 0;
        for index in 0..request.n {
            let generation = self.generate(&url, &prompt, &params, request.echo).await?;
            completion_tokens += self.completion_tokens(&generation);
            let wire::Generation {
                generated_text,
                details,
            } = generation;
            let (finish_reason, tokens) = match details {
                Some(d) => (Some(d.finish_reason), d.tokens),
                None => (None, None),
            };
            choices.push(CompletionChoice {
                index,
                text: generated_text,
                logprobs: if request.logprobs { tokens } else { None },
                finish_reason,
            });
        }

        let usage = Usage::completion(self.estimator.estimate(&prompt), completion_tokens);
        Ok(CompletionResponse::new(
            request.model.clone(),
            choices,
            usage,
        ))
    }

    fn complete_stream(
        &self,
        _request: CompletionRequest,
    ) -> impl Stream<Item = Result<CompletionChunk>> + Send {
        stream::iter([Err(Error::Unsupported {
            provider: PROVIDER,
            capability: "streaming",
        })])
    }

    async fn embed(&self, request: &EmbeddingsRequest) -> Result<EmbeddingsResponse> {
        let url = self.invocation_url(request.model.as_deref());
        tracing::debug!(%url, "embeddings request");

        let body = serde_json::to_vec(&serde_json::json!({ "inputs": &request.input }))?;
        let text = self.invoke(&url, body).await?;
        let response: wire::EmbeddingResponse = serde_json::from_str(&text)?;
        let vectors = response.into_vectors().ok_or_else(|| {
            Error::Backend("no vectors, predictions, or embeddings in response".to_owned())
        })?;

        let mut data = Vec::new();
        let prompt_tokens = match &request.input {
            EmbeddingInput::Many(inputs) => {
                if vectors.len() != inputs.len() {
                    return Err(Error::Backend(format!(
                        "expected {} embeddings, got {}",
                        inputs.len(),
                        vectors.len()
                    )));
                }
                for (index, vector) in vectors.into_iter().enumerate() {
                    data.push(Embedding::new(index as u32, vector));
                }
                inputs.iter().map(|i| self.estimator.estimate(i)).sum()
            }
            EmbeddingInput::One(input) => {
                let vector = vectors
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::Backend("empty embeddings response".to_owned()))?;
                data.push(Embedding::new(0, vector));
                self.estimator.estimate(input)
            }
        };

        Ok(EmbeddingsResponse::new(
            request.model.clone(),
            data,
            Usage::prompt_only(prompt_tokens),
        ))
    }
}
