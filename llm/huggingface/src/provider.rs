//! The provider implementation.

use crate::{HuggingFace, wire};
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use llm::{
    ChatChoice, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    CompletionChoice, CompletionChunk, CompletionRequest, CompletionResponse, Embedding,
    EmbeddingInput, EmbeddingsRequest, EmbeddingsResponse, Error, Provider, Result, SamplingParams,
    Usage, generate_id, reqwest,
};

impl HuggingFace {
    async fn send(&self, url: &str, body: &wire::GenerationRequest<'_>) -> Result<reqwest::Response> {
        tracing::debug!(request = %serde_json::to_string(body)?, "backend request");
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await?;
            return Err(Error::BackendStatus {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response)
    }

    async fn generate(
        &self,
        url: &str,
        inputs: &str,
        params: &SamplingParams,
        echo: bool,
    ) -> Result<wire::Generation> {
        let body = wire::GenerationRequest::new(inputs, params, echo, false);
        let text = self.send(url, &body).await?.text().await?;
        tracing::debug!(response = %text, "backend response");
        let generations: Vec<wire::Generation> = serde_json::from_str(&text)?;
        generations
            .into_iter()
            .next()
            .ok_or_else(|| Error::Backend("empty generation response".to_owned()))
    }

    fn completion_tokens(&self, generation: &wire::Generation) -> u32 {
        match &generation.details {
            Some(details) => details.generated_tokens,
            None => self.estimator.estimate(&generation.generated_text),
        }
    }
}

/// Pull every complete `data:` event out of the buffer, leaving any partial
/// trailing frame in place.
fn drain_events(buffer: &mut String) -> Vec<String> {
    let mut events = Vec::new();
    while let Some(end) = buffer.find("\n\n") {
        let frame: String = buffer.drain(..end + 2).collect();
        for line in frame.lines() {
            if let Some(data) = line.strip_prefix("data:") {
                let data = data.trim();
                if !data.is_empty() {
                    events.push(data.to_owned());
                }
            }
        }
    }
    events
}

fn parse_event(data: &str) -> Option<wire::StreamEvent> {
    match serde_json::from_str(data) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!("skipping unparseable stream event: {e}, data: {data}");
            None
        }
    }
}

impl Provider for HuggingFace {
    async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let params = request.sampling(&self.default_stop)?;
        let prompt = self.render_messages(&request.messages)?;
        let url = self.completion_url(request.model.as_deref());
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

    fn chat_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> impl Stream<Item = Result<ChatCompletionChunk>> + Send {
        try_stream! {
            let params = request.sampling(&self.default_stop)?;
            let prompt = self.render_messages(&request.messages)?;
            let url = self.completion_url(request.model.as_deref());
            let id = generate_id("chatcmpl");
            let model = request.model.as_deref();

            let body = wire::GenerationRequest::new(&prompt, &params, false, true);
            let response = self.send(&url, &body).await?;

            yield ChatCompletionChunk::role(&id, model);

            let mut reason = None;
            let mut buffer = String::new();
            let mut bytes_stream = response.bytes_stream();
            'read: while let Some(bytes) = bytes_stream.next().await {
                let bytes = bytes?;
                buffer.push_str(&String::from_utf8_lossy(&bytes));
                for data in drain_events(&mut buffer) {
                    let Some(event) = parse_event(&data) else {
                        continue;
                    };
                    if event.token.special {
                        continue;
                    }
                    if params.stop.iter().any(|s| *s == event.token.text) {
                        break 'read;
                    }
                    if let Some(r) = event.details.and_then(|d| d.finish_reason) {
                        reason = Some(r);
                    }
                    yield ChatCompletionChunk::content(&id, model, &event.token.text);
                }
            }

            yield ChatCompletionChunk::finish(&id, model, reason);
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let params = request.sampling(&self.default_stop)?;
        let prompt = self.render_text(&request.prompt_with_suffix())?;
        let url = self.completion_url(request.model.as_deref());
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
        request: CompletionRequest,
    ) -> impl Stream<Item = Result<CompletionChunk>> + Send {
        try_stream! {
            let params = request.sampling(&self.default_stop)?;
            let prompt = self.render_text(&request.prompt_with_suffix())?;
            let url = self.completion_url(request.model.as_deref());
            let id = generate_id("cmpl");
            let model = request.model.as_deref();

            let body = wire::GenerationRequest::new(&prompt, &params, request.echo, true);
            let response = self.send(&url, &body).await?;

            let mut buffer = String::new();
            let mut bytes_stream = response.bytes_stream();
            'read: while let Some(bytes) = bytes_stream.next().await {
                let bytes = bytes?;
                buffer.push_str(&String::from_utf8_lossy(&bytes));
                for data in drain_events(&mut buffer) {
                    let Some(event) = parse_event(&data) else {
                        continue;
                    };
                    if event.token.special {
                        continue;
                    }
                    if params.stop.iter().any(|s| *s == event.token.text) {
                        break 'read;
                    }
                    yield CompletionChunk::token(&id, model, &event.token.text, event.token.logprob);
                }
            }
        }
    }

    async fn embed(&self, request: &EmbeddingsRequest) -> Result<EmbeddingsResponse> {
        let url = self.embeddings_url(request.model.as_deref());
        tracing::debug!(%url, "embeddings request");

        let body = serde_json::json!({ "inputs": &request.input });
        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::BackendStatus {
                status: status.as_u16(),
                detail: text,
            });
        }

        let mut data = Vec::new();
        let prompt_tokens = match &request.input {
            EmbeddingInput::Many(inputs) => {
                let vectors: Vec<Vec<f32>> = serde_json::from_str(&text)?;
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
                let vector: Vec<f32> = serde_json::from_str(&text)?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_frames_stay_buffered() {
        let mut buffer = String::from("data:{\"a\":1}\n\ndata:{\"b\"");
        let events = drain_events(&mut buffer);
        assert_eq!(events, vec!["{\"a\":1}".to_owned()]);
        assert_eq!(buffer, "data:{\"b\"");

        buffer.push_str(":2}\n\n");
        let events = drain_events(&mut buffer);
        assert_eq!(events, vec!["{\"b\":2}".to_owned()]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn unparseable_events_are_skipped() {
        assert!(parse_event("not json").is_none());
        assert!(
            parse_event(r#"{"token":{"id":1,"text":"a","logprob":-0.1,"special":false}}"#)
                .is_some()
        );
    }
}
