//! Wire types for text-generation-inference containers behind SageMaker.

use llm::{FinishReason, SamplingParams};
use serde::{Deserialize, Serialize};

/// Fixed sampling seed, sent with every generation request.
pub(crate) const SEED: u64 = 42;

#[derive(Debug, Serialize)]
pub(crate) struct InvocationRequest<'a> {
    pub inputs: &'a str,
    pub parameters: InvocationParameters<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct InvocationParameters<'a> {
    pub details: bool,
    pub do_sample: bool,
    pub return_full_text: bool,
    pub max_new_tokens: u32,
    pub top_p: f64,
    pub temperature: f64,
    pub stop_sequences: &'a [String],
    pub repetition_penalty: f64,
    pub top_k: u32,
    pub seed: u64,
}

impl<'a> InvocationRequest<'a> {
    pub(crate) fn new(inputs: &'a str, params: &'a SamplingParams, echo: bool) -> Self {
        Self {
            inputs,
            parameters: InvocationParameters {
                details: true,
                do_sample: true,
                return_full_text: echo,
                max_new_tokens: params.max_tokens,
                top_p: params.top_p,
                temperature: params.temperature,
                stop_sequences: &params.stop,
                repetition_penalty: params.repetition_penalty,
                top_k: params.top_k,
                seed: SEED,
            },
        }
    }
}

/// One element of the invocation response array.
#[derive(Debug, Deserialize)]
pub(crate) struct Generation {
    pub generated_text: String,
    pub details: Option<GenerationDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerationDetails {
    pub finish_reason: FinishReason,
    pub generated_tokens: u32,
    #[serde(default)]
    pub tokens: Option<serde_json::Value>,
}

/// An embeddings invocation response. Different containers report the
/// vectors under different keys.
#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingResponse {
    vectors: Option<Vec<Vec<f32>>>,
    predictions: Option<Vec<Vec<f32>>>,
    embeddings: Option<Vec<Vec<f32>>>,
}

impl EmbeddingResponse {
    /// The vectors, whichever key the container used.
    pub(crate) fn into_vectors(self) -> Option<Vec<Vec<f32>>> {
        self.vectors.or(self.predictions).or(self.embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_the_container_schema() {
        let params = SamplingParams {
            temperature: 0.9,
            top_p: 0.6,
            top_k: 10,
            max_tokens: 256,
            repetition_penalty: 1.0,
            stop: vec!["</s>".to_owned()],
        };
        let json = serde_json::to_value(InvocationRequest::new("Hello", &params, false)).unwrap();
        assert_eq!(json["inputs"], "Hello");
        assert!(json.get("stream").is_none());
        assert_eq!(json["parameters"]["details"], true);
        assert_eq!(json["parameters"]["max_new_tokens"], 256);
        assert_eq!(json["parameters"]["seed"], 42);
    }

    #[test]
    fn embedding_keys_are_tried_in_order() {
        let vectors: EmbeddingResponse =
            serde_json::from_str(r#"{"vectors":[[0.1]]}"#).unwrap();
        assert_eq!(vectors.into_vectors(), Some(vec![vec![0.1]]));

        let predictions: EmbeddingResponse =
            serde_json::from_str(r#"{"predictions":[[0.2]]}"#).unwrap();
        assert_eq!(predictions.into_vectors(), Some(vec![vec![0.2]]));

        let embeddings: EmbeddingResponse =
            serde_json::from_str(r#"{"embeddings":[[0.3]]}"#).unwrap();
        assert_eq!(embeddings.into_vectors(), Some(vec![vec![0.3]]));

        let none: EmbeddingResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(none.into_vectors(), None);
    }
}
