//! Wire types for the Anthropic Claude invocation API on Bedrock.

use llm::{FinishReason, SamplingParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct InvocationBody<'a> {
    pub prompt: &'a str,
    pub max_tokens_to_sample: u32,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub stop_sequences: &'a [String],
    pub anthropic_version: &'static str,
}

impl<'a> InvocationBody<'a> {
    pub(crate) fn new(prompt: &'a str, params: &'a SamplingParams, version: &'static str) -> Self {
        Self {
            prompt,
            max_tokens_to_sample: params.max_tokens,
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            stop_sequences: &params.stop,
            anthropic_version: version,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvocationResponse {
    pub completion: String,
    pub stop_reason: Option<FinishReason>,
}

/// The payload carried by one response-stream chunk.
#[derive(Debug, Deserialize)]
pub(crate) struct ChunkPayload {
    pub completion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_matches_the_claude_schema() {
        let params = SamplingParams {
            temperature: 0.9,
            top_p: 0.6,
            top_k: 10,
            max_tokens: 1024,
            repetition_penalty: 1.0,
            stop: vec!["\n\nHuman:".to_owned()],
        };
        let body = InvocationBody::new("\n\nHuman: Hello!\n\nAssistant: ", &params, "bedrock-2023-05-31");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["prompt"], "\n\nHuman: Hello!\n\nAssistant: ");
        assert_eq!(json["max_tokens_to_sample"], 1024);
        assert_eq!(json["temperature"], 0.9);
        assert_eq!(json["top_k"], 10);
        assert_eq!(json["top_p"], 0.6);
        assert_eq!(json["stop_sequences"][0], "\n\nHuman:");
        assert_eq!(json["anthropic_version"], "bedrock-2023-05-31");
    }

    #[test]
    fn responses_parse_with_and_without_a_stop_reason() {
        let full: InvocationResponse =
            serde_json::from_str(r#"{"completion":" Hi!","stop_reason":"stop_sequence"}"#).unwrap();
        assert_eq!(full.completion, " Hi!");
        assert_eq!(full.stop_reason, Some(FinishReason::StopSequence));

        let bare: InvocationResponse =
            serde_json::from_str(r#"{"completion":" Hi!","stop_reason":null}"#).unwrap();
        assert!(bare.stop_reason.is_none());
    }
}
