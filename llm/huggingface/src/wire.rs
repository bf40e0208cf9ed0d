//! Wire types for the text-generation-inference API.

use llm::{FinishReason, SamplingParams};
use serde::{Deserialize, Serialize};

/// Fixed sampling seed, sent with every generation request.
pub(crate) const SEED: u64 = 42;

#[derive(Debug, Serialize)]
pub(crate) struct GenerationRequest<'a> {
    pub inputs: &'a str,
    pub parameters: GenerationParameters<'a>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerationParameters<'a> {
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

impl<'a> GenerationRequest<'a> {
    pub(crate) fn new(
        inputs: &'a str,
        params: &'a SamplingParams,
        echo: bool,
        stream: bool,
    ) -> Self {
        Self {
            inputs,
            parameters: GenerationParameters {
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
            stream,
        }
    }
}

/// One element of the generation response array.
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

/// One server-sent generation event.
#[derive(Debug, Deserialize)]
pub(crate) struct StreamEvent {
    pub token: StreamToken,
    pub details: Option<StreamDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamToken {
    #[allow(dead_code)]
    pub id: u64,
    pub text: String,
    pub logprob: Option<f64>,
    pub special: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamDetails {
    pub finish_reason: Option<FinishReason>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SamplingParams {
        SamplingParams {
            temperature: 0.9,
            top_p: 0.6,
            top_k: 10,
            max_tokens: 1024,
            repetition_penalty: 1.0,
            stop: vec!["</s>".to_owned()],
        }
    }

    #[test]
    fn request_body_matches_the_tgi_schema() {
        let params = params();
        let body = GenerationRequest::new("Hello", &params, false, false);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["inputs"], "Hello");
        assert_eq!(json["stream"], false);
        let p = &json["parameters"];
        assert_eq!(p["details"], true);
        assert_eq!(p["do_sample"], true);
        assert_eq!(p["return_full_text"], false);
        assert_eq!(p["max_new_tokens"], 1024);
        assert_eq!(p["stop_sequences"][0], "</s>");
        assert_eq!(p["seed"], 42);
    }

    #[test]
    fn echo_turns_into_return_full_text() {
        let params = params();
        let body = GenerationRequest::new("Hello", &params, true, false);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["parameters"]["return_full_text"], true);
    }

    #[test]
    fn stream_events_parse() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"token":{"id":5,"text":" world","logprob":-0.5,"special":false},"details":null}"#,
        )
        .unwrap();
        assert_eq!(event.token.text, " world");
        assert!(!event.token.special);
        assert!(event.details.is_none());
    }
}
