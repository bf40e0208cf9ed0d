//! Request envelopes for chat completion, text completion, and embeddings.

use crate::ChatMessage;
use serde::{Deserialize, Serialize};

/// A chat completion request.
///
/// Sampling fields default to the values every backend adapter shares:
/// `temperature = 0.9`, `top_p = 0.6`, `top_k = 10`, `n = 1`,
/// `max_tokens = 1024`, `frequency_penalty = 1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatCompletionRequest {
    /// The conversation to complete.
    pub messages: Vec<ChatMessage>,

    /// The model to use. `None` means the configured base endpoint is
    /// called directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Sampling temperature.
    pub temperature: f64,

    /// Nucleus sampling probability mass.
    pub top_p: f64,

    /// Top-k sampling cutoff.
    pub top_k: u32,

    /// Number of completions to generate.
    pub n: u32,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Caller-supplied stop sequence(s), merged with the configured
    /// defaults before the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Stop>,

    /// Whether to stream the completion. Mutually exclusive with `n > 1`.
    pub stream: bool,

    /// Frequency (repetition) penalty.
    pub frequency_penalty: f64,

    /// An opaque end-user identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ChatCompletionRequest {
    /// Create a request for the given conversation with default sampling
    /// parameters.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the number of completions to generate.
    pub fn with_n(mut self, n: u32) -> Self {
        self.n = n;
        self
    }

    /// Enable or disable streaming.
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Set the caller-supplied stop sequence(s).
    pub fn with_stop(mut self, stop: impl Into<Stop>) -> Self {
        self.stop = Some(stop.into());
        self
    }
}

impl Default for ChatCompletionRequest {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            model: None,
            temperature: 0.9,
            top_p: 0.6,
            top_k: 10,
            n: 1,
            max_tokens: 1024,
            stop: None,
            stream: false,
            frequency_penalty: 1.0,
            user: None,
        }
    }
}

/// A text completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionRequest {
    /// The model to use. `None` means the configured base endpoint is
    /// called directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// The text to complete.
    pub prompt: String,

    /// If set, appended to the prompt text before rendering. Never sent as
    /// a separate backend field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Sampling temperature.
    pub temperature: f64,

    /// Nucleus sampling probability mass.
    pub top_p: f64,

    /// Top-k sampling cutoff.
    pub top_k: u32,

    /// Number of completions to generate.
    pub n: u32,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Caller-supplied stop sequence(s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Stop>,

    /// Whether to stream the completion. Mutually exclusive with `n > 1`.
    pub stream: bool,

    /// Frequency (repetition) penalty.
    pub frequency_penalty: f64,

    /// Whether to return per-token log probabilities.
    pub logprobs: bool,

    /// Whether to echo the prompt back in the generated text.
    pub echo: bool,

    /// An opaque end-user identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl CompletionRequest {
    /// Create a request for the given prompt with default sampling
    /// parameters.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the suffix appended to the prompt.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// The prompt text with the suffix (if any) appended.
    pub fn prompt_with_suffix(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}{}", self.prompt, suffix),
            None => self.prompt.clone(),
        }
    }
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self {
            model: None,
            prompt: String::new(),
            suffix: None,
            temperature: 0.9,
            top_p: 0.6,
            top_k: 10,
            n: 1,
            max_tokens: 1024,
            stop: None,
            stream: false,
            frequency_penalty: 1.0,
            logprobs: false,
            echo: false,
            user: None,
        }
    }
}

/// An embeddings request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsRequest {
    /// The model to use. `None` means the configured base endpoint is
    /// called directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// The document(s) to embed.
    pub input: EmbeddingInput,
}

impl EmbeddingsRequest {
    /// Create a request embedding the given input.
    pub fn new(input: impl Into<EmbeddingInput>) -> Self {
        Self {
            model: None,
            input: input.into(),
        }
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Input to an embeddings request: a single document or a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    /// A single document.
    One(String),
    /// A batch of documents, one embedding per element in input order.
    Many(Vec<String>),
}

impl From<&str> for EmbeddingInput {
    fn from(s: &str) -> Self {
        EmbeddingInput::One(s.to_owned())
    }
}

impl From<String> for EmbeddingInput {
    fn from(s: String) -> Self {
        EmbeddingInput::One(s)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(items: Vec<String>) -> Self {
        EmbeddingInput::Many(items)
    }
}

/// Caller-supplied stop sequence(s).
///
/// A bare string is treated as a one-element list when merged with the
/// configured defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stop {
    /// A single stop sequence.
    One(String),
    /// A list of stop sequences.
    Many(Vec<String>),
}

impl Stop {
    /// The stop sequences as a slice-backed vector.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Stop::One(s) => vec![s.clone()],
            Stop::Many(items) => items.clone(),
        }
    }
}

impl From<&str> for Stop {
    fn from(s: &str) -> Self {
        Stop::One(s.to_owned())
    }
}

impl From<String> for Stop {
    fn from(s: String) -> Self {
        Stop::One(s)
    }
}

impl From<Vec<String>> for Stop {
    fn from(items: Vec<String>) -> Self {
        Stop::Many(items)
    }
}

impl From<&[&str]> for Stop {
    fn from(items: &[&str]) -> Self {
        Stop::Many(items.iter().map(|s| (*s).to_owned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_defaults_match_the_schema() {
        let req = ChatCompletionRequest::default();
        assert_eq!(req.temperature, 0.9);
        assert_eq!(req.top_p, 0.6);
        assert_eq!(req.top_k, 10);
        assert_eq!(req.n, 1);
        assert_eq!(req.max_tokens, 1024);
        assert_eq!(req.frequency_penalty, 1.0);
        assert!(!req.stream);
    }

    #[test]
    fn chat_request_deserializes_with_defaults() {
        let req: ChatCompletionRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"Hi"}]}"#).unwrap();
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.max_tokens, 1024);
    }

    #[test]
    fn stop_deserializes_from_string_or_list() {
        let one: Stop = serde_json::from_str(r#""</s>""#).unwrap();
        assert_eq!(one.to_vec(), vec!["</s>".to_owned()]);
        let many: Stop = serde_json::from_str(r#"["</s>","<|end|>"]"#).unwrap();
        assert_eq!(many.to_vec().len(), 2);
    }

    #[test]
    fn suffix_is_appended_to_the_prompt() {
        let req = CompletionRequest::new("Hello").with_suffix(" World");
        assert_eq!(req.prompt_with_suffix(), "Hello World");
    }

    #[test]
    fn embedding_input_deserializes_untagged() {
        let one: EmbeddingInput = serde_json::from_str(r#""doc""#).unwrap();
        assert_eq!(one, EmbeddingInput::One("doc".into()));
        let many: EmbeddingInput = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(many, EmbeddingInput::Many(vec!["a".into(), "b".into()]));
    }
}
