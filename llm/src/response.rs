//! Canonical response envelopes and their streaming chunk counterparts.
//!
//! Every envelope is constructed once per backend call (or once per streamed
//! chunk) and never mutated after being handed to the caller.

use crate::{ChatMessage, Role};
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a response identifier: the given tag plus a short random
/// alphanumeric suffix.
pub fn generate_id(prefix: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("{prefix}-{suffix}")
}

/// The current time in whole seconds since the unix epoch.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Token accounting for a completed call.
///
/// Counts are estimates when the backend does not report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,

    /// Tokens generated across all choices. Absent for embeddings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,

    /// Prompt plus completion tokens.
    pub total_tokens: u32,
}

impl Usage {
    /// Usage for a completion call.
    pub fn completion(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens: Some(completion_tokens),
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Usage for a call that consumes a prompt without generating tokens.
    pub fn prompt_only(prompt_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens: None,
            total_tokens: prompt_tokens,
        }
    }
}

/// The reason the backend stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// A stop condition was met.
    Stop,
    /// A stop sequence was generated.
    StopSequence,
    /// The generation length limit was reached.
    Length,
    /// The end-of-sequence token was generated.
    EosToken,
    /// The backend's token budget was exhausted.
    MaxTokens,
}

/// One generated chat completion.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatChoice {
    /// Zero-based index in call order.
    pub index: u32,

    /// The generated assistant message.
    pub message: ChatMessage,

    /// Why generation stopped, when the backend reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

/// A complete chat completion response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatCompletionResponse {
    /// Generated identifier.
    pub id: String,

    /// Always `"chat.completion"`.
    pub object: String,

    /// Creation time in whole unix seconds.
    pub created: u64,

    /// The model that generated the response, when one was named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// The generated choices, indexed `0..n`.
    pub choices: Vec<ChatChoice>,

    /// Token accounting for the whole call.
    pub usage: Usage,
}

impl ChatCompletionResponse {
    /// Create a response with a fresh id and timestamp.
    pub fn new(model: Option<String>, choices: Vec<ChatChoice>, usage: Usage) -> Self {
        Self {
            id: generate_id("chatcmpl"),
            object: "chat.completion".to_owned(),
            created: unix_timestamp(),
            model,
            choices,
            usage,
        }
    }
}

/// The partial message carried by a streaming chunk.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Delta {
    /// The role, announced once in the first chunk of a stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// An increment of generated content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Delta {
    /// A delta announcing the given role with no content.
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            content: None,
        }
    }

    /// A delta carrying a content increment.
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            role: None,
            content: Some(text.into()),
        }
    }
}

/// One choice within a streaming chat chunk.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct ChatStreamChoice {
    /// Zero-based choice index. Always 0: streaming requires `n == 1`.
    pub index: u32,

    /// The partial message.
    pub delta: Delta,

    /// Set on the terminal chunk when the backend reported a reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

/// One incremental unit of a streaming chat completion.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct ChatCompletionChunk {
    /// Identifier shared by every chunk of one stream.
    pub id: String,

    /// Always `"chat.completion.chunk"`.
    pub object: String,

    /// Creation time in whole unix seconds.
    pub created: u64,

    /// The model that generated the chunk, when one was named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// The partial choices (always exactly one).
    pub choices: Vec<ChatStreamChoice>,
}

impl ChatCompletionChunk {
    fn with_choice(id: &str, model: Option<&str>, choice: ChatStreamChoice) -> Self {
        Self {
            id: id.to_owned(),
            object: "chat.completion.chunk".to_owned(),
            created: unix_timestamp(),
            model: model.map(str::to_owned),
            choices: vec![choice],
        }
    }

    /// The opening chunk of a stream, announcing the assistant role.
    pub fn role(id: &str, model: Option<&str>) -> Self {
        Self::with_choice(
            id,
            model,
            ChatStreamChoice {
                index: 0,
                delta: Delta::role(Role::Assistant),
                finish_reason: None,
            },
        )
    }

    /// A chunk carrying one content increment.
    pub fn content(id: &str, model: Option<&str>, text: &str) -> Self {
        Self::with_choice(
            id,
            model,
            ChatStreamChoice {
                index: 0,
                delta: Delta::content(text),
                finish_reason: None,
            },
        )
    }

    /// The terminal chunk: empty delta plus the finish reason, if any.
    pub fn finish(id: &str, model: Option<&str>, reason: Option<FinishReason>) -> Self {
        Self::with_choice(
            id,
            model,
            ChatStreamChoice {
                index: 0,
                delta: Delta::default(),
                finish_reason: reason,
            },
        )
    }

    /// The content increment of the first choice, if any.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.delta.content.as_deref())
    }

    /// The finish reason of the first choice, if any.
    pub fn reason(&self) -> Option<FinishReason> {
        self.choices.first().and_then(|c| c.finish_reason)
    }
}

/// One generated text completion.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompletionChoice {
    /// Zero-based index in call order.
    pub index: u32,

    /// The generated text.
    pub text: String,

    /// Per-token log probability details, when requested and reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<serde_json::Value>,

    /// Why generation stopped, when the backend reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

/// A complete text completion response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompletionResponse {
    /// Generated identifier.
    pub id: String,

    /// Always `"text.completion"`.
    pub object: String,

    /// Creation time in whole unix seconds.
    pub created: u64,

    /// The model that generated the response, when one was named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// The generated choices, indexed `0..n`.
    pub choices: Vec<CompletionChoice>,

    /// Token accounting for the whole call.
    pub usage: Usage,
}

impl CompletionResponse {
    /// Create a response with a fresh id and timestamp.
    pub fn new(model: Option<String>, choices: Vec<CompletionChoice>, usage: Usage) -> Self {
        Self {
            id: generate_id("cmpl"),
            object: "text.completion".to_owned(),
            created: unix_timestamp(),
            model,
            choices,
            usage,
        }
    }
}

/// One choice within a streaming text completion chunk.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct CompletionStreamChoice {
    /// Zero-based choice index. Always 0: streaming requires `n == 1`.
    pub index: u32,

    /// The generated text increment.
    pub text: String,

    /// The log probability of the emitted token, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<f64>,

    /// Set when the backend reported a terminal reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

/// One incremental unit of a streaming text completion.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct CompletionChunk {
    /// Identifier shared by every chunk of one stream.
    pub id: String,

    /// Always `"text.completion"`.
    pub object: String,

    /// Creation time in whole unix seconds.
    pub created: u64,

    /// The model that generated the chunk, when one was named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// The partial choices (always exactly one).
    pub choices: Vec<CompletionStreamChoice>,
}

impl CompletionChunk {
    /// A chunk carrying one emitted token.
    pub fn token(id: &str, model: Option<&str>, text: &str, logprob: Option<f64>) -> Self {
        Self {
            id: id.to_owned(),
            object: "text.completion".to_owned(),
            created: unix_timestamp(),
            model: model.map(str::to_owned),
            choices: vec![CompletionStreamChoice {
                index: 0,
                text: text.to_owned(),
                logprobs: logprob,
                finish_reason: None,
            }],
        }
    }
}

/// One embedding vector within an embeddings response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Embedding {
    /// Zero-based index matching the input element order.
    pub index: u32,

    /// Always `"embedding"`.
    pub object: String,

    /// The embedding vector.
    pub embedding: Vec<f32>,
}

impl Embedding {
    /// Create an embedding object for the given input position.
    pub fn new(index: u32, embedding: Vec<f32>) -> Self {
        Self {
            index,
            object: "embedding".to_owned(),
            embedding,
        }
    }
}

/// A complete embeddings response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmbeddingsResponse {
    /// Always `"list"`.
    pub object: String,

    /// One embedding per input element, in input order.
    pub data: Vec<Embedding>,

    /// The model that generated the embeddings, when one was named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Token accounting for the whole call.
    pub usage: Usage,
}

impl EmbeddingsResponse {
    /// Create a response for the given embeddings.
    pub fn new(model: Option<String>, data: Vec<Embedding>, usage: Usage) -> Self {
        Self {
            object: "list".to_owned(),
            data,
            model,
            usage,
        }
    }
}
