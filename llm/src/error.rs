//! Error taxonomy for the unified LLM interface.
//!
//! All failures are synchronous and terminal for the call that triggered
//! them; there is no retry or circuit-breaking layer.

use crate::Role;
use thiserror::Error;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type shared by the schema, the prompt templates, and every
/// backend adapter.
#[derive(Debug, Error)]
pub enum Error {
    /// An unrecognized prompt template name.
    #[error("unknown prompt template `{name}`, expected one of: {}", .valid.join(", "))]
    UnknownTemplate {
        name: String,
        valid: Vec<&'static str>,
    },

    /// A `function` role message was passed to a template without function
    /// call support.
    #[error("{template} does not support function calls")]
    FunctionsUnsupported { template: &'static str },

    /// A message role a template cannot render at the given position.
    #[error("invalid message role `{role}` at index {index} for {template}")]
    InvalidRole {
        template: &'static str,
        role: Role,
        index: usize,
    },

    /// Streaming requested together with more than one completion.
    #[error("cannot stream more than one completion (n = {n})")]
    StreamWithMultipleChoices { n: u32 },

    /// An invalid request option or option combination.
    #[error("{0}")]
    Config(String),

    /// Malformed input to a data model.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A capability the backend does not implement.
    #[error("{capability} is not supported by {provider}")]
    Unsupported {
        provider: &'static str,
        capability: &'static str,
    },

    /// A non-success HTTP status from the backend, with the raw body.
    #[error("backend returned status {status}: {detail}")]
    BackendStatus { status: u16, detail: String },

    /// Any other backend call failure (SDK errors, malformed replies).
    #[error("backend call failed: {0}")]
    Backend(String),

    /// A transport-level HTTP failure.
    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// A JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_template_enumerates_valid_names() {
        let err = Error::UnknownTemplate {
            name: "gpt".into(),
            valid: vec!["llama2", "vicuna"],
        };
        assert_eq!(
            err.to_string(),
            "unknown prompt template `gpt`, expected one of: llama2, vicuna"
        );
    }

    #[test]
    fn stream_with_multiple_choices_names_n() {
        let err = Error::StreamWithMultipleChoices { n: 2 };
        assert_eq!(err.to_string(), "cannot stream more than one completion (n = 2)");
    }
}
