//! Canonical chat message.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: Role,

    /// The text content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Create a new function message.
    pub fn function(content: impl Into<String>) -> Self {
        Self {
            role: Role::Function,
            content: content.into(),
        }
    }
}

/// The role of a message author.
///
/// The set is closed; unknown roles are rejected at deserialization and by
/// [`Role::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model, honored only at the start of a chat.
    System,
    /// The human side of the conversation.
    #[default]
    User,
    /// The model side of the conversation.
    Assistant,
    /// A function call result. No supported template renders this role.
    Function,
}

impl Role {
    /// All valid role names.
    pub const NAMES: [&'static str; 4] = ["system", "user", "assistant", "function"];

    /// The lowercase wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Function => "function",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "function" => Ok(Role::Function),
            other => Err(Error::Validation {
                field: "role",
                reason: format!("unknown role `{other}`, expected one of: {}", Self::NAMES.join(", ")),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_serde() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let role: Role = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(role, Role::System);
    }

    #[test]
    fn unknown_role_is_rejected_at_deserialization() {
        let result: std::result::Result<ChatMessage, _> =
            serde_json::from_str(r#"{"role":"tool","content":"hi"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_role_name_lists_the_closed_set() {
        let err = "moderator".parse::<Role>().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("moderator"));
        assert!(text.contains("system, user, assistant, function"));
    }
}
