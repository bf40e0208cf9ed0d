//! Open Assistant prompt.
//!
//! `<|system|>system message</s><|prompter|>user prompt</s><|assistant|>`

use crate::{ChatMessage, Error, Result, Role};
use std::fmt::Write;

/// Stop sequences for Open Assistant models.
pub const OPEN_ASSISTANT_STOP_SEQUENCES: &[&str] = &["</s>"];

const TEMPLATE: &str = "Open Assistant";
const SYSTEM_TOKEN: &str = "<|system|>";
const USER_TOKEN: &str = "<|prompter|>";
const ASSISTANT_TOKEN: &str = "<|assistant|>";
const EOS_TOKEN: &str = "</s>";

/// Build an Open Assistant prompt.
pub fn build_open_assistant_prompt(messages: &[ChatMessage]) -> Result<String> {
    let mut conversation = String::new();

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::User => {
                let _ = write!(
                    conversation,
                    "{USER_TOKEN}{}{EOS_TOKEN}",
                    message.content.trim()
                );
            }
            Role::Assistant => {
                let _ = write!(
                    conversation,
                    "{ASSISTANT_TOKEN}{}{EOS_TOKEN}",
                    message.content.trim()
                );
            }
            Role::Function => {
                return Err(Error::FunctionsUnsupported { template: TEMPLATE });
            }
            Role::System if index == 0 => {
                let _ = write!(
                    conversation,
                    "{SYSTEM_TOKEN}{}{EOS_TOKEN}",
                    message.content.trim()
                );
            }
            Role::System => {
                return Err(Error::InvalidRole {
                    template: TEMPLATE,
                    role: message.role,
                    index,
                });
            }
        }
    }

    conversation.push_str(ASSISTANT_TOKEN);
    Ok(conversation)
}
