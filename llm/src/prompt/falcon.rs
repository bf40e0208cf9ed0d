//! Falcon prompt, per the Falcon 180B prompt format.

use crate::{ChatMessage, Error, Result, Role};
use std::fmt::Write;

/// Stop sequences for Falcon models.
pub const FALCON_STOP_SEQUENCES: &[&str] = &["\nUser:", "<|endoftext|>", " User:", "###"];

const TEMPLATE: &str = "Falcon";
const SYSTEM_TOKEN: &str = "System: ";
const USER_TOKEN: &str = "User: ";
const ASSISTANT_TOKEN: &str = "Falcon: ";

/// Build a Falcon prompt.
pub fn build_falcon_prompt(messages: &[ChatMessage]) -> Result<String> {
    let mut conversation = String::new();

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::User => {
                let _ = write!(conversation, "{USER_TOKEN}{}\n", message.content.trim());
            }
            Role::Assistant => {
                let _ = write!(conversation, "{ASSISTANT_TOKEN}{}\n", message.content.trim());
            }
            Role::Function => {
                return Err(Error::FunctionsUnsupported { template: TEMPLATE });
            }
            Role::System if index == 0 => {
                let _ = write!(conversation, "{SYSTEM_TOKEN}{}\n", message.content);
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
