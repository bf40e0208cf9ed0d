//! Anthropic Claude prompt (`\n\nHuman:` / `\n\nAssistant:` turns).

use crate::{ChatMessage, Error, Result, Role};
use std::fmt::Write;

/// Stop sequences for Anthropic Claude models.
pub const ANTHROPIC_STOP_SEQUENCES: &[&str] = &["\n\nUser:", "User:"];

const TEMPLATE: &str = "Anthropic";
const USER_TOKEN: &str = "\n\nHuman:";
const ASSISTANT_TOKEN: &str = "\n\nAssistant:";

/// Build an Anthropic Claude prompt.
pub fn build_anthropic_prompt(messages: &[ChatMessage]) -> Result<String> {
    let mut conversation = String::new();

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::User => {
                let _ = write!(conversation, "{USER_TOKEN} {}", message.content.trim());
            }
            Role::Assistant => {
                let _ = write!(conversation, "{ASSISTANT_TOKEN} {}", message.content.trim());
            }
            Role::Function => {
                return Err(Error::FunctionsUnsupported { template: TEMPLATE });
            }
            Role::System if index == 0 => {
                conversation.push_str(&message.content);
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

    let _ = write!(conversation, "{ASSISTANT_TOKEN} ");
    Ok(conversation)
}
