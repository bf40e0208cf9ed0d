//! Vicuna prompt (FastChat v1.1 template).

use crate::{ChatMessage, Error, Result, Role};
use std::fmt::Write;

/// Stop sequences for Vicuna models.
pub const VICUNA_STOP_SEQUENCES: &[&str] = &["</s>"];

const TEMPLATE: &str = "Vicuna";
const EOS_TOKEN: &str = "</s>";
const USER_TOKEN: &str = "USER: ";
const ASSISTANT_TOKEN: &str = "ASSISTANT: ";

/// Build a Vicuna prompt.
pub fn build_vicuna_prompt(messages: &[ChatMessage]) -> Result<String> {
    let mut conversation = String::new();

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::User => {
                let _ = write!(conversation, "{USER_TOKEN}{}\n", message.content.trim());
            }
            Role::Assistant => {
                let _ = write!(
                    conversation,
                    "{ASSISTANT_TOKEN}{}{EOS_TOKEN}\n",
                    message.content.trim()
                );
            }
            Role::Function => {
                return Err(Error::FunctionsUnsupported { template: TEMPLATE });
            }
            Role::System if index == 0 => {
                let _ = write!(conversation, "{}\n\n", message.content.trim());
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
