//! StableBeluga prompt, per the StableBeluga2 model card.

use crate::{ChatMessage, Error, Result, Role};
use std::fmt::Write;

/// Stop sequences for StableBeluga models.
pub const STABLEBELUGA_STOP_SEQUENCES: &[&str] = &["</s>"];

const TEMPLATE: &str = "StableBeluga";
const SYSTEM_TOKEN: &str = "### System:";
const USER_TOKEN: &str = "### User:";
const ASSISTANT_TOKEN: &str = "### Assistant:";

/// Build a StableBeluga prompt.
pub fn build_stablebeluga_prompt(messages: &[ChatMessage]) -> Result<String> {
    let mut conversation = String::new();

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::User => {
                let _ = write!(conversation, "{USER_TOKEN}\n{}\n\n", message.content.trim());
            }
            Role::Assistant => {
                let _ = write!(
                    conversation,
                    "{ASSISTANT_TOKEN}\n{}\n\n",
                    message.content.trim()
                );
            }
            Role::Function => {
                return Err(Error::FunctionsUnsupported { template: TEMPLATE });
            }
            Role::System if index == 0 => {
                let _ = write!(conversation, "{SYSTEM_TOKEN}\n{}\n\n", message.content.trim());
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
