//! Fallback prompt builder used when no template is configured.

use crate::{ChatMessage, Error, Result, Role};
use std::fmt::Write;

const TEMPLATE: &str = "base prompt";

/// Build a plain `USER:`/`ASSISTANT:` prompt with no model-specific tagging.
pub fn build_base_prompt(messages: &[ChatMessage]) -> Result<String> {
    let mut conversation = String::new();

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::User => {
                let _ = write!(conversation, "USER: {}", message.content.trim());
            }
            Role::Assistant => {
                let _ = write!(conversation, "ASSISTANT: {}", message.content);
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

    Ok(conversation)
}
