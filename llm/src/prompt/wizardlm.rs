//! WizardLM prompt (space-joined turns).

use crate::{ChatMessage, Error, Result, Role};

/// Stop sequences for WizardLM models.
pub const WIZARDLM_STOP_SEQUENCES: &[&str] = &["</s>"];

const TEMPLATE: &str = "WizardLM";
const USER_TOKEN: &str = "USER: ";
const ASSISTANT_TOKEN: &str = "ASSISTANT: ";

/// Build a WizardLM prompt.
pub fn build_wizardlm_prompt(messages: &[ChatMessage]) -> Result<String> {
    let mut conversation = Vec::with_capacity(messages.len());

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::User => conversation.push(format!("{USER_TOKEN}{}", message.content.trim())),
            Role::Assistant => {
                conversation.push(format!("{ASSISTANT_TOKEN}{}", message.content.trim()));
            }
            Role::Function => {
                return Err(Error::FunctionsUnsupported { template: TEMPLATE });
            }
            Role::System if index == 0 => conversation.push(message.content.trim().to_owned()),
            Role::System => {
                return Err(Error::InvalidRole {
                    template: TEMPLATE,
                    role: message.role,
                    index,
                });
            }
        }
    }

    Ok(format!(
        "{} {ASSISTANT_TOKEN}",
        conversation.join(" ").trim_start()
    ))
}
