//! HuggingFaceH4 ChatML prompt, used by models like StarChat and Falcon.
//!
//! `<|system|>\nYou are a chat bot.<|end|>\n<|user|>\nHello!<|end|>\n<|assistant|>`

use crate::{ChatMessage, Error, Result, Role};
use std::fmt::Write;

/// Stop sequences for the Falcon ChatML variant.
pub const CHATML_FALCON_STOP_SEQUENCES: &[&str] = &["<|endoftext|>"];

/// Stop sequences for the StarChat ChatML variant.
pub const CHATML_STARCHAT_STOP_SEQUENCES: &[&str] = &["<|end|>"];

const TEMPLATE: &str = "HF ChatML";
const SYSTEM_TOKEN: &str = "<|system|>";
const USER_TOKEN: &str = "<|user|>";
const ASSISTANT_TOKEN: &str = "<|assistant|>";

/// Build a ChatML prompt with the Falcon end token.
pub fn build_chatml_falcon_prompt(messages: &[ChatMessage]) -> Result<String> {
    build_chatml_prompt(messages, "<|endoftext|>")
}

/// Build a ChatML prompt with the StarChat end token.
pub fn build_chatml_starchat_prompt(messages: &[ChatMessage]) -> Result<String> {
    build_chatml_prompt(messages, "<|end|>")
}

/// Build a ChatML prompt with the given end-of-segment token.
pub fn build_chatml_prompt(messages: &[ChatMessage], eos_token: &str) -> Result<String> {
    let mut conversation = String::new();

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::User => {
                let _ = write!(
                    conversation,
                    "{USER_TOKEN}\n{}{eos_token}\n",
                    message.content.trim()
                );
            }
            Role::Assistant => {
                let _ = write!(
                    conversation,
                    "{ASSISTANT_TOKEN}\n{}{eos_token}\n",
                    message.content.trim()
                );
            }
            Role::Function => {
                return Err(Error::FunctionsUnsupported { template: TEMPLATE });
            }
            Role::System if index == 0 => {
                let _ = write!(
                    conversation,
                    "{SYSTEM_TOKEN}\n{}{eos_token}\n",
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
