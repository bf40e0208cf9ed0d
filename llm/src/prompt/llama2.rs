//! Llama 2 chat prompt.
//!
//! Uses the Llama 2 chat tokens (`[INST]`, `<<SYS>>`) described in the
//! Hugging Face blog on prompting Llama 2.

use crate::{ChatMessage, Error, Result, Role};
use std::fmt::Write;

/// Stop sequences for Llama 2 chat models.
pub const LLAMA2_STOP_SEQUENCES: &[&str] = &["</s>"];

const TEMPLATE: &str = "Llama 2";
const START: &str = "<s>[INST] ";
const END: &str = " [/INST]";

/// Build a Llama 2 chat prompt.
pub fn build_llama2_prompt(messages: &[ChatMessage]) -> Result<String> {
    let mut conversation = String::new();

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::User => conversation.push_str(message.content.trim()),
            Role::Assistant => {
                let _ = write!(conversation, " [/INST] {} </s><s>[INST] ", message.content);
            }
            Role::Function => {
                return Err(Error::FunctionsUnsupported { template: TEMPLATE });
            }
            Role::System if index == 0 => {
                let _ = write!(conversation, "<<SYS>>\n{}\n<</SYS>>\n\n", message.content);
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

    Ok(format!("{START}{conversation}{END}"))
}
