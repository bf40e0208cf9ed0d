//! Prompt template registry.
//!
//! Each template is a pure function from an ordered message list to a single
//! backend-ready prompt string, specific to one model family's tagging
//! convention. The registry is the closed set of named templates; the
//! [`build_falcon_prompt`] and [`build_anthropic_prompt`] builders ship
//! alongside it without a registry name, and [`build_base_prompt`] is the
//! fallback used by adapters when no template is configured.

pub use anthropic::{ANTHROPIC_STOP_SEQUENCES, build_anthropic_prompt};
pub use base::build_base_prompt;
pub use chatml::{
    CHATML_FALCON_STOP_SEQUENCES, CHATML_STARCHAT_STOP_SEQUENCES, build_chatml_falcon_prompt,
    build_chatml_prompt, build_chatml_starchat_prompt,
};
pub use falcon::{FALCON_STOP_SEQUENCES, build_falcon_prompt};
pub use llama2::{LLAMA2_STOP_SEQUENCES, build_llama2_prompt};
pub use open_assistant::{OPEN_ASSISTANT_STOP_SEQUENCES, build_open_assistant_prompt};
pub use stablebeluga::{STABLEBELUGA_STOP_SEQUENCES, build_stablebeluga_prompt};
pub use vicuna::{VICUNA_STOP_SEQUENCES, build_vicuna_prompt};
pub use wizardlm::{WIZARDLM_STOP_SEQUENCES, build_wizardlm_prompt};

mod anthropic;
mod base;
mod chatml;
mod falcon;
mod llama2;
mod open_assistant;
mod stablebeluga;
mod vicuna;
mod wizardlm;

use crate::{ChatMessage, Error, Result};
use std::fmt;
use std::str::FromStr;

/// A named prompt template, one per supported model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// HuggingFaceH4 ChatML with the Falcon end token.
    ChatmlFalcon,
    /// HuggingFaceH4 ChatML with the StarChat end token.
    ChatmlStarchat,
    /// Llama 2 chat (`[INST]` tagging).
    Llama2,
    /// Open Assistant (`<|prompter|>` tagging).
    OpenAssistant,
    /// StableBeluga (`### User:` tagging).
    StableBeluga,
    /// Vicuna (`USER:`/`ASSISTANT:` lines).
    Vicuna,
    /// WizardLM (space-joined `USER:`/`ASSISTANT:` turns).
    WizardLm,
}

impl Template {
    /// Every registered template, in registry order.
    pub const ALL: [Template; 7] = [
        Template::ChatmlFalcon,
        Template::ChatmlStarchat,
        Template::Llama2,
        Template::OpenAssistant,
        Template::StableBeluga,
        Template::Vicuna,
        Template::WizardLm,
    ];

    /// The registry name of this template.
    pub fn name(&self) -> &'static str {
        match self {
            Template::ChatmlFalcon => "chatml_falcon",
            Template::ChatmlStarchat => "chatml_starchat",
            Template::Llama2 => "llama2",
            Template::OpenAssistant => "open_assistant",
            Template::StableBeluga => "stablebeluga",
            Template::Vicuna => "vicuna",
            Template::WizardLm => "wizardlm",
        }
    }

    /// All registry names, for error messages.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Template::name).collect()
    }

    /// The stop sequences the model family mandates.
    pub fn stop_sequences(&self) -> &'static [&'static str] {
        match self {
            Template::ChatmlFalcon => CHATML_FALCON_STOP_SEQUENCES,
            Template::ChatmlStarchat => CHATML_STARCHAT_STOP_SEQUENCES,
            Template::Llama2 => LLAMA2_STOP_SEQUENCES,
            Template::OpenAssistant => OPEN_ASSISTANT_STOP_SEQUENCES,
            Template::StableBeluga => STABLEBELUGA_STOP_SEQUENCES,
            Template::Vicuna => VICUNA_STOP_SEQUENCES,
            Template::WizardLm => WIZARDLM_STOP_SEQUENCES,
        }
    }

    /// The mandated stop sequences as owned strings.
    pub fn default_stop(&self) -> Vec<String> {
        self.stop_sequences().iter().map(|s| (*s).to_owned()).collect()
    }

    /// Render the message list into this family's prompt string.
    pub fn render(&self, messages: &[ChatMessage]) -> Result<String> {
        match self {
            Template::ChatmlFalcon => build_chatml_falcon_prompt(messages),
            Template::ChatmlStarchat => build_chatml_starchat_prompt(messages),
            Template::Llama2 => build_llama2_prompt(messages),
            Template::OpenAssistant => build_open_assistant_prompt(messages),
            Template::StableBeluga => build_stablebeluga_prompt(messages),
            Template::Vicuna => build_vicuna_prompt(messages),
            Template::WizardLm => build_wizardlm_prompt(messages),
        }
    }

    /// Render a single free-text string.
    ///
    /// The string is wrapped as a one-turn conversation (an empty system
    /// turn followed by a user turn; Llama 2 uses a bare user turn) and
    /// rendered through [`Template::render`].
    pub fn render_text(&self, text: &str) -> Result<String> {
        self.render(&self.wrap(text))
    }

    fn wrap(&self, text: &str) -> Vec<ChatMessage> {
        match self {
            Template::Llama2 => vec![ChatMessage::user(text)],
            _ => vec![ChatMessage::system(""), ChatMessage::user(text)],
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|template| template.name() == s)
            .ok_or_else(|| Error::UnknownTemplate {
                name: s.to_owned(),
                valid: Self::names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_round_trip() {
        for template in Template::ALL {
            assert_eq!(template.name().parse::<Template>().unwrap(), template);
        }
    }

    #[test]
    fn unknown_name_enumerates_the_registry() {
        let err = "gpt4".parse::<Template>().unwrap_err();
        let text = err.to_string();
        for template in Template::ALL {
            assert!(text.contains(template.name()), "missing {template} in: {text}");
        }
    }
}
