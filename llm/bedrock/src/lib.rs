//! Amazon Bedrock provider.
//!
//! Invokes Anthropic Claude models through the Bedrock runtime SDK and
//! normalizes the responses into the shared chat completion envelopes.
//! Bedrock ships chat only: text completion and embeddings are
//! unsupported capabilities.

mod provider;
mod wire;

use aws_config::BehaviorVersion;
use llm::{CharEstimator, Error, Result, Template, TokenEstimator, prompt};
use std::sync::Arc;

/// The models this provider accepts.
pub const SUPPORTED_MODELS: &[&str] = &["anthropic.claude-v2"];

/// The `anthropic_version` sent for each supported model.
fn anthropic_version(model: &str) -> Option<&'static str> {
    match model {
        "anthropic.claude-v2" => Some("bedrock-2023-05-31"),
        _ => None,
    }
}

/// The Amazon Bedrock provider.
///
/// Read-only after construction; cloning shares the underlying SDK client.
#[derive(Clone)]
pub struct Bedrock {
    /// The Bedrock runtime client.
    client: aws_sdk_bedrockruntime::Client,

    /// The prompt template; the plain base prompt is used when unset.
    template: Option<Template>,

    /// Stop sequences applied to every request, before caller-supplied ones.
    default_stop: Vec<String>,

    /// Token count estimator. Bedrock reports no token counts, so both
    /// sides of the usage math are estimated.
    estimator: Arc<dyn TokenEstimator + Send + Sync>,
}

impl Bedrock {
    /// Create a provider over an existing runtime client.
    pub fn new(client: aws_sdk_bedrockruntime::Client) -> Self {
        Self {
            client,
            template: None,
            default_stop: Vec::new(),
            estimator: Arc::new(CharEstimator),
        }
    }

    /// Create a provider from the ambient AWS configuration (environment,
    /// shared config files, instance metadata) and `BEDROCK_PROMPT`.
    pub async fn from_env() -> Result<Self> {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mut provider = Self::new(aws_sdk_bedrockruntime::Client::new(&config));
        if let Ok(name) = std::env::var("BEDROCK_PROMPT") {
            provider = provider.with_template(name.parse()?);
        }
        Ok(provider)
    }

    /// Set the prompt template and adopt its mandated stop sequences.
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self.default_stop = template.default_stop();
        self
    }

    /// Replace the default stop sequences.
    pub fn with_default_stop(mut self, stop: Vec<String>) -> Self {
        self.default_stop = stop;
        self
    }

    /// Replace the token count estimator.
    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator + Send + Sync>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Check the model against the allowlist and resolve its
    /// `anthropic_version`.
    fn model_version<'a>(&self, model: Option<&'a str>) -> Result<(&'a str, &'static str)> {
        let model = model.ok_or_else(|| {
            Error::Config(format!(
                "a model is required, supported models are: {SUPPORTED_MODELS:?}"
            ))
        })?;
        match anthropic_version(model) {
            Some(version) => Ok((model, version)),
            None => Err(Error::Config(format!(
                "model {model} is not supported, supported models are: {SUPPORTED_MODELS:?}"
            ))),
        }
    }

    fn render_messages(&self, messages: &[llm::ChatMessage]) -> Result<String> {
        match self.template {
            Some(template) => template.render(messages),
            None => {
                tracing::warn!(
                    "no prompt template configured, sending a plain USER/ASSISTANT prompt"
                );
                prompt::build_base_prompt(messages)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_mapping_covers_exactly_the_allowlist() {
        for model in SUPPORTED_MODELS {
            assert!(anthropic_version(model).is_some());
        }
        assert!(anthropic_version("anthropic.claude-v1").is_none());
    }
}
