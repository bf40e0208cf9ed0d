//! Hugging Face Inference provider.
//!
//! Talks to text-generation-inference endpoints (hosted Inference API or a
//! dedicated endpoint) and normalizes the responses into the shared
//! completion envelopes.

mod provider;
mod wire;

use llm::reqwest::header::{self, HeaderMap, HeaderValue};
use llm::{CharEstimator, Client, Error, Result, Template, TokenEstimator, prompt};
use std::sync::Arc;

/// The hosted Inference API base.
pub const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co/models";

/// The Hugging Face Inference provider.
///
/// Read-only after construction; cloning shares the underlying HTTP client.
#[derive(Clone)]
pub struct HuggingFace {
    /// The HTTP client.
    client: Client,

    /// The request headers, including the bearer token when one is set.
    headers: HeaderMap,

    /// The endpoint base. A request model is appended as a path segment.
    api_base: String,

    /// The prompt template; the plain base prompt is used when unset.
    template: Option<Template>,

    /// Stop sequences applied to every request, before caller-supplied ones.
    default_stop: Vec<String>,

    /// Token count estimator for prompts and unreported completions.
    estimator: Arc<dyn TokenEstimator + Send + Sync>,
}

impl HuggingFace {
    /// Create a provider for the hosted Inference API.
    pub fn api(token: &str) -> Result<Self> {
        Self::custom(DEFAULT_API_BASE, Some(token))
    }

    /// Create a provider for an arbitrary endpoint base, with an optional
    /// bearer token.
    pub fn custom(api_base: impl Into<String>, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| Error::Config(format!("invalid api token: {e}")))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(Self {
            client: Client::new(),
            headers,
            api_base: api_base.into().trim_end_matches('/').to_owned(),
            template: None,
            default_stop: Vec::new(),
            estimator: Arc::new(CharEstimator),
        })
    }

    /// Create a provider from `HUGGINGFACE_TOKEN`, `HUGGINGFACE_API_BASE`,
    /// and `HUGGINGFACE_PROMPT`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("HUGGINGFACE_TOKEN").ok();
        let api_base =
            std::env::var("HUGGINGFACE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_owned());
        let mut provider = Self::custom(api_base, token.as_deref())?;
        if let Ok(name) = std::env::var("HUGGINGFACE_PROMPT") {
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

    fn completion_url(&self, model: Option<&str>) -> String {
        match model {
            Some(model) => format!("{}/{model}", self.api_base),
            None => self.api_base.clone(),
        }
    }

    /// The feature-extraction pipeline URL for embeddings. The hosted API
    /// serves embeddings under a different path prefix than generation, so a
    /// trailing `/models` segment is swapped out.
    fn embeddings_url(&self, model: Option<&str>) -> String {
        match model {
            Some(model) => match self.api_base.strip_suffix("/models") {
                Some(base) => format!("{base}/pipeline/feature-extraction/{model}"),
                None => format!("{}/{model}", self.api_base),
            },
            None => self.api_base.clone(),
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

    fn render_text(&self, text: &str) -> Result<String> {
        match self.template {
            Some(template) => template.render_text(text),
            None => {
                tracing::warn!(
                    "no prompt template configured, sending a plain USER/ASSISTANT prompt"
                );
                prompt::build_base_prompt(&[llm::ChatMessage::user(text)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_is_appended_to_the_base() {
        let hf = HuggingFace::custom("https://api-inference.huggingface.co/models", None).unwrap();
        assert_eq!(
            hf.completion_url(Some("tiiuae/falcon-7b")),
            "https://api-inference.huggingface.co/models/tiiuae/falcon-7b"
        );
        assert_eq!(
            hf.completion_url(None),
            "https://api-inference.huggingface.co/models"
        );
    }

    #[test]
    fn embeddings_use_the_feature_extraction_pipeline() {
        let hf = HuggingFace::custom(DEFAULT_API_BASE, None).unwrap();
        assert_eq!(
            hf.embeddings_url(Some("bge-base-en")),
            "https://api-inference.huggingface.co/pipeline/feature-extraction/bge-base-en"
        );
    }

    #[test]
    fn only_a_trailing_models_segment_is_rewritten() {
        let hf = HuggingFace::custom("https://host/models/v1", None).unwrap();
        assert_eq!(
            hf.embeddings_url(Some("bge-base-en")),
            "https://host/models/v1/bge-base-en"
        );
    }

    #[test]
    fn dedicated_endpoints_keep_their_base_for_embeddings() {
        let hf = HuggingFace::custom("https://my-endpoint.example", None).unwrap();
        assert_eq!(
            hf.embeddings_url(Some("bge-base-en")),
            "https://my-endpoint.example/bge-base-en"
        );
        assert_eq!(hf.embeddings_url(None), "https://my-endpoint.example");
    }

    #[test]
    fn template_adoption_sets_default_stop() {
        let hf = HuggingFace::custom(DEFAULT_API_BASE, None)
            .unwrap()
            .with_template(Template::Llama2);
        assert_eq!(hf.default_stop, vec!["</s>".to_owned()]);
    }
}
