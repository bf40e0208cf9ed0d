//! Amazon SageMaker endpoint provider.
//!
//! Invokes text-generation-inference containers behind SageMaker runtime
//! endpoints with SigV4-signed HTTP requests and normalizes the responses
//! into the shared completion envelopes.

mod provider;
mod sign;
mod wire;

use aws_credential_types::Credentials;
use llm::{CharEstimator, Client, Error, Result, Template, TokenEstimator, prompt};
use std::sync::Arc;

/// The Amazon SageMaker provider.
///
/// Read-only after construction; cloning shares the underlying HTTP client.
#[derive(Clone)]
pub struct SageMaker {
    /// The HTTP client.
    client: Client,

    /// AWS credentials used to sign every request.
    credentials: Credentials,

    /// The signing region.
    region: String,

    /// The runtime endpoint base. A request model is appended as
    /// `/{model}/invocations`.
    api_base: String,

    /// The prompt template; the plain base prompt is used when unset.
    template: Option<Template>,

    /// Stop sequences applied to every request, before caller-supplied ones.
    default_stop: Vec<String>,

    /// Token count estimator for prompts and unreported completions.
    estimator: Arc<dyn TokenEstimator + Send + Sync>,
}

impl SageMaker {
    /// Create a provider for the given credentials and region, targeting the
    /// regional runtime endpoint.
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        let region = region.into();
        let api_base = format!("https://runtime.sagemaker.{region}.amazonaws.com/endpoints");
        Self {
            client: Client::new(),
            credentials,
            region,
            api_base,
            template: None,
            default_stop: Vec::new(),
            estimator: Arc::new(CharEstimator),
        }
    }

    /// Create a provider from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`,
    /// `AWS_SESSION_TOKEN`, `AWS_REGION`/`AWS_DEFAULT_REGION`,
    /// `SAGEMAKER_API_BASE`, and `SAGEMAKER_PROMPT`.
    pub fn from_env() -> Result<Self> {
        let access_key = std::env::var("AWS_ACCESS_KEY_ID")
            .map_err(|_| Error::Config("AWS_ACCESS_KEY_ID is not set".to_owned()))?;
        let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .map_err(|_| Error::Config("AWS_SECRET_ACCESS_KEY is not set".to_owned()))?;
        let session_token = std::env::var("AWS_SESSION_TOKEN").ok();
        let region = std::env::var("AWS_REGION")
            .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
            .map_err(|_| Error::Config("AWS_REGION is not set".to_owned()))?;

        let credentials =
            Credentials::from_keys(access_key, secret_key, session_token);
        let mut provider = Self::new(credentials, region);
        if let Ok(base) = std::env::var("SAGEMAKER_API_BASE") {
            provider = provider.with_api_base(base);
        }
        if let Ok(name) = std::env::var("SAGEMAKER_PROMPT") {
            provider = provider.with_template(name.parse()?);
        }
        Ok(provider)
    }

    /// Override the runtime endpoint base.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self
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

    fn invocation_url(&self, model: Option<&str>) -> String {
        match model {
            Some(model) => format!("{}/{model}/invocations", self.api_base),
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
