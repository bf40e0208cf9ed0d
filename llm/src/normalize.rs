//! Parameter normalization shared by every backend adapter.
//!
//! Rewrites degenerate probability inputs, merges stop sequences, and
//! rejects incompatible option combinations before any backend call.

use crate::{ChatCompletionRequest, CompletionRequest, Error, Result, Stop};

/// Substitute for a probability mass of exactly zero. Several backends
/// treat exact 0/1 as invalid or as "greedy" in provider-specific ways;
/// the epsilon yields near-deterministic behavior inside every backend's
/// input domain.
pub const PROBABILITY_EPSILON: f64 = 2e-4;

/// Substitute for a `top_p` of exactly one.
pub const TOP_P_MAX: f64 = 0.999_999_9;

/// Rewrite degenerate `top_p` values: `0 -> PROBABILITY_EPSILON`,
/// `1 -> TOP_P_MAX`, anything else unchanged.
pub fn normalize_top_p(top_p: f64) -> f64 {
    if top_p == 0.0 {
        PROBABILITY_EPSILON
    } else if top_p == 1.0 {
        TOP_P_MAX
    } else {
        top_p
    }
}

/// Rewrite a temperature of exactly zero to `PROBABILITY_EPSILON`.
pub fn normalize_temperature(temperature: f64) -> f64 {
    if temperature == 0.0 {
        PROBABILITY_EPSILON
    } else {
        temperature
    }
}

/// Union of the configured default stop sequences and the caller-supplied
/// ones, defaults first. A bare string contributes exactly one entry.
pub fn merge_stop(defaults: &[String], stop: Option<&Stop>) -> Vec<String> {
    let mut merged = defaults.to_vec();
    if let Some(stop) = stop {
        merged.extend(stop.to_vec());
    }
    merged
}

/// Fail when streaming is combined with more than one completion.
pub fn ensure_streamable(stream: bool, n: u32) -> Result<()> {
    if stream && n > 1 {
        return Err(Error::StreamWithMultipleChoices { n });
    }
    Ok(())
}

/// A validated, backend-agnostic parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    /// Normalized sampling temperature.
    pub temperature: f64,
    /// Normalized nucleus sampling mass.
    pub top_p: f64,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Repetition penalty (the request's frequency penalty).
    pub repetition_penalty: f64,
    /// Merged stop sequences, configured defaults first.
    pub stop: Vec<String>,
}

fn build_params(
    stream: bool,
    n: u32,
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_tokens: u32,
    frequency_penalty: f64,
    stop: Option<&Stop>,
    default_stop: &[String],
) -> Result<SamplingParams> {
    ensure_streamable(stream, n)?;
    let params = SamplingParams {
        temperature: normalize_temperature(temperature),
        top_p: normalize_top_p(top_p),
        top_k,
        max_tokens,
        repetition_penalty: frequency_penalty,
        stop: merge_stop(default_stop, stop),
    };
    tracing::debug!(?params, "normalized sampling parameters");
    Ok(params)
}

impl ChatCompletionRequest {
    /// Validate this request and produce its normalized parameter set,
    /// merging `default_stop` with any caller-supplied stop sequences.
    pub fn sampling(&self, default_stop: &[String]) -> Result<SamplingParams> {
        build_params(
            self.stream,
            self.n,
            self.temperature,
            self.top_p,
            self.top_k,
            self.max_tokens,
            self.frequency_penalty,
            self.stop.as_ref(),
            default_stop,
        )
    }
}

impl CompletionRequest {
    /// Validate this request and produce its normalized parameter set,
    /// merging `default_stop` with any caller-supplied stop sequences.
    pub fn sampling(&self, default_stop: &[String]) -> Result<SamplingParams> {
        build_params(
            self.stream,
            self.n,
            self.temperature,
            self.top_p,
            self.top_k,
            self.max_tokens,
            self.frequency_penalty,
            self.stop.as_ref(),
            default_stop,
        )
    }
}
