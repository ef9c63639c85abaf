//! Retry and model-fallback policy.
//!
//! [`FallbackChain`] tries a ranked list of candidate models strictly in
//! order: the configured primary first, then the built-in fallbacks,
//! deduplicated by identity. For each candidate it makes up to
//! `max_attempts` calls; a transient failure (rate limit, timeout) backs
//! off exponentially (`base_delay * 2^attempt`, or the provider's
//! `retry-after` hint when present) and retries the *same* model, while
//! any other failure abandons the candidate immediately and advances the
//! chain. The first success wins; candidates are never tried in parallel.
//!
//! When every candidate exhausts every attempt the chain reports a single
//! [`AllModelsFailed`](crate::AnikiError::AllModelsFailed) — the pipeline
//! maps it to a canned reply, so it never reaches a user as an error.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::traits::ChatProvider;
use crate::telemetry;
use crate::types::{ChatOptions, ChatResponse, Message};
use crate::{AnikiError, Result};

/// Ranked fallback models, tried after the configured primary.
pub const FALLBACK_MODELS: &[&str] = &[
    "openai/gpt-3.5-turbo",
    "anthropic/claude-3-haiku",
    "google/gemini-pro",
    "meta-llama/llama-3.1-8b-instruct:free",
];

/// Sequential retry/fallback executor over one [`ChatProvider`].
pub struct FallbackChain {
    provider: Arc<dyn ChatProvider>,
    candidates: Vec<String>,
    max_attempts: u32,
    base_delay: Duration,
}

impl FallbackChain {
    /// Build a chain of `[primary] + FALLBACK_MODELS`, deduplicated.
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        primary: &str,
        max_attempts: u32,
        base_delay: Duration,
    ) -> Self {
        Self::with_candidates(provider, candidate_models(primary), max_attempts, base_delay)
    }

    /// Build a chain over an explicit candidate list (used by tests).
    pub fn with_candidates(
        provider: Arc<dyn ChatProvider>,
        candidates: Vec<String>,
        max_attempts: u32,
        base_delay: Duration,
    ) -> Self {
        Self {
            provider,
            candidates,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// The candidate models in trial order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Run one chat request through the chain.
    pub async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse> {
        let primary = self.candidates.first().cloned().unwrap_or_default();
        let mut last_err = None;

        for model in &self.candidates {
            debug!(%model, "trying candidate model");
            let attempt_options = options.clone().model(model.clone());

            for attempt in 0..self.max_attempts {
                match self.provider.chat(messages, &attempt_options).await {
                    Ok(mut response) => {
                        metrics::counter!(telemetry::REQUESTS_TOTAL,
                            "model" => model.clone(),
                            "status" => "ok",
                        )
                        .increment(1);
                        if let Some(ref usage) = response.usage {
                            record_token_usage(model, usage);
                        }
                        if *model != primary {
                            info!(%model, "fallback model served the request");
                        }
                        response.model.get_or_insert_with(|| model.clone());
                        return Ok(response);
                    }
                    Err(e) if e.is_transient() => {
                        metrics::counter!(telemetry::RETRIES_TOTAL, "model" => model.clone())
                            .increment(1);
                        if attempt + 1 < self.max_attempts {
                            let delay = e
                                .retry_after()
                                .unwrap_or_else(|| self.delay_for_attempt(attempt));
                            warn!(
                                %model,
                                attempt = attempt + 1,
                                max_attempts = self.max_attempts,
                                delay_ms = delay.as_millis() as u64,
                                error = %e,
                                "transient error, backing off"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        last_err = Some(e);
                    }
                    Err(e) => {
                        metrics::counter!(telemetry::REQUESTS_TOTAL,
                            "model" => model.clone(),
                            "status" => "error",
                        )
                        .increment(1);
                        warn!(%model, error = %e, "model failed, advancing to next candidate");
                        last_err = Some(e);
                        break;
                    }
                }
            }
        }

        warn!(
            models = %self.candidates.join(", "),
            last_error = %last_err.as_ref().map(ToString::to_string).unwrap_or_default(),
            "all candidate models exhausted"
        );
        Err(AnikiError::AllModelsFailed {
            models: self.candidates.clone(),
        })
    }

    /// Exponential backoff: `base_delay * 2^attempt` (0-indexed).
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// `[primary] + FALLBACK_MODELS`, deduplicated by identity, order kept.
fn candidate_models(primary: &str) -> Vec<String> {
    let mut candidates = vec![primary.to_string()];
    for model in FALLBACK_MODELS {
        if !candidates.iter().any(|c| c == model) {
            candidates.push((*model).to_string());
        }
    }
    candidates
}

fn record_token_usage(model: &str, usage: &crate::types::Usage) {
    metrics::counter!(telemetry::TOKENS_TOTAL,
        "model" => model.to_owned(),
        "direction" => "prompt",
    )
    .increment(u64::from(usage.prompt_tokens));
    metrics::counter!(telemetry::TOKENS_TOTAL,
        "model" => model.to_owned(),
        "direction" => "completion",
    )
    .increment(u64::from(usage.completion_tokens));
}
