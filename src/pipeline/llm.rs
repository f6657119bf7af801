//! Summarizer adapter: one blocking-in-spirit call to a generative model.
//!
//! The only stage with network I/O. There is no retry, no timeout and no
//! post-validation: the service's reply is returned verbatim and any
//! provider failure becomes [`AnalysisError::SummarizationServiceError`],
//! which aborts the current document.
//!
//! Gating lives in [`summarize_if_scientific`]: non-scientific documents never
//! reach the service and get [`NOT_A_VALID_DOCUMENT`] instead. Validity plays
//! no part in the decision.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::prompts::{summary_prompt, NOT_A_VALID_DOCUMENT};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Generates prose from a fully built prompt.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Submit `prompt` once and return the service's text.
    async fn summarize(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Default summarizer over an `edgequake_llm` provider.
pub struct LlmSummarizer {
    provider: Arc<dyn LLMProvider>,
    model: String,
    options: CompletionOptions,
}

impl LlmSummarizer {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &AnalysisConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            options: build_options(config),
        }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, AnalysisError> {
        let start = Instant::now();
        let messages = vec![ChatMessage::user(prompt)];

        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| AnalysisError::SummarizationServiceError {
                model: self.model.clone(),
                detail: e.to_string(),
            })?;

        debug!(
            "Summary from {}: {} input tokens, {} output tokens, {:?}",
            self.model,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        Ok(response.content)
    }
}

/// Produce the summary field of a result record.
///
/// Scientific documents: truncate to `max_input_chars`, wrap in the
/// instruction template and call `summarizer` exactly once. Everything else:
/// the sentinel, with no call made.
pub async fn summarize_if_scientific(
    summarizer: &dyn Summarizer,
    text: &str,
    is_scientific: bool,
    config: &AnalysisConfig,
) -> Result<String, AnalysisError> {
    if !is_scientific {
        return Ok(NOT_A_VALID_DOCUMENT.to_string());
    }
    let prompt = summary_prompt(text, config.summary_words, config.max_input_chars);
    summarizer.summarize(&prompt).await
}

/// Build `CompletionOptions` from the config; unset knobs stay provider defaults.
fn build_options(config: &AnalysisConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..Default::default()
    }
}
