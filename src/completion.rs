//! The completion-service boundary.
//!
//! The pipeline only needs "prompt in, text out". [`CompletionService`] is
//! that seam: [`LlmCompletion`] implements it over any `edgequake_llm`
//! provider, and tests implement it with scripted responses so the retry
//! protocol can be exercised without a network.
//!
//! Errors from this boundary (missing credentials, HTTP failures, timeouts)
//! are fatal for the request. They are never treated as a parse failure and
//! never consume a structuring attempt.

use crate::config::SummaryConfig;
use crate::error::BriefError;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Something that turns a prompt into free-form text.
pub trait CompletionService: Send + Sync {
    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send one prompt and return the raw response text.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, BriefError>> + Send;
}

/// [`CompletionService`] backed by an `edgequake_llm` provider.
pub struct LlmCompletion {
    provider: Arc<dyn LLMProvider>,
    model: String,
    options: CompletionOptions,
    timeout: Duration,
}

impl LlmCompletion {
    /// The model name is taken from `provider`, which may differ from
    /// `config.model` when the provider was pre-built or auto-detected.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &SummaryConfig) -> Self {
        Self {
            model: provider.model().to_string(),
            provider,
            options: build_options(config),
            timeout: Duration::from_secs(config.api_timeout_secs),
        }
    }

    /// Resolve a provider from `config` and wrap it.
    pub fn from_config(config: &SummaryConfig) -> Result<Self, BriefError> {
        let provider = resolve_provider(config)?;
        Ok(Self::new(provider, config))
    }
}

impl CompletionService for LlmCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, BriefError> {
        let start = Instant::now();
        let messages = vec![ChatMessage::user(prompt)];

        let response = tokio::time::timeout(
            self.timeout,
            self.provider.chat(&messages, Some(&self.options)),
        )
        .await
        .map_err(|_| BriefError::ApiTimeout {
            model: self.model.clone(),
            secs: self.timeout.as_secs(),
        })?
        .map_err(|e| BriefError::LlmApiError {
            message: format!("{}", e),
        })?;

        debug!(
            "Completion from {}: {} input tokens, {} output tokens, {:?}",
            self.model,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        Ok(response.content)
    }
}

/// Build `CompletionOptions` from the summary config.
fn build_options(config: &SummaryConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, BriefError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        BriefError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific:
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider** (`config.provider_name`) with `config.model`.
/// 3. **Environment pair** `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`.
/// 4. **Gemini** when `GEMINI_API_KEY` is set.
/// 5. **Full auto-detection** via `ProviderFactory::from_env`.
///
/// A missing credential surfaces here as
/// [`BriefError::ProviderNotConfigured`], before any document work is done.
pub fn resolve_provider(config: &SummaryConfig) -> Result<Arc<dyn LLMProvider>, BriefError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, config.model_or_default());
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            return create_provider("gemini", config.model_or_default());
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| BriefError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, OPENAI_API_KEY, or ANTHROPIC_API_KEY.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
