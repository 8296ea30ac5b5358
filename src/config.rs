//! Configuration types for document summarization.
//!
//! All behaviour is controlled through [`SummaryConfig`], built via its
//! [`SummaryConfigBuilder`]. Callers set only what they care about and rely
//! on the documented defaults for the rest.

use crate::error::BriefError;
use crate::notify::SharedNotifier;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Model used when a provider has to be created and none was named.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Which summarizer produces the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// Extractive summary computed in-process. No network, no API key.
    #[default]
    Local,
    /// Draft + structured summary from the completion service.
    Ai,
}

/// Configuration for one summarization request.
///
/// # Example
/// ```rust
/// use docbrief::{SummaryConfig, SummaryMode};
///
/// let config = SummaryConfig::builder()
///     .mode(SummaryMode::Ai)
///     .model("gemini-2.0-flash")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// Local or AI summarization. Default: [`SummaryMode::Local`].
    pub mode: SummaryMode,

    /// LLM model identifier, e.g. "gemini-2.0-flash", "gpt-4.1-nano".
    /// If None, [`DEFAULT_MODEL`] is used when a provider is created.
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai", "ollama").
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Structuring is a transcription task; low temperature keeps the model
    /// on the schema.
    pub temperature: f32,

    /// Maximum tokens per completion. Default: 2048.
    pub max_tokens: usize,

    /// Upper bound on each completion call, in seconds. Default: 60.
    ///
    /// A call that exceeds it fails the request with
    /// [`BriefError::ApiTimeout`]; it does not count as a structuring attempt.
    pub api_timeout_secs: u64,

    /// Ask for a free-form summary first and structure that. Default: true.
    ///
    /// When false the extracted document text is structured directly.
    pub draft_summary: bool,

    /// Sentences kept by the local summarizer. Default: 5.
    pub local_sentences: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Receives status notifications. Default: none.
    pub notifier: Option<SharedNotifier>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            mode: SummaryMode::default(),
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.1,
            max_tokens: 2048,
            api_timeout_secs: 60,
            draft_summary: true,
            local_sentences: 5,
            password: None,
            notifier: None,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("mode", &self.mode)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("draft_summary", &self.draft_summary)
            .field("local_sentences", &self.local_sentences)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("notifier", &self.notifier.as_ref().map(|_| "<dyn Notifier>"))
            .finish()
    }
}

impl SummaryConfig {
    /// Create a new builder for `SummaryConfig`.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model that will be requested from a freshly created provider.
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`SummaryConfig`].
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl SummaryConfigBuilder {
    pub fn mode(mut self, mode: SummaryMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn draft_summary(mut self, v: bool) -> Self {
        self.config.draft_summary = v;
        self
    }

    pub fn local_sentences(mut self, n: usize) -> Self {
        self.config.local_sentences = n.max(1);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn notifier(mut self, notifier: SharedNotifier) -> Self {
        self.config.notifier = Some(notifier);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, BriefError> {
        let c = &self.config;
        if c.api_timeout_secs == 0 {
            return Err(BriefError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(BriefError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if matches!(&c.model, Some(m) if m.trim().is_empty()) {
            return Err(BriefError::InvalidConfig("model must not be empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SummaryConfig::default();
        assert_eq!(c.mode, SummaryMode::Local);
        assert_eq!(c.api_timeout_secs, 60);
        assert_eq!(c.local_sentences, 5);
        assert!(c.draft_summary);
        assert_eq!(c.model_or_default(), DEFAULT_MODEL);
    }

    #[test]
    fn builder_clamps() {
        let c = SummaryConfig::builder()
            .temperature(5.0)
            .local_sentences(0)
            .build()
            .unwrap();
        assert_eq!(c.temperature, 2.0);
        assert_eq!(c.local_sentences, 1);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = SummaryConfig::builder().api_timeout_secs(0).build().unwrap_err();
        assert!(matches!(err, BriefError::InvalidConfig(_)));
    }

    #[test]
    fn empty_model_is_rejected() {
        assert!(SummaryConfig::builder().model("  ").build().is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let c = SummaryConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn mode_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&SummaryMode::Ai).unwrap(), "\"ai\"");
    }
}
