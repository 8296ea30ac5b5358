//! Summarization entry points.
//!
//! ```text
//! PDF path ──▶ extract ──┬─ local ─▶ extractive summary ─────────────────────▶ record
//!                        └─ ai ────▶ draft ─▶ structure ─┬─ Structured ──────▶ record
//!                                                        └─ Exhausted ─▶ degraded record
//! ```
//!
//! [`try_summarize`] returns fatal failures as `Err`. [`summarize`] folds
//! them into an error record so a presentation layer always has something to
//! render.

use crate::completion::{CompletionService, LlmCompletion};
use crate::config::{SummaryConfig, SummaryMode};
use crate::error::BriefError;
use crate::local::summarize_local;
use crate::notify::{
    NoopNotifier, Notification, NotificationKind, Notifier, OperationId, DRAFT_OPERATION,
    STRUCTURE_OPERATION,
};
use crate::pipeline::extract::extract_text;
use crate::pipeline::structure::{structure, StructuringOutcome};
use crate::prompts::draft_prompt;
use crate::record::SummaryRecord;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Summarize a PDF, never failing.
///
/// Any fatal error becomes [`SummaryRecord::error`] with the error's message.
pub async fn summarize(input: impl AsRef<str>, config: &SummaryConfig) -> SummaryRecord {
    match try_summarize(input, config).await {
        Ok(record) => record,
        Err(e) => {
            warn!("Summarization failed: {}", e);
            SummaryRecord::error(e.to_string())
        }
    }
}

/// Summarize a PDF.
///
/// # Errors
/// - provider not configured (AI mode, checked before extraction)
/// - any extraction failure, including a document with no text
/// - completion-service failures during the draft or structuring calls
///
/// Structuring exhaustion is *not* an error: the result is a degraded record.
pub async fn try_summarize(
    input: impl AsRef<str>,
    config: &SummaryConfig,
) -> Result<SummaryRecord, BriefError> {
    let start = Instant::now();
    let input = input.as_ref();
    info!("Summarizing {} ({:?} mode)", input, config.mode);

    // Fail fast on a missing credential, before paying for extraction.
    let service = match config.mode {
        SummaryMode::Ai => Some(LlmCompletion::from_config(config)?),
        SummaryMode::Local => None,
    };

    let raw_text = extract_text(input, config.password.as_deref()).await?;
    info!("Extracted {} chars", raw_text.len());

    let record = match service {
        Some(ref service) => summarize_text_with(service, &raw_text, config).await?,
        None => local_record(&raw_text, config)?,
    };

    info!("Summary complete in {}ms", start.elapsed().as_millis());
    Ok(record)
}

/// Summarize already-extracted text according to `config.mode`.
pub async fn summarize_text(
    raw_text: &str,
    config: &SummaryConfig,
) -> Result<SummaryRecord, BriefError> {
    match config.mode {
        SummaryMode::Local => local_record(raw_text, config),
        SummaryMode::Ai => {
            let service = LlmCompletion::from_config(config)?;
            summarize_text_with(&service, raw_text, config).await
        }
    }
}

/// AI-mode summary of `raw_text` using the given completion service.
///
/// With `config.draft_summary` the service first writes a free-form summary,
/// which is then structured; otherwise `raw_text` is structured directly.
/// On exhaustion the degraded record carries the draft (or a local
/// extractive summary) as `short_summary`, and `raw_text` unchanged.
pub async fn summarize_text_with<C: CompletionService>(
    service: &C,
    raw_text: &str,
    config: &SummaryConfig,
) -> Result<SummaryRecord, BriefError> {
    let notifier: &dyn Notifier = config.notifier.as_deref().unwrap_or(&NoopNotifier);

    let (text_to_structure, fallback_summary) = if config.draft_summary {
        let draft = draft_summary(service, raw_text, notifier).await?;
        (draft.clone(), draft)
    } else {
        let fallback = summarize_local(raw_text, config.local_sentences)
            .map(|s| s.short_summary)
            .unwrap_or_default();
        (raw_text.to_string(), fallback)
    };

    let operation = OperationId::new(STRUCTURE_OPERATION);
    let outcome = structure(service, &text_to_structure, raw_text, notifier, &operation)
        .await
        .inspect_err(|e| {
            notifier.notify(&Notification::new(
                &operation,
                NotificationKind::Failed,
                format!("Structuring failed: {e}"),
            ))
        })?;

    match outcome {
        StructuringOutcome::Structured { record, .. } => Ok(record),
        StructuringOutcome::Exhausted { attempts } => {
            warn!(
                "No structured output after {} attempts; falling back to unstructured summary",
                attempts
            );
            notifier.notify(&Notification::new(
                &operation,
                NotificationKind::Failed,
                format!(
                    "Could not get a structured summary after {attempts} attempts; \
                     showing the unstructured summary instead"
                ),
            ));
            Ok(SummaryRecord::degraded(fallback_summary, raw_text))
        }
    }
}

/// Ask the service for a free-form summary of the document.
async fn draft_summary<C: CompletionService>(
    service: &C,
    raw_text: &str,
    notifier: &dyn Notifier,
) -> Result<String, BriefError> {
    let operation = OperationId::new(DRAFT_OPERATION);
    notifier.notify(&Notification::new(
        &operation,
        NotificationKind::Fetching,
        format!("Fetching summary from {}…", service.model()),
    ));

    match service.complete(&draft_prompt(raw_text)).await {
        Ok(draft) => {
            notifier.notify(&Notification::new(
                &operation,
                NotificationKind::Succeeded,
                "Summary received",
            ));
            Ok(draft)
        }
        Err(e) => {
            notifier.notify(&Notification::new(
                &operation,
                NotificationKind::Failed,
                format!("Summary request failed: {e}"),
            ));
            Err(e)
        }
    }
}

fn local_record(raw_text: &str, config: &SummaryConfig) -> Result<SummaryRecord, BriefError> {
    let summary = summarize_local(raw_text, config.local_sentences).ok_or_else(|| {
        BriefError::LocalSummaryFailed("document contains no sentences".to_string())
    })?;
    Ok(SummaryRecord::local(summary, raw_text))
}

/// Summarize a PDF and write the record as pretty JSON.
///
/// Uses atomic write (temp file + rename) to prevent partial files. The
/// record is written even when it is an error record.
pub async fn summarize_to_file(
    input: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &SummaryConfig,
) -> Result<SummaryRecord, BriefError> {
    let record = summarize(input, config).await;
    write_record(output_path.as_ref(), &record).await?;
    Ok(record)
}

/// Atomically write `record` as pretty JSON to `path`.
pub async fn write_record(path: &Path, record: &SummaryRecord) -> Result<(), BriefError> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| BriefError::Internal(format!("Failed to serialise record: {e}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| BriefError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json)
        .await
        .map_err(|e| BriefError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| BriefError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Synchronous wrapper around [`summarize`].
///
/// Creates a temporary tokio runtime internally. Calling it from inside a
/// tokio runtime returns an error record instead of blocking that runtime;
/// use [`summarize`] there.
pub fn summarize_sync(input: impl AsRef<str>, config: &SummaryConfig) -> SummaryRecord {
    if tokio::runtime::Handle::try_current().is_ok() {
        return SummaryRecord::error(
            BriefError::Internal(
                "summarize_sync called from within a tokio runtime; use summarize().await"
                    .to_string(),
            )
            .to_string(),
        );
    }

    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(summarize(input, config)),
        Err(e) => SummaryRecord::error(
            BriefError::Internal(format!("Failed to create tokio runtime: {}", e)).to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ACTION_ITEMS, CONFIDENCE_ESTIMATE};
    use serde_json::json;

    #[tokio::test]
    async fn local_mode_summarizes_text() {
        let config = SummaryConfig::default();
        let record = summarize_text("The bid must be submitted. It is due in March.", &config)
            .await
            .unwrap();
        assert_eq!(record.get(CONFIDENCE_ESTIMATE), Some(&json!("medium")));
        assert_eq!(
            record.get(ACTION_ITEMS),
            Some(&json!(["The bid must be submitted"]))
        );
        assert_eq!(
            record.raw_text(),
            Some("The bid must be submitted. It is due in March.")
        );
    }

    #[tokio::test]
    async fn local_mode_rejects_text_without_sentences() {
        let err = summarize_text("?!.", &SummaryConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BriefError::LocalSummaryFailed(_)));
    }

    #[tokio::test]
    async fn missing_file_becomes_error_record() {
        let record = summarize("/no/such/file.pdf", &SummaryConfig::default()).await;
        assert!(record.is_error());
        assert!(record.error_text().unwrap().contains("not found"));
    }

    #[test]
    fn summarize_sync_runs_outside_a_runtime() {
        let record = summarize_sync("/no/such/file.pdf", &SummaryConfig::default());
        assert!(record.error_text().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn summarize_sync_inside_a_runtime_is_an_error_record() {
        let record = summarize_sync("/no/such/file.pdf", &SummaryConfig::default());
        assert!(record.error_text().unwrap().contains("within a tokio runtime"));
    }

    #[tokio::test]
    async fn write_record_is_atomic_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/brief.json");
        let record = SummaryRecord::degraded("s", "r");
        write_record(&path, &record).await.unwrap();

        let written: SummaryRecord =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, record);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
