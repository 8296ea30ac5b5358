//! Retry orchestrator: coerce one free-form text into a structured record.
//!
//! ## Protocol
//!
//! ```text
//! Idle ─▶ Primary pending ─┬─▶ parsed ──────────────────────────▶ Structured
//!                          └─▶ failed ─▶ Strict pending ─┬─▶ parsed ─▶ Structured
//!                                                        └─▶ failed ─▶ Exhausted
//! ```
//!
//! Each attempt is one completion call followed by
//! [`sanitize_candidate`] and [`try_parse`]. A parsed value must be a JSON
//! object to count as success; anything else is a parse failure.
//!
//! The attempt bound is structural: [`Attempt`] has two variants and
//! [`Attempt::next`] returns `None` after [`Attempt::Strict`], so a third
//! call cannot be made. Completion-service errors end the protocol
//! immediately via `?` and do not consume an attempt.
//!
//! The orchestrator never builds a degraded record. On exhaustion it returns
//! [`StructuringOutcome::Exhausted`] and the caller decides what to show.

use crate::completion::CompletionService;
use crate::error::BriefError;
use crate::notify::{Notification, NotificationKind, Notifier, OperationId};
use crate::pipeline::parse::try_parse;
use crate::pipeline::sanitize::sanitize_candidate;
use crate::prompts::{primary_prompt, strict_prompt};
use crate::record::SummaryRecord;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

/// One structuring attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Primary,
    Strict,
}

impl Attempt {
    /// The attempt that follows a parse failure of this one, if any.
    pub fn next(self) -> Option<Attempt> {
        match self {
            Attempt::Primary => Some(Attempt::Strict),
            Attempt::Strict => None,
        }
    }

    /// 1-based attempt number.
    pub fn number(self) -> u8 {
        match self {
            Attempt::Primary => 1,
            Attempt::Strict => 2,
        }
    }

    fn prompt(self, text: &str) -> String {
        match self {
            Attempt::Primary => primary_prompt(text),
            Attempt::Strict => strict_prompt(text),
        }
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attempt::Primary => f.write_str("primary"),
            Attempt::Strict => f.write_str("strict"),
        }
    }
}

/// Terminal state of the protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuringOutcome {
    /// A response parsed; `record` is that document merged with `raw_text`.
    Structured {
        record: SummaryRecord,
        attempts: u8,
    },
    /// Both attempts produced unparseable output.
    Exhausted { attempts: u8 },
}

impl StructuringOutcome {
    /// Number of completion calls made.
    pub fn attempts(&self) -> u8 {
        match self {
            StructuringOutcome::Structured { attempts, .. }
            | StructuringOutcome::Exhausted { attempts } => *attempts,
        }
    }
}

/// Run the two-attempt structuring protocol.
///
/// # Arguments
/// * `service`   — completion service to call
/// * `text`      — the free-form text to structure
/// * `raw_text`  — extracted document text, attached verbatim on success
/// * `notifier`  — receives fetching/retrying/succeeded/failed notices
/// * `operation` — id the notices are keyed by
///
/// # Errors
/// Only completion-service errors. Parse failures are outcomes, not errors.
pub async fn structure<C: CompletionService>(
    service: &C,
    text: &str,
    raw_text: &str,
    notifier: &dyn Notifier,
    operation: &OperationId,
) -> Result<StructuringOutcome, BriefError> {
    let mut next = Some(Attempt::Primary);
    let mut made = 0u8;

    notifier.notify(&Notification::new(
        operation,
        NotificationKind::Fetching,
        format!("Fetching structured summary from {}…", service.model()),
    ));

    while let Some(attempt) = next {
        made = attempt.number();
        debug!("Structuring attempt {} ({})", made, attempt);

        let response = service.complete(&attempt.prompt(text)).await?;

        if let Some(document) = parse_document(&response) {
            info!("Structured summary parsed on attempt {} ({})", made, attempt);
            notifier.notify(&Notification::new(
                operation,
                NotificationKind::Succeeded,
                format!("Structured summary ready (attempt {made})"),
            ));
            return Ok(StructuringOutcome::Structured {
                record: SummaryRecord::structured(document, raw_text),
                attempts: made,
            });
        }

        warn!(
            "Attempt {} ({}) did not return a JSON object ({} bytes)",
            made,
            attempt,
            response.len()
        );

        next = attempt.next();
        if next.is_some() {
            notifier.notify(&Notification::new(
                operation,
                NotificationKind::Retrying,
                "Response was not valid JSON, retrying with stricter prompt…",
            ));
        }
    }

    warn!("Structuring exhausted after {} attempts", made);
    Ok(StructuringOutcome::Exhausted { attempts: made })
}

/// Sanitize and parse one response; only JSON objects qualify.
fn parse_document(response: &str) -> Option<serde_json::Map<String, Value>> {
    match try_parse(&sanitize_candidate(response))? {
        Value::Object(map) => Some(map),
        other => {
            debug!("Parsed a JSON {} instead of an object", json_kind(&other));
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{LatestNotifications, NoopNotifier, STRUCTURE_OPERATION};
    use crate::record::{CONFIDENCE_ESTIMATE, RAW_TEXT};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every prompt it receives.
    struct Scripted {
        responses: Mutex<VecDeque<Result<String, BriefError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<String, BriefError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl CompletionService for Scripted {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str) -> Result<String, BriefError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("no more scripted responses".into()))
        }
    }

    fn op() -> OperationId {
        OperationId::new(STRUCTURE_OPERATION)
    }

    #[test]
    fn attempts_are_bounded_at_two() {
        assert_eq!(Attempt::Primary.next(), Some(Attempt::Strict));
        assert_eq!(Attempt::Strict.next(), None);
        assert_eq!(Attempt::Strict.number(), 2);
    }

    #[test]
    fn first_attempt_success_makes_one_call() {
        let svc = Scripted::new(vec![Ok(
            "```json\n{\"short_summary\":\"ok\",\"confidence_estimate\":\"high\"}\n```".into(),
        )]);
        let outcome =
            tokio_test::block_on(structure(&svc, "draft", "raw", &NoopNotifier, &op())).unwrap();

        assert_eq!(svc.calls(), 1);
        match outcome {
            StructuringOutcome::Structured { record, attempts } => {
                assert_eq!(attempts, 1);
                assert_eq!(record.get(CONFIDENCE_ESTIMATE), Some(&json!("high")));
                assert_eq!(record.get(RAW_TEXT), Some(&json!("raw")));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn retry_uses_strict_prompt() {
        let svc = Scripted::new(vec![
            Ok("Sure! Here it is.".into()),
            Ok("{\"short_summary\":\"second\"}".into()),
        ]);
        let outcome =
            tokio_test::block_on(structure(&svc, "draft", "raw", &NoopNotifier, &op())).unwrap();

        assert_eq!(outcome.attempts(), 2);
        let prompts = svc.prompts.lock().unwrap();
        assert_eq!(prompts[0], primary_prompt("draft"));
        assert_eq!(prompts[1], strict_prompt("draft"));
    }

    #[test]
    fn non_object_json_counts_as_failure() {
        let svc = Scripted::new(vec![Ok("[\"a\", \"b\"]".into()), Ok("42".into())]);
        let outcome =
            tokio_test::block_on(structure(&svc, "draft", "raw", &NoopNotifier, &op())).unwrap();
        assert_eq!(outcome, StructuringOutcome::Exhausted { attempts: 2 });
        assert_eq!(svc.calls(), 2);
    }

    #[test]
    fn transport_error_is_fatal_and_not_retried() {
        let svc = Scripted::new(vec![Err(BriefError::LlmApiError {
            message: "401 Unauthorized".into(),
        })]);
        let err = tokio_test::block_on(structure(&svc, "draft", "raw", &NoopNotifier, &op()))
            .unwrap_err();
        assert!(matches!(err, BriefError::LlmApiError { .. }));
        assert_eq!(svc.calls(), 1);
    }

    #[test]
    fn transport_error_on_retry_is_fatal() {
        let svc = Scripted::new(vec![
            Ok("not json".into()),
            Err(BriefError::ApiTimeout {
                model: "scripted".into(),
                secs: 1,
            }),
        ]);
        let err = tokio_test::block_on(structure(&svc, "draft", "raw", &NoopNotifier, &op()))
            .unwrap_err();
        assert!(matches!(err, BriefError::ApiTimeout { .. }));
        assert_eq!(svc.calls(), 2);
    }

    #[test]
    fn notifications_follow_the_protocol() {
        let svc = Scripted::new(vec![Ok("nope".into()), Ok("still nope".into())]);
        let sink = LatestNotifications::default();
        tokio_test::block_on(structure(&svc, "draft", "raw", &sink, &op())).unwrap();

        assert_eq!(
            sink.history(),
            vec![NotificationKind::Fetching, NotificationKind::Retrying]
        );
        assert_eq!(
            sink.latest(STRUCTURE_OPERATION).unwrap().kind,
            NotificationKind::Retrying
        );
    }
}
