//! The summary record exchanged between the pipeline and the presentation
//! layer.
//!
//! A [`SummaryRecord`] is deliberately *loosely typed*: it wraps a JSON object
//! map rather than a struct with `Vec<String>` fields. Records produced by the
//! LLM path carry whatever shape the model emitted (a bare string where a
//! list was asked for, `"Medium"` instead of `"medium"`, extra keys), and that
//! value must travel to the presentation layer untouched so it can be shown
//! verbatim in JSON mode. Strong typing happens on the read side, in
//! [`crate::normalize`].
//!
//! There are three ways to build a record, mirroring the three sources the
//! presentation layer can receive:
//!
//! | Constructor | Source |
//! |-------------|--------|
//! | [`SummaryRecord::structured`] | LLM output that parsed as a JSON object |
//! | [`SummaryRecord::degraded`]   | structuring exhausted both attempts |
//! | [`SummaryRecord::local`]      | local extractive summarizer |
//!
//! plus [`SummaryRecord::error`] for fatal failures.

use crate::local::LocalSummary;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::fmt;

// ── Field names ──────────────────────────────────────────────────────────

pub const SHORT_SUMMARY: &str = "short_summary";
pub const RELEVANCE_TO_OFFICIALS: &str = "relevance_to_officials";
pub const ACTION_ITEMS: &str = "action_items";
pub const CONFIDENCE_ESTIMATE: &str = "confidence_estimate";
pub const RAW_TEXT: &str = "raw_text";
pub const ERROR: &str = "error";

/// The four structured fields the completion service is asked to produce.
pub const STRUCTURED_FIELDS: [&str; 4] = [
    SHORT_SUMMARY,
    RELEVANCE_TO_OFFICIALS,
    ACTION_ITEMS,
    CONFIDENCE_ESTIMATE,
];

// ── Confidence ───────────────────────────────────────────────────────────

/// How much the producer of a summary trusts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::Unknown => "unknown",
        }
    }

    /// Map free text onto the enum. Anything unrecognised is `Unknown`.
    pub fn from_text(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "high" => Confidence::High,
            "medium" => Confidence::Medium,
            "low" => Confidence::Low,
            _ => Confidence::Unknown,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SummaryRecord ────────────────────────────────────────────────────────

/// One summarization result, as handed to the presentation layer.
///
/// Either an error record (has `error`) or a data record. Built once per
/// request and never mutated afterwards; the next request replaces it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryRecord(Map<String, Value>);

impl SummaryRecord {
    /// A record from a parsed LLM document, with `raw_text` attached.
    ///
    /// `raw_text` always wins over any `raw_text` key the model invented, and
    /// a model-supplied `error` key is dropped so a data record can never be
    /// mistaken for an error record.
    pub fn structured(document: Map<String, Value>, raw_text: impl Into<String>) -> Self {
        let mut fields = document;
        fields.remove(ERROR);
        fields.insert(RAW_TEXT.to_string(), Value::String(raw_text.into()));
        Self(fields)
    }

    /// The fallback record built by the caller when structuring is exhausted.
    pub fn degraded(short_summary: impl Into<String>, raw_text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(SHORT_SUMMARY.into(), Value::String(short_summary.into()));
        fields.insert(RELEVANCE_TO_OFFICIALS.into(), Value::Array(Vec::new()));
        fields.insert(ACTION_ITEMS.into(), Value::Array(Vec::new()));
        fields.insert(
            CONFIDENCE_ESTIMATE.into(),
            Value::String(Confidence::Unknown.as_str().into()),
        );
        fields.insert(RAW_TEXT.into(), Value::String(raw_text.into()));
        Self(fields)
    }

    /// A record from the local extractive summarizer.
    pub fn local(summary: LocalSummary, raw_text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(SHORT_SUMMARY.into(), Value::String(summary.short_summary));
        fields.insert(
            RELEVANCE_TO_OFFICIALS.into(),
            string_array(summary.relevance_to_officials),
        );
        fields.insert(ACTION_ITEMS.into(), string_array(summary.action_items));
        fields.insert(
            CONFIDENCE_ESTIMATE.into(),
            Value::String(summary.confidence_estimate.as_str().into()),
        );
        fields.insert(RAW_TEXT.into(), Value::String(raw_text.into()));
        Self(fields)
    }

    /// An error record. Only the error text is meaningful.
    pub fn error(message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ERROR.into(), Value::String(message.into()));
        Self(fields)
    }

    /// Wrap an arbitrary JSON object, e.g. one received over a boundary.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn is_error(&self) -> bool {
        self.error_text().is_some()
    }

    /// The error message, if this is an error record.
    pub fn error_text(&self) -> Option<Cow<'_, str>> {
        error_message(self.0.get(ERROR))
    }

    pub fn raw_text(&self) -> Option<&str> {
        self.0.get(RAW_TEXT).and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Read an `error` field value.
///
/// Missing, `null`, `false`, zero and blank strings mark a data record. Any
/// other string is the message; any other value is shown as JSON text.
pub fn error_message(value: Option<&Value>) -> Option<Cow<'_, str>> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if is_zero(n) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

pub(crate) fn is_zero(n: &Number) -> bool {
    n.as_f64() == Some(0.0)
}

fn string_array(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn confidence_from_text() {
        assert_eq!(Confidence::from_text("high"), Confidence::High);
        assert_eq!(Confidence::from_text(" Medium "), Confidence::Medium);
        assert_eq!(Confidence::from_text("LOW"), Confidence::Low);
        assert_eq!(Confidence::from_text("maybe"), Confidence::Unknown);
        assert_eq!(Confidence::from_text(""), Confidence::Unknown);
    }

    #[test]
    fn confidence_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"high\"");
        let c: Confidence = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(c, Confidence::Unknown);
    }

    #[test]
    fn structured_overrides_raw_text_and_drops_error() {
        let doc = json!({
            "short_summary": "ok",
            "raw_text": "invented by the model",
            "error": "also invented"
        });
        let Value::Object(map) = doc else { unreachable!() };
        let record = SummaryRecord::structured(map, "extracted");
        assert_eq!(record.raw_text(), Some("extracted"));
        assert!(!record.is_error());
        assert_eq!(record.get(SHORT_SUMMARY), Some(&json!("ok")));
    }

    #[test]
    fn degraded_has_empty_structured_fields() {
        let record = SummaryRecord::degraded("draft", "original text");
        assert_eq!(record.get(RELEVANCE_TO_OFFICIALS), Some(&json!([])));
        assert_eq!(record.get(ACTION_ITEMS), Some(&json!([])));
        assert_eq!(record.get(CONFIDENCE_ESTIMATE), Some(&json!("unknown")));
        assert_eq!(record.raw_text(), Some("original text"));
        assert!(!record.is_error());
    }

    #[test]
    fn error_record_serialises_as_object_with_error_only() {
        let record = SummaryRecord::error("boom");
        assert!(record.is_error());
        assert_eq!(record.error_text().as_deref(), Some("boom"));
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"error": "boom"}));
    }

    #[test]
    fn null_error_is_not_an_error() {
        let Value::Object(map) = json!({"error": null, "short_summary": "x"}) else {
            unreachable!()
        };
        assert!(!SummaryRecord::from_map(map).is_error());
    }

    #[test]
    fn falsy_error_values_are_not_errors() {
        for value in [json!(""), json!("  \n"), json!(false), json!(0), json!(0.0)] {
            let Value::Object(map) = json!({"error": value.clone(), "short_summary": "real"}) else {
                unreachable!()
            };
            let record = SummaryRecord::from_map(map);
            assert!(!record.is_error(), "error: {value}");
        }
    }

    #[test]
    fn non_string_error_is_shown_as_json() {
        let Value::Object(map) = json!({"error": 5}) else { unreachable!() };
        assert_eq!(SummaryRecord::from_map(map).error_text().as_deref(), Some("5"));
        assert_eq!(
            error_message(Some(&json!({"code": 401}))).as_deref(),
            Some(r#"{"code":401}"#)
        );
    }

    #[test]
    fn round_trips_through_json() {
        let record = SummaryRecord::degraded("s", "r");
        let text = serde_json::to_string(&record).unwrap();
        let back: SummaryRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }
}
