//! Read-side normalization of summary records.
//!
//! The presentation layer can receive a record from three sources (a parsed
//! LLM document, a degraded fallback, the local summarizer) or an error
//! record. Only the first is untrusted, but treating all of them the same way
//! keeps rendering code free of shape checks.
//!
//! Every list field is classified into a [`FieldShape`] and coerced by one
//! total rule. [`normalize`] and [`normalize_value`] never fail: any input,
//! including non-objects, produces a [`RenderableRecord`].

use crate::record::{
    error_message, is_zero, Confidence, SummaryRecord, ACTION_ITEMS, CONFIDENCE_ESTIMATE, ERROR,
    RAW_TEXT, RELEVANCE_TO_OFFICIALS, SHORT_SUMMARY,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Shown when a data record has no usable `short_summary`.
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary available.";

/// What a record is once its shape has been made trustworthy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderableRecord {
    /// An error record; nothing else in it is rendered.
    Failure { error: String },
    /// A data record whose fields satisfy the schema invariants.
    Summary(NormalizedSummary),
}

impl RenderableRecord {
    pub fn is_failure(&self) -> bool {
        matches!(self, RenderableRecord::Failure { .. })
    }
}

/// A data record with canonical field types.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NormalizedSummary {
    pub short_summary: Option<String>,
    pub relevance_to_officials: Vec<String>,
    pub action_items: Vec<String>,
    pub confidence_estimate: Confidence,
    pub raw_text: Option<String>,
}

impl NormalizedSummary {
    /// The summary text for display, falling back to a placeholder.
    pub fn display_summary(&self) -> &str {
        match self.short_summary.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => NO_SUMMARY_PLACEHOLDER,
        }
    }
}

/// How a list-valued field actually arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape<'a> {
    Absent,
    Scalar(String),
    Sequence(&'a [Value]),
    WrongType,
}

impl<'a> FieldShape<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldShape::Absent,
            Some(Value::Array(items)) => FieldShape::Sequence(items),
            Some(Value::Bool(false)) => FieldShape::Absent,
            Some(Value::Number(n)) if is_zero(n) => FieldShape::Absent,
            Some(Value::String(s)) => FieldShape::Scalar(s.clone()),
            Some(Value::Number(n)) => FieldShape::Scalar(n.to_string()),
            Some(Value::Bool(true)) => FieldShape::Scalar("true".to_string()),
            Some(Value::Object(_)) => FieldShape::WrongType,
        }
    }

    /// Coerce into a list of display strings.
    pub fn into_items(self) -> Vec<String> {
        match self {
            FieldShape::Absent | FieldShape::WrongType => Vec::new(),
            FieldShape::Scalar(s) if s.trim().is_empty() => Vec::new(),
            FieldShape::Scalar(s) => vec![s],
            FieldShape::Sequence(items) => items.iter().filter_map(item_text).collect(),
        }
    }
}

fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Normalize a [`SummaryRecord`].
pub fn normalize(record: &SummaryRecord) -> RenderableRecord {
    normalize_fields(record.fields())
}

/// Normalize any JSON value purporting to be a summary record.
pub fn normalize_value(value: &Value) -> RenderableRecord {
    match value {
        Value::Object(fields) => normalize_fields(fields),
        _ => RenderableRecord::Summary(NormalizedSummary::default()),
    }
}

fn normalize_fields(fields: &Map<String, Value>) -> RenderableRecord {
    if let Some(error) = error_message(fields.get(ERROR)) {
        return RenderableRecord::Failure {
            error: error.into_owned(),
        };
    }

    RenderableRecord::Summary(NormalizedSummary {
        short_summary: text_field(fields.get(SHORT_SUMMARY)),
        relevance_to_officials: FieldShape::classify(fields.get(RELEVANCE_TO_OFFICIALS))
            .into_items(),
        action_items: FieldShape::classify(fields.get(ACTION_ITEMS)).into_items(),
        confidence_estimate: match fields.get(CONFIDENCE_ESTIMATE) {
            Some(Value::String(s)) => Confidence::from_text(s),
            _ => Confidence::Unknown,
        },
        raw_text: text_field(fields.get(RAW_TEXT)),
    })
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
