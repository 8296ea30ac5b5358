//! Plain-text rendering of a normalized record.
//!
//! Rendering is unconditional: it takes a [`RenderableRecord`], whose fields
//! already satisfy the schema invariants, and never inspects raw JSON.

use crate::normalize::{NormalizedSummary, RenderableRecord};

/// Shown in place of an empty list.
pub const EMPTY_LIST: &str = "N/A";

/// Render the record as the summary panels, or the error panel.
pub fn render_text(record: &RenderableRecord) -> String {
    match record {
        RenderableRecord::Failure { error } => format!("Error\n─────\n{error}\n"),
        RenderableRecord::Summary(summary) => render_summary(summary),
    }
}

fn render_summary(s: &NormalizedSummary) -> String {
    let mut out = format!(
        "Short Summary\n─────────────\n{}\n\nDerived Values\n──────────────\n",
        s.display_summary()
    );
    out.push_str(&render_list("Relevance to Officials", &s.relevance_to_officials));
    out.push_str(&render_list("Action Items", &s.action_items));
    out.push_str(&format!("Confidence Estimate: {}\n", s.confidence_estimate));
    out
}

fn render_list(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return format!("{title}: {EMPTY_LIST}\n");
    }
    let mut out = format!("{title}:\n");
    for item in items {
        out.push_str(&format!("  • {item}\n"));
    }
    out
}

/// Render the raw extracted text pane.
pub fn render_raw_text(record: &RenderableRecord) -> String {
    match record {
        RenderableRecord::Summary(NormalizedSummary {
            raw_text: Some(text),
            ..
        }) if !text.is_empty() => text.clone(),
        _ => "(No text extracted)".to_string(),
    }
}
