//! Prompts sent to the completion service.
//!
//! Every prompt lives here so prompt wording can change without touching the
//! retry logic in [`crate::pipeline::structure`], and so tests can inspect the
//! exact text without a live model.
//!
//! Three templates exist:
//!
//! 1. [`draft_prompt`] — free-form summary of the extracted document (AI mode,
//!    first call).
//! 2. [`primary_prompt`] — ask for the structured JSON document.
//! 3. [`strict_prompt`] — terser restatement used for the single retry after
//!    the primary response failed to parse.
//!
//! All three are pure `format!` templates: same input, same output.

/// Instructions for the free-form draft summary.
pub const DRAFT_INSTRUCTIONS: &str = "Summarize the following PDF text in a natural, unstructured way. \
Provide key insights, deadlines, action items, and any relevant details for officials.";

/// Build the free-form summary prompt for the extracted document text.
pub fn draft_prompt(document_text: &str) -> String {
    format!("{DRAFT_INSTRUCTIONS}\n\nText: {document_text}")
}

/// Build the first structuring prompt.
pub fn primary_prompt(text: &str) -> String {
    format!(
        r#"Convert the following summary into a JSON document with exactly these four fields:

- "short_summary": a string, a concise human-readable synopsis
- "relevance_to_officials": an array of strings, points that matter to government officials
- "action_items": an array of strings, concrete next steps
- "confidence_estimate": one of "high", "medium", "low", "unknown"

Output only the JSON document, with no prose before or after it and no code fences.
If a value is unknown, use an empty array for list fields and "unknown" for confidence_estimate.

Summary:
{text}"#
    )
}

/// Build the stricter retry prompt.
pub fn strict_prompt(text: &str) -> String {
    format!(
        r#"Return ONLY valid JSON. No explanations, no markdown, no code fences.

Schema:
{{
  "short_summary": string,
  "relevance_to_officials": string[],
  "action_items": string[],
  "confidence_estimate": "high" | "medium" | "low" | "unknown"
}}

Unknown values: [] for arrays, "unknown" for confidence_estimate.

Input:
{text}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::STRUCTURED_FIELDS;

    #[test]
    fn primary_prompt_names_every_structured_field() {
        let p = primary_prompt("some text");
        for field in STRUCTURED_FIELDS {
            assert!(p.contains(field), "missing {field}");
        }
        assert!(!p.contains("raw_text"));
        assert!(!p.contains("\"error\""));
        assert!(p.contains("Output only the JSON document"));
        assert!(p.ends_with("some text"));
    }

    #[test]
    fn strict_prompt_names_every_structured_field_with_types() {
        let p = strict_prompt("some text");
        for field in STRUCTURED_FIELDS {
            assert!(p.contains(field), "missing {field}");
        }
        assert!(p.contains("ONLY"));
        assert!(p.contains("string[]"));
        assert!(p.contains(r#""high" | "medium" | "low" | "unknown""#));
        assert!(p.ends_with("some text"));
    }

    #[test]
    fn prompts_are_distinct_and_deterministic() {
        assert_ne!(primary_prompt("x"), strict_prompt("x"));
        assert_eq!(primary_prompt("x"), primary_prompt("x"));
        assert_eq!(strict_prompt("x"), strict_prompt("x"));
    }

    #[test]
    fn strict_prompt_is_terser() {
        assert!(strict_prompt("").len() < primary_prompt("").len());
    }

    #[test]
    fn draft_prompt_embeds_text() {
        let p = draft_prompt("Tender closes 15 Sep.");
        assert!(p.starts_with(DRAFT_INSTRUCTIONS));
        assert!(p.ends_with("Text: Tender closes 15 Sep."));
    }
}
