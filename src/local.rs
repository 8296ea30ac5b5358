//! Local extractive summarizer.
//!
//! No model, no network: sentences are scored by the corpus frequency of
//! their words and the top N are kept. Cheap, deterministic, and good
//! enough to triage a document before paying for an LLM call.
//!
//! Relevance and action items are picked with keyword cues. A sentence that
//! mentions a deadline, date, amount or official is relevant; one that uses
//! obligation language ("must", "shall", "submit", …) is an action item.

use crate::record::Confidence;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Upper bound on relevance and action items each.
const MAX_ITEMS: usize = 3;

static RE_SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}]+)?").unwrap());

static RE_RELEVANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(deadline|due|by\s+\d|dated?|jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|june?|july?|aug(ust)?|sep(t|tember)?|oct(ober)?|nov(ember)?|dec(ember)?|budget|tender|value|cost|amount|crore|lakh|officials?|department|ministry|authority)\b|[₹$€£]\s*\d",
    )
    .unwrap()
});

static RE_ACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(must|shall|should|required?|submit|upload|prepare|apply|register|send|complete|ensure|provide)\b",
    )
    .unwrap()
});

/// Result of the local summarizer.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSummary {
    pub short_summary: String,
    pub relevance_to_officials: Vec<String>,
    pub action_items: Vec<String>,
    pub confidence_estimate: Confidence,
}

/// Summarize `text` into at most `num_sentences` sentences.
///
/// Returns `None` for blank input.
pub fn summarize_local(text: &str, num_sentences: usize) -> Option<LocalSummary> {
    if text.trim().is_empty() {
        return None;
    }

    let sentences: Vec<&str> = RE_SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.is_empty() {
        return None;
    }

    let mut word_freq: HashMap<String, usize> = HashMap::new();
    for sentence in &sentences {
        for word in words(sentence) {
            *word_freq.entry(word).or_insert(0) += 1;
        }
    }

    let mut scored: Vec<(usize, usize, &str)> = sentences
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            let score = words(s)
                .map(|w| word_freq.get(&w).copied().unwrap_or(0))
                .sum();
            (score, idx, *s)
        })
        .collect();

    // Highest score first; ties keep document order.
    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let picked: Vec<&str> = scored
        .iter()
        .take(num_sentences.max(1))
        .map(|(_, _, s)| *s)
        .collect();

    let mut short_summary = picked.join(". ");
    if !short_summary.ends_with('.') {
        short_summary.push('.');
    }

    Some(LocalSummary {
        short_summary,
        relevance_to_officials: matching(&sentences, &RE_RELEVANCE),
        action_items: matching(&sentences, &RE_ACTION),
        confidence_estimate: Confidence::Medium,
    })
}

fn words(sentence: &str) -> impl Iterator<Item = String> + '_ {
    RE_WORD.find_iter(sentence).map(|m| m.as_str().to_lowercase())
}

fn matching(sentences: &[&str], cue: &Regex) -> Vec<String> {
    sentences
        .iter()
        .filter(|s| cue.is_match(s))
        .take(MAX_ITEMS)
        .map(|s| collapse_whitespace(s))
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
