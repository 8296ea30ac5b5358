//! Candidate sanitizer: turn raw completion text into something a JSON
//! parser can accept.
//!
//! Models asked for "JSON only" still wrap their answer in a
//! ` ```json … ``` ` block more often than not. This stage strips exactly
//! that wrapper (a leading fence with an optional language tag and a
//! trailing fence) plus surrounding whitespace, and nothing else. It does not
//! try to repair the document; a response that is not JSON after stripping
//! is left for the retry protocol to deal with.

use once_cell::sync::Lazy;
use regex::Regex;

// A leading fence plus an optional language tag. The tag may be padded and
// ends at a line break or a space, except `json`, which may run straight
// into the document.
static RE_LEADING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^```[ \t]*(?:[a-z][\w.+-]*(?:[ \t]*\r?\n|[ \t]+)|json)?").unwrap()
});

static RE_TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*```\s*$").unwrap());

/// Strip code fences and surrounding whitespace.
///
/// Stripping repeats until nothing changes, so the function is idempotent
/// even for doubly-fenced input.
pub fn sanitize_candidate(input: &str) -> String {
    let mut current = input.trim().to_string();
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_once(input: &str) -> String {
    let s = RE_LEADING_FENCE.replace(input, "");
    let s = RE_TRAILING_FENCE.replace(&s, "");
    s.trim().to_string()
}
