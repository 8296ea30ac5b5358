//! # docbrief
//!
//! Summarise PDF documents into a structured brief: a short synopsis, points
//! relevant to officials, action items, and a confidence estimate.
//!
//! ## Why this crate?
//!
//! Asking an LLM for "JSON only" works most of the time. The rest of the
//! time the answer arrives in code fences, with a friendly preamble, or with
//! a string where a list was requested. This crate wraps the completion call
//! in a small, bounded protocol that turns whatever comes back into a record
//! the UI can render without a single shape check.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract    pdfium text extraction (spawn_blocking)
//!  ├─ 2. Draft      free-form summary from the completion service   (ai mode)
//!  ├─ 3. Structure  primary prompt → sanitize → parse
//!  │                 └─ on parse failure: strict prompt → sanitize → parse
//!  ├─ 4. Fallback   degraded record when both attempts fail
//!  └─ 5. Normalize  any record shape → canonical, renderable summary
//! ```
//!
//! Local mode replaces steps 2–4 with an in-process extractive summarizer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docbrief::{normalize, summarize, SummaryConfig, SummaryMode};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let config = SummaryConfig::builder()
//!         .mode(SummaryMode::Ai)
//!         .build()
//!         .unwrap();
//!     let record = summarize("tender.pdf", &config).await;
//!     println!("{}", docbrief::display::render_text(&normalize(&record)));
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docbrief` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod completion;
pub mod config;
pub mod display;
pub mod error;
pub mod local;
pub mod normalize;
pub mod notify;
pub mod pipeline;
pub mod prompts;
pub mod record;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use completion::{CompletionService, LlmCompletion};
pub use config::{SummaryConfig, SummaryConfigBuilder, SummaryMode};
pub use error::BriefError;
pub use normalize::{normalize, normalize_value, NormalizedSummary, RenderableRecord};
pub use notify::{Notification, NotificationKind, Notifier, OperationId};
pub use pipeline::structure::{structure, Attempt, StructuringOutcome};
pub use record::{Confidence, SummaryRecord};
pub use summarize::{
    summarize, summarize_sync, summarize_text, summarize_text_with, summarize_to_file,
    try_summarize,
};
