//! Pipeline stages for turning a document into a structured record.
//!
//! Each submodule implements exactly one step, so each is independently
//! testable.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ (completion) ──▶ sanitize ──▶ parse ──▶ structure
//! (pdfium)                     (fences)    (JSON)    (retry protocol)
//! ```
//!
//! 1. [`extract`]   — validate the path and pull text out of the PDF; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 2. [`sanitize`]  — strip code fences and whitespace from a completion
//! 3. [`parse`]     — total JSON parse, `Option` instead of `Result`
//! 4. [`structure`] — the two-attempt protocol; the only stage with network
//!    I/O

pub mod extract;
pub mod parse;
pub mod sanitize;
pub mod structure;
