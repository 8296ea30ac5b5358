//! Error types for the docbrief library.
//!
//! Only *fatal* conditions are errors. A completion that cannot be parsed
//! into a structured document is not an error at all: it is an expected
//! outcome of talking to an LLM and is handled inside
//! [`crate::pipeline::structure`] by the retry protocol, which reports
//! exhaustion through [`crate::pipeline::structure::StructuringOutcome`].
//!
//! Everything in [`BriefError`] ends a summarization request. The
//! [`crate::summarize()`] entry point folds these into an error record
//! ([`crate::record::SummaryRecord::error`]) so the presentation layer always
//! receives something it can render.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docbrief library.
#[derive(Debug, Error)]
pub enum BriefError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Extraction succeeded but produced no text (scanned images, empty file).
    #[error("No text extracted from PDF '{path}'")]
    NoTextExtracted { path: PathBuf },

    /// The local summarizer could not produce a summary from the text.
    #[error("Failed to generate local summary: {0}")]
    LocalSummaryFailed(String),

    // ── Completion service errors ─────────────────────────────────────────
    /// The provider cannot be invoked at all (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The completion call failed at the transport or API level.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    /// The completion call did not answer within the configured bound.
    #[error("Completion call timed out after {secs}s (model '{model}')\nIncrease --api-timeout.")]
    ApiTimeout { model: String, secs: u64 },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Text extraction needs a PDFium shared library. Either:\n\
  • install libpdfium system-wide, or\n\
  • set PDFIUM_LIB_PATH=/path/to/dir/containing/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BriefError {
    /// True for errors raised by the extraction backend, before any
    /// completion call could have been made.
    pub fn is_extraction_error(&self) -> bool {
        matches!(
            self,
            BriefError::FileNotFound { .. }
                | BriefError::PermissionDenied { .. }
                | BriefError::NotAPdf { .. }
                | BriefError::CorruptPdf { .. }
                | BriefError::PasswordRequired { .. }
                | BriefError::WrongPassword { .. }
                | BriefError::NoTextExtracted { .. }
                | BriefError::PdfiumBindingFailed(_)
        )
    }
}
