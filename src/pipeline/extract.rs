//! Text extraction backend: local PDF path → raw document text.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which is not async-safe.
//! Extraction runs on tokio's blocking pool so worker threads never stall
//! on a large document.
//!
//! The path is validated (exists, readable, `%PDF` magic bytes) before
//! pdfium is touched, so callers get a precise error instead of a generic
//! load failure.

use crate::error::BriefError;
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Validate that `path_str` names a readable PDF file.
pub fn resolve_local(path_str: &str) -> Result<PathBuf, BriefError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(BriefError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(BriefError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(BriefError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(BriefError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Extract the text of every page, joined by blank lines.
///
/// # Errors
/// Any input or pdfium failure, and [`BriefError::NoTextExtracted`] when the
/// document yields only whitespace.
pub async fn extract_text(path_str: &str, password: Option<&str>) -> Result<String, BriefError> {
    let path = resolve_local(path_str)?;
    let pwd = password.map(|s| s.to_string());

    let text = tokio::task::spawn_blocking(move || extract_text_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| BriefError::Internal(format!("Extraction task panicked: {}", e)))??;

    Ok(text)
}

/// Bind pdfium: `PDFIUM_LIB_PATH` first, then the system library.
fn bind_pdfium() -> Result<Pdfium, BriefError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(dir) if !dir.is_empty() => {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
        }
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| BriefError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

fn extract_text_blocking(pdf_path: &Path, password: Option<&str>) -> Result<String, BriefError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                BriefError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                BriefError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            BriefError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut parts = Vec::with_capacity(pages.len() as usize);
    for (idx, page) in pages.iter().enumerate() {
        match page.text() {
            Ok(text) => parts.push(text.all()),
            // One unreadable page should not cost the whole document.
            Err(e) => warn!("Page {}: text extraction failed: {:?}", idx + 1, e),
        }
    }

    let text = parts.join("\n\n");
    if text.trim().is_empty() {
        return Err(BriefError::NoTextExtracted {
            path: pdf_path.to_path_buf(),
        });
    }

    debug!("Extracted {} chars of text", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let err = resolve_local("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, BriefError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_magic_is_not_a_pdf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"PK\x03\x04 zip archive").unwrap();
        let err = resolve_local(f.path().to_str().unwrap()).unwrap_err();
        match err {
            BriefError::NotAPdf { magic, .. } => assert_eq!(&magic, b"PK\x03\x04"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn pdf_magic_resolves() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n").unwrap();
        let path = resolve_local(f.path().to_str().unwrap()).unwrap();
        assert_eq!(path, f.path());
    }

    #[tokio::test]
    async fn extract_text_reports_input_errors_before_pdfium() {
        let err = extract_text("/definitely/not/here.pdf", None).await.unwrap_err();
        assert!(err.is_extraction_error());
    }
}
