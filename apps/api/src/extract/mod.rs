//! Resume text extraction for uploaded files.
//!
//! Supported families: PDF, word-processor (`.docx`, legacy `.doc`) and plain text.
//! Parsing is CPU-bound; callers on the async path go through `extract_text_blocking`.

pub mod docx;

use tracing::{debug, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Doc,
    Docx,
    Txt,
}

impl FileKind {
    /// Classifies by extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, AppError> {
        let lower = filename.to_ascii_lowercase();
        let kind = match lower.rsplit_once('.').map(|(_, ext)| ext) {
            Some("pdf") => FileKind::Pdf,
            Some("docx") => FileKind::Docx,
            Some("doc") => FileKind::Doc,
            Some("txt") => FileKind::Txt,
            _ => return Err(AppError::UnsupportedFormat(filename.to_string())),
        };
        Ok(kind)
    }
}

pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, AppError> {
    let kind = FileKind::from_filename(filename)?;
    debug!("Extracting {kind:?} text from '{filename}' ({} bytes)", bytes.len());

    match kind {
        FileKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::Extraction(format!("could not read PDF: {e}"))),
        FileKind::Docx => docx::extract_docx_text(bytes)
            .map_err(|e| AppError::Extraction(e.to_string())),
        FileKind::Doc => match docx::extract_docx_text(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!("'{filename}' is not an OOXML package ({e}); scanning legacy binary");
                let text = docx::scan_printable_runs(bytes);
                if text.trim().is_empty() {
                    Err(AppError::Extraction("no readable text in .doc file".to_string()))
                } else {
                    Ok(text)
                }
            }
        },
        FileKind::Txt => String::from_utf8(bytes.to_vec())
            .map_err(|e| AppError::Extraction(format!("text file is not valid UTF-8: {e}"))),
    }
}

/// Runs `extract_text` on the blocking pool.
pub async fn extract_text_blocking(bytes: Vec<u8>, filename: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes, &filename))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        assert_eq!(FileKind::from_filename("CV.PDF").unwrap(), FileKind::Pdf);
        assert_eq!(FileKind::from_filename("cv.Docx").unwrap(), FileKind::Docx);
        assert_eq!(FileKind::from_filename("cv.doc").unwrap(), FileKind::Doc);
        assert_eq!(FileKind::from_filename("notes.txt").unwrap(), FileKind::Txt);
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        for name in ["resume.rtf", "resume", "archive.tar.gz"] {
            assert!(matches!(
                FileKind::from_filename(name),
                Err(AppError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn test_plain_text_roundtrips() {
        let text = extract_text("Jane Doe\nRust".as_bytes(), "cv.txt").unwrap();
        assert_eq!(text, "Jane Doe\nRust");
    }

    #[test]
    fn test_invalid_utf8_text_is_extraction_error() {
        let err = extract_text(&[0xff, 0xfe, 0x00], "cv.txt").unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_legacy_doc_falls_back_to_printable_scan() {
        let text = extract_text(b"\x00\x00Staff Engineer\x00\x01", "old.doc").unwrap();
        assert_eq!(text, "Staff Engineer");
    }

    #[tokio::test]
    async fn test_blocking_wrapper_propagates_errors() {
        let err = extract_text_blocking(vec![1, 2, 3], "x.xyz".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }
}
