//! Download writers: the edited resume text as txt, docx or pdf.

pub mod docx;
pub mod handlers;

use std::str::FromStr;

use anyhow::Context;

use crate::compile::pdf_writer::{write_pdf, PageLimit};
use crate::compile::PlainDocument;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "txt" => Ok(ExportFormat::Txt),
            "docx" => Ok(ExportFormat::Docx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(AppError::InvalidFormat(other.to_string())),
        }
    }
}

/// Serializes `text` in `format`. CPU-bound writers run on the blocking pool.
pub async fn export(text: String, format: ExportFormat) -> Result<Vec<u8>, AppError> {
    if format == ExportFormat::Txt {
        return Ok(text.into_bytes());
    }

    let bytes = tokio::task::spawn_blocking(move || match format {
        ExportFormat::Docx => docx::write_docx(&text),
        ExportFormat::Pdf => write_pdf(&PlainDocument::from_paragraphs(&text), PageLimit::Unbounded)
            .map(|written| written.bytes),
        ExportFormat::Txt => Ok(text.into_bytes()),
    })
    .await
    .context("export task panicked")??;

    Ok(bytes)
}
