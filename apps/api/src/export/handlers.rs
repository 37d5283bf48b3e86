//! Axum route handler for resume downloads.

use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
    Form,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::{export, ExportFormat};
use crate::generation::generator::safe_stem;

const DEFAULT_FILENAME: &str = "tailored_resume";

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// POST /download/:format
///
/// Returns the submitted text as an attachment in `txt`, `docx` or `pdf`.
pub async fn handle_download(
    Path(format): Path<String>,
    Form(form): Form<DownloadForm>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format.parse()?;
    let stem = safe_stem(
        form.filename.as_deref().unwrap_or(DEFAULT_FILENAME),
        DEFAULT_FILENAME,
    );
    let bytes = export(form.resume_text, format).await?;
    info!("Exported {} ({} bytes)", format.extension(), bytes.len());

    let disposition = format!("attachment; filename=\"{stem}.{}\"", format.extension());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(bytes),
    )
        .into_response())
}
