//! Axum route handlers for resume analysis.

use axum::{extract::Multipart, Json};
use serde::Serialize;
use tracing::{debug, info};

use crate::ats::{score, AtsReport};
use crate::errors::AppError;
use crate::extract::extract_text_blocking;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub status: &'static str,
    pub resume_text: String,
    pub ats_score: f64,
    pub matching_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub analysis: AtsReport,
}

/// POST /analyze
///
/// Multipart form: `resume` (file) and `job_description` (text).
/// Extracts the resume text and scores it against the job description.
pub async fn handle_analyze(mut multipart: Multipart) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read resume upload: {e}")))?;
                debug!("Received resume upload '{filename}' ({} bytes)", bytes.len());
                upload = Some((filename, bytes.to_vec()));
            }
            Some("job_description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read job_description: {e}")))?;
                job_description = Some(text);
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let job_description = job_description
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    let resume_text = extract_text_blocking(bytes, filename).await?;
    let analysis = score(&resume_text, &job_description);
    info!(
        "Analyzed resume: score={} ({}/{} keywords)",
        analysis.score, analysis.matched_count, analysis.total_jd_keywords
    );

    Ok(Json(AnalyzeResponse {
        status: "success",
        resume_text,
        ats_score: analysis.score,
        matching_keywords: analysis.matching_keywords.clone(),
        missing_keywords: analysis.missing_keywords.clone(),
        analysis,
    }))
}
