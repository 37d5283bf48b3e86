// Markup rendering: structured records + template assets -> LaTeX source.
// Every interpolated value is escaped; renderers are pure given the template text.

pub mod escape;
pub mod extended;
pub mod plain;
pub mod simple;
pub mod templates;

use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{CoverLetterRecord, ExtendedResume, ResumeRecord};

pub use templates::{TemplateKind, TemplateStore};

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{[A-Z_]+\}\}").expect("static placeholder pattern"))
}

fn page_break_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\\(newpage|clearpage)\b").expect("static page-break pattern"))
}

/// `{{TOKEN}}` placeholders still present in rendered source.
pub fn unresolved_placeholders(tex: &str) -> Vec<String> {
    placeholder_pattern()
        .find_iter(tex)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Strips forced page breaks and rejects truncated output.
pub fn finalize_single_page(tex: String) -> Result<String, AppError> {
    let tex = page_break_pattern().replace_all(&tex, "").into_owned();
    if !tex.trim_end().ends_with(r"\end{document}") {
        return Err(AppError::Internal(anyhow::anyhow!(
            "rendered LaTeX source is empty or missing \\end{{document}}"
        )));
    }
    let leftover = unresolved_placeholders(&tex);
    if !leftover.is_empty() {
        warn!("Template left unresolved placeholders: {}", leftover.join(", "));
    }
    Ok(tex)
}

pub async fn render_simple_resume(
    store: &TemplateStore,
    record: &ResumeRecord,
) -> Result<String, AppError> {
    let template = store.load(TemplateKind::SimpleResume).await?;
    Ok(simple::render_resume(&template, record))
}

pub async fn render_cover_letter(
    store: &TemplateStore,
    record: &CoverLetterRecord,
) -> Result<String, AppError> {
    let template = store.load(TemplateKind::CoverLetter).await?;
    Ok(simple::render_cover_letter(&template, record))
}

/// Renders the two-column resume. When its template asset is absent, the record is
/// adapted onto the single-column schema and rendered with that template instead.
pub async fn render_extended_resume(
    store: &TemplateStore,
    record: &ExtendedResume,
) -> Result<String, AppError> {
    let clamped = extended::clamp_for_layout(record);

    let tex = match store.try_load(TemplateKind::ExtendedResume).await? {
        Some(template) => extended::render_extended(&template, &clamped),
        None => {
            let simple_template = store.try_load(TemplateKind::SimpleResume).await?.ok_or_else(|| {
                AppError::TemplateNotFound(format!(
                    "{} or {}",
                    store.path_of(TemplateKind::ExtendedResume).display(),
                    store.path_of(TemplateKind::SimpleResume).display()
                ))
            })?;
            info!("Two-column template missing; rendering with the single-column template");
            simple::render_resume(&simple_template, &extended::to_simple(&clamped))
        }
    };

    finalize_single_page(tex)
}
