//! Tailoring and cover-letter pipelines.
//!
//! Each pipeline: (optional) model call -> structured record -> markup render ->
//! compiler chain -> response. The extended resume pipeline adds relevance
//! scoring before and after, single-page pruning, and one overflow retry.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::ats;
use crate::compile::{CompileJob, CompiledDocument, CompilerChain, CompilerKind, PlainDocument};
use crate::errors::AppError;
use crate::generation::prompts;
use crate::layout;
use crate::llm_client::{extract_json_object, CompletionClient};
use crate::models::extended::Contact;
use crate::models::{
    CoverLetterDraft, CoverLetterParagraphs, CoverLetterRecord, ExtendedResume, ResumeRecord,
};
use crate::render::{self, plain, TemplateStore};

const PDF_DATA_URI_PREFIX: &str = "data:application/pdf;base64,";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct TailorResumeRequest {
    /// A ready record skips the model call.
    #[serde(default, alias = "data")]
    pub resume_data: Option<ResumeRecord>,
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TailorResumeResponse {
    pub status: &'static str,
    pub filename: String,
    pub latex: String,
    pub pdf_base64: String,
    pub data: ResumeRecord,
    pub page_count: usize,
    pub compiler: CompilerKind,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub links: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub hiring_manager: String,
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    /// Ready paragraphs skip the model call.
    #[serde(default)]
    pub paragraphs: Option<CoverLetterParagraphs>,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub status: &'static str,
    pub filename: String,
    pub latex: String,
    pub pdf_base64: String,
    pub paragraphs: CoverLetterParagraphs,
    pub page_count: usize,
    pub compiler: CompilerKind,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExtendedTailorRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default, alias = "jd_text")]
    pub job_description: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Skip markup compilation and draw the built-in document directly.
    #[serde(default, alias = "fast_mode")]
    pub fast: bool,
}

#[derive(Debug, Serialize)]
pub struct ExtendedTailorResponse {
    pub status: &'static str,
    pub filename: String,
    pub latex_source: String,
    /// `data:application/pdf;base64,...`
    pub pdf_base64: String,
    pub ats_before: f64,
    pub ats_after: f64,
    pub missing_keywords: Vec<String>,
    pub page_count: usize,
    pub compiler: CompilerKind,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExtendedCoverLetterRequest {
    #[serde(default)]
    pub resume_summary: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: Contact,
    /// Ready body paragraphs skip the model call.
    #[serde(default)]
    pub body: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ExtendedCoverLetterResponse {
    pub status: &'static str,
    pub filename: String,
    pub latex: String,
    pub pdf_base64: String,
    pub page_count: usize,
    pub compiler: CompilerKind,
}

// ────────────────────────────────────────────────────────────────────────────
// Shared steps
// ────────────────────────────────────────────────────────────────────────────

/// Filename stem: runs outside `[A-Za-z0-9_-]` become one `_`, edges trimmed.
pub fn safe_stem(name: &str, default: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_run = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            stem.push(ch);
            in_run = false;
        } else if !in_run {
            stem.push('_');
            in_run = true;
        }
    }
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        default.to_string()
    } else {
        stem.to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require_client(client: Option<&dyn CompletionClient>) -> Result<&dyn CompletionClient, AppError> {
    client.ok_or(AppError::CredentialNotSet)
}

/// One completion, parsed into `T` through the JSON extraction contract.
async fn request_record<T: DeserializeOwned>(
    client: &dyn CompletionClient,
    prompt: &str,
    what: &str,
) -> Result<T, AppError> {
    let raw = client
        .complete(prompt)
        .await
        .map_err(|e| AppError::Llm(format!("{what} generation failed: {e}")))?;
    let object = extract_json_object(&raw)?;
    serde_json::from_value(Value::Object(object))
        .map_err(|e| AppError::ModelOutputNotJson(format!("{what} JSON has an unexpected shape: {e}")))
}

async fn compile(
    compiler: &CompilerChain,
    source: &str,
    fallback: PlainDocument,
) -> Result<CompiledDocument, AppError> {
    compiler
        .compile(&CompileJob {
            source: source.to_string(),
            fallback,
        })
        .await
}

// ────────────────────────────────────────────────────────────────────────────
// Pipelines
// ────────────────────────────────────────────────────────────────────────────

pub async fn tailor_resume(
    client: Option<&dyn CompletionClient>,
    templates: &TemplateStore,
    compiler: &CompilerChain,
    request: TailorResumeRequest,
) -> Result<TailorResumeResponse, AppError> {
    let record = match request.resume_data {
        Some(record) => record,
        None => {
            let client = require_client(client)?;
            let prompt = prompts::resume_prompt(&request.resume_text, &request.job_description);
            request_record::<ResumeRecord>(client, &prompt, "Resume").await?
        }
    };

    let latex = render::render_simple_resume(templates, &record).await?;
    let compiled = compile(compiler, &latex, plain::resume_document(&record)).await?;

    let stem = safe_stem(
        non_blank(request.username.as_deref())
            .or(non_blank(Some(record.name.as_str())))
            .unwrap_or("tailored"),
        "tailored",
    );

    Ok(TailorResumeResponse {
        status: "success",
        filename: format!("{stem}_resume.pdf"),
        latex,
        pdf_base64: STANDARD.encode(&compiled.pdf),
        data: record,
        page_count: compiled.page_count,
        compiler: compiled.compiler,
    })
}

pub async fn generate_cover_letter(
    client: Option<&dyn CompletionClient>,
    templates: &TemplateStore,
    compiler: &CompilerChain,
    request: CoverLetterRequest,
) -> Result<CoverLetterResponse, AppError> {
    let paragraphs = match request.paragraphs {
        Some(paragraphs) => paragraphs,
        None => {
            let client = require_client(client)?;
            let prompt = prompts::cover_letter_prompt(
                &request.resume_text,
                &request.job_description,
                &request.job_title,
                &request.company,
            );
            request_record::<CoverLetterParagraphs>(client, &prompt, "Cover letter").await?
        }
    };

    let record = CoverLetterRecord {
        name: request.name,
        email: request.email,
        phone: request.phone,
        links: request.links,
        company: request.company,
        hiring_manager: request.hiring_manager,
        job_title: request.job_title,
        ..Default::default()
    }
    .with_paragraphs(paragraphs.clone());

    let latex = render::render_cover_letter(templates, &record).await?;
    let compiled = compile(compiler, &latex, plain::cover_letter_document(&record)).await?;
    let stem = safe_stem(&record.name, "candidate");

    Ok(CoverLetterResponse {
        status: "success",
        filename: format!("{stem}_cover_letter.pdf"),
        latex,
        pdf_base64: STANDARD.encode(&compiled.pdf),
        paragraphs,
        page_count: compiled.page_count,
        compiler: compiled.compiler,
    })
}

/// Two-column single-page tailoring with before/after relevance scores.
pub async fn tailor_resume_extended(
    client: Option<&dyn CompletionClient>,
    templates: &TemplateStore,
    compiler: &CompilerChain,
    request: ExtendedTailorRequest,
) -> Result<ExtendedTailorResponse, AppError> {
    let client = require_client(client)?;
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text is required".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }

    let before = ats::score(&request.resume_text, &request.job_description);

    let prompt = prompts::extended_resume_prompt(&request.resume_text, &request.job_description);
    let generated: ExtendedResume = request_record(client, &prompt, "Resume").await?;
    let mut record = layout::fit_before_render(generated);
    let mut latex = render::render_extended_resume(templates, &record).await?;

    let compiled = if request.fast {
        info!("Fast mode: skipping markup compilation");
        compile(&CompilerChain::builtin_only(), &latex, plain::extended_document(&record)).await?
    } else {
        let first = compile(compiler, &latex, plain::extended_document(&record)).await?;
        if first.page_count > 1 {
            warn!(
                "{} compile produced {} pages; pruning and recompiling once",
                first.compiler, first.page_count
            );
            record = layout::prune(&record);
            latex = render::render_extended_resume(templates, &record).await?;
            compile(compiler, &latex, plain::extended_document(&record)).await?
        } else {
            first
        }
    };

    let after = ats::score(&record.tailored_text(), &request.job_description);
    info!(
        "Tailored resume: ATS {} -> {}, {} page(s) via {}",
        before.score, after.score, compiled.page_count, compiled.compiler
    );

    let stem = safe_stem(
        non_blank(request.username.as_deref()).unwrap_or("candidate"),
        "candidate",
    );

    Ok(ExtendedTailorResponse {
        status: "success",
        filename: format!("{stem}_resume.pdf"),
        latex_source: latex,
        pdf_base64: format!("{PDF_DATA_URI_PREFIX}{}", STANDARD.encode(&compiled.pdf)),
        ats_before: before.score,
        ats_after: after.score,
        missing_keywords: after.missing_keywords,
        page_count: compiled.page_count,
        compiler: compiled.compiler,
    })
}

pub async fn generate_cover_letter_extended(
    client: Option<&dyn CompletionClient>,
    templates: &TemplateStore,
    compiler: &CompilerChain,
    request: ExtendedCoverLetterRequest,
) -> Result<ExtendedCoverLetterResponse, AppError> {
    let draft = match request.body {
        Some(body) => CoverLetterDraft {
            body,
            ..Default::default()
        },
        None => {
            let client = require_client(client)?;
            let prompt = prompts::extended_cover_letter_prompt(
                &request.resume_summary,
                &request.job_description,
                &request.role,
                &request.company,
            );
            request_record::<CoverLetterDraft>(client, &prompt, "Cover letter").await?
        }
    };

    let company = non_blank(Some(draft.recipient.company.as_str()))
        .unwrap_or(&request.company)
        .to_string();
    let job_title = non_blank(Some(draft.recipient.role.as_str()))
        .unwrap_or(&request.role)
        .to_string();

    let record = CoverLetterRecord {
        name: request.name.clone(),
        email: request.contact.email.clone(),
        phone: request.contact.phone.clone(),
        links: request.contact.links().join(", "),
        company,
        job_title,
        ..Default::default()
    }
    .with_paragraphs(draft.to_paragraphs());

    let latex = render::render_cover_letter(templates, &record).await?;
    let compiled = compile(compiler, &latex, plain::cover_letter_document(&record)).await?;
    let stem = safe_stem(&request.name, "candidate");

    Ok(ExtendedCoverLetterResponse {
        status: "success",
        filename: format!("{stem}_cover_letter.pdf"),
        latex,
        pdf_base64: STANDARD.encode(&compiled.pdf),
        page_count: compiled.page_count,
        compiler: compiled.compiler,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::compile::{CompileStrategy, StageFailure};
    use crate::config::Config;
    use crate::llm_client::LlmError;

    struct FakeClient {
        reply: &'static str,
        calls: AtomicUsize,
    }

    impl FakeClient {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    /// Reports two pages on the first call and one afterwards.
    struct OverflowOnce {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompileStrategy for OverflowOnce {
        fn kind(&self) -> CompilerKind {
            CompilerKind::Local
        }

        async fn compile(&self, _job: &CompileJob) -> Result<CompiledDocument, StageFailure> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CompiledDocument {
                pdf: b"%PDF-1.5 fake".to_vec(),
                page_count: if call == 0 { 2 } else { 1 },
                compiler: CompilerKind::Local,
            })
        }
    }

    const EXTENDED_REPLY: &str = r#"Here you go:
```json
{
  "name": "Ada Lovelace",
  "contact": {"email": "ada@example.com", "github": "github.com/ada"},
  "summary": "Rust engineer building async services with tokio.",
  "experience": [{"title": "Engineer", "company": "Acme", "date": "2021 - Present",
                  "points": ["Built Rust services on tokio", "Shipped Docker images"]}],
  "projects": [{"title": "Parser", "link": "", "desc": "A Rust parser"}],
  "education": [{"date": "2019", "degree": "BSc", "institute": "Uni", "gpa": ""}],
  "skills_left": ["Rust", "Tokio"],
  "skills_right": ["Docker"]
}
```"#;

    fn templates() -> TemplateStore {
        TemplateStore::new(Config::for_tests().templates_dir)
    }

    fn extended_request() -> ExtendedTailorRequest {
        ExtendedTailorRequest {
            resume_text: "Python developer".into(),
            job_description: "Rust tokio docker engineer".into(),
            username: Some("Ada Lovelace".into()),
            fast: false,
        }
    }

    #[test]
    fn test_safe_stem() {
        assert_eq!(safe_stem("Ada Lovelace", "x"), "Ada_Lovelace");
        assert_eq!(safe_stem("  a/b\\c..d ", "x"), "a_b_c_d");
        assert_eq!(safe_stem("", "candidate"), "candidate");
        assert_eq!(safe_stem("???", "candidate"), "candidate");
        assert_eq!(safe_stem("jane-doe_2", "x"), "jane-doe_2");
    }

    #[tokio::test]
    async fn test_ready_record_needs_no_credential() {
        let request = TailorResumeRequest {
            resume_data: Some(ResumeRecord {
                name: "Grace Hopper".into(),
                summary: "Compiler pioneer".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let response = tailor_resume(None, &templates(), &CompilerChain::builtin_only(), request)
            .await
            .unwrap();

        assert_eq!(response.filename, "Grace_Hopper_resume.pdf");
        assert_eq!(response.compiler, CompilerKind::Builtin);
        assert!(response.latex.trim_end().ends_with("\\end{document}"));
        let pdf = STANDARD.decode(&response.pdf_base64).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_generation_without_credential_is_rejected() {
        let err = tailor_resume(
            None,
            &templates(),
            &CompilerChain::builtin_only(),
            TailorResumeRequest::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::CredentialNotSet));

        let err = tailor_resume_extended(
            None,
            &templates(),
            &CompilerChain::builtin_only(),
            ExtendedTailorRequest::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::CredentialNotSet));
    }

    #[tokio::test]
    async fn test_extended_requires_inputs_before_calling_model() {
        let client = FakeClient::new(EXTENDED_REPLY);
        let request = ExtendedTailorRequest {
            resume_text: "   ".into(),
            ..extended_request()
        };
        let err = tailor_resume_extended(
            Some(&client),
            &templates(),
            &CompilerChain::builtin_only(),
            request,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extended_pipeline_reports_scores_and_data_uri() {
        let client = FakeClient::new(EXTENDED_REPLY);
        let response = tailor_resume_extended(
            Some(&client),
            &templates(),
            &CompilerChain::builtin_only(),
            extended_request(),
        )
        .await
        .unwrap();

        assert_eq!(response.filename, "Ada_Lovelace_resume.pdf");
        assert!(response.pdf_base64.starts_with("data:application/pdf;base64,"));
        assert!(response.ats_after > response.ats_before);
        assert!(response.latex_source.contains("Ada Lovelace"));
        assert_eq!(response.page_count, 1);
    }

    #[tokio::test]
    async fn test_overflowing_compile_is_retried_once() {
        let stage = Arc::new(OverflowOnce {
            calls: AtomicUsize::new(0),
        });
        let chain = CompilerChain::new(vec![stage.clone() as Arc<dyn CompileStrategy>]);
        let client = FakeClient::new(EXTENDED_REPLY);

        let response = tailor_resume_extended(Some(&client), &templates(), &chain, extended_request())
            .await
            .unwrap();

        assert_eq!(stage.calls.load(Ordering::SeqCst), 2);
        assert_eq!(response.page_count, 1);
        assert_eq!(response.compiler, CompilerKind::Local);
    }

    #[tokio::test]
    async fn test_fast_mode_skips_configured_chain() {
        let stage = Arc::new(OverflowOnce {
            calls: AtomicUsize::new(0),
        });
        let chain = CompilerChain::new(vec![stage.clone() as Arc<dyn CompileStrategy>]);
        let client = FakeClient::new(EXTENDED_REPLY);
        let request = ExtendedTailorRequest {
            fast: true,
            ..extended_request()
        };

        let response = tailor_resume_extended(Some(&client), &templates(), &chain, request)
            .await
            .unwrap();

        assert_eq!(stage.calls.load(Ordering::SeqCst), 0);
        assert_eq!(response.compiler, CompilerKind::Builtin);
    }

    #[tokio::test]
    async fn test_non_json_model_output_is_surfaced() {
        let client = FakeClient::new("I cannot help with that.");
        let err = tailor_resume_extended(
            Some(&client),
            &templates(),
            &CompilerChain::builtin_only(),
            extended_request(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ModelOutputNotJson(_)));
    }

    #[tokio::test]
    async fn test_cover_letter_from_model_paragraphs() {
        let client = FakeClient::new(
            r#"{"opening": "I am applying.", "skills_fit": "I know Rust.", "conclusion": "Thanks."}"#,
        );
        let request = CoverLetterRequest {
            name: "Ada Lovelace".into(),
            company: "Acme".into(),
            job_title: "Engineer".into(),
            ..Default::default()
        };
        let response = generate_cover_letter(
            Some(&client),
            &templates(),
            &CompilerChain::builtin_only(),
            request,
        )
        .await
        .unwrap();

        assert_eq!(response.filename, "Ada_Lovelace_cover_letter.pdf");
        assert_eq!(response.paragraphs.skills_fit, "I know Rust.");
        assert!(response.latex.contains("I know Rust."));
        assert!(response.latex.contains("Hiring Manager"));
    }

    #[tokio::test]
    async fn test_extended_cover_letter_with_ready_body() {
        let request = ExtendedCoverLetterRequest {
            company: "Acme & Co".into(),
            role: "Engineer".into(),
            name: "".into(),
            contact: Contact {
                email: "ada@example.com".into(),
                ..Default::default()
            },
            body: Some(vec!["One.".into(), "Two.".into(), "Three.".into(), "Bye.".into()]),
            ..Default::default()
        };
        let response = generate_cover_letter_extended(
            None,
            &templates(),
            &CompilerChain::builtin_only(),
            request,
        )
        .await
        .unwrap();

        assert_eq!(response.filename, "candidate_cover_letter.pdf");
        assert!(response.latex.contains("Acme \\& Co"));
        assert!(response.latex.contains("Three. Bye."));
    }
}
