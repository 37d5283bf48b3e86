//! Remote LaTeX compilation over HTTP (latexonline.cc compatible).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use super::pdf_writer::count_pages;
use super::{CompileJob, CompileStrategy, CompiledDocument, CompilerKind, StageFailure};

const ENGINE: &str = "pdflatex";
const GET_TIMEOUT: Duration = Duration::from_secs(120);
const POST_TIMEOUT: Duration = Duration::from_secs(180);
const BODY_SNIPPET_CHARS: usize = 300;

pub struct RemoteCompiler {
    http: Client,
    endpoint: String,
}

impl RemoteCompiler {
    pub fn new(http: Client, endpoint: String) -> Self {
        Self { http, endpoint }
    }

    async fn compile_get(&self, text: &str) -> Result<Vec<u8>, StageFailure> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("text", text), ("engine", ENGINE)])
            .timeout(GET_TIMEOUT)
            .send()
            .await?;
        read_pdf(response).await
    }

    async fn compile_post(&self, text: &str) -> Result<Vec<u8>, StageFailure> {
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("text", text), ("engine", ENGINE), ("directive", "general")])
            .timeout(POST_TIMEOUT)
            .send()
            .await?;
        read_pdf(response).await
    }
}

#[async_trait]
impl CompileStrategy for RemoteCompiler {
    fn kind(&self) -> CompilerKind {
        CompilerKind::Remote
    }

    async fn compile(&self, job: &CompileJob) -> Result<CompiledDocument, StageFailure> {
        let text = minify_latex(&job.source);
        debug!("Remote compile: {} chars after minify", text.len());

        // Query-string first; long sources overflow URL limits, so fall back to a form POST.
        let pdf = match self.compile_get(&text).await {
            Ok(pdf) => pdf,
            Err(e) => {
                warn!("Remote GET compile failed, retrying as POST: {e}");
                self.compile_post(&text).await?
            }
        };

        Ok(CompiledDocument {
            page_count: count_pages(&pdf).unwrap_or(0),
            pdf,
            compiler: CompilerKind::Remote,
        })
    }
}

async fn read_pdf(response: Response) -> Result<Vec<u8>, StageFailure> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if status == StatusCode::OK && content_type.contains("pdf") {
        return Ok(response.bytes().await?.to_vec());
    }

    let body = response.text().await.unwrap_or_default();
    Err(StageFailure::NotPdf {
        status: status.as_u16(),
        content_type,
        body: body.chars().take(BODY_SNIPPET_CHARS).collect(),
    })
}

/// Drops `%` comments (keeping `\%`), drops lines that are entirely comment or
/// empty, and collapses all whitespace to single spaces.
///
/// A `%` inside a verbatim environment or URL argument is treated as a comment too.
pub fn minify_latex(source: &str) -> String {
    let kept: Vec<&str> = source
        .lines()
        .filter_map(|line| {
            let cut = comment_start(line).unwrap_or(line.len());
            (cut > 0).then(|| &line[..cut])
        })
        .collect();
    kept.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|&(i, &b)| b == b'%' && (i == 0 || bytes[i - 1] != b'\\'))
        .map(|(i, _)| i)
}
