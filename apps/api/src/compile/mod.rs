// Document compilation: an ordered chain of strategies, each tried until one
// yields a PDF. Stage failures are absorbed and only the last one is surfaced.

pub mod builtin;
pub mod local;
pub mod pdf_writer;
pub mod remote;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::AppError;

pub use builtin::BuiltinRenderer;
pub use local::LocalCompiler;
pub use pdf_writer::PlainDocument;
pub use remote::RemoteCompiler;

/// Everything a stage may need: the rendered markup, and the unstyled outline
/// the built-in renderer draws when no markup compiler succeeds.
#[derive(Debug, Clone)]
pub struct CompileJob {
    pub source: String,
    pub fallback: PlainDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerKind {
    Local,
    Remote,
    Builtin,
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompilerKind::Local => "local",
            CompilerKind::Remote => "remote",
            CompilerKind::Builtin => "builtin",
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompiledDocument {
    pub pdf: Vec<u8>,
    /// Best effort; 0 when a remote payload could not be inspected.
    pub page_count: usize,
    pub compiler: CompilerKind,
}

#[derive(Debug, Error)]
pub enum StageFailure {
    #[error("no local LaTeX compiler found on PATH")]
    Unavailable,

    #[error("{engine} exited with {status}\n{log_tail}")]
    ExitStatus {
        engine: &'static str,
        status: String,
        log_tail: String,
    },

    #[error("{engine} timed out after {secs}s")]
    TimedOut { engine: &'static str, secs: u64 },

    #[error("{engine} finished but produced no PDF\n{log_tail}")]
    MissingOutput {
        engine: &'static str,
        log_tail: String,
    },

    #[error("remote compile returned {status} ({content_type}): {body}")]
    NotPdf {
        status: u16,
        content_type: String,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("built-in renderer failed: {0}")]
    Render(String),
}

/// One way of turning a `CompileJob` into a PDF.
#[async_trait]
pub trait CompileStrategy: Send + Sync {
    fn kind(&self) -> CompilerKind;

    async fn compile(&self, job: &CompileJob) -> Result<CompiledDocument, StageFailure>;
}

/// Ordered fallback chain: local binary, remote service, built-in renderer.
#[derive(Clone)]
pub struct CompilerChain {
    stages: Vec<Arc<dyn CompileStrategy>>,
}

impl CompilerChain {
    pub fn new(stages: Vec<Arc<dyn CompileStrategy>>) -> Self {
        Self { stages }
    }

    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        let mut stages: Vec<Arc<dyn CompileStrategy>> = vec![Arc::new(LocalCompiler::from_env(
            Duration::from_secs(config.local_compile_timeout_secs),
        ))];
        if config.enable_remote_compile {
            stages.push(Arc::new(RemoteCompiler::new(
                http,
                config.remote_compile_url.clone(),
            )));
        }
        stages.push(Arc::new(BuiltinRenderer));
        Self::new(stages)
    }

    /// The built-in renderer alone, for callers that skip markup compilation.
    pub fn builtin_only() -> Self {
        let builtin: Arc<dyn CompileStrategy> = Arc::new(BuiltinRenderer);
        Self::new(vec![builtin])
    }

    pub fn stage_kinds(&self) -> Vec<CompilerKind> {
        self.stages.iter().map(|s| s.kind()).collect()
    }

    pub async fn compile(&self, job: &CompileJob) -> Result<CompiledDocument, AppError> {
        let mut last_failure: Option<StageFailure> = None;

        for stage in &self.stages {
            debug!("Trying {} compile stage", stage.kind());
            match stage.compile(job).await {
                Ok(doc) => {
                    info!(
                        "Compiled with {} stage: {} bytes, {} page(s)",
                        doc.compiler,
                        doc.pdf.len(),
                        doc.page_count
                    );
                    return Ok(doc);
                }
                Err(e) => {
                    warn!("{} compile stage failed: {e}", stage.kind());
                    last_failure = Some(e);
                }
            }
        }

        Err(AppError::CompilationFailed(
            last_failure
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no compile stages configured".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeStage {
        kind: CompilerKind,
        payload: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeStage {
        fn new(
            kind: CompilerKind,
            payload: Option<&'static str>,
        ) -> (Arc<dyn CompileStrategy>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let stage: Arc<dyn CompileStrategy> = Arc::new(Self {
                kind,
                payload,
                calls: calls.clone(),
            });
            (stage, calls)
        }
    }

    #[async_trait]
    impl CompileStrategy for FakeStage {
        fn kind(&self) -> CompilerKind {
            self.kind
        }

        async fn compile(&self, _job: &CompileJob) -> Result<CompiledDocument, StageFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.payload {
                Some(bytes) => Ok(CompiledDocument {
                    pdf: bytes.as_bytes().to_vec(),
                    page_count: 1,
                    compiler: self.kind,
                }),
                None => Err(StageFailure::ExitStatus {
                    engine: "fake",
                    status: "exit status: 1".to_string(),
                    log_tail: format!("{} failed", self.kind),
                }),
            }
        }
    }

    fn job() -> CompileJob {
        CompileJob {
            source: "\\documentclass{article}\\begin{document}x\\end{document}".to_string(),
            fallback: PlainDocument::from_paragraphs("x"),
        }
    }

    #[tokio::test]
    async fn test_local_success_skips_fallbacks() {
        let (local, local_calls) = FakeStage::new(CompilerKind::Local, Some("%PDF-local"));
        let (remote, remote_calls) = FakeStage::new(CompilerKind::Remote, Some("%PDF-remote"));
        let (builtin, builtin_calls) = FakeStage::new(CompilerKind::Builtin, Some("%PDF-builtin"));
        let chain = CompilerChain::new(vec![local, remote, builtin]);

        let doc = chain.compile(&job()).await.unwrap();
        assert_eq!(doc.pdf, b"%PDF-local");
        assert_eq!(doc.compiler, CompilerKind::Local);
        assert_eq!(local_calls.load(Ordering::SeqCst), 1);
        assert_eq!(remote_calls.load(Ordering::SeqCst), 0);
        assert_eq!(builtin_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_failure_uses_remote_payload() {
        let (local, _) = FakeStage::new(CompilerKind::Local, None);
        let (remote, _) = FakeStage::new(CompilerKind::Remote, Some("%PDF-remote"));
        let (builtin, builtin_calls) = FakeStage::new(CompilerKind::Builtin, Some("%PDF-builtin"));
        let chain = CompilerChain::new(vec![local, remote, builtin]);

        let doc = chain.compile(&job()).await.unwrap();
        assert_eq!(doc.pdf, b"%PDF-remote");
        assert_eq!(doc.compiler, CompilerKind::Remote);
        assert_eq!(builtin_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_both_failing_falls_through_to_builtin() {
        let (local, _) = FakeStage::new(CompilerKind::Local, None);
        let (remote, _) = FakeStage::new(CompilerKind::Remote, None);
        let builtin: Arc<dyn CompileStrategy> = Arc::new(BuiltinRenderer);
        let chain = CompilerChain::new(vec![local, remote, builtin]);

        let doc = chain.compile(&job()).await.unwrap();
        assert_eq!(doc.compiler, CompilerKind::Builtin);
        assert!(doc.pdf.starts_with(b"%PDF-"));
        assert_eq!(doc.page_count, 1);
    }

    #[tokio::test]
    async fn test_exhausted_chain_reports_last_diagnostic() {
        let (local, _) = FakeStage::new(CompilerKind::Local, None);
        let (remote, _) = FakeStage::new(CompilerKind::Remote, None);
        let chain = CompilerChain::new(vec![local, remote]);

        match chain.compile(&job()).await {
            Err(AppError::CompilationFailed(msg)) => assert!(msg.contains("remote failed")),
            other => panic!("expected CompilationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_chain_order_from_config() {
        let mut config = Config::for_tests();
        config.enable_remote_compile = true;
        let chain = CompilerChain::from_config(&config, reqwest::Client::new());
        assert_eq!(
            chain.stage_kinds(),
            vec![CompilerKind::Local, CompilerKind::Remote, CompilerKind::Builtin]
        );

        config.enable_remote_compile = false;
        let chain = CompilerChain::from_config(&config, reqwest::Client::new());
        assert_eq!(chain.stage_kinds(), vec![CompilerKind::Local, CompilerKind::Builtin]);
        assert_eq!(
            CompilerChain::builtin_only().stage_kinds(),
            vec![CompilerKind::Builtin]
        );
    }
}
