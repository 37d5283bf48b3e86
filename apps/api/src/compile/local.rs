//! Local LaTeX compilation via `latexmk` or `pdflatex` found on PATH.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, info};

use super::pdf_writer::count_pages;
use super::{CompileJob, CompileStrategy, CompiledDocument, CompilerKind, StageFailure};

const JOB_NAME: &str = "resume";
const LOG_TAIL_CHARS: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Drives its own reruns, so one invocation suffices.
    Latexmk,
    /// Needs two passes for stable cross-references.
    Pdflatex,
}

impl Engine {
    const PREFERENCE: [Engine; 2] = [Engine::Latexmk, Engine::Pdflatex];

    pub fn binary(self) -> &'static str {
        match self {
            Engine::Latexmk => "latexmk",
            Engine::Pdflatex => "pdflatex",
        }
    }

    fn args(self) -> &'static [&'static str] {
        match self {
            Engine::Latexmk => &["-pdf", "-interaction=nonstopmode", "-halt-on-error"],
            Engine::Pdflatex => &["-interaction=nonstopmode"],
        }
    }

    fn passes(self) -> usize {
        match self {
            Engine::Latexmk => 1,
            Engine::Pdflatex => 2,
        }
    }
}

pub struct LocalCompiler {
    search_path: Option<OsString>,
    timeout: Duration,
}

impl LocalCompiler {
    /// Searches the process PATH at compile time.
    pub fn from_env(timeout: Duration) -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
            timeout,
        }
    }

    #[cfg(test)]
    pub fn with_search_path(search_path: impl Into<OsString>, timeout: Duration) -> Self {
        Self {
            search_path: Some(search_path.into()),
            timeout,
        }
    }

    /// First preferred engine whose binary is on the search path.
    pub fn discover(&self) -> Option<(Engine, PathBuf)> {
        let search_path = self.search_path.as_ref()?;
        Engine::PREFERENCE.into_iter().find_map(|engine| {
            std::env::split_paths(search_path)
                .map(|dir| dir.join(engine.binary()))
                .find(|candidate| candidate.is_file())
                .map(|binary| (engine, binary))
        })
    }

    async fn run_pass(
        &self,
        engine: Engine,
        binary: &Path,
        workdir: &Path,
    ) -> Result<(), StageFailure> {
        let mut command = Command::new(binary);
        command
            .args(engine.args())
            .arg(format!("{JOB_NAME}.tex"))
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| StageFailure::TimedOut {
                engine: engine.binary(),
                secs: self.timeout.as_secs(),
            })??;

        if output.status.success() {
            return Ok(());
        }

        let log = match read_lossy(&workdir.join(format!("{JOB_NAME}.log"))).await {
            Some(log) => log,
            None => String::from_utf8_lossy(&output.stdout).into_owned(),
        };
        Err(StageFailure::ExitStatus {
            engine: engine.binary(),
            status: output.status.to_string(),
            log_tail: log_tail(&log, LOG_TAIL_CHARS),
        })
    }
}

#[async_trait]
impl CompileStrategy for LocalCompiler {
    fn kind(&self) -> CompilerKind {
        CompilerKind::Local
    }

    async fn compile(&self, job: &CompileJob) -> Result<CompiledDocument, StageFailure> {
        let (engine, binary) = self.discover().ok_or(StageFailure::Unavailable)?;

        // Removed on drop, on every exit path below.
        let workdir = tempfile::Builder::new().prefix("resume_tex_").tempdir()?;
        tokio::fs::write(workdir.path().join(format!("{JOB_NAME}.tex")), &job.source).await?;

        for pass in 1..=engine.passes() {
            debug!("{} pass {pass}/{}", engine.binary(), engine.passes());
            self.run_pass(engine, &binary, workdir.path()).await?;
        }

        let log = read_lossy(&workdir.path().join(format!("{JOB_NAME}.log")))
            .await
            .unwrap_or_default();
        let pdf = match tokio::fs::read(workdir.path().join(format!("{JOB_NAME}.pdf"))).await {
            Ok(pdf) => pdf,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StageFailure::MissingOutput {
                    engine: engine.binary(),
                    log_tail: log_tail(&log, LOG_TAIL_CHARS),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let page_count = parse_page_count(&log)
            .or_else(|| count_pages(&pdf))
            .unwrap_or(1);
        info!("{} produced {page_count} page(s)", engine.binary());

        Ok(CompiledDocument {
            pdf,
            page_count,
            compiler: CompilerKind::Local,
        })
    }
}

async fn read_lossy(path: &Path) -> Option<String> {
    tokio::fs::read(path)
        .await
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

fn page_count_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)Output written on .*?\((\d+) pages?").expect("static page-count pattern")
    })
}

/// Page count from a TeX log's "Output written on ... (N pages, M bytes)." line.
/// TeX hard-wraps long log lines, so the match may span a newline.
pub fn parse_page_count(log: &str) -> Option<usize> {
    page_count_pattern()
        .captures(log)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Last `max_chars` characters of a log.
pub fn log_tail(log: &str, max_chars: usize) -> String {
    let total = log.chars().count();
    log.chars().skip(total.saturating_sub(max_chars)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::PlainDocument;

    #[test]
    fn test_parse_page_count_variants() {
        assert_eq!(
            parse_page_count("...\nOutput written on resume.pdf (1 page, 40213 bytes).\n"),
            Some(1)
        );
        assert_eq!(
            parse_page_count("Output written on /tmp/resume_tex_ab/resume.pdf (2 pages, 81\n024 bytes)."),
            Some(2)
        );
        assert_eq!(
            parse_page_count("Output written on /very/long/path/that/wraps/re\nsume.pdf (3 pages, 1 bytes)."),
            Some(3)
        );
        assert_eq!(parse_page_count("No pages of output."), None);
    }

    #[test]
    fn test_log_tail_is_char_safe() {
        assert_eq!(log_tail("abcdef", 3), "def");
        assert_eq!(log_tail("ab", 10), "ab");
        assert_eq!(log_tail("ééé", 2), "éé");
    }

    #[test]
    fn test_discover_prefers_latexmk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pdflatex"), b"").unwrap();
        let compiler = LocalCompiler::with_search_path(dir.path(), Duration::from_secs(1));
        assert_eq!(compiler.discover().map(|(e, _)| e), Some(Engine::Pdflatex));

        std::fs::write(dir.path().join("latexmk"), b"").unwrap();
        assert_eq!(compiler.discover().map(|(e, _)| e), Some(Engine::Latexmk));
    }

    #[tokio::test]
    async fn test_missing_binaries_are_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = LocalCompiler::with_search_path(dir.path(), Duration::from_secs(1));
        let job = CompileJob {
            source: "\\end{document}".to_string(),
            fallback: PlainDocument::new(),
        };
        assert!(matches!(
            compiler.compile(&job).await,
            Err(StageFailure::Unavailable)
        ));
    }

    #[cfg(unix)]
    fn install_script(dir: &Path, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn job() -> CompileJob {
        CompileJob {
            source: "\\documentclass{article}\\begin{document}Hi\\end{document}".to_string(),
            fallback: PlainDocument::new(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_pdflatex_runs_twice_and_reads_pages_from_log() {
        let bin = tempfile::tempdir().unwrap();
        let runs = bin.path().join("runs.txt");
        install_script(
            bin.path(),
            "pdflatex",
            &format!(
                "test -f resume.tex || exit 3\n\
                 echo \"$PWD\" >> '{}'\n\
                 printf '%%PDF-1.4 local' > resume.pdf\n\
                 printf 'This is pdfTeX\\nOutput written on resume.pdf (2 pages, 1234 bytes).\\n' > resume.log",
                runs.display()
            ),
        );

        let compiler = LocalCompiler::with_search_path(bin.path(), Duration::from_secs(10));
        let doc = compiler.compile(&job()).await.unwrap();

        assert_eq!(doc.pdf, b"%PDF-1.4 local");
        assert_eq!(doc.page_count, 2);
        assert_eq!(doc.compiler, CompilerKind::Local);

        let recorded = std::fs::read_to_string(&runs).unwrap();
        let workdirs: Vec<&str> = recorded.lines().collect();
        assert_eq!(workdirs.len(), 2);
        assert_eq!(workdirs[0], workdirs[1]);
        assert!(!Path::new(workdirs[0]).exists(), "work directory left behind");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_run_reports_exit_status_and_log_tail() {
        let bin = tempfile::tempdir().unwrap();
        install_script(
            bin.path(),
            "latexmk",
            "printf 'This is pdfTeX\\n! Undefined control sequence.\\n' > resume.log\nexit 12",
        );

        let compiler = LocalCompiler::with_search_path(bin.path(), Duration::from_secs(10));
        match compiler.compile(&job()).await {
            Err(StageFailure::ExitStatus {
                engine,
                status,
                log_tail,
            }) => {
                assert_eq!(engine, "latexmk");
                assert!(status.contains("12"), "{status}");
                assert!(log_tail.contains("! Undefined control sequence."));
            }
            other => panic!("expected ExitStatus, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run_without_pdf_is_missing_output() {
        let bin = tempfile::tempdir().unwrap();
        install_script(bin.path(), "latexmk", "printf 'No pages of output.\\n' > resume.log");

        let compiler = LocalCompiler::with_search_path(bin.path(), Duration::from_secs(10));
        assert!(matches!(
            compiler.compile(&job()).await,
            Err(StageFailure::MissingOutput { engine: "latexmk", .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_engine_times_out() {
        let bin = tempfile::tempdir().unwrap();
        install_script(bin.path(), "latexmk", "sleep 5");

        let compiler = LocalCompiler::with_search_path(bin.path(), Duration::from_millis(200));
        assert!(matches!(
            compiler.compile(&job()).await,
            Err(StageFailure::TimedOut { engine: "latexmk", .. })
        ));
    }
}
