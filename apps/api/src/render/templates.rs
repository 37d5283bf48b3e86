use std::path::PathBuf;

use tracing::debug;

use crate::errors::AppError;

/// The three template assets the renderers consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Single-column resume (`{{EXPERIENCE}}`, `{{SKILLS}}`, ...).
    SimpleResume,
    /// Two-column resume with custom job/project macros.
    ExtendedResume,
    CoverLetter,
}

impl TemplateKind {
    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::SimpleResume => "resume.tex",
            TemplateKind::ExtendedResume => "resume_template.tex",
            TemplateKind::CoverLetter => "cover_letter.tex",
        }
    }
}

/// Reads template assets from a directory on each request, so edits take effect without restart.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_of(&self, kind: TemplateKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Loads a template; a missing file is `TemplateNotFound`.
    pub async fn load(&self, kind: TemplateKind) -> Result<String, AppError> {
        self.try_load(kind)
            .await?
            .ok_or_else(|| AppError::TemplateNotFound(self.path_of(kind).display().to_string()))
    }

    /// Loads a template, returning `None` when the asset does not exist.
    pub async fn try_load(&self, kind: TemplateKind) -> Result<Option<String>, AppError> {
        let path = self.path_of(kind);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                debug!("Loaded template {} ({} bytes)", path.display(), text.len());
                Ok(Some(text))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Internal(anyhow::anyhow!(
                "failed to read template {}: {e}",
                path.display()
            ))),
        }
    }
}
