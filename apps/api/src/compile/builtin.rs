use async_trait::async_trait;

use super::pdf_writer::{write_pdf, PageLimit};
use super::{CompileJob, CompileStrategy, CompiledDocument, CompilerKind, StageFailure};

/// Last-resort stage: draws the job's plain outline directly, ignoring the markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRenderer;

#[async_trait]
impl CompileStrategy for BuiltinRenderer {
    fn kind(&self) -> CompilerKind {
        CompilerKind::Builtin
    }

    async fn compile(&self, job: &CompileJob) -> Result<CompiledDocument, StageFailure> {
        let outline = job.fallback.clone();
        let written = tokio::task::spawn_blocking(move || write_pdf(&outline, PageLimit::SinglePage))
            .await
            .map_err(|e| StageFailure::Render(e.to_string()))?
            .map_err(|e| StageFailure::Render(format!("{e:#}")))?;

        Ok(CompiledDocument {
            pdf: written.bytes,
            page_count: written.page_count,
            compiler: CompilerKind::Builtin,
        })
    }
}
