use crate::shared::error::{ExitCode, SbomError};
use std::fmt;

/// Stages of one generator run, in execution order
///
/// A run moves strictly forward through `Init`, `Fetching`, `Normalizing`,
/// `Encoding` and `Writing` to `Done`; any stage may move to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Init,
    Fetching,
    Normalizing,
    Encoding,
    Writing,
    Done,
    Failed,
}

impl PipelineStage {
    /// The stage after this one on the success path
    pub fn next(self) -> Self {
        match self {
            PipelineStage::Init => PipelineStage::Fetching,
            PipelineStage::Fetching => PipelineStage::Normalizing,
            PipelineStage::Normalizing => PipelineStage::Encoding,
            PipelineStage::Encoding => PipelineStage::Writing,
            PipelineStage::Writing => PipelineStage::Done,
            PipelineStage::Done => PipelineStage::Done,
            PipelineStage::Failed => PipelineStage::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineStage::Init => "init",
            PipelineStage::Fetching => "fetching",
            PipelineStage::Normalizing => "normalizing",
            PipelineStage::Encoding => "encoding",
            PipelineStage::Writing => "writing",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// A failed run: the stage it failed in and the underlying error
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub source: anyhow::Error,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, source: impl Into<anyhow::Error>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// The classified error in the chain, if any
    pub fn sbom_error(&self) -> Option<&SbomError> {
        SbomError::find_in(&self.source)
    }

    /// Short error kind label; unclassified errors count as internal
    pub fn kind(&self) -> &'static str {
        self.sbom_error().map_or("internal error", SbomError::kind)
    }

    pub fn exit_code(&self) -> ExitCode {
        self.sbom_error()
            .map_or(ExitCode::ApplicationError, SbomError::exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_stage_order() {
        let mut stage = PipelineStage::Init;
        let mut visited = vec![stage];
        while !stage.is_terminal() {
            stage = stage.next();
            visited.push(stage);
        }
        assert_eq!(
            visited,
            vec![
                PipelineStage::Init,
                PipelineStage::Fetching,
                PipelineStage::Normalizing,
                PipelineStage::Encoding,
                PipelineStage::Writing,
                PipelineStage::Done,
            ]
        );
        assert_eq!(PipelineStage::Failed.next(), PipelineStage::Failed);
    }

    #[test]
    fn test_pipeline_error_classification() {
        let source: anyhow::Error = SbomError::Authentication {
            details: "inventory service returned 401 Unauthorized".to_string(),
        }
        .into();
        let err = PipelineError::new(PipelineStage::Fetching, source.context("scope demo-go"));

        assert_eq!(err.kind(), "authentication error");
        assert_eq!(err.exit_code(), ExitCode::UpstreamError);
        assert!(err.to_string().starts_with("fetching stage failed: scope demo-go"));
    }

    #[test]
    fn test_unclassified_error_is_internal() {
        let source: Result<(), anyhow::Error> = Err(anyhow::anyhow!("boom"));
        let err = PipelineError::new(
            PipelineStage::Encoding,
            source.context("encoding demo").unwrap_err(),
        );
        assert_eq!(err.kind(), "internal error");
        assert_eq!(err.exit_code(), ExitCode::ApplicationError);
    }
}
