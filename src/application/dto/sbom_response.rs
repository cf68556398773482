use super::OutputFormat;
use crate::sbom_generation::domain::{NormalizationDiagnostics, ScopeInfo};
use crate::sbom_generation::services::DependencyReport;
use std::path::PathBuf;

/// One written document and what went into it
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub scope: ScopeInfo,
    pub format: OutputFormat,
    pub path: PathBuf,
    pub package_count: usize,
    pub relationship_count: usize,
    pub diagnostics: NormalizationDiagnostics,
    pub dependency_report: DependencyReport,
}

/// SbomResponse - Internal response DTO from the SBOM generation use case
#[derive(Debug, Clone, Default)]
pub struct SbomResponse {
    /// Documents in scope-token order, then format order
    pub documents: Vec<GeneratedDocument>,
}

impl SbomResponse {
    pub fn new(documents: Vec<GeneratedDocument>) -> Self {
        Self { documents }
    }

    pub fn paths(&self) -> Vec<&PathBuf> {
        self.documents.iter().map(|d| &d.path).collect()
    }
}
