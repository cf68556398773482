use super::{NormalizationDiagnostics, PackageGraph, SbomMetadata, ScopeInfo};
use std::collections::BTreeMap;

/// Bom aggregate root: one scope's package graph plus document metadata
#[derive(Debug, Clone)]
pub struct Bom {
    scope: ScopeInfo,
    metadata: SbomMetadata,
    graph: PackageGraph,
    diagnostics: NormalizationDiagnostics,
    /// Upstream license names behind `LicenseRef-` identifiers
    license_names: BTreeMap<String, String>,
}

impl Bom {
    pub fn new(
        scope: ScopeInfo,
        metadata: SbomMetadata,
        graph: PackageGraph,
        diagnostics: NormalizationDiagnostics,
    ) -> Self {
        Self {
            scope,
            metadata,
            graph,
            diagnostics,
            license_names: BTreeMap::new(),
        }
    }

    pub fn with_license_names(mut self, license_names: BTreeMap<String, String>) -> Self {
        self.license_names = license_names;
        self
    }

    pub fn scope(&self) -> &ScopeInfo {
        &self.scope
    }

    pub fn metadata(&self) -> &SbomMetadata {
        &self.metadata
    }

    pub fn graph(&self) -> &PackageGraph {
        &self.graph
    }

    pub fn diagnostics(&self) -> &NormalizationDiagnostics {
        &self.diagnostics
    }

    /// The upstream name of a `LicenseRef-` identifier, when known
    pub fn license_name(&self, license_ref: &str) -> Option<&str> {
        self.license_names.get(license_ref).map(String::as_str)
    }
}
