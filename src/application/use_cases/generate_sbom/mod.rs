use crate::application::dto::{GeneratedDocument, OutputFormat, SbomRequest, SbomResponse};
use crate::application::factories::EncoderFactory;
use crate::application::pipeline::{PipelineError, PipelineStage};
use crate::ports::outbound::{InventoryRepository, OutputWriter, ProgressReporter};
use crate::sbom_generation::domain::{Bom, NormalizationDiagnostics, RawInventory, Scope};
use crate::sbom_generation::services::{
    DependencyAnalyzer, DependencyReport, ModelNormalizer, SbomGenerator,
};
use crate::shared::error::SbomError;
use crate::shared::security::sanitize_filename;
use crate::shared::Result;
use anyhow::Context;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, BTreeSet};

/// Maximum number of inventory requests in flight at once
const MAX_CONCURRENT_FETCHES: usize = 4;

/// GenerateSbomUseCase - Core use case for SBOM generation
///
/// This use case orchestrates one run of the generator using generic
/// dependency injection for all infrastructure dependencies:
/// fetch every scope, normalize, encode, then write.
///
/// All fetching and encoding completes before the first file is written, so
/// a failure in any scope leaves the output directory untouched.
///
/// # Type Parameters
/// * `IR` - InventoryRepository implementation
/// * `OW` - OutputWriter implementation
/// * `PR` - ProgressReporter implementation
pub struct GenerateSbomUseCase<IR, OW, PR> {
    inventory_repository: IR,
    output_writer: OW,
    progress_reporter: PR,
}

impl<IR, OW, PR> GenerateSbomUseCase<IR, OW, PR>
where
    IR: InventoryRepository,
    OW: OutputWriter,
    PR: ProgressReporter,
{
    /// Creates a new GenerateSbomUseCase with injected dependencies
    pub fn new(inventory_repository: IR, output_writer: OW, progress_reporter: PR) -> Self {
        Self {
            inventory_repository,
            output_writer,
            progress_reporter,
        }
    }

    /// Executes the SBOM generation use case
    ///
    /// # Arguments
    /// * `request` - Scopes, output format and document settings
    ///
    /// # Returns
    /// SbomResponse describing every written document
    ///
    /// # Errors
    /// Returns a [`PipelineError`] naming the stage that failed
    pub async fn execute(&self, request: SbomRequest) -> std::result::Result<SbomResponse, PipelineError> {
        let mut stage = PipelineStage::Init;
        tracing::debug!(%stage, format = %request.format, "Starting SBOM generation");

        stage = stage.next();
        let scopes = self
            .resolve_scopes(&request)
            .await
            .map_err(|e| PipelineError::new(stage, e))?;
        Self::check_output_names(&scopes, &request)
            .map_err(|e| PipelineError::new(PipelineStage::Init, e))?;
        let inventories = self
            .fetch_inventories(&scopes)
            .await
            .map_err(|e| PipelineError::new(stage, e))?;

        stage = stage.next();
        tracing::debug!(%stage, scopes = inventories.len(), "Normalizing inventories");
        let normalized = inventories
            .into_iter()
            .map(|inventory| self.normalize(inventory, &request))
            .collect::<Result<Vec<(Bom, DependencyReport)>>>()
            .map_err(|e| PipelineError::new(stage, e))?;

        stage = stage.next();
        let formats = request.format.formats();
        for format in &formats {
            self.progress_reporter
                .report(EncoderFactory::progress_message(*format));
        }
        let encoded = normalized
            .iter()
            .map(|(bom, _)| Self::encode_all(bom, &formats))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| PipelineError::new(stage, e))?;

        stage = stage.next();
        let mut documents = Vec::with_capacity(normalized.len() * formats.len());
        for ((bom, dependency_report), files) in normalized.into_iter().zip(encoded) {
            for (format, content) in files {
                let file_name = Self::output_file_name(bom.scope().scope(), format);
                let path = self
                    .output_writer
                    .write_output(&file_name, &content)
                    .map_err(|e| PipelineError::new(stage, e))?;
                self.progress_reporter
                    .report(&format!("✅ Output complete: {}", path.display()));

                documents.push(GeneratedDocument {
                    scope: bom.scope().clone(),
                    format,
                    path,
                    package_count: bom.graph().package_count(),
                    relationship_count: bom.graph().relationship_count(),
                    diagnostics: bom.diagnostics().clone(),
                    dependency_report: dependency_report.clone(),
                });
            }
        }

        stage = stage.next();
        tracing::debug!(%stage, documents = documents.len(), "SBOM generation finished");
        self.progress_reporter.report_completion(&format!(
            "Success: generated {} SBOM document(s)",
            documents.len()
        ));
        Ok(SbomResponse::new(documents))
    }

    /// Explicit scopes plus, when requested, every project of the organization.
    /// Duplicates are removed and the result is sorted by token.
    async fn resolve_scopes(&self, request: &SbomRequest) -> Result<Vec<Scope>> {
        let mut scopes: BTreeSet<Scope> = request.scopes.iter().cloned().collect();

        if request.all_projects {
            self.progress_reporter
                .report("🔍 Listing organization projects...");
            let projects = self.inventory_repository.list_projects().await?;
            self.progress_reporter
                .report(&format!("✅ Found {} project(s)", projects.len()));
            scopes.extend(projects);
        }

        if scopes.is_empty() {
            let err = if request.all_projects {
                SbomError::ScopeNotFound {
                    scope: "<organization>".to_string(),
                    details: "the organization has no projects".to_string(),
                }
            } else {
                SbomError::Usage {
                    message: "At least one scope (-s) is required".to_string(),
                }
            };
            return Err(err.into());
        }
        Ok(scopes.into_iter().collect())
    }

    /// No two documents of a run may share a file name
    fn check_output_names(scopes: &[Scope], request: &SbomRequest) -> Result<()> {
        let mut seen: BTreeMap<String, &Scope> = BTreeMap::new();
        for scope in scopes {
            for format in request.format.formats() {
                let file_name = Self::output_file_name(scope, format);
                if let Some(previous) = seen.insert(file_name.clone(), scope) {
                    return Err(SbomError::Usage {
                        message: format!(
                            "Scopes '{}' and '{}' would both be written to {}",
                            previous, scope, file_name
                        ),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn output_file_name(scope: &Scope, format: OutputFormat) -> String {
        let stem = sanitize_filename(scope.token());
        match format.extension() {
            Some(extension) => format!("{}.{}", stem, extension),
            None => stem,
        }
    }

    /// Encodes one Bom in every requested format, in format order
    fn encode_all(bom: &Bom, formats: &[OutputFormat]) -> Result<Vec<(OutputFormat, Vec<u8>)>> {
        formats
            .iter()
            .map(|format| {
                EncoderFactory::encode(*format, bom)
                    .map(|content| (*format, content))
                    .with_context(|| {
                        format!("Failed to encode scope {} as {}", bom.scope().scope(), format)
                    })
            })
            .collect()
    }

    /// Fetches every scope concurrently; the first failure aborts the rest.
    ///
    /// Inventories are returned in scope order regardless of completion order.
    async fn fetch_inventories(&self, scopes: &[Scope]) -> Result<Vec<RawInventory>> {
        let total = scopes.len();
        self.progress_reporter.report(&format!(
            "🔍 Fetching inventory for {} scope(s)...",
            total
        ));

        let mut fetches = stream::iter(scopes.iter().cloned())
            .map(|scope| async move {
                let result = self.inventory_repository.fetch_inventory(&scope).await;
                (scope, result)
            })
            .buffer_unordered(MAX_CONCURRENT_FETCHES);

        let mut inventories = BTreeMap::new();
        while let Some((scope, result)) = fetches.next().await {
            let inventory =
                result.with_context(|| format!("Failed to fetch inventory for scope {}", scope))?;
            inventories.insert(scope.clone(), inventory);
            self.progress_reporter.report_progress(
                inventories.len(),
                total,
                Some(&format!("Fetched {}", scope)),
            );
        }

        Ok(inventories.into_values().collect())
    }

    fn normalize(
        &self,
        inventory: RawInventory,
        request: &SbomRequest,
    ) -> Result<(Bom, DependencyReport)> {
        let scope = inventory.scope.scope().clone();
        let created = SbomGenerator::resolve_created(
            inventory.last_updated.as_deref(),
            request.source_date_epoch.as_deref(),
            Utc::now(),
        );
        let metadata =
            SbomGenerator::generate_default_metadata(&inventory.scope, created, &request.settings);

        let bom = ModelNormalizer::normalize(inventory, metadata)
            .with_context(|| format!("Failed to normalize inventory for scope {}", scope))?;

        self.report_diagnostics(&scope, bom.diagnostics());
        let report = DependencyAnalyzer::analyze(bom.graph());
        self.report_dependencies(&bom, &report);
        Ok((bom, report))
    }

    fn report_diagnostics(&self, scope: &Scope, diagnostics: &NormalizationDiagnostics) {
        if diagnostics.is_clean() {
            return;
        }
        self.progress_reporter.report_warning(&format!(
            "Scope '{}': dropped {} malformed record(s), {} relationship(s) with unknown kind, \
             {} dangling relationship(s) and {} self-loop(s)",
            scope,
            diagnostics.malformed_records,
            diagnostics.malformed_relationships,
            diagnostics.dangling_relationships,
            diagnostics.self_loops
        ));
    }

    fn report_dependencies(&self, bom: &Bom, report: &DependencyReport) {
        self.progress_reporter.report(&format!(
            "📊 {}: {} package(s) with {} root(s), {} direct and {} transitive dependencies",
            bom.scope().name(),
            bom.graph().package_count(),
            report.roots().len(),
            report.direct_dependency_count(),
            report.transitive_dependency_count()
        ));
        for cycle in report.cycles() {
            let members: Vec<String> = cycle.iter().map(ToString::to_string).collect();
            self.progress_reporter
                .report_warning(&format!("Dependency cycle: {}", members.join(" -> ")));
        }
    }
}
