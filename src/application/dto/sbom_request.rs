use super::OutputFormat;
use crate::sbom_generation::domain::Scope;
use crate::sbom_generation::services::MetadataSettings;

/// SbomRequest - Internal request DTO for the SBOM generation use case
#[derive(Debug, Clone)]
pub struct SbomRequest {
    /// Scopes to generate documents for
    pub scopes: Vec<Scope>,
    /// Also generate a document for every project of the organization
    pub all_projects: bool,
    pub format: OutputFormat,
    /// Namespace and creator settings written into every document
    pub settings: MetadataSettings,
    /// Raw `SOURCE_DATE_EPOCH` value, used when the inventory has no timestamp
    pub source_date_epoch: Option<String>,
}

impl SbomRequest {
    pub fn new(scopes: Vec<Scope>, format: OutputFormat) -> Self {
        Self {
            scopes,
            all_projects: false,
            format,
            settings: MetadataSettings::default(),
            source_date_epoch: None,
        }
    }

    pub fn with_all_projects(mut self, all_projects: bool) -> Self {
        self.all_projects = all_projects;
        self
    }

    pub fn with_settings(mut self, settings: MetadataSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_source_date_epoch(mut self, source_date_epoch: Option<String>) -> Self {
        self.source_date_epoch = source_date_epoch;
        self
    }
}
