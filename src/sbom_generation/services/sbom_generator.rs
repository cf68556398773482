use crate::sbom_generation::domain::{Creator, SbomMetadata, ScopeInfo};
use crate::shared::security::sanitize_filename;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Default base URI for generated document namespaces
pub const DEFAULT_NAMESPACE_BASE: &str = "https://spdx.org/spdxdocs";

/// Document-level settings taken from the extra configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSettings {
    pub namespace_base: String,
    pub organization: Option<Creator>,
    pub person: Option<Creator>,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            namespace_base: DEFAULT_NAMESPACE_BASE.to_string(),
            organization: None,
            person: None,
        }
    }
}

/// SbomGenerator service for generating SBOM metadata
///
/// Metadata is a pure function of its inputs: the same scope and creation
/// time always produce the same namespace, so re-runs are byte-identical.
pub struct SbomGenerator;

impl SbomGenerator {
    /// Generates document metadata for a scope
    ///
    /// # Arguments
    /// * `scope` - The scope the document describes
    /// * `created` - Creation time written into the document
    /// * `settings` - Namespace base and creator information
    /// * `tool_name` / `tool_version` - The generating tool
    pub fn generate_metadata(
        scope: &ScopeInfo,
        created: DateTime<Utc>,
        settings: &MetadataSettings,
        tool_name: &str,
        tool_version: &str,
    ) -> SbomMetadata {
        let timestamp = created.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let document_name = format!("{} SBOM report", scope.name());
        let seed = format!("{}#{}", scope.scope().token(), timestamp);
        let uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, seed.as_bytes());
        let namespace = format!(
            "{}/{}-{}",
            settings.namespace_base.trim_end_matches('/'),
            sanitize_filename(scope.name()).replace(' ', "-"),
            uuid
        );

        let mut metadata = SbomMetadata::new(
            document_name,
            namespace,
            timestamp,
            tool_name.to_string(),
            tool_version.to_string(),
        );
        if let Some(organization) = &settings.organization {
            metadata = metadata.with_organization(organization.clone());
        }
        if let Some(person) = &settings.person {
            metadata = metadata.with_person(person.clone());
        }
        metadata
    }

    /// Generates metadata with this crate's tool name and compile-time version
    pub fn generate_default_metadata(
        scope: &ScopeInfo,
        created: DateTime<Utc>,
        settings: &MetadataSettings,
    ) -> SbomMetadata {
        Self::generate_metadata(
            scope,
            created,
            settings,
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        )
    }

    /// Picks the document creation time.
    ///
    /// Priority order: the upstream inventory's last change, then
    /// `SOURCE_DATE_EPOCH` (seconds), then `now`. Unparsable values are skipped.
    pub fn resolve_created(
        last_updated: Option<&str>,
        source_date_epoch: Option<&str>,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        last_updated
            .and_then(|value| DateTime::parse_from_rfc3339(value.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                source_date_epoch
                    .and_then(|value| value.trim().parse::<i64>().ok())
                    .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            })
            .unwrap_or(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{Scope, ScopeKind};

    fn scope() -> ScopeInfo {
        ScopeInfo::new(
            Scope::new("demo-go").unwrap(),
            Some("Demo Go".to_string()),
            ScopeKind::Project,
        )
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_generate_metadata() {
        let metadata = SbomGenerator::generate_metadata(
            &scope(),
            created(),
            &MetadataSettings::default(),
            "test-tool",
            "1.0.0",
        );

        assert_eq!(metadata.tool_name(), "test-tool");
        assert_eq!(metadata.tool_version(), "1.0.0");
        assert_eq!(metadata.timestamp(), "2024-01-02T03:04:05Z");
        assert_eq!(metadata.document_name(), "Demo Go SBOM report");
        assert!(metadata
            .namespace()
            .starts_with("https://spdx.org/spdxdocs/Demo-Go-"));
    }

    #[test]
    fn test_generate_metadata_is_deterministic() {
        let settings = MetadataSettings::default();
        let first = SbomGenerator::generate_default_metadata(&scope(), created(), &settings);
        let second = SbomGenerator::generate_default_metadata(&scope(), created(), &settings);
        assert_eq!(first, second);
    }

    #[test]
    fn test_namespace_changes_with_creation_time() {
        let settings = MetadataSettings::default();
        let first = SbomGenerator::generate_default_metadata(&scope(), created(), &settings);
        let later = SbomGenerator::generate_default_metadata(
            &scope(),
            created() + chrono::Duration::seconds(1),
            &settings,
        );
        assert_ne!(first.namespace(), later.namespace());
    }

    #[test]
    fn test_generate_default_metadata_uses_crate_info() {
        let metadata =
            SbomGenerator::generate_default_metadata(&scope(), created(), &MetadataSettings::default());
        assert_eq!(metadata.tool_name(), "sbom-generator");
        assert_eq!(metadata.tool_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_settings_creators_are_applied() {
        let settings = MetadataSettings {
            namespace_base: "https://sbom.acme.io/".to_string(),
            organization: Some(Creator::new("Acme", None)),
            person: Some(Creator::new("Jane", Some("jane@acme.io".to_string()))),
        };
        let metadata = SbomGenerator::generate_default_metadata(&scope(), created(), &settings);
        assert!(metadata.namespace().starts_with("https://sbom.acme.io/Demo-Go-"));
        assert_eq!(metadata.organization().unwrap().name(), "Acme");
        assert_eq!(metadata.person().unwrap().email(), Some("jane@acme.io"));
    }

    #[test]
    fn test_resolve_created_priority() {
        let now = created();
        let upstream = SbomGenerator::resolve_created(
            Some("2023-05-06T07:08:09+02:00"),
            Some("0"),
            now,
        );
        assert_eq!(upstream, Utc.with_ymd_and_hms(2023, 5, 6, 5, 8, 9).unwrap());

        let epoch = SbomGenerator::resolve_created(None, Some("86400"), now);
        assert_eq!(epoch, Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap());

        let fallback = SbomGenerator::resolve_created(Some("yesterday"), Some("soon"), now);
        assert_eq!(fallback, now);
    }
}
