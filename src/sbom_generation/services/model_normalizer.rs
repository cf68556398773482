use crate::sbom_generation::domain::package::is_unknown;
use crate::sbom_generation::domain::{
    Bom, Checksum, ChecksumAlgorithm, Ecosystem, NormalizationDiagnostics, Package, PackageGraph,
    PackageId, RawInventory, RawRecord, Relationship, RelationshipKind, SbomMetadata,
};
use crate::sbom_generation::policies::{LicenseIdentifierPolicy, SupplierResolution};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::{BTreeMap, HashMap};

/// ModelNormalizer service turning raw inventory records into a Bom
///
/// This service contains pure business logic: no I/O, and bad upstream
/// records are dropped and counted instead of failing the run.
pub struct ModelNormalizer;

impl ModelNormalizer {
    /// Normalizes a raw inventory into the canonical package graph
    ///
    /// # Errors
    /// Returns `SbomError::MalformedRecord` only when the inventory contained
    /// records and none of them could be turned into a package.
    pub fn normalize(raw: RawInventory, metadata: SbomMetadata) -> Result<Bom> {
        let mut diagnostics = NormalizationDiagnostics::default();
        let suppliers = SupplierResolution::new(&raw.due_diligence);
        let mut graph = PackageGraph::new();
        let mut ids_by_key: HashMap<&str, PackageId> = HashMap::new();
        let mut license_names = BTreeMap::new();

        for record in &raw.records {
            match Self::build_package(record, &suppliers, &mut license_names) {
                Ok(package) => {
                    let id = package.id().clone();
                    if graph.upsert_package(package) {
                        diagnostics.duplicates_merged += 1;
                        tracing::debug!(package = %id, "merged duplicate inventory record");
                    }
                    if !record.key.is_empty() {
                        ids_by_key.insert(record.key.as_str(), id);
                    }
                }
                Err(e) => {
                    diagnostics.malformed_records += 1;
                    tracing::warn!(record = %record.key, error = %e, "dropping malformed inventory record");
                }
            }
        }

        if !raw.records.is_empty() && graph.is_empty() {
            return Err(SbomError::MalformedRecord {
                details: format!(
                    "none of the {} inventory record(s) of scope {} could be normalized",
                    raw.records.len(),
                    raw.scope.scope()
                ),
            }
            .into());
        }

        for raw_relationship in &raw.relationships {
            let kind = match raw_relationship.kind.parse::<RelationshipKind>() {
                Ok(kind) => kind,
                Err(e) => {
                    diagnostics.malformed_relationships += 1;
                    tracing::warn!(error = %e, "dropping relationship with unknown kind");
                    continue;
                }
            };

            let (Some(from), Some(to)) = (
                ids_by_key.get(raw_relationship.from_key.as_str()),
                ids_by_key.get(raw_relationship.to_key.as_str()),
            ) else {
                diagnostics.dangling_relationships += 1;
                tracing::warn!(
                    from = %raw_relationship.from_key,
                    to = %raw_relationship.to_key,
                    "dropping relationship referencing an unknown record"
                );
                continue;
            };

            // Two records that deduplicated into one package
            if from == to {
                diagnostics.self_loops += 1;
                tracing::debug!(package = %from, "dropping self-referencing relationship");
                continue;
            }

            graph.add_relationship(Relationship::new(from.clone(), kind, to.clone())?)?;
        }

        if !diagnostics.is_clean() {
            tracing::info!(
                malformed_records = diagnostics.malformed_records,
                malformed_relationships = diagnostics.malformed_relationships,
                dangling_relationships = diagnostics.dangling_relationships,
                self_loops = diagnostics.self_loops,
                "normalization dropped inventory data"
            );
        }

        Ok(Bom::new(raw.scope, metadata, graph, diagnostics).with_license_names(license_names))
    }

    /// Builds one package from a raw record
    ///
    /// The first upstream name seen for each `LicenseRef-` identifier is
    /// recorded in `license_names`.
    fn build_package(
        record: &RawRecord,
        suppliers: &SupplierResolution,
        license_names: &mut BTreeMap<String, String>,
    ) -> Result<Package> {
        let ecosystem = Ecosystem::from_library_type(record.library_type.as_deref().unwrap_or(""));
        let name = Self::package_name(record, &ecosystem)
            .ok_or_else(|| anyhow::anyhow!("record {} has no package name", record.key))?;
        let version = non_empty(record.version.as_deref())
            .ok_or_else(|| anyhow::anyhow!("record {} ({}) has no version", record.key, name))?;

        let mut package = Package::new(PackageId::parse(ecosystem, &name, version)?);

        for license in &record.licenses {
            if let Some(identifier) = LicenseIdentifierPolicy::select_identifier(license) {
                if let Some(name) = LicenseIdentifierPolicy::extracted_name(license, &identifier) {
                    license_names.entry(identifier.clone()).or_insert(name);
                }
                package = package.with_license(identifier);
            }
        }

        if let Some(sha1) = non_empty(record.sha1.as_deref()) {
            match Checksum::new(ChecksumAlgorithm::Sha1, sha1) {
                Ok(checksum) => package = package.with_checksum(checksum),
                Err(e) => tracing::warn!(package = %name, error = %e, "ignoring invalid checksum"),
            }
        }

        if let Some(url) = non_empty(record.url.as_deref()) {
            package = package.with_download_location(url);
        }

        if let Some(supplier) = suppliers.resolve(record) {
            package = package.with_supplier(supplier);
        }

        let copyrights: Vec<&str> = record
            .copyright_references
            .iter()
            .filter_map(|c| non_empty(c.copyright.as_deref()))
            .filter(|c| !is_unknown(c))
            .collect();
        if !copyrights.is_empty() {
            package = package.with_copyright(copyrights.join("\n"));
        }

        if let Some(file_name) = non_empty(record.filename.as_deref()) {
            package = package.with_file_name(file_name);
        }

        Ok(package)
    }

    /// Maven artifacts are identified by `groupId:artifactId` when both
    /// coordinates are known
    fn package_name(record: &RawRecord, ecosystem: &Ecosystem) -> Option<String> {
        let group = non_empty(record.group_id.as_deref());
        let artifact = non_empty(record.artifact_id.as_deref());

        match (ecosystem, group, artifact) {
            (Ecosystem::Maven, Some(group), Some(artifact)) => {
                Some(format!("{}:{}", group, artifact))
            }
            _ => non_empty(record.name.as_deref())
                .or(artifact)
                .map(str::to_string),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
