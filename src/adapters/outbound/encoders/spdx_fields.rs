//! Field conventions shared by every SPDX serialization.
//!
//! Encoders and decoders both go through these helpers so that a document
//! written in one format decodes to exactly the graph it was built from.

use crate::sbom_generation::domain::{
    Bom, Checksum, ChecksumAlgorithm, Ecosystem, Package, PackageGraph, PackageId, Relationship,
    RelationshipKind,
};
use crate::sbom_generation::policies::{LicenseExpression, LICENSE_REF_PREFIX, NOASSERTION};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

pub(crate) const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";
pub(crate) const NONE: &str = "NONE";
pub(crate) const DESCRIBES: &str = "DESCRIBES";
pub(crate) const PACKAGE_MANAGER: &str = "PACKAGE-MANAGER";
pub(crate) const PURL: &str = "purl";

const ORGANIZATION_PREFIX: &str = "Organization: ";
const PERSON_PREFIX: &str = "Person: ";

/// Deterministic SPDX element id for a package.
///
/// The readable part is restricted to `[A-Za-z0-9.-]`; the hash suffix keeps
/// ids distinct when two names only differ in replaced characters.
pub(crate) fn package_spdx_id(id: &PackageId) -> String {
    let readable: String = format!("{}-{}-{}", id.ecosystem(), id.name(), id.version())
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let digest = Uuid::new_v5(&Uuid::NAMESPACE_URL, id.purl().as_bytes()).simple().to_string();
    format!("SPDXRef-Package-{}-{}", readable, &digest[..8])
}

/// Suppliers are organizations unless already recorded as a person
pub(crate) fn supplier_field(package: &Package) -> String {
    match package.supplier() {
        Some(person) if person.starts_with(PERSON_PREFIX) => person.to_string(),
        Some(organization) => format!("{}{}", ORGANIZATION_PREFIX, organization),
        None => NOASSERTION.to_string(),
    }
}

/// Inverse of [`supplier_field`]: the organization prefix is dropped, a
/// person keeps theirs
pub(crate) fn parse_supplier(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == NOASSERTION {
        return None;
    }
    Some(
        value
            .strip_prefix(ORGANIZATION_PREFIX)
            .unwrap_or(value)
            .to_string(),
    )
}

/// A `LicenseRef-` license declared by the document itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractedLicense {
    pub license_id: String,
    pub name: String,
    pub extracted_text: String,
}

/// Identifiers a package license entry stands for.
///
/// Entries that do not parse as an expression are split on whitespace and
/// parentheses so that embedded `LicenseRef-` ids are still found.
pub(crate) fn license_ids(license: &str) -> BTreeSet<String> {
    match LicenseExpression::parse(license) {
        Some(expression) => expression.license_ids(),
        None => license
            .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .filter(|token| {
                !token.is_empty() && !["AND", "OR", "WITH"].contains(&token.to_uppercase().as_str())
            })
            .map(str::to_string)
            .collect(),
    }
}

/// One entry per `LicenseRef-` id used by any package, in id order.
///
/// The text is the upstream license name the id was derived from, or the
/// id's own suffix when that name is unknown.
pub(crate) fn extracted_licenses(bom: &Bom) -> Vec<ExtractedLicense> {
    let ids: BTreeSet<String> = bom
        .graph()
        .packages()
        .flat_map(|package| package.licenses().iter())
        .flat_map(|license| license_ids(license))
        .filter(|id| id.starts_with(LICENSE_REF_PREFIX))
        .collect();

    ids.into_iter()
        .map(|license_id| {
            let name = bom
                .license_name(&license_id)
                .map(str::to_string)
                .unwrap_or_else(|| license_id[LICENSE_REF_PREFIX.len()..].to_string());
            ExtractedLicense {
                license_id,
                extracted_text: name.clone(),
                name,
            }
        })
        .collect()
}

pub(crate) fn copyright_field(package: &Package) -> String {
    package.copyright().unwrap_or(NONE).to_string()
}

pub(crate) fn download_location_field(package: &Package) -> String {
    package.download_location().unwrap_or(NOASSERTION).to_string()
}

/// `None` for the SPDX "unknown" placeholders
pub(crate) fn parse_optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == NONE || value == NOASSERTION {
        None
    } else {
        Some(value.to_string())
    }
}

fn malformed(details: String) -> SbomError {
    SbomError::MalformedRecord { details }
}

/// Package fields as read back from a document, before validation
#[derive(Debug, Default)]
pub(crate) struct DecodedPackage {
    pub spdx_id: String,
    pub name: String,
    pub version: Option<String>,
    pub purl: Option<String>,
    pub file_name: Option<String>,
    pub supplier: Option<String>,
    pub download_location: Option<String>,
    pub copyright: Option<String>,
    pub checksums: Vec<(String, String)>,
    pub licenses: Vec<String>,
}

impl DecodedPackage {
    fn into_package(self) -> Result<(String, Package)> {
        let ecosystem = self
            .purl
            .as_deref()
            .and_then(Ecosystem::from_purl)
            .unwrap_or_else(|| Ecosystem::Generic("generic".to_string()));
        let version = self
            .version
            .ok_or_else(|| malformed(format!("package {} has no version", self.spdx_id)))?;
        let id = PackageId::parse(ecosystem, &self.name, &version)
            .map_err(|e| malformed(format!("package {}: {}", self.spdx_id, e)))?;

        let mut package = Package::new(id);
        for license in self.licenses {
            if parse_optional(&license).is_some() {
                package = package.with_license(license.trim());
            }
        }
        for (algorithm, value) in &self.checksums {
            if let Some(algorithm) = ChecksumAlgorithm::from_spdx_name(algorithm) {
                let checksum = Checksum::new(algorithm, value)
                    .map_err(|e| malformed(format!("package {}: {}", self.spdx_id, e)))?;
                package = package.with_checksum(checksum);
            }
        }
        if let Some(url) = self.download_location.as_deref().and_then(parse_optional) {
            package = package.with_download_location(url);
        }
        if let Some(supplier) = self.supplier.as_deref().and_then(parse_supplier) {
            package = package.with_supplier(supplier);
        }
        if let Some(copyright) = self.copyright.as_deref().and_then(parse_optional) {
            package = package.with_copyright(copyright);
        }
        if let Some(file_name) = self.file_name.as_deref().and_then(parse_optional) {
            package = package.with_file_name(file_name);
        }
        Ok((self.spdx_id, package))
    }
}

/// Collects decoded packages and relationships into a [`PackageGraph`]
#[derive(Default)]
pub(crate) struct GraphBuilder {
    graph: PackageGraph,
    ids: HashMap<String, PackageId>,
}

impl GraphBuilder {
    pub fn add_package(&mut self, decoded: DecodedPackage) -> Result<()> {
        let (spdx_id, package) = decoded.into_package()?;
        self.ids.insert(spdx_id, package.id().clone());
        self.graph.upsert_package(package);
        Ok(())
    }

    /// Adds one relationship; edges touching the document element are skipped
    pub fn add_relationship(&mut self, from: &str, kind: &str, to: &str) -> Result<()> {
        if from == DOCUMENT_ID || to == DOCUMENT_ID {
            return Ok(());
        }
        let kind: RelationshipKind = kind.parse().map_err(malformed)?;
        let lookup = |spdx_id: &str| {
            self.ids
                .get(spdx_id)
                .cloned()
                .ok_or_else(|| malformed(format!("relationship references unknown element {}", spdx_id)))
        };
        let relationship = Relationship::new(lookup(from)?, kind, lookup(to)?)?;
        self.graph.add_relationship(relationship)
    }

    pub fn finish(self) -> PackageGraph {
        self.graph
    }
}
