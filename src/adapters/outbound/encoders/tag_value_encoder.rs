use super::spdx_fields::{
    copyright_field, download_location_field, extracted_licenses, package_spdx_id, supplier_field,
    DecodedPackage, GraphBuilder, DESCRIBES, DOCUMENT_ID, PACKAGE_MANAGER, PURL,
};
use crate::ports::outbound::{BomDecoder, BomEncoder};
use crate::sbom_generation::domain::{Bom, Package, PackageGraph, DATA_LICENSE, SPDX_VERSION};
use crate::sbom_generation::policies::LicenseIdentifierPolicy;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fmt::Write;

const TEXT_OPEN: &str = "<text>";
const TEXT_CLOSE: &str = "</text>";

/// Wraps values spanning several lines in `<text>` markers
fn text_value(value: &str) -> String {
    if value.contains('\n') {
        format!("{}{}{}", TEXT_OPEN, value, TEXT_CLOSE)
    } else {
        value.to_string()
    }
}

/// TagValueEncoder adapter producing SPDX tag-value documents
pub struct TagValueEncoder;

impl TagValueEncoder {
    pub fn new() -> Self {
        Self
    }

    fn write_document(out: &mut String, bom: &Bom) -> std::fmt::Result {
        let metadata = bom.metadata();
        writeln!(out, "SPDXVersion: {}", SPDX_VERSION)?;
        writeln!(out, "DataLicense: {}", DATA_LICENSE)?;
        writeln!(out, "SPDXID: {}", DOCUMENT_ID)?;
        writeln!(out, "DocumentName: {}", text_value(metadata.document_name()))?;
        writeln!(out, "DocumentNamespace: {}", metadata.namespace())?;
        writeln!(out)?;
        writeln!(out, "## Creation Information")?;
        for creator in metadata.creators() {
            writeln!(out, "Creator: {}", text_value(&creator))?;
        }
        writeln!(out, "Created: {}", metadata.timestamp())?;

        for package in bom.graph().packages() {
            writeln!(out)?;
            Self::write_package(out, package)?;
        }

        let extracted = extracted_licenses(bom);
        if !extracted.is_empty() {
            writeln!(out)?;
            writeln!(out, "## Other Licensing Information")?;
            for license in &extracted {
                writeln!(out, "LicenseID: {}", license.license_id)?;
                writeln!(
                    out,
                    "ExtractedText: {}{}{}",
                    TEXT_OPEN, license.extracted_text, TEXT_CLOSE
                )?;
                writeln!(out, "LicenseName: {}", text_value(&license.name))?;
            }
        }

        writeln!(out)?;
        writeln!(out, "## Relationships")?;
        for package in bom.graph().packages() {
            writeln!(
                out,
                "Relationship: {} {} {}",
                DOCUMENT_ID,
                DESCRIBES,
                package_spdx_id(package.id())
            )?;
        }
        for relationship in bom.graph().relationships() {
            writeln!(
                out,
                "Relationship: {} {} {}",
                package_spdx_id(relationship.from()),
                relationship.kind(),
                package_spdx_id(relationship.to())
            )?;
        }
        Ok(())
    }

    fn write_package(out: &mut String, package: &Package) -> std::fmt::Result {
        let license_expression = LicenseIdentifierPolicy::expression(package.licenses());

        writeln!(out, "## Package: {}", package.name())?;
        writeln!(out, "PackageName: {}", package.name())?;
        writeln!(out, "SPDXID: {}", package_spdx_id(package.id()))?;
        writeln!(out, "PackageVersion: {}", package.version())?;
        if let Some(file_name) = package.file_name() {
            writeln!(out, "PackageFileName: {}", text_value(file_name))?;
        }
        writeln!(out, "PackageSupplier: {}", text_value(&supplier_field(package)))?;
        writeln!(
            out,
            "PackageDownloadLocation: {}",
            text_value(&download_location_field(package))
        )?;
        writeln!(out, "FilesAnalyzed: false")?;
        if let Some(checksum) = package.checksum() {
            writeln!(
                out,
                "PackageChecksum: {}: {}",
                checksum.algorithm().spdx_name(),
                checksum.value()
            )?;
        }
        writeln!(out, "PackageLicenseConcluded: {}", license_expression)?;
        writeln!(out, "PackageLicenseDeclared: {}", license_expression)?;
        for license in package.licenses() {
            writeln!(out, "PackageLicenseInfoFromFiles: {}", license)?;
        }
        writeln!(out, "PackageCopyrightText: {}", text_value(&copyright_field(package)))?;
        writeln!(
            out,
            "ExternalRef: {} {} {}",
            PACKAGE_MANAGER,
            PURL,
            package.id().purl()
        )
    }
}

impl Default for TagValueEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BomEncoder for TagValueEncoder {
    fn encode(&self, bom: &Bom) -> Result<Vec<u8>> {
        let mut out = String::new();
        Self::write_document(&mut out, bom).map_err(|e| SbomError::Internal {
            details: format!("Failed to render SPDX tag-value: {}", e),
        })?;
        Ok(out.into_bytes())
    }
}

/// TagValueDecoder adapter reading SPDX tag-value documents back into a package graph
pub struct TagValueDecoder;

impl TagValueDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Splits a document into `(tag, value)` pairs, joining `<text>` blocks
    fn parse_pairs(text: &str) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        let mut lines = text.lines().enumerate();

        while let Some((index, line)) = lines.next() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (tag, rest) = trimmed.split_once(':').ok_or_else(|| SbomError::MalformedRecord {
                details: format!("line {}: expected 'Tag: value'", index + 1),
            })?;
            let rest = rest.trim_start();

            let value = match rest.strip_prefix(TEXT_OPEN) {
                Some(opened) => {
                    let mut value = opened.to_string();
                    while !value.contains(TEXT_CLOSE) {
                        let (_, next) = lines.next().ok_or_else(|| SbomError::MalformedRecord {
                            details: format!("line {}: unterminated <text> block", index + 1),
                        })?;
                        value.push('\n');
                        value.push_str(next);
                    }
                    value
                        .split_once(TEXT_CLOSE)
                        .map(|(inner, _)| inner.to_string())
                        .unwrap_or(value)
                }
                None => rest.trim_end().to_string(),
            };
            pairs.push((tag.trim().to_string(), value));
        }
        Ok(pairs)
    }
}

impl Default for TagValueDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BomDecoder for TagValueDecoder {
    fn decode(&self, content: &[u8]) -> Result<PackageGraph> {
        let text = std::str::from_utf8(content).map_err(|e| SbomError::MalformedRecord {
            details: format!("tag-value document is not UTF-8: {}", e),
        })?;

        let mut packages: Vec<DecodedPackage> = Vec::new();
        let mut relationships: Vec<(String, String, String)> = Vec::new();

        for (tag, value) in Self::parse_pairs(text)? {
            if tag == "PackageName" {
                packages.push(DecodedPackage {
                    name: value,
                    ..DecodedPackage::default()
                });
                continue;
            }
            if tag == "Relationship" {
                let parts: Vec<&str> = value.split_whitespace().collect();
                if let [from, kind, to] = parts.as_slice() {
                    relationships.push((from.to_string(), kind.to_string(), to.to_string()));
                    continue;
                }
                return Err(SbomError::MalformedRecord {
                    details: format!("invalid relationship: {}", value),
                }
                .into());
            }

            // Remaining tags describe the current package, if any. License
            // blocks follow the packages and carry no package fields.
            let Some(current) = packages.last_mut() else {
                continue;
            };
            match tag.as_str() {
                "SPDXID" => current.spdx_id = value,
                "PackageVersion" => current.version = Some(value),
                "PackageFileName" => current.file_name = Some(value),
                "PackageSupplier" => current.supplier = Some(value),
                "PackageDownloadLocation" => current.download_location = Some(value),
                "PackageCopyrightText" => current.copyright = Some(value),
                "PackageLicenseInfoFromFiles" => current.licenses.push(value),
                "PackageChecksum" => {
                    if let Some((algorithm, digest)) = value.split_once(':') {
                        current
                            .checksums
                            .push((algorithm.trim().to_string(), digest.trim().to_string()));
                    }
                }
                "ExternalRef" => {
                    let parts: Vec<&str> = value.split_whitespace().collect();
                    if let [_, reference_type, locator] = parts.as_slice() {
                        if *reference_type == PURL {
                            current.purl = Some(locator.to_string());
                        }
                    }
                }
                _ => {}
            }
        }

        let mut builder = GraphBuilder::default();
        for package in packages {
            builder.add_package(package)?;
        }
        for (from, kind, to) in &relationships {
            builder.add_relationship(from, kind, to)?;
        }
        Ok(builder.finish())
    }
}
