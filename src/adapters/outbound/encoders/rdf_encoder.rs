use super::spdx_fields::{extracted_licenses, package_spdx_id, supplier_field, DOCUMENT_ID};
use crate::ports::outbound::BomEncoder;
use crate::sbom_generation::domain::{Bom, Package, PackageId, Relationship, DATA_LICENSE, SPDX_VERSION};
use crate::sbom_generation::policies::{LicenseExpression, LICENSE_REF_PREFIX, NOASSERTION};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const SPDX_NS: &str = "http://spdx.org/rdf/terms#";
const LICENSE_LIST: &str = "http://spdx.org/licenses/";
const PURL_REFERENCE_TYPE: &str = "http://spdx.org/rdf/references/purl";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

/// Escapes text for use in XML content and attribute values
fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// RdfEncoder adapter producing SPDX RDF/XML documents
///
/// Elements are addressed as `<document namespace>#<SPDX id>`. Relationships
/// are nested under their source element, the document `DESCRIBES` every
/// package.
pub struct RdfEncoder;

impl RdfEncoder {
    pub fn new() -> Self {
        Self
    }

    fn write_document(out: &mut String, bom: &Bom) -> std::fmt::Result {
        let metadata = bom.metadata();
        let namespace = xml_escape(metadata.namespace());
        let element = |spdx_id: &str| format!("{}#{}", namespace, spdx_id);

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(out, "<rdf:RDF")?;
        writeln!(out, r#"    xmlns:rdf="{}""#, RDF_NS)?;
        writeln!(out, r#"    xmlns:rdfs="{}""#, RDFS_NS)?;
        writeln!(out, r#"    xmlns:spdx="{}">"#, SPDX_NS)?;

        writeln!(out, r#"  <spdx:SpdxDocument rdf:about="{}">"#, element(DOCUMENT_ID))?;
        writeln!(out, "    <spdx:specVersion>{}</spdx:specVersion>", SPDX_VERSION)?;
        writeln!(
            out,
            r#"    <spdx:dataLicense rdf:resource="{}{}"/>"#,
            LICENSE_LIST, DATA_LICENSE
        )?;
        writeln!(out, "    <spdx:name>{}</spdx:name>", xml_escape(metadata.document_name()))?;
        writeln!(out, "    <spdx:creationInfo>")?;
        writeln!(out, "      <spdx:CreationInfo>")?;
        writeln!(out, "        <spdx:created>{}</spdx:created>", xml_escape(metadata.timestamp()))?;
        for creator in metadata.creators() {
            writeln!(out, "        <spdx:creator>{}</spdx:creator>", xml_escape(&creator))?;
        }
        writeln!(out, "      </spdx:CreationInfo>")?;
        writeln!(out, "    </spdx:creationInfo>")?;
        for license in extracted_licenses(bom) {
            writeln!(out, "    <spdx:hasExtractedLicensingInfo>")?;
            writeln!(
                out,
                r#"      <spdx:ExtractedLicensingInfo rdf:about="{}">"#,
                Self::license_uri(&license.license_id, &namespace)
            )?;
            writeln!(out, "        <spdx:licenseId>{}</spdx:licenseId>", xml_escape(&license.license_id))?;
            writeln!(
                out,
                "        <spdx:extractedText>{}</spdx:extractedText>",
                xml_escape(&license.extracted_text)
            )?;
            writeln!(out, "        <spdx:name>{}</spdx:name>", xml_escape(&license.name))?;
            writeln!(out, "      </spdx:ExtractedLicensingInfo>")?;
            writeln!(out, "    </spdx:hasExtractedLicensingInfo>")?;
        }
        for package in bom.graph().packages() {
            Self::write_relationship(out, "    ", "describes", &element(&package_spdx_id(package.id())))?;
        }
        writeln!(out, "  </spdx:SpdxDocument>")?;

        let mut outgoing: BTreeMap<&PackageId, Vec<&Relationship>> = BTreeMap::new();
        for relationship in bom.graph().relationships() {
            outgoing.entry(relationship.from()).or_default().push(relationship);
        }

        for package in bom.graph().packages() {
            let relationships = outgoing.get(package.id()).map(Vec::as_slice).unwrap_or(&[]);
            Self::write_package(out, package, relationships, &namespace)?;
        }

        writeln!(out, "</rdf:RDF>")
    }

    fn write_package(
        out: &mut String,
        package: &Package,
        relationships: &[&Relationship],
        namespace: &str,
    ) -> std::fmt::Result {
        let spdx_id = package_spdx_id(package.id());
        writeln!(out, r#"  <spdx:Package rdf:about="{}#{}">"#, namespace, spdx_id)?;
        writeln!(out, "    <spdx:name>{}</spdx:name>", xml_escape(package.name()))?;
        writeln!(out, "    <spdx:versionInfo>{}</spdx:versionInfo>", xml_escape(package.version()))?;
        if let Some(file_name) = package.file_name() {
            writeln!(out, "    <spdx:packageFileName>{}</spdx:packageFileName>", xml_escape(file_name))?;
        }
        writeln!(out, "    <spdx:supplier>{}</spdx:supplier>", xml_escape(&supplier_field(package)))?;
        match package.download_location() {
            Some(url) => writeln!(out, "    <spdx:downloadLocation>{}</spdx:downloadLocation>", xml_escape(url))?,
            None => writeln!(out, r#"    <spdx:downloadLocation rdf:resource="{}noassertion"/>"#, SPDX_NS)?,
        }
        writeln!(
            out,
            r#"    <spdx:filesAnalyzed rdf:datatype="{}">false</spdx:filesAnalyzed>"#,
            XSD_BOOLEAN
        )?;
        if let Some(checksum) = package.checksum() {
            writeln!(out, "    <spdx:checksum>")?;
            writeln!(out, "      <spdx:Checksum>")?;
            writeln!(
                out,
                r#"        <spdx:algorithm rdf:resource="{}checksumAlgorithm_{}"/>"#,
                SPDX_NS,
                checksum.algorithm().spdx_name().to_lowercase()
            )?;
            writeln!(out, "        <spdx:checksumValue>{}</spdx:checksumValue>", checksum.value())?;
            writeln!(out, "      </spdx:Checksum>")?;
            writeln!(out, "    </spdx:checksum>")?;
        }
        Self::write_license_set(out, "licenseConcluded", package.licenses(), namespace)?;
        Self::write_license_set(out, "licenseDeclared", package.licenses(), namespace)?;
        let info_from_files: BTreeSet<String> = package
            .licenses()
            .iter()
            .flat_map(|license| Self::expression(license).license_ids())
            .collect();
        for license in &info_from_files {
            writeln!(
                out,
                r#"    <spdx:licenseInfoFromFiles rdf:resource="{}"/>"#,
                Self::license_uri(license, namespace)
            )?;
        }
        match package.copyright() {
            Some(copyright) => writeln!(out, "    <spdx:copyrightText>{}</spdx:copyrightText>", xml_escape(copyright))?,
            None => writeln!(out, r#"    <spdx:copyrightText rdf:resource="{}none"/>"#, SPDX_NS)?,
        }
        writeln!(out, "    <spdx:externalRef>")?;
        writeln!(out, "      <spdx:ExternalRef>")?;
        writeln!(
            out,
            r#"        <spdx:referenceCategory rdf:resource="{}referenceCategory_packageManager"/>"#,
            SPDX_NS
        )?;
        writeln!(out, r#"        <spdx:referenceType rdf:resource="{}"/>"#, PURL_REFERENCE_TYPE)?;
        writeln!(
            out,
            "        <spdx:referenceLocator>{}</spdx:referenceLocator>",
            xml_escape(&package.id().purl())
        )?;
        writeln!(out, "      </spdx:ExternalRef>")?;
        writeln!(out, "    </spdx:externalRef>")?;
        for relationship in relationships {
            let target = format!("{}#{}", namespace, package_spdx_id(relationship.to()));
            Self::write_relationship(out, "    ", relationship.kind().rdf_term(), &target)?;
        }
        writeln!(out, "  </spdx:Package>")
    }

    fn write_relationship(out: &mut String, indent: &str, term: &str, target: &str) -> std::fmt::Result {
        writeln!(out, "{}<spdx:relationship>", indent)?;
        writeln!(out, "{}  <spdx:Relationship>", indent)?;
        writeln!(
            out,
            r#"{}    <spdx:relationshipType rdf:resource="{}relationshipType_{}"/>"#,
            indent, SPDX_NS, term
        )?;
        writeln!(out, r#"{}    <spdx:relatedSpdxElement rdf:resource="{}"/>"#, indent, target)?;
        writeln!(out, "{}  </spdx:Relationship>", indent)?;
        writeln!(out, "{}</spdx:relationship>", indent)
    }

    /// One license is a resource; several form a conjunctive set and
    /// expressions become nested license sets
    fn write_license_set(
        out: &mut String,
        property: &str,
        licenses: &BTreeSet<String>,
        namespace: &str,
    ) -> std::fmt::Result {
        let mut members: Vec<LicenseExpression> =
            licenses.iter().map(|license| Self::expression(license)).collect();
        let expression = match members.len() {
            0 => {
                return writeln!(
                    out,
                    r#"    <spdx:{} rdf:resource="{}{}"/>"#,
                    property,
                    SPDX_NS,
                    NOASSERTION.to_lowercase()
                )
            }
            1 => members.remove(0),
            _ => LicenseExpression::Conjunctive(members),
        };

        if let LicenseExpression::License(id) = &expression {
            return writeln!(
                out,
                r#"    <spdx:{} rdf:resource="{}"/>"#,
                property,
                Self::license_uri(id, namespace)
            );
        }
        writeln!(out, "    <spdx:{}>", property)?;
        Self::write_expression(out, 6, &expression, namespace)?;
        writeln!(out, "    </spdx:{}>", property)
    }

    /// Entries that are not valid expressions are kept whole as one license
    fn expression(license: &str) -> LicenseExpression {
        LicenseExpression::parse(license)
            .unwrap_or_else(|| LicenseExpression::License(license.to_string()))
    }

    /// Writes a compound expression node; leaves are written by the caller
    fn write_expression(
        out: &mut String,
        indent: usize,
        expression: &LicenseExpression,
        namespace: &str,
    ) -> std::fmt::Result {
        let pad = " ".repeat(indent);
        match expression {
            LicenseExpression::License(id) => writeln!(
                out,
                r#"{}<spdx:member rdf:resource="{}"/>"#,
                pad,
                Self::license_uri(id, namespace)
            ),
            LicenseExpression::With { license, exception } => {
                writeln!(out, "{}<spdx:WithExceptionOperator>", pad)?;
                writeln!(
                    out,
                    r#"{}  <spdx:member rdf:resource="{}"/>"#,
                    pad,
                    Self::license_uri(license, namespace)
                )?;
                writeln!(out, "{}  <spdx:licenseException>", pad)?;
                writeln!(out, "{}    <spdx:LicenseException>", pad)?;
                writeln!(
                    out,
                    "{}      <spdx:licenseExceptionId>{}</spdx:licenseExceptionId>",
                    pad,
                    xml_escape(exception)
                )?;
                writeln!(out, "{}    </spdx:LicenseException>", pad)?;
                writeln!(out, "{}  </spdx:licenseException>", pad)?;
                writeln!(out, "{}</spdx:WithExceptionOperator>", pad)
            }
            LicenseExpression::Conjunctive(members) | LicenseExpression::Disjunctive(members) => {
                let set = if matches!(expression, LicenseExpression::Conjunctive(_)) {
                    "ConjunctiveLicenseSet"
                } else {
                    "DisjunctiveLicenseSet"
                };
                writeln!(out, "{}<spdx:{}>", pad, set)?;
                for member in members {
                    match member {
                        LicenseExpression::License(_) => {
                            Self::write_expression(out, indent + 2, member, namespace)?
                        }
                        _ => {
                            writeln!(out, "{}  <spdx:member>", pad)?;
                            Self::write_expression(out, indent + 4, member, namespace)?;
                            writeln!(out, "{}  </spdx:member>", pad)?;
                        }
                    }
                }
                writeln!(out, "{}</spdx:{}>", pad, set)
            }
        }
    }

    /// Listed licenses live at spdx.org; `LicenseRef-` ids are local to the
    /// document. Anything that is not a plain identifier is percent-encoded.
    fn license_uri(license: &str, namespace: &str) -> String {
        let plain = license
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'));
        if !plain {
            format!("{}#{}", namespace, urlencoding::encode(license))
        } else if license.starts_with(LICENSE_REF_PREFIX) {
            format!("{}#{}", namespace, license)
        } else {
            format!("{}{}", LICENSE_LIST, license)
        }
    }
}

impl Default for RdfEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BomEncoder for RdfEncoder {
    fn encode(&self, bom: &Bom) -> Result<Vec<u8>> {
        let mut out = String::new();
        Self::write_document(&mut out, bom).map_err(|e| SbomError::Internal {
            details: format!("Failed to render SPDX RDF/XML: {}", e),
        })?;
        Ok(out.into_bytes())
    }
}
