use super::spdx_fields::{
    copyright_field, download_location_field, extracted_licenses, package_spdx_id, supplier_field,
    DecodedPackage, GraphBuilder, DESCRIBES, DOCUMENT_ID, PACKAGE_MANAGER, PURL,
};
use crate::ports::outbound::{BomDecoder, BomEncoder};
use crate::sbom_generation::domain::{Bom, PackageGraph, DATA_LICENSE, SPDX_VERSION};
use crate::sbom_generation::policies::LicenseIdentifierPolicy;
use crate::shared::error::SbomError;
use crate::shared::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxDocument {
    spdx_version: String,
    data_license: String,
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    document_namespace: String,
    creation_info: CreationInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    has_extracted_licensing_infos: Vec<SpdxExtractedLicense>,
    #[serde(default)]
    packages: Vec<SpdxPackage>,
    #[serde(default)]
    relationships: Vec<SpdxRelationship>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CreationInfo {
    created: String,
    creators: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExtractedLicense {
    license_id: String,
    extracted_text: String,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxPackage {
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    package_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    supplier: Option<String>,
    #[serde(default)]
    download_location: String,
    #[serde(default)]
    files_analyzed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<SpdxChecksum>,
    #[serde(default)]
    license_concluded: String,
    #[serde(default)]
    license_declared: String,
    #[serde(default)]
    license_info_from_files: Vec<String>,
    #[serde(default)]
    copyright_text: String,
    #[serde(default)]
    external_refs: Vec<SpdxExternalRef>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxChecksum {
    algorithm: String,
    checksum_value: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExternalRef {
    reference_category: String,
    reference_type: String,
    reference_locator: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxRelationship {
    spdx_element_id: String,
    relationship_type: String,
    related_spdx_element: String,
}

impl SpdxDocument {
    fn from_bom(bom: &Bom) -> Self {
        let metadata = bom.metadata();
        let graph = bom.graph();

        // BTreeMap iteration gives packages in id order
        let packages: Vec<SpdxPackage> = graph
            .packages()
            .map(|package| {
                let license_expression = LicenseIdentifierPolicy::expression(package.licenses());
                SpdxPackage {
                    spdx_id: package_spdx_id(package.id()),
                    name: package.name().to_string(),
                    version_info: Some(package.version().to_string()),
                    package_file_name: package.file_name().map(str::to_string),
                    supplier: Some(supplier_field(package)),
                    download_location: download_location_field(package),
                    files_analyzed: false,
                    checksums: package
                        .checksum()
                        .map(|c| SpdxChecksum {
                            algorithm: c.algorithm().spdx_name().to_string(),
                            checksum_value: c.value().to_string(),
                        })
                        .into_iter()
                        .collect(),
                    license_concluded: license_expression.clone(),
                    license_declared: license_expression,
                    license_info_from_files: package.licenses().iter().cloned().collect(),
                    copyright_text: copyright_field(package),
                    external_refs: vec![SpdxExternalRef {
                        reference_category: PACKAGE_MANAGER.to_string(),
                        reference_type: PURL.to_string(),
                        reference_locator: package.id().purl(),
                    }],
                }
            })
            .collect();

        let mut relationships: Vec<SpdxRelationship> = packages
            .iter()
            .map(|p| SpdxRelationship {
                spdx_element_id: DOCUMENT_ID.to_string(),
                relationship_type: DESCRIBES.to_string(),
                related_spdx_element: p.spdx_id.clone(),
            })
            .collect();
        relationships.extend(graph.relationships().map(|r| SpdxRelationship {
            spdx_element_id: package_spdx_id(r.from()),
            relationship_type: r.kind().as_str().to_string(),
            related_spdx_element: package_spdx_id(r.to()),
        }));

        SpdxDocument {
            spdx_version: SPDX_VERSION.to_string(),
            data_license: DATA_LICENSE.to_string(),
            spdx_id: DOCUMENT_ID.to_string(),
            name: metadata.document_name().to_string(),
            document_namespace: metadata.namespace().to_string(),
            creation_info: CreationInfo {
                created: metadata.timestamp().to_string(),
                creators: metadata.creators(),
            },
            has_extracted_licensing_infos: extracted_licenses(bom)
                .into_iter()
                .map(|license| SpdxExtractedLicense {
                    license_id: license.license_id,
                    extracted_text: license.extracted_text,
                    name: license.name,
                })
                .collect(),
            packages,
            relationships,
        }
    }
}

/// JsonEncoder adapter producing SPDX 2.3 JSON documents
///
/// Output is pretty-printed with a trailing newline. Field order is fixed by
/// the serialization structs and collections come from sorted sets, so the
/// same Bom always encodes to the same bytes.
pub struct JsonEncoder;

impl JsonEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BomEncoder for JsonEncoder {
    fn encode(&self, bom: &Bom) -> Result<Vec<u8>> {
        let document = SpdxDocument::from_bom(bom);
        let mut json = serde_json::to_string_pretty(&document).map_err(|e| SbomError::Internal {
            details: format!("Failed to serialize SPDX JSON: {}", e),
        })?;
        json.push('\n');
        Ok(json.into_bytes())
    }
}

/// JsonDecoder adapter reading SPDX JSON documents back into a package graph
pub struct JsonDecoder;

impl JsonDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BomDecoder for JsonDecoder {
    fn decode(&self, content: &[u8]) -> Result<PackageGraph> {
        let document: SpdxDocument =
            serde_json::from_slice(content).map_err(|e| SbomError::MalformedRecord {
                details: format!("invalid SPDX JSON document: {}", e),
            })?;

        let mut builder = GraphBuilder::default();
        for package in document.packages {
            let purl = package
                .external_refs
                .iter()
                .find(|r| r.reference_type == PURL)
                .map(|r| r.reference_locator.clone());
            builder.add_package(DecodedPackage {
                spdx_id: package.spdx_id,
                name: package.name,
                version: package.version_info,
                purl,
                file_name: package.package_file_name,
                supplier: package.supplier,
                download_location: Some(package.download_location),
                copyright: Some(package.copyright_text),
                checksums: package
                    .checksums
                    .into_iter()
                    .map(|c| (c.algorithm, c.checksum_value))
                    .collect(),
                licenses: package.license_info_from_files,
            })?;
        }
        for relationship in &document.relationships {
            builder.add_relationship(
                &relationship.spdx_element_id,
                &relationship.relationship_type,
                &relationship.related_spdx_element,
            )?;
        }
        Ok(builder.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_fixtures::{bom_from, empty_bom, go_id, mixed_ecosystem_bom, sample_bom};
    use super::*;
    use crate::sbom_generation::domain::Package;

    fn encode_json(bom: &Bom) -> serde_json::Value {
        let bytes = JsonEncoder::new().encode(bom).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_document_header() {
        let json = encode_json(&sample_bom());

        assert_eq!(json["spdxVersion"], "SPDX-2.3");
        assert_eq!(json["dataLicense"], "CC0-1.0");
        assert_eq!(json["SPDXID"], "SPDXRef-DOCUMENT");
        assert_eq!(json["name"], "Demo Go SBOM report");
        assert_eq!(json["creationInfo"]["created"], "2024-01-02T03:04:05Z");
        assert!(json["creationInfo"]["creators"][0]
            .as_str()
            .unwrap()
            .starts_with("Tool: sbom-generator-"));
    }

    #[test]
    fn test_packages_and_relationships() {
        let json = encode_json(&sample_bom());

        let packages = json["packages"].as_array().unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0]["name"], "A");
        assert_eq!(packages[0]["versionInfo"], "1.0");
        assert_eq!(packages[0]["licenseConcluded"], "Apache-2.0 AND MIT");
        assert_eq!(packages[0]["supplier"], "Organization: Alice");
        assert_eq!(packages[0]["checksums"][0]["algorithm"], "SHA1");
        assert_eq!(
            packages[0]["externalRefs"][0]["referenceLocator"],
            "pkg:golang/A@1.0"
        );
        assert_eq!(packages[1]["licenseConcluded"], "NOASSERTION");
        assert_eq!(packages[1]["downloadLocation"], "NOASSERTION");
        assert_eq!(packages[1]["copyrightText"], "NONE");
        assert!(packages[1]["licenseInfoFromFiles"]
            .as_array()
            .unwrap()
            .is_empty());

        let relationships = json["relationships"].as_array().unwrap();
        let describes = relationships
            .iter()
            .filter(|r| r["relationshipType"] == "DESCRIBES")
            .count();
        assert_eq!(describes, 2);
        let depends: Vec<_> = relationships
            .iter()
            .filter(|r| r["relationshipType"] == "DEPENDS_ON")
            .collect();
        assert_eq!(depends.len(), 1);
        assert_eq!(depends[0]["spdxElementId"], packages[0]["SPDXID"]);
        assert_eq!(depends[0]["relatedSpdxElement"], packages[1]["SPDXID"]);
    }

    #[test]
    fn test_encoding_is_deterministic_with_trailing_newline() {
        let first = JsonEncoder::new().encode(&sample_bom()).unwrap();
        let second = JsonEncoder::new().encode(&sample_bom()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.last(), Some(&b'\n'));
    }

    #[test]
    fn test_round_trip() {
        let bom = sample_bom();
        let bytes = JsonEncoder::new().encode(&bom).unwrap();
        let graph = JsonDecoder::new().decode(&bytes).unwrap();
        assert_eq!(&graph, bom.graph());
    }

    #[test]
    fn test_empty_bom_round_trip() {
        let bom = empty_bom();
        let json = encode_json(&bom);
        assert!(json["packages"].as_array().unwrap().is_empty());

        let bytes = JsonEncoder::new().encode(&bom).unwrap();
        let graph = JsonDecoder::new().decode(&bytes).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_license_refs_have_extracted_licensing_infos() {
        let bom = mixed_ecosystem_bom();
        let json = encode_json(&bom);

        let infos = json["hasExtractedLicensingInfos"].as_array().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0]["licenseId"], "LicenseRef-Custom-License");
        assert_eq!(infos[0]["extractedText"], "Custom License (v2)");
        assert_eq!(infos[0]["name"], "Custom License (v2)");

        let bytes = JsonEncoder::new().encode(&bom).unwrap();
        let graph = JsonDecoder::new().decode(&bytes).unwrap();
        assert_eq!(&graph, bom.graph());
    }

    #[test]
    fn test_no_extracted_licensing_infos_without_license_refs() {
        let json = encode_json(&sample_bom());
        assert!(json.get("hasExtractedLicensingInfos").is_none());
    }

    #[test]
    fn test_round_trip_of_placeholder_values() {
        let mut graph = PackageGraph::new();
        graph.upsert_package(
            Package::new(go_id("A", "1.0"))
                .with_copyright("NONE")
                .with_supplier("Person: Jane Doe"),
        );
        graph.upsert_package(Package::new(go_id("Apache Commons Lang", "3.6.0 (patched)")));
        let bom = bom_from(graph);

        let json = encode_json(&bom);
        let packages = json["packages"].as_array().unwrap();
        let a = packages.iter().find(|p| p["name"] == "A").unwrap();
        assert_eq!(a["copyrightText"], "NONE");
        assert_eq!(a["supplier"], "Person: Jane Doe");
        assert!(a.get("checksums").is_none());

        let bytes = JsonEncoder::new().encode(&bom).unwrap();
        let decoded = JsonDecoder::new().decode(&bytes).unwrap();
        assert_eq!(&decoded, bom.graph());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = JsonDecoder::new().decode(b"not json").unwrap_err();
        assert_eq!(SbomError::find_in(&err).unwrap().kind(), "malformed record");
    }
}
