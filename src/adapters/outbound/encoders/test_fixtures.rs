use crate::sbom_generation::domain::{
    Bom, Checksum, ChecksumAlgorithm, Ecosystem, NormalizationDiagnostics, Package, PackageGraph,
    PackageId, Relationship, RelationshipKind, Scope, ScopeInfo, ScopeKind,
};
use crate::sbom_generation::services::{MetadataSettings, SbomGenerator};
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

fn scope() -> ScopeInfo {
    ScopeInfo::new(
        Scope::new("demo-go").unwrap(),
        Some("Demo Go".to_string()),
        ScopeKind::Project,
    )
}

pub(crate) fn bom_from(graph: PackageGraph) -> Bom {
    let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let metadata =
        SbomGenerator::generate_default_metadata(&scope(), created, &MetadataSettings::default());
    Bom::new(scope(), metadata, graph, NormalizationDiagnostics::default())
}

pub(crate) fn go_id(name: &str, version: &str) -> PackageId {
    PackageId::parse(Ecosystem::Go, name, version).unwrap()
}

/// A@1.0 (fully populated) depends on B@2.0 (bare)
pub(crate) fn sample_bom() -> Bom {
    let mut graph = PackageGraph::new();
    graph.upsert_package(
        Package::new(go_id("A", "1.0"))
            .with_license("MIT")
            .with_license("Apache-2.0")
            .with_checksum(
                Checksum::new(
                    ChecksumAlgorithm::Sha1,
                    "da39a3ee5e6b4b0d3255bfef95601890afd80709",
                )
                .unwrap(),
            )
            .with_download_location("https://example.com/a.zip")
            .with_supplier("Alice")
            .with_copyright("Copyright (c) A authors\nCopyright (c) A & <friends>")
            .with_file_name("a.zip"),
    );
    graph.upsert_package(Package::new(go_id("B", "2.0")));
    graph
        .add_relationship(
            Relationship::new(go_id("A", "1.0"), RelationshipKind::DependsOn, go_id("B", "2.0"))
                .unwrap(),
        )
        .unwrap();
    bom_from(graph)
}

/// Packages from several ecosystems, including a generic one
pub(crate) fn mixed_ecosystem_bom() -> Bom {
    let mut graph = PackageGraph::new();
    let maven = PackageId::parse(Ecosystem::Maven, "org.slf4j:slf4j-api", "2.0.9").unwrap();
    let npm = PackageId::parse(Ecosystem::Npm, "@types/node", "20.1.0").unwrap();
    let generic =
        PackageId::parse(Ecosystem::Generic("c++ source".to_string()), "zlib", "1.3").unwrap();
    graph.upsert_package(Package::new(maven.clone()).with_license("MIT"));
    graph.upsert_package(Package::new(npm.clone()).with_license("LicenseRef-Custom-License"));
    graph.upsert_package(Package::new(generic.clone()));
    graph
        .add_relationship(Relationship::new(npm.clone(), RelationshipKind::DevDependencyOf, maven).unwrap())
        .unwrap();
    graph
        .add_relationship(Relationship::new(npm, RelationshipKind::Contains, generic).unwrap())
        .unwrap();
    bom_from(graph).with_license_names(BTreeMap::from([(
        "LicenseRef-Custom-License".to_string(),
        "Custom License (v2)".to_string(),
    )]))
}

pub(crate) fn empty_bom() -> Bom {
    bom_from(PackageGraph::new())
}
