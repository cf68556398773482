pub mod bom;
pub mod diagnostics;
pub mod package;
pub mod package_graph;
pub mod raw_inventory;
pub mod relationship;
pub mod sbom_metadata;
pub mod scope;

pub use bom::Bom;
pub use diagnostics::NormalizationDiagnostics;
pub use package::{Checksum, ChecksumAlgorithm, Ecosystem, Package, PackageId, PackageName, Version};
pub use package_graph::PackageGraph;
pub use raw_inventory::{
    DueDiligenceEntry, RawCopyright, RawInventory, RawLicense, RawRecord, RawRelationship,
};
pub use relationship::{Relationship, RelationshipKind};
pub use sbom_metadata::{Creator, SbomMetadata, DATA_LICENSE, SPDX_VERSION};
pub use scope::{Scope, ScopeInfo, ScopeKind};
