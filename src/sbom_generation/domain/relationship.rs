use super::PackageId;
use crate::shared::Result;
use std::fmt;
use std::str::FromStr;

/// Kind of a directed relationship between two packages (SPDX vocabulary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationshipKind {
    DependsOn,
    DependencyOf,
    DevDependencyOf,
    OptionalDependencyOf,
    Contains,
    ContainedBy,
    BuildToolOf,
    Other,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 8] = [
        RelationshipKind::DependsOn,
        RelationshipKind::DependencyOf,
        RelationshipKind::DevDependencyOf,
        RelationshipKind::OptionalDependencyOf,
        RelationshipKind::Contains,
        RelationshipKind::ContainedBy,
        RelationshipKind::BuildToolOf,
        RelationshipKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::DependsOn => "DEPENDS_ON",
            RelationshipKind::DependencyOf => "DEPENDENCY_OF",
            RelationshipKind::DevDependencyOf => "DEV_DEPENDENCY_OF",
            RelationshipKind::OptionalDependencyOf => "OPTIONAL_DEPENDENCY_OF",
            RelationshipKind::Contains => "CONTAINS",
            RelationshipKind::ContainedBy => "CONTAINED_BY",
            RelationshipKind::BuildToolOf => "BUILD_TOOL_OF",
            RelationshipKind::Other => "OTHER",
        }
    }

    /// camelCase term used by the SPDX RDF vocabulary (`relationshipType_dependsOn`)
    pub fn rdf_term(&self) -> &'static str {
        match self {
            RelationshipKind::DependsOn => "dependsOn",
            RelationshipKind::DependencyOf => "dependencyOf",
            RelationshipKind::DevDependencyOf => "devDependencyOf",
            RelationshipKind::OptionalDependencyOf => "optionalDependencyOf",
            RelationshipKind::Contains => "contains",
            RelationshipKind::ContainedBy => "containedBy",
            RelationshipKind::BuildToolOf => "buildToolOf",
            RelationshipKind::Other => "other",
        }
    }
}

impl FromStr for RelationshipKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        RelationshipKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("Unknown relationship kind: {}", s))
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Directed edge between two packages. Never a self-loop.
///
/// Field order gives the derived ordering: by source, then kind, then target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Relationship {
    from: PackageId,
    kind: RelationshipKind,
    to: PackageId,
}

impl Relationship {
    pub fn new(from: PackageId, kind: RelationshipKind, to: PackageId) -> Result<Self> {
        if from == to {
            anyhow::bail!("Relationship {} {} {} is a self-loop", from, kind, to);
        }
        Ok(Self { from, kind, to })
    }

    pub fn from(&self) -> &PackageId {
        &self.from
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn to(&self) -> &PackageId {
        &self.to
    }
}
