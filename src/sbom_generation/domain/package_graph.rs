use super::{Package, PackageId, Relationship};
use crate::shared::Result;
use std::collections::{BTreeMap, BTreeSet};

/// PackageGraph aggregate: packages keyed by identity plus the edges between them
///
/// Invariant: every relationship endpoint exists in the package map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageGraph {
    packages: BTreeMap<PackageId, Package>,
    relationships: BTreeSet<Relationship>,
}

impl PackageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a package, merging into an existing entry with the same identity.
    ///
    /// Returns `true` when the package was merged into an existing one.
    pub fn upsert_package(&mut self, package: Package) -> bool {
        match self.packages.get_mut(package.id()) {
            Some(existing) => {
                existing.merge(package);
                true
            }
            None => {
                self.packages.insert(package.id().clone(), package);
                false
            }
        }
    }

    /// Adds a relationship whose endpoints must already be present
    pub fn add_relationship(&mut self, relationship: Relationship) -> Result<()> {
        for endpoint in [relationship.from(), relationship.to()] {
            if !self.packages.contains_key(endpoint) {
                anyhow::bail!(
                    "Relationship endpoint {} is not a package of this graph",
                    endpoint
                );
            }
        }
        self.relationships.insert(relationship);
        Ok(())
    }

    pub fn contains(&self, id: &PackageId) -> bool {
        self.packages.contains_key(id)
    }

    /// Packages in identity order
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Relationships in (source, kind, target) order
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
