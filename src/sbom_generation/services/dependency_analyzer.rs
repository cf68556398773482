use crate::sbom_generation::domain::{PackageGraph, PackageId, RelationshipKind};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, VecDeque};

/// Summary of the dependency structure of a package graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    roots: Vec<PackageId>,
    direct_dependency_count: usize,
    transitive_dependency_count: usize,
    cycles: Vec<Vec<PackageId>>,
}

impl DependencyReport {
    /// Packages nothing else depends on (or the members of such a cycle)
    pub fn roots(&self) -> &[PackageId] {
        &self.roots
    }

    /// Packages one hop away from a root
    pub fn direct_dependency_count(&self) -> usize {
        self.direct_dependency_count
    }

    /// Packages two or more hops away from every root
    pub fn transitive_dependency_count(&self) -> usize {
        self.transitive_dependency_count
    }

    /// Each dependency cycle once, members sorted
    pub fn cycles(&self) -> &[Vec<PackageId>] {
        &self.cycles
    }
}

/// DependencyAnalyzer service for analyzing transitive dependencies
///
/// This service contains pure business logic for dependency graph analysis.
/// It has no I/O dependencies and works only with domain objects.
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    /// Analyzes roots, direct/transitive dependency counts and cycles
    pub fn analyze(graph: &PackageGraph) -> DependencyReport {
        let view = Self::dependency_view(graph);
        let components = tarjan_scc(&view);

        let mut component_of = vec![0usize; view.node_count()];
        for (component, nodes) in components.iter().enumerate() {
            for node in nodes {
                component_of[node.index()] = component;
            }
        }

        // A component is a root when no other component depends on it
        let mut depended_on = vec![false; components.len()];
        for edge in view.edge_references() {
            let source = component_of[edge.source().index()];
            let target = component_of[edge.target().index()];
            if source != target {
                depended_on[target] = true;
            }
        }

        let root_nodes: Vec<NodeIndex> = components
            .iter()
            .enumerate()
            .filter(|(component, _)| !depended_on[*component])
            .flat_map(|(_, nodes)| nodes.iter().copied())
            .collect();

        let mut cycles: Vec<Vec<PackageId>> = components
            .iter()
            .filter(|nodes| nodes.len() > 1)
            .map(|nodes| {
                let mut members: Vec<PackageId> =
                    nodes.iter().map(|n| view[*n].clone()).collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();

        let distances = Self::distances_from(&view, &root_nodes);
        let direct_dependency_count = distances.iter().filter(|d| **d == Some(1)).count();
        let transitive_dependency_count = distances
            .iter()
            .filter(|d| matches!(d, Some(distance) if *distance >= 2))
            .count();

        let mut roots: Vec<PackageId> = root_nodes.iter().map(|n| view[*n].clone()).collect();
        roots.sort();

        DependencyReport {
            roots,
            direct_dependency_count,
            transitive_dependency_count,
            cycles,
        }
    }

    /// Breadth-first shortest distance from any root; `None` when unreachable
    fn distances_from(graph: &DiGraph<PackageId, ()>, roots: &[NodeIndex]) -> Vec<Option<usize>> {
        let mut distances = vec![None; graph.node_count()];
        let mut queue = VecDeque::new();
        for root in roots {
            distances[root.index()] = Some(0);
            queue.push_back(*root);
        }

        while let Some(node) = queue.pop_front() {
            let next = distances[node.index()].map_or(0, |d| d + 1);
            for neighbor in graph.neighbors(node) {
                if distances[neighbor.index()].is_none() {
                    distances[neighbor.index()] = Some(next);
                    queue.push_back(neighbor);
                }
            }
        }
        distances
    }

    /// Projects dependency relationships onto a petgraph graph whose edges
    /// point at the dependency.
    ///
    /// `X DEPENDS_ON Y` becomes X -> Y; the `*_DEPENDENCY_OF` kinds are the
    /// same edge stated from the other end. Containment is not a dependency.
    fn dependency_view(graph: &PackageGraph) -> DiGraph<PackageId, ()> {
        let mut dependency_graph = DiGraph::new();
        let mut index = HashMap::new();
        for package in graph.packages() {
            let node = dependency_graph.add_node(package.id().clone());
            index.insert(package.id().clone(), node);
        }

        for relationship in graph.relationships() {
            let (dependent, dependency) = match relationship.kind() {
                RelationshipKind::DependsOn => (relationship.from(), relationship.to()),
                RelationshipKind::DependencyOf
                | RelationshipKind::DevDependencyOf
                | RelationshipKind::OptionalDependencyOf => (relationship.to(), relationship.from()),
                _ => continue,
            };
            if let (Some(&a), Some(&b)) = (index.get(dependent), index.get(dependency)) {
                dependency_graph.update_edge(a, b, ());
            }
        }

        dependency_graph
    }
}
