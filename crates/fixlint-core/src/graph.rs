//! Pass 1: fixture discovery and dependency graph construction.
//!
//! [`FixtureGraphBuilder`] consumes the flat per-file extraction output,
//! populates the [`DirectoryScopeTree`], resolves each declared dependency
//! name relative to the declaring fixture's own directory, and detects
//! dependency cycles. The result is a read-only [`FixtureGraph`] that the
//! pass-2 validators share.
//!
//! Resolution order matters: any fixture may be referenced before it is
//! textually discovered when files arrive in arbitrary order, so no edge
//! is resolved until every file has been submitted.

use std::collections::{BTreeSet, HashSet};

use crate::config::AnalysisConfig;
use crate::model::{FixtureId, FixtureRecord, TestUsage};
use crate::tree::{DirectoryScopeTree, Resolution};
use crate::violation::{Violation, ViolationKind};

// ============================================================================
// Resolved Edge
// ============================================================================

/// A resolved dependency between two fixture declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEdge {
    /// The fixture that declares the dependency.
    pub dependent: FixtureId,
    /// The declaration the dependency name resolved to.
    pub dependency: FixtureId,
}

// ============================================================================
// Fixture Graph
// ============================================================================

/// The finished project model: tree, records, edges, and everything the
/// pass-2 validators read. Built once per run, read-only afterward.
#[derive(Debug)]
pub struct FixtureGraph {
    records: Vec<FixtureRecord>,
    usages: Vec<TestUsage>,
    tree: DirectoryScopeTree,
    edges: Vec<ResolvedEdge>,
    tainted: HashSet<FixtureId>,
    discovery_violations: Vec<Violation>,
}

impl FixtureGraph {
    /// The record behind an ID.
    pub fn record(&self, id: FixtureId) -> &FixtureRecord {
        &self.records[id.index()]
    }

    /// All records with their IDs, in canonical (directory, file, line)
    /// order.
    pub fn records(&self) -> impl Iterator<Item = (FixtureId, &FixtureRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (FixtureId::new(i as u32), record))
    }

    /// All resolved dependency edges.
    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    /// The directory scope tree.
    pub fn tree(&self) -> &DirectoryScopeTree {
        &self.tree
    }

    /// All test usage records.
    pub fn usages(&self) -> &[TestUsage] {
        &self.usages
    }

    /// Whether a fixture participates in a dependency cycle. Tainted
    /// fixtures are excluded from scope validation only; shadow and
    /// liveness checks still see them.
    pub fn is_tainted(&self, id: FixtureId) -> bool {
        self.tainted.contains(&id)
    }

    /// Violations collected during discovery (unresolved names, cycles).
    pub fn discovery_violations(&self) -> &[Violation] {
        &self.discovery_violations
    }

    /// Number of fixture declarations in the run.
    pub fn fixture_count(&self) -> usize {
        self.records.len()
    }

    /// Number of resolved dependency edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates per-file extraction output, then builds the graph in one
/// pass once every file has been submitted.
#[derive(Debug, Default)]
pub struct FixtureGraphBuilder {
    records: Vec<FixtureRecord>,
    usages: Vec<TestUsage>,
}

impl FixtureGraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        FixtureGraphBuilder::default()
    }

    /// Add one file's extraction output.
    pub fn add_file(&mut self, records: Vec<FixtureRecord>, usages: Vec<TestUsage>) {
        self.records.extend(records);
        self.usages.extend(usages);
    }

    /// Build the graph: register every record into the tree, resolve each
    /// declared dependency relative to the declaring directory, and detect
    /// cycles. Unresolvable names outside the builtin allowlist and
    /// detected cycles become discovery violations; neither aborts the run.
    pub fn build(self, config: &AnalysisConfig) -> FixtureGraph {
        let FixtureGraphBuilder {
            mut records,
            usages,
        } = self;

        // Files arrive in arbitrary order, so submission order cannot be
        // what decides which same-directory declaration counts as later.
        // Canonicalize on source position before assigning IDs.
        records.sort_by(|a, b| {
            (&a.defining_directory, &a.defining_file, a.line, &a.name)
                .cmp(&(&b.defining_directory, &b.defining_file, b.line, &b.name))
        });

        let mut tree = DirectoryScopeTree::new();
        for (i, record) in records.iter().enumerate() {
            tree.register(
                &record.defining_directory,
                &record.name,
                FixtureId::new(i as u32),
            );
        }

        let mut edges = Vec::new();
        let mut violations = Vec::new();
        for (i, record) in records.iter().enumerate() {
            let id = FixtureId::new(i as u32);
            for dep_name in &record.dependencies {
                // A fixture requesting its own name reaches past its whole
                // directory to the next-outer definition.
                let resolution = if dep_name == &record.name {
                    tree.resolve_above(&record.defining_directory, dep_name)
                } else {
                    tree.resolve(&record.defining_directory, dep_name)
                };
                match resolution {
                    Resolution::Found { nearest, .. } => {
                        edges.push(ResolvedEdge {
                            dependent: id,
                            dependency: nearest,
                        });
                    }
                    Resolution::NotFound => {
                        if config.is_builtin(dep_name) {
                            continue;
                        }
                        violations.push(Violation::new(
                            ViolationKind::UnresolvedDependency,
                            record.location(),
                            format!(
                                "fixture '{}' depends on '{}', which is not defined \
                                 in its directory or any parent",
                                record.name, dep_name
                            ),
                        ));
                    }
                }
            }
        }

        let (cycle_violations, tainted) = detect_cycles(&records, &edges);
        violations.extend(cycle_violations);

        tracing::debug!(
            fixtures = records.len(),
            edges = edges.len(),
            usages = usages.len(),
            tainted = tainted.len(),
            "fixture graph built"
        );

        FixtureGraph {
            records,
            usages,
            tree,
            edges,
            tainted,
            discovery_violations: violations,
        }
    }
}

// ============================================================================
// Cycle Detection
// ============================================================================

#[derive(Clone, Copy, PartialEq)]
enum Color {
    White,
    Grey,
    Black,
}

/// Depth-first cycle detection over the resolved edges.
///
/// Each cycle is canonicalized by the sorted set of participant names, so
/// re-entering the same cycle from a different node does not duplicate the
/// report. Every participant is marked tainted.
fn detect_cycles(
    records: &[FixtureRecord],
    edges: &[ResolvedEdge],
) -> (Vec<Violation>, HashSet<FixtureId>) {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    for edge in edges {
        adjacency[edge.dependent.index()].push(edge.dependency.index());
    }

    let mut color = vec![Color::White; records.len()];
    let mut path = Vec::new();
    let mut cycles: Vec<Vec<usize>> = Vec::new();
    for start in 0..records.len() {
        if color[start] == Color::White {
            visit(start, &adjacency, &mut color, &mut path, &mut cycles);
        }
    }

    let mut seen: BTreeSet<Vec<String>> = BTreeSet::new();
    let mut violations = Vec::new();
    let mut tainted = HashSet::new();
    for cycle in cycles {
        for &member in &cycle {
            tainted.insert(FixtureId::new(member as u32));
        }
        let mut names: Vec<String> = cycle
            .iter()
            .map(|&member| records[member].name.clone())
            .collect();
        names.sort();
        names.dedup();
        if !seen.insert(names.clone()) {
            continue;
        }
        // Anchor the report at the participant that appears earliest in
        // the project, for deterministic output.
        let Some(anchor) = cycle.iter().map(|&member| records[member].location()).min() else {
            continue;
        };
        violations.push(Violation::new(
            ViolationKind::DependencyCycle,
            anchor,
            format!("dependency cycle between fixtures: {}", names.join(", ")),
        ));
    }
    (violations, tainted)
}

fn visit(
    node: usize,
    adjacency: &[Vec<usize>],
    color: &mut [Color],
    path: &mut Vec<usize>,
    cycles: &mut Vec<Vec<usize>>,
) {
    color[node] = Color::Grey;
    path.push(node);
    for &next in &adjacency[node] {
        match color[next] {
            Color::White => visit(next, adjacency, color, path, cycles),
            Color::Grey => {
                // Re-entered the active path: the slice from the first
                // occurrence of `next` is a cycle.
                if let Some(pos) = path.iter().position(|&n| n == next) {
                    cycles.push(path[pos..].to_vec());
                }
            }
            Color::Black => {}
        }
    }
    path.pop();
    color[node] = Color::Black;
}

// ============================================================================
// Tests
// ============================================================================
