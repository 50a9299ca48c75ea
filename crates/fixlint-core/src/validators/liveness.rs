//! Usage liveness: fixtures that are declared but never referenced.
//!
//! The referenced set is built from every test's requested names plus the
//! dependency side of every resolved edge. Autouse fixtures are exempt:
//! their activation is implicit and never appears in the dependency graph.
//! Allowlisted (framework-provided) names are exempt as well.

use std::collections::HashSet;

use crate::config::AnalysisConfig;
use crate::graph::FixtureGraph;
use crate::violation::{Violation, ViolationKind};

/// Report every dead fixture declaration.
pub fn check(graph: &FixtureGraph, config: &AnalysisConfig) -> Vec<Violation> {
    let mut referenced: HashSet<&str> = graph
        .usages()
        .iter()
        .flat_map(|usage| usage.requested_names.iter().map(String::as_str))
        .collect();
    for edge in graph.edges() {
        referenced.insert(graph.record(edge.dependency).name.as_str());
    }

    graph
        .records()
        .filter(|(_, record)| {
            !record.autouse
                && !config.is_builtin(&record.name)
                && !referenced.contains(record.name.as_str())
        })
        .map(|(_, record)| {
            Violation::new(
                ViolationKind::UnusedFixture,
                record.location(),
                format!(
                    "fixture '{}' is defined but never used by any test or fixture",
                    record.name
                ),
            )
        })
        .collect()
}
