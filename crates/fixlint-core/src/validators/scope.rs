//! Scope validator: a fixture may depend only on same-or-broader-scoped
//! fixtures.
//!
//! A session fixture is created once; it cannot depend on a function
//! fixture that is rebuilt for every test. Edges touching cycle-tainted
//! fixtures are skipped; the cycle itself is already reported and scope
//! comparison along a cycle is not meaningful.

use crate::config::AnalysisConfig;
use crate::graph::FixtureGraph;
use crate::violation::{Violation, ViolationKind};

/// Check every non-tainted resolved edge against the scope ordering.
pub fn check(graph: &FixtureGraph, config: &AnalysisConfig) -> Vec<Violation> {
    let ranking = &config.scope_rank_table;
    graph
        .edges()
        .iter()
        .filter(|edge| !graph.is_tainted(edge.dependent) && !graph.is_tainted(edge.dependency))
        .filter_map(|edge| {
            let dependent = graph.record(edge.dependent);
            let dependency = graph.record(edge.dependency);
            if ranking.rank(&dependency.scope) >= ranking.rank(&dependent.scope) {
                return None;
            }
            Some(
                Violation::new(
                    ViolationKind::InvalidScope,
                    dependent.location(),
                    format!(
                        "fixture '{}' (scope='{}') cannot depend on narrower-scoped \
                         fixture '{}' (scope='{}')",
                        dependent.name, dependent.scope, dependency.name, dependency.scope
                    ),
                )
                .with_secondary(dependency.location()),
            )
        })
        .collect()
}
