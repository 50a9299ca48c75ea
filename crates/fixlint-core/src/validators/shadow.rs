//! Shadow resolver: hidden fixture overrides.
//!
//! Two distinct findings share one detection mechanism (multiple records
//! under one name):
//!
//! - `shadowed-fixture`: a deeper directory redefines a name an ancestor
//!   directory also defines. Reported once per (name, ancestor chain),
//!   anchored at the deepest definition, naming the shadowed ancestor's
//!   file.
//! - `redefined-fixture`: the same directory declares a name twice.
//!   Reported at each later declaration, referencing its immediate
//!   predecessor.

use crate::config::AnalysisConfig;
use crate::graph::FixtureGraph;
use crate::violation::{Violation, ViolationKind};

/// Scan the scope tree for hierarchy shadowing and same-directory
/// redefinitions.
pub fn check(graph: &FixtureGraph, _config: &AnalysisConfig) -> Vec<Violation> {
    let tree = graph.tree();
    let mut violations = Vec::new();

    for (node_id, node) in tree.nodes() {
        let mut names: Vec<&String> = node.locals.keys().collect();
        names.sort();
        for name in names {
            let declarations = node.declarations(name);

            // Same-directory redefinitions: each later declaration
            // references the one it replaces.
            for pair in declarations.windows(2) {
                let earlier = graph.record(pair[0]);
                let later = graph.record(pair[1]);
                violations.push(
                    Violation::new(
                        ViolationKind::RedefinedFixture,
                        later.location(),
                        format!(
                            "fixture '{}' is redefined; earlier definition at {}",
                            name,
                            earlier.location()
                        ),
                    )
                    .with_secondary(earlier.location()),
                );
            }

            // Hierarchy shadowing: report only at the deepest definition
            // on the chain, so a chain of N directories yields one
            // violation, not N-1.
            let Some((_, shadowed_id)) = tree.nearest_ancestor_defining(node_id, name) else {
                continue;
            };
            let has_deeper_definition = tree.nodes().any(|(other_id, other)| {
                other_id != node_id
                    && other.winner(name).is_some()
                    && tree.is_strict_ancestor(node_id, other_id)
            });
            if has_deeper_definition {
                continue;
            }
            let Some(winner) = node.winner(name) else {
                continue;
            };
            let overriding = graph.record(winner);
            let shadowed = graph.record(shadowed_id);
            violations.push(
                Violation::new(
                    ViolationKind::ShadowedFixture,
                    overriding.location(),
                    format!(
                        "fixture '{}' is defined in both '{}' and '{}'",
                        name, overriding.defining_file, shadowed.defining_file
                    ),
                )
                .with_secondary(shadowed.location()),
            );
        }
    }

    violations
}
