//! Mutability classifier: shared fixtures holding fresh mutable state.
//!
//! A session- or module-scoped fixture that returns a freshly constructed
//! mutable container hands every test the same instance; one test's
//! mutation bleeds into the next. The classification is syntactic and
//! best-effort: it sees only the [`ReturnShape`] hint, so both false
//! positives (a container the suite never mutates) and false negatives
//! (mutable state behind an opaque constructor) are possible. The strategy
//! is a trait so a host tool can swap in a smarter one without touching
//! graph logic.

use crate::config::AnalysisConfig;
use crate::graph::FixtureGraph;
use crate::model::ReturnShape;
use crate::violation::{Violation, ViolationKind};

// ============================================================================
// Classification Strategy
// ============================================================================

/// Best-effort mutability verdict for a return shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// An immutable literal value.
    ImmutableLiteral,
    /// A freshly constructed mutable container (list, dict, set, ...).
    FreshMutableContainer,
    /// Cannot tell from the shape alone.
    Unknown,
}

/// Replaceable classification strategy.
pub trait MutabilityClassifier: Send + Sync {
    /// Classify a fixture's return shape.
    fn classify(&self, shape: &ReturnShape) -> Mutability;
}

/// Default strategy: container literals and bare container-constructor
/// calls are fresh mutable containers; scalar and string literals are
/// immutable; everything else is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntacticClassifier;

impl MutabilityClassifier for SyntacticClassifier {
    fn classify(&self, shape: &ReturnShape) -> Mutability {
        match shape {
            ReturnShape::ListLiteral | ReturnShape::DictLiteral | ReturnShape::SetLiteral => {
                Mutability::FreshMutableContainer
            }
            ReturnShape::ConstructorCall { qualname } => {
                let tail = qualname.rsplit('.').next().unwrap_or_default();
                if matches!(tail, "list" | "dict" | "set") {
                    Mutability::FreshMutableContainer
                } else {
                    Mutability::Unknown
                }
            }
            ReturnShape::ScalarLiteral | ReturnShape::StringLiteral => {
                Mutability::ImmutableLiteral
            }
            ReturnShape::YieldedResource | ReturnShape::Unknown => Mutability::Unknown,
        }
    }
}

// ============================================================================
// Check
// ============================================================================

/// Run the check with the default syntactic strategy.
pub fn check(graph: &FixtureGraph, config: &AnalysisConfig) -> Vec<Violation> {
    check_with(graph, config, &SyntacticClassifier)
}

/// Flag shared-scope fixtures whose return shape classifies as a fresh
/// mutable container. The identical shape at function (or class) scope is
/// never flagged: those instances are rebuilt per consumer and cannot
/// carry state between tests.
pub fn check_with(
    graph: &FixtureGraph,
    config: &AnalysisConfig,
    classifier: &dyn MutabilityClassifier,
) -> Vec<Violation> {
    graph
        .records()
        .filter(|(_, record)| config.is_shared_scope(&record.scope))
        .filter(|(_, record)| {
            classifier.classify(&record.return_shape) == Mutability::FreshMutableContainer
        })
        .map(|(_, record)| {
            Violation::new(
                ViolationKind::StatefulSessionFixture,
                record.location(),
                format!(
                    "fixture '{}' (scope='{}') returns a freshly constructed mutable \
                     container that is shared across tests",
                    record.name, record.scope
                ),
            )
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
