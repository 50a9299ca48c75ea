//! Violation types emitted by the analysis.
//!
//! A [`Violation`] is the only output the core produces. Report formatting
//! (terminal, JSON, HTML) is an external collaborator; violations carry
//! everything a formatter needs: kind, anchor location, optional secondary
//! location, and a human-readable message.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::types::Location;

// ============================================================================
// Violation Kind
// ============================================================================

/// Category of fixture-analysis violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A fixture depends on a narrower-scoped fixture.
    InvalidScope,
    /// A deeper-directory definition overrides a same-named ancestor one.
    ShadowedFixture,
    /// A name is declared more than once in the same directory.
    RedefinedFixture,
    /// A fixture is declared but never referenced.
    UnusedFixture,
    /// A broad-scoped fixture returns a fresh mutable container.
    StatefulSessionFixture,
    /// A declared dependency name resolves to no definition.
    UnresolvedDependency,
    /// Fixtures depend on each other in a cycle.
    DependencyCycle,
}

impl ViolationKind {
    /// All kinds, in a stable order.
    pub const ALL: [ViolationKind; 7] = [
        ViolationKind::InvalidScope,
        ViolationKind::ShadowedFixture,
        ViolationKind::RedefinedFixture,
        ViolationKind::UnusedFixture,
        ViolationKind::StatefulSessionFixture,
        ViolationKind::UnresolvedDependency,
        ViolationKind::DependencyCycle,
    ];

    /// Stable kebab-case name, matching the wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::InvalidScope => "invalid-scope",
            ViolationKind::ShadowedFixture => "shadowed-fixture",
            ViolationKind::RedefinedFixture => "redefined-fixture",
            ViolationKind::UnusedFixture => "unused-fixture",
            ViolationKind::StatefulSessionFixture => "stateful-session-fixture",
            ViolationKind::UnresolvedDependency => "unresolved-dependency",
            ViolationKind::DependencyCycle => "dependency-cycle",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViolationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AnalysisError::UnknownViolationKind {
                name: s.to_string(),
            })
    }
}

// ============================================================================
// Violation
// ============================================================================

/// One finding, anchored at a primary location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    /// Violation category.
    pub kind: ViolationKind,
    /// Anchor location (the definition or declaration being flagged).
    pub primary_location: Location,
    /// Related location (e.g. the shadowed ancestor definition).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_location: Option<Location>,
    /// Human-readable message naming the fixtures involved.
    pub message: String,
}

impl Violation {
    /// Create a violation without a secondary location.
    pub fn new(kind: ViolationKind, primary_location: Location, message: impl Into<String>) -> Self {
        Violation {
            kind,
            primary_location,
            secondary_location: None,
            message: message.into(),
        }
    }

    /// Attach a secondary location.
    pub fn with_secondary(mut self, location: Location) -> Self {
        self.secondary_location = Some(location);
        self
    }

    /// Comparison key for deterministic sorting: location first, then kind.
    fn sort_key(&self) -> (&Location, ViolationKind, &str, &Option<Location>) {
        (
            &self.primary_location,
            self.kind,
            &self.message,
            &self.secondary_location,
        )
    }
}

impl PartialOrd for Violation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Violation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.primary_location, self.message, self.kind)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod kind {
        use super::*;

        #[test]
        fn as_str_round_trips_through_from_str() {
            for kind in ViolationKind::ALL {
                assert_eq!(kind.as_str().parse::<ViolationKind>().unwrap(), kind);
            }
        }

        #[test]
        fn unknown_name_is_an_error() {
            let err = "no-such-kind".parse::<ViolationKind>().unwrap_err();
            assert!(matches!(
                err,
                AnalysisError::UnknownViolationKind { name } if name == "no-such-kind"
            ));
        }

        #[test]
        fn serde_uses_kebab_case() {
            let json = serde_json::to_string(&ViolationKind::InvalidScope).unwrap();
            assert_eq!(json, r#""invalid-scope""#);
            let kind: ViolationKind =
                serde_json::from_str(r#""stateful-session-fixture""#).unwrap();
            assert_eq!(kind, ViolationKind::StatefulSessionFixture);
        }
    }

    mod violation {
        use super::*;

        #[test]
        fn secondary_location_omitted_when_none() {
            let v = Violation::new(
                ViolationKind::UnusedFixture,
                Location::new("conftest.py", 5),
                "fixture 'helper' is defined but never used by any test or fixture",
            );
            let json = serde_json::to_string(&v).unwrap();
            assert!(!json.contains("secondary_location"));
            assert!(json.contains(r#""kind":"unused-fixture""#));
        }

        #[test]
        fn secondary_location_serialized_when_present() {
            let v = Violation::new(
                ViolationKind::ShadowedFixture,
                Location::new("pkg/conftest.py", 3),
                "fixture 'db' is defined in both 'pkg/conftest.py' and 'conftest.py'",
            )
            .with_secondary(Location::new("conftest.py", 8));
            let json = serde_json::to_string(&v).unwrap();
            assert!(json.contains(r#""secondary_location":{"file":"conftest.py","line":8}"#));
        }

        #[test]
        fn sort_is_by_location_then_kind() {
            let early = Violation::new(
                ViolationKind::UnusedFixture,
                Location::new("a.py", 1),
                "x",
            );
            let late = Violation::new(
                ViolationKind::InvalidScope,
                Location::new("b.py", 1),
                "y",
            );
            let mut violations = vec![late.clone(), early.clone()];
            violations.sort();
            assert_eq!(violations, vec![early, late]);
        }
    }
}
