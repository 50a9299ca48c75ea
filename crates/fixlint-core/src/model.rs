//! Data model: immutable facts produced by the external extraction layer.
//!
//! This module provides the input records for fixture analysis:
//! - [`FixtureRecord`]: one fixture declaration (name, scope, dependencies)
//! - [`TestUsage`]: the fixture names a test requests, prior to resolution
//! - [`ReturnShape`]: syntactic hint about a fixture's return value
//! - [`ScopeRanking`]: ordered scope vocabulary (narrowest first)
//!
//! Records are created once per analysis run and never mutated afterward.
//! Per-language extraction is an external collaborator; nothing in this
//! crate parses source text.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::Location;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a fixture record within one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FixtureId(pub u32);

impl FixtureId {
    /// Create a new fixture ID.
    pub fn new(id: u32) -> Self {
        FixtureId(id)
    }

    /// Index into the run's record table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fix_{}", self.0)
    }
}

// ============================================================================
// Return Shape
// ============================================================================

/// Syntactic hint describing what a fixture's body returns.
///
/// Produced by the extraction layer from the return (or yield) expression.
/// Consumed only by the mutability classifier; the hint is best-effort and
/// deliberately coarse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReturnShape {
    /// A bare list literal (e.g. `[1, 2]` or `[]`).
    ListLiteral,
    /// A bare dict/map literal.
    DictLiteral,
    /// A bare set literal.
    SetLiteral,
    /// A numeric or boolean literal.
    ScalarLiteral,
    /// A string literal.
    StringLiteral,
    /// A call expression; `qualname` is the called name as written
    /// (e.g. `"dict"` or `"sqlalchemy.create_engine"`).
    ConstructorCall { qualname: String },
    /// The fixture yields a managed resource rather than returning a value.
    YieldedResource,
    /// Anything the extraction layer could not classify.
    #[default]
    Unknown,
}

// ============================================================================
// Fixture Record
// ============================================================================

/// One fixture declaration discovered by the extraction layer.
///
/// Immutable once created. `scope` is a scope *name*; its lifetime rank
/// comes from the configured [`ScopeRanking`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureRecord {
    /// Fixture name as declared.
    pub name: String,
    /// Scope name (e.g. "function", "session").
    pub scope: String,
    /// Whether the fixture activates implicitly, without explicit reference.
    #[serde(default)]
    pub autouse: bool,
    /// Dependency names as written in the declaration, in order.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Workspace-relative path of the defining file.
    pub defining_file: String,
    /// Workspace-relative directory the declaration belongs to.
    pub defining_directory: PathBuf,
    /// Declaration line (1-indexed).
    pub line: u32,
    /// Syntactic hint about the returned value.
    #[serde(default)]
    pub return_shape: ReturnShape,
}

impl FixtureRecord {
    /// Create a record with defaults: not autouse, no dependencies,
    /// unknown return shape.
    pub fn new(
        name: impl Into<String>,
        scope: impl Into<String>,
        defining_file: impl Into<String>,
        defining_directory: impl Into<PathBuf>,
        line: u32,
    ) -> Self {
        FixtureRecord {
            name: name.into(),
            scope: scope.into(),
            autouse: false,
            dependencies: Vec::new(),
            defining_file: defining_file.into(),
            defining_directory: defining_directory.into(),
            line,
            return_shape: ReturnShape::Unknown,
        }
    }

    /// Set the declared dependency names.
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Mark the fixture as autouse.
    pub fn with_autouse(mut self, autouse: bool) -> Self {
        self.autouse = autouse;
        self
    }

    /// Set the return shape hint.
    pub fn with_return_shape(mut self, return_shape: ReturnShape) -> Self {
        self.return_shape = return_shape;
        self
    }

    /// Location of the declaration.
    pub fn location(&self) -> Location {
        Location::new(self.defining_file.clone(), self.line)
    }
}

// ============================================================================
// Test Usage
// ============================================================================

/// Every fixture name a test (or test-like consumer) references, prior to
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestUsage {
    /// Stable test identifier (e.g. `"tests/test_api.py::test_create"`).
    pub test_id: String,
    /// Workspace-relative file the test lives in.
    pub file: String,
    /// Requested fixture names, in signature order.
    pub requested_names: Vec<String>,
}

impl TestUsage {
    /// Create a usage record.
    pub fn new(
        test_id: impl Into<String>,
        file: impl Into<String>,
        requested_names: Vec<String>,
    ) -> Self {
        TestUsage {
            test_id: test_id.into(),
            file: file.into(),
            requested_names,
        }
    }
}

// ============================================================================
// Scope Ranking
// ============================================================================

/// Ordered scope vocabulary, narrowest lifetime first.
///
/// The default mirrors pytest: `function < class < module < package <
/// session`. A host framework with its own vocabulary supplies its own
/// table; the ordering invariant (a fixture may depend only on same-or-
/// broader-scoped fixtures) is preserved regardless of the names.
///
/// Unknown scope names rank as narrowest, matching the host framework's
/// behavior of defaulting unrecognized scopes to per-test lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeRanking {
    names: Vec<String>,
}

impl Default for ScopeRanking {
    fn default() -> Self {
        ScopeRanking {
            names: ["function", "class", "module", "package", "session"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ScopeRanking {
    /// Create a ranking from an ordered list of scope names.
    pub fn new(names: Vec<String>) -> AnalysisResult<Self> {
        let ranking = ScopeRanking { names };
        ranking.validate()?;
        Ok(ranking)
    }

    /// Check the table invariants: non-empty, no duplicate names.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.names.is_empty() {
            return Err(AnalysisError::EmptyScopeTable);
        }
        for (i, name) in self.names.iter().enumerate() {
            if self.names[..i].contains(name) {
                return Err(AnalysisError::DuplicateScope { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Lifetime rank of a scope name. Higher means broader. Unknown names
    /// rank 0 (narrowest).
    pub fn rank(&self, scope: &str) -> usize {
        self.names.iter().position(|n| n == scope).unwrap_or(0)
    }

    /// Compare two scope names by lifetime.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }

    /// The ordered scope names, narrowest first.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Normalize a workspace-relative directory path.
///
/// Drops `.` components so `"./pkg"` and `"pkg"` address the same tree
/// node; `""` and `"."` both mean the project root.
pub(crate) fn normalize_dir(dir: &Path) -> PathBuf {
    use std::path::Component;
    dir.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
