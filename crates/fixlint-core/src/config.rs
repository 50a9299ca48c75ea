//! Analysis configuration.
//!
//! The core consumes configuration as a plain value; discovering and
//! parsing a configuration *file* is the host tool's job, the same way the
//! original extraction and reporting layers are external collaborators.
//! Every field deserializes with a sensible default, so `{}` is a valid
//! configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisResult;
use crate::model::ScopeRanking;
use crate::violation::ViolationKind;

/// Fixture names provided by the host test framework. These are never
/// flagged as unresolved or unused. Mirrors pytest's built-in fixtures.
const DEFAULT_BUILTIN_FIXTURES: &[&str] = &[
    "cache",
    "capfd",
    "capfdbinary",
    "caplog",
    "capsys",
    "capsysbinary",
    "monkeypatch",
    "pytestconfig",
    "record_property",
    "recwarn",
    "request",
    "tmp_path",
    "tmp_path_factory",
    "tmpdir",
    "tmpdir_factory",
];

/// Scope names whose instances are shared across multiple tests. Only
/// fixtures at these scopes are candidates for the shared-mutable-state
/// check; a function-scoped instance is rebuilt per test and cannot leak.
const DEFAULT_SHARED_STATE_SCOPES: &[&str] = &["module", "package", "session"];

/// Configuration for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Names never flagged as unresolved or unused.
    pub builtin_fixture_allowlist: BTreeSet<String>,
    /// Ordered scope vocabulary, narrowest first.
    pub scope_rank_table: ScopeRanking,
    /// Violation kinds to report. Kinds outside this set are still
    /// detected but filtered from the final report.
    pub enabled_violation_kinds: BTreeSet<ViolationKind>,
    /// Scopes whose fixture instances outlive a single test.
    pub shared_state_scopes: BTreeSet<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            builtin_fixture_allowlist: DEFAULT_BUILTIN_FIXTURES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scope_rank_table: ScopeRanking::default(),
            enabled_violation_kinds: ViolationKind::ALL.into_iter().collect(),
            shared_state_scopes: DEFAULT_SHARED_STATE_SCOPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AnalysisConfig {
    /// Check configuration invariants. Called once before a run starts.
    pub fn validate(&self) -> AnalysisResult<()> {
        self.scope_rank_table.validate()
    }

    /// Whether a violation kind should appear in the report.
    pub fn is_enabled(&self, kind: ViolationKind) -> bool {
        self.enabled_violation_kinds.contains(&kind)
    }

    /// Whether a name refers to a framework-provided fixture.
    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtin_fixture_allowlist.contains(name)
    }

    /// Whether fixtures at this scope share one instance across tests.
    pub fn is_shared_scope(&self, scope: &str) -> bool {
        self.shared_state_scopes.contains(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_every_kind() {
        let config = AnalysisConfig::default();
        for kind in ViolationKind::ALL {
            assert!(config.is_enabled(kind), "{kind} should be enabled");
        }
    }

    #[test]
    fn default_allowlist_covers_pytest_builtins() {
        let config = AnalysisConfig::default();
        assert!(config.is_builtin("tmp_path"));
        assert!(config.is_builtin("monkeypatch"));
        assert!(!config.is_builtin("db"));
    }

    #[test]
    fn function_scope_is_not_shared() {
        let config = AnalysisConfig::default();
        assert!(config.is_shared_scope("session"));
        assert!(config.is_shared_scope("module"));
        assert!(!config.is_shared_scope("function"));
        assert!(!config.is_shared_scope("class"));
    }

    #[test]
    fn empty_json_object_deserializes_to_defaults() {
        let config: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.is_builtin("request"));
    }

    #[test]
    fn partial_json_overrides_one_field() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{"enabled_violation_kinds": ["invalid-scope", "unused-fixture"]}"#,
        )
        .unwrap();
        assert!(config.is_enabled(ViolationKind::InvalidScope));
        assert!(!config.is_enabled(ViolationKind::ShadowedFixture));
        // Untouched fields keep their defaults.
        assert!(config.is_builtin("tmp_path"));
    }

    #[test]
    fn validate_rejects_bad_scope_table() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"scope_rank_table": []}"#).unwrap();
        assert!(config.validate().is_err());
    }
}
