//! Orchestrator: collect → barrier → validate → merge.
//!
//! [`ProjectAnalyzer`] owns one analysis run. The extraction layer submits
//! per-file output in any order (parallel workers are fine; the analyzer
//! is the single merge point). Nothing is resolved until [`finish`], the
//! hard barrier: any fixture may be referenced before it is textually
//! discovered, so pass 2 cannot start until every file is in. After the
//! barrier the graph is read-only and the four validators run
//! concurrently; the run is equally correct fully sequentially.
//!
//! [`finish`]: ProjectAnalyzer::finish

use std::path::Path;

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::graph::FixtureGraphBuilder;
use crate::model::{normalize_dir, FixtureRecord, TestUsage};
use crate::validators::mutability::{MutabilityClassifier, SyntacticClassifier};
use crate::validators::{liveness, mutability, scope, shadow};
use crate::violation::Violation;

// ============================================================================
// Report Types
// ============================================================================

/// A file whose extraction failed and whose records were dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// Workspace-relative path.
    pub file: String,
    /// Why extraction failed, as reported by the extraction layer.
    pub reason: String,
}

/// The result of one analysis run.
#[derive(Debug)]
pub struct AnalysisReport {
    /// Merged, deterministically ordered, deduplicated violations.
    pub violations: Vec<Violation>,
    /// Files dropped due to extraction failures.
    pub skipped_files: Vec<SkippedFile>,
    /// Number of fixture declarations discovered.
    pub fixture_count: usize,
    /// Number of resolved dependency edges.
    pub edge_count: usize,
}

// ============================================================================
// Project Analyzer
// ============================================================================

/// One analysis run: build once, validate once, discard.
pub struct ProjectAnalyzer {
    config: AnalysisConfig,
    builder: FixtureGraphBuilder,
    skipped: Vec<SkippedFile>,
    classifier: Box<dyn MutabilityClassifier>,
}

impl ProjectAnalyzer {
    /// Create an analyzer. Fails only if the configuration is invalid.
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(ProjectAnalyzer {
            config,
            builder: FixtureGraphBuilder::new(),
            skipped: Vec::new(),
            classifier: Box::new(SyntacticClassifier),
        })
    }

    /// Replace the mutability classification strategy.
    pub fn with_classifier(mut self, classifier: Box<dyn MutabilityClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Submit one file's extraction output.
    ///
    /// The submitted `file` and `directory` are authoritative: they are
    /// stamped onto every record and usage in the call, so a record can
    /// never end up in a directory other than its file's.
    pub fn submit(
        &mut self,
        file: &str,
        directory: &Path,
        records: Vec<FixtureRecord>,
        usages: Vec<TestUsage>,
    ) {
        let directory = normalize_dir(directory);
        tracing::debug!(
            file,
            records = records.len(),
            usages = usages.len(),
            "file submitted"
        );
        let records = records
            .into_iter()
            .map(|mut record| {
                record.defining_file = file.to_string();
                record.defining_directory = directory.clone();
                record
            })
            .collect();
        let usages = usages
            .into_iter()
            .map(|mut usage| {
                usage.file = file.to_string();
                usage
            })
            .collect();
        self.builder.add_file(records, usages);
    }

    /// Record that a file's extraction failed. Its records are dropped;
    /// the run continues and the failure appears in the report.
    pub fn skip_file(&mut self, file: impl Into<String>, reason: impl Into<String>) {
        let skipped = SkippedFile {
            file: file.into(),
            reason: reason.into(),
        };
        tracing::warn!(file = %skipped.file, reason = %skipped.reason, "file skipped");
        self.skipped.push(skipped);
    }

    /// The hard barrier: run pass 1 to completion, then every pass-2
    /// validator over the finished read-only graph, then merge.
    ///
    /// The merged list is filtered by the enabled-kinds set, sorted by
    /// (location, kind, message), and deduplicated, so identical input
    /// always yields an identical violation list.
    pub fn finish(self) -> AnalysisReport {
        let ProjectAnalyzer {
            config,
            builder,
            skipped,
            classifier,
        } = self;

        let graph = builder.build(&config);

        let ((scope_violations, shadow_violations), (liveness_violations, mutability_violations)) =
            rayon::join(
                || {
                    rayon::join(
                        || scope::check(&graph, &config),
                        || shadow::check(&graph, &config),
                    )
                },
                || {
                    rayon::join(
                        || liveness::check(&graph, &config),
                        || mutability::check_with(&graph, &config, classifier.as_ref()),
                    )
                },
            );

        let mut violations: Vec<Violation> = graph.discovery_violations().to_vec();
        violations.extend(scope_violations);
        violations.extend(shadow_violations);
        violations.extend(liveness_violations);
        violations.extend(mutability_violations);
        violations.retain(|violation| config.is_enabled(violation.kind));
        violations.sort();
        violations.dedup();

        tracing::debug!(
            violations = violations.len(),
            skipped = skipped.len(),
            "analysis complete"
        );

        AnalysisReport {
            violations,
            skipped_files: skipped,
            fixture_count: graph.fixture_count(),
            edge_count: graph.edge_count(),
        }
    }
}

impl std::fmt::Debug for ProjectAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectAnalyzer")
            .field("config", &self.config)
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FixtureRecord;
    use crate::violation::ViolationKind;

    fn record(name: &str, scope: &str, line: u32, deps: &[&str]) -> FixtureRecord {
        // File and directory are placeholders; submit() stamps the real ones.
        FixtureRecord::new(name, scope, "", "", line)
            .with_dependencies(deps.iter().map(|d| d.to_string()).collect())
    }

    #[test]
    fn submit_stamps_file_and_directory() {
        let mut analyzer = ProjectAnalyzer::new(AnalysisConfig::default()).unwrap();
        analyzer.submit(
            "pkg/conftest.py",
            Path::new("pkg"),
            vec![record("db", "session", 1, &[])],
            Vec::new(),
        );
        let report = analyzer.finish();
        assert_eq!(report.fixture_count, 1);
        // The unused-fixture violation is anchored at the stamped file.
        assert_eq!(report.violations[0].primary_location.file, "pkg/conftest.py");
    }

    #[test]
    fn skip_file_never_aborts_the_run() {
        let mut analyzer = ProjectAnalyzer::new(AnalysisConfig::default()).unwrap();
        analyzer.skip_file("broken.py", "syntax error at line 3");
        analyzer.submit(
            "conftest.py",
            Path::new(""),
            vec![record("db", "session", 1, &[])],
            vec![TestUsage::new("t.py::test_a", "t.py", vec!["db".to_string()])],
        );
        let report = analyzer.finish();
        assert_eq!(report.skipped_files.len(), 1);
        assert_eq!(report.skipped_files[0].file, "broken.py");
        assert!(report.violations.is_empty());
    }

    #[test]
    fn disabled_kinds_are_filtered_from_the_report() {
        let mut config = AnalysisConfig::default();
        config
            .enabled_violation_kinds
            .remove(&ViolationKind::UnusedFixture);
        let mut analyzer = ProjectAnalyzer::new(config).unwrap();
        analyzer.submit(
            "conftest.py",
            Path::new(""),
            vec![record("helper", "function", 4, &[])],
            Vec::new(),
        );
        let report = analyzer.finish();
        assert!(report.violations.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"scope_rank_table": []}"#).unwrap();
        assert!(ProjectAnalyzer::new(config).is_err());
    }
}
