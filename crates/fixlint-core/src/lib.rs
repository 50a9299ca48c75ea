//! Project-wide test fixture analysis.
//!
//! This crate builds a whole-project model of a test suite's shared
//! fixtures and validates it:
//! - Scope lifecycle consistency (no depending on narrower-scoped fixtures)
//! - Hidden overrides (directory-hierarchy shadowing, same-file redefinition)
//! - Dead declarations (fixtures no test or fixture references)
//! - Unsafe shared mutable state (broad-scoped fixtures returning fresh
//!   mutable containers)
//! - Unresolvable dependency names and dependency cycles
//!
//! Per-language extraction, CLI handling, and report formatting are
//! external collaborators: the input is structured [`model::FixtureRecord`]
//! and [`model::TestUsage`] facts, the output is a list of
//! [`violation::Violation`]s. See [`orchestrator::ProjectAnalyzer`] for the
//! entry point.

pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod orchestrator;
pub mod tree;
pub mod types;
pub mod validators;
pub mod violation;
