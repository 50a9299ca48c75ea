//! Pass 2: independent validators over the finished graph.
//!
//! Each validator is a pure function `(graph, config) -> Vec<Violation>`.
//! None mutates shared state and none depends on another's results, so the
//! orchestrator may run them concurrently once pass 1 completes.

pub mod liveness;
pub mod mutability;
pub mod scope;
pub mod shadow;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::AnalysisConfig;
    use crate::graph::{FixtureGraph, FixtureGraphBuilder};
    use crate::model::{FixtureRecord, TestUsage};

    /// A fixture declared in `dir/conftest.py` (or `conftest.py` at root).
    pub fn fixture(name: &str, scope: &str, dir: &str, line: u32, deps: &[&str]) -> FixtureRecord {
        let file = if dir.is_empty() {
            "conftest.py".to_string()
        } else {
            format!("{dir}/conftest.py")
        };
        FixtureRecord::new(name, scope, file, dir, line)
            .with_dependencies(deps.iter().map(|d| d.to_string()).collect())
    }

    pub fn usage(test_id: &str, file: &str, names: &[&str]) -> TestUsage {
        TestUsage::new(test_id, file, names.iter().map(|n| n.to_string()).collect())
    }

    pub fn build_graph(records: Vec<FixtureRecord>, usages: Vec<TestUsage>) -> FixtureGraph {
        let mut builder = FixtureGraphBuilder::new();
        builder.add_file(records, usages);
        builder.build(&AnalysisConfig::default())
    }
}
