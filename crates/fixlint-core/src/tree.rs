//! Directory scope tree: hierarchy-aware fixture name resolution.
//!
//! Mirrors the project directory layout and answers "which fixture named X
//! applies to a file in directory D?". Resolution walks from D up to the
//! project root; the nearest directory defining the name wins, and every
//! further ancestor that also defines it is reported as part of the shadow
//! chain.
//!
//! Directories are workspace-relative; the empty path is the project root.
//! Nodes are created on registration, including empty intermediate nodes,
//! so parent links always reach the root.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::{normalize_dir, FixtureId};

// ============================================================================
// Node Types
// ============================================================================

/// Identifier of a directory node within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One directory in the project hierarchy and the fixtures declared in it.
#[derive(Debug)]
pub struct DirectoryNode {
    /// Normalized workspace-relative path.
    pub path: PathBuf,
    /// Parent directory; `None` only for the tree root.
    pub parent: Option<NodeId>,
    /// Declarations by name, in registration order. A name may appear more
    /// than once when the same directory redefines it.
    pub locals: HashMap<String, Vec<FixtureId>>,
}

impl DirectoryNode {
    /// The declaration that wins resolution for `name` in this directory:
    /// the latest registration, matching source order.
    pub fn winner(&self, name: &str) -> Option<FixtureId> {
        self.locals.get(name).and_then(|decls| decls.last().copied())
    }

    /// All declarations of `name` in this directory, in registration order.
    pub fn declarations(&self, name: &str) -> &[FixtureId] {
        self.locals.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Outcome of resolving a fixture name from a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The name is defined on the ancestor chain.
    Found {
        /// Winning declaration in the nearest defining directory.
        nearest: FixtureId,
        /// Winning declarations in further ancestors that also define the
        /// name, nearest first. Used for shadow detection.
        ancestor_matches: Vec<FixtureId>,
    },
    /// No directory on the chain defines the name.
    NotFound,
}

impl Resolution {
    /// The winning declaration, if any.
    pub fn nearest(&self) -> Option<FixtureId> {
        match self {
            Resolution::Found { nearest, .. } => Some(*nearest),
            Resolution::NotFound => None,
        }
    }
}

// ============================================================================
// Tree
// ============================================================================

/// The project's directory hierarchy with per-directory fixture tables.
///
/// Built once per analysis run by the graph builder; read-only afterward.
#[derive(Debug, Default)]
pub struct DirectoryScopeTree {
    nodes: Vec<DirectoryNode>,
    index: HashMap<PathBuf, NodeId>,
}

impl DirectoryScopeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        DirectoryScopeTree::default()
    }

    /// Record that the fixture `name` (declaration `id`) is declared in
    /// `directory`. Same-directory redefinitions append rather than
    /// replace, preserving them for later reporting.
    pub fn register(&mut self, directory: &Path, name: &str, id: FixtureId) {
        let node_id = self.ensure_node(&normalize_dir(directory));
        self.nodes[node_id.index()]
            .locals
            .entry(name.to_string())
            .or_default()
            .push(id);
    }

    /// Resolve `name` starting from `from` and walking up to the root.
    pub fn resolve(&self, from: &Path, name: &str) -> Resolution {
        let from = normalize_dir(from);
        let mut matches = Vec::new();
        for ancestor in from.ancestors() {
            let Some(&node_id) = self.index.get(ancestor) else {
                continue;
            };
            if let Some(id) = self.nodes[node_id.index()].winner(name) {
                matches.push(id);
            }
        }
        match matches.split_first() {
            Some((&nearest, rest)) => Resolution::Found {
                nearest,
                ancestor_matches: rest.to_vec(),
            },
            None => Resolution::NotFound,
        }
    }

    /// Resolve `name` starting strictly above `from`: the walk begins at
    /// the parent directory, so every declaration in `from` itself is
    /// skipped.
    ///
    /// Used when a fixture requests its own name: the request resolves past
    /// the requesting directory to the next-outer definition, matching the
    /// host framework's parent-override semantics.
    pub fn resolve_above(&self, from: &Path, name: &str) -> Resolution {
        let from = normalize_dir(from);
        match from.parent() {
            Some(parent) => self.resolve(parent, name),
            None => Resolution::NotFound,
        }
    }

    /// Look up a node by directory path.
    pub fn node_at(&self, directory: &Path) -> Option<&DirectoryNode> {
        self.index
            .get(&normalize_dir(directory))
            .map(|id| &self.nodes[id.index()])
    }

    /// Node lookup by ID.
    pub fn node(&self, id: NodeId) -> &DirectoryNode {
        &self.nodes[id.index()]
    }

    /// Iterate all nodes with their IDs, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DirectoryNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Whether `ancestor` lies strictly above `node` on the parent chain.
    pub fn is_strict_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes[node.index()].parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.index()].parent;
        }
        false
    }

    /// The nearest strict ancestor of `node` defining `name`, with its
    /// winning declaration.
    pub fn nearest_ancestor_defining(&self, node: NodeId, name: &str) -> Option<(NodeId, FixtureId)> {
        let mut current = self.nodes[node.index()].parent;
        while let Some(id) = current {
            if let Some(winner) = self.nodes[id.index()].winner(name) {
                return Some((id, winner));
            }
            current = self.nodes[id.index()].parent;
        }
        None
    }

    fn ensure_node(&mut self, dir: &Path) -> NodeId {
        if let Some(&id) = self.index.get(dir) {
            return id;
        }
        let parent = dir.parent().map(|p| self.ensure_node(p));
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(DirectoryNode {
            path: dir.to_path_buf(),
            parent,
            locals: HashMap::new(),
        });
        self.index.insert(dir.to_path_buf(), id);
        id
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(entries: &[(&str, &str, u32)]) -> DirectoryScopeTree {
        let mut tree = DirectoryScopeTree::new();
        for (dir, name, id) in entries {
            tree.register(Path::new(dir), name, FixtureId::new(*id));
        }
        tree
    }

    mod registration {
        use super::*;

        #[test]
        fn intermediate_directories_are_materialized() {
            let tree = tree_with(&[("pkg/sub/deep", "db", 0)]);
            assert!(tree.node_at(Path::new("pkg/sub/deep")).is_some());
            assert!(tree.node_at(Path::new("pkg/sub")).is_some());
            assert!(tree.node_at(Path::new("pkg")).is_some());
            assert!(tree.node_at(Path::new("")).is_some());
        }

        #[test]
        fn same_directory_redefinition_appends() {
            let tree = tree_with(&[("", "db", 0), ("", "db", 1)]);
            let node = tree.node_at(Path::new("")).unwrap();
            assert_eq!(
                node.declarations("db"),
                &[FixtureId::new(0), FixtureId::new(1)]
            );
            assert_eq!(node.winner("db"), Some(FixtureId::new(1)));
        }

        #[test]
        fn dot_prefixed_directory_is_normalized() {
            let tree = tree_with(&[("./pkg", "db", 0)]);
            assert!(tree.node_at(Path::new("pkg")).is_some());
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn nearest_definition_wins() {
            let tree = tree_with(&[("", "db", 0), ("pkg", "db", 1)]);
            let resolution = tree.resolve(Path::new("pkg"), "db");
            assert_eq!(
                resolution,
                Resolution::Found {
                    nearest: FixtureId::new(1),
                    ancestor_matches: vec![FixtureId::new(0)],
                }
            );
        }

        #[test]
        fn root_definition_reaches_deep_directories() {
            let tree = tree_with(&[("", "db", 0)]);
            let resolution = tree.resolve(Path::new("pkg/sub/deep"), "db");
            assert_eq!(resolution.nearest(), Some(FixtureId::new(0)));
        }

        #[test]
        fn sibling_directories_do_not_leak() {
            let tree = tree_with(&[("pkg_a", "db", 0)]);
            assert_eq!(tree.resolve(Path::new("pkg_b"), "db"), Resolution::NotFound);
        }

        #[test]
        fn unknown_name_is_not_found() {
            let tree = tree_with(&[("", "db", 0)]);
            assert_eq!(tree.resolve(Path::new(""), "ghost"), Resolution::NotFound);
        }

        #[test]
        fn shadow_chain_lists_all_further_ancestors() {
            let tree = tree_with(&[("", "db", 0), ("pkg", "db", 1), ("pkg/sub", "db", 2)]);
            let resolution = tree.resolve(Path::new("pkg/sub"), "db");
            assert_eq!(
                resolution,
                Resolution::Found {
                    nearest: FixtureId::new(2),
                    ancestor_matches: vec![FixtureId::new(1), FixtureId::new(0)],
                }
            );
        }

        #[test]
        fn resolve_above_skips_the_starting_directory() {
            let tree = tree_with(&[("", "db", 0), ("pkg", "db", 1)]);
            let resolution = tree.resolve_above(Path::new("pkg"), "db");
            assert_eq!(resolution.nearest(), Some(FixtureId::new(0)));
        }

        #[test]
        fn resolve_above_skips_every_declaration_in_the_directory() {
            // Two declarations in pkg; neither is visible from above pkg.
            let tree = tree_with(&[("", "db", 0), ("pkg", "db", 1), ("pkg", "db", 2)]);
            let resolution = tree.resolve_above(Path::new("pkg"), "db");
            assert_eq!(resolution.nearest(), Some(FixtureId::new(0)));
        }

        #[test]
        fn resolve_above_the_root_is_not_found() {
            let tree = tree_with(&[("", "db", 0)]);
            assert_eq!(tree.resolve_above(Path::new(""), "db"), Resolution::NotFound);
        }
    }

    mod ancestry {
        use super::*;

        #[test]
        fn strict_ancestor_checks_follow_parent_links() {
            let tree = tree_with(&[("pkg/sub", "db", 0), ("other", "db", 1)]);
            let find = |path: &str| {
                tree.nodes()
                    .find(|(_, n)| n.path == Path::new(path))
                    .map(|(id, _)| id)
                    .unwrap()
            };
            let root = find("");
            let pkg = find("pkg");
            let sub = find("pkg/sub");
            let other = find("other");
            assert!(tree.is_strict_ancestor(root, sub));
            assert!(tree.is_strict_ancestor(pkg, sub));
            assert!(!tree.is_strict_ancestor(sub, sub));
            assert!(!tree.is_strict_ancestor(other, sub));
        }

        #[test]
        fn nearest_ancestor_defining_skips_empty_levels() {
            let tree = tree_with(&[("", "db", 0), ("pkg/sub", "db", 2)]);
            let sub = tree
                .nodes()
                .find(|(_, n)| n.path == Path::new("pkg/sub"))
                .map(|(id, _)| id)
                .unwrap();
            let (node_id, winner) = tree.nearest_ancestor_defining(sub, "db").unwrap();
            assert_eq!(tree.node(node_id).path, Path::new(""));
            assert_eq!(winner, FixtureId::new(0));
        }
    }
}
