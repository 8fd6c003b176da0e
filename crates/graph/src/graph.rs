//! Module dependency graph builder using petgraph.
//!
//! Nodes are inserted in lexicographic order of their module identifier, so
//! node indices double as the DFS visitation order used by
//! [`decompose`](crate::decompose). An edge `a -> b` means "a depends on b".

use crate::config::{GraphConfig, normalize_module_path};
use crate::{Error, Result};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// A parsed module manifest as yielded by the manifest enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    /// Module directory relative to the repository root (`.` or `./a/b`).
    pub path: String,
    /// The module identifier declared by the manifest.
    pub module: String,
    /// Declared dependency identifiers, in manifest order.
    pub requires: Vec<String>,
}

impl ManifestRecord {
    /// Create a record, normalizing `path` to the `./a/b` form.
    #[must_use]
    pub fn new(
        path: impl AsRef<str>,
        module: impl Into<String>,
        requires: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            path: normalize_module_path(path.as_ref()),
            module: module.into(),
            requires: requires.into_iter().map(Into::into).collect(),
        }
    }
}

/// A node in the module graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Module identifier.
    pub name: String,
    /// Module directory relative to the repository root.
    pub path: String,
    /// Direct intra-repository dependencies, in declaration order.
    pub deps: Vec<String>,
}

/// A module identifier paired with its directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef {
    /// Module identifier.
    pub module: String,
    /// Module directory relative to the repository root.
    pub path: String,
}

impl From<&GraphNode> for ModuleRef {
    fn from(node: &GraphNode) -> Self {
        Self {
            module: node.name.clone(),
            path: node.path.clone(),
        }
    }
}

/// Dependency graph of the modules that live inside one repository.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    root: String,
    graph: DiGraph<GraphNode, ()>,
    name_to_node: HashMap<String, NodeIndex>,
}

impl ModuleGraph {
    /// Build the graph for the repository whose root module is `root`.
    ///
    /// Records that are skipped, or whose identifier falls outside the root
    /// namespace, never become nodes. Declared dependencies that do not name
    /// another node are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateModule`] if two records declare the same
    /// identifier and [`Error::MissingRoot`] if no retained record declares
    /// `root` itself.
    pub fn build<I>(root: &str, records: I, config: &GraphConfig) -> Result<Self>
    where
        I: IntoIterator<Item = ManifestRecord>,
    {
        let mut retained: BTreeMap<String, ManifestRecord> = BTreeMap::new();

        for record in records {
            if config.skip.contains(&record.path) {
                debug!(module = %record.module, path = %record.path, "Skipping manifest");
                continue;
            }
            if !config.namespace_policy.admits(root, &record.module) {
                debug!(module = %record.module, "Module outside root namespace");
                continue;
            }
            match retained.entry(record.module.clone()) {
                Entry::Occupied(existing) => {
                    return Err(Error::duplicate_module(
                        record.module,
                        existing.get().path.clone(),
                        record.path,
                    ));
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }

        if !retained.contains_key(root) {
            return Err(Error::missing_root(root));
        }

        let mut graph = DiGraph::with_capacity(retained.len(), retained.len());
        let mut name_to_node = HashMap::with_capacity(retained.len());

        // BTreeMap iteration gives lexicographic insertion order.
        for (name, record) in &retained {
            let mut deps: Vec<String> = Vec::new();
            for dep in &record.requires {
                if retained.contains_key(dep) && !deps.contains(dep) {
                    deps.push(dep.clone());
                }
            }
            let index = graph.add_node(GraphNode {
                name: name.clone(),
                path: record.path.clone(),
                deps,
            });
            name_to_node.insert(name.clone(), index);
            debug!(module = %name, "Added module node");
        }

        let edges: Vec<(NodeIndex, NodeIndex)> = graph
            .node_indices()
            .flat_map(|from| {
                graph[from]
                    .deps
                    .iter()
                    .map(|dep| (from, name_to_node[dep]))
                    .collect::<Vec<_>>()
            })
            .collect();
        for (from, to) in edges {
            graph.add_edge(from, to, ());
        }

        debug!(
            modules = graph.node_count(),
            edges = graph.edge_count(),
            "Built module graph"
        );

        Ok(Self {
            root: root.to_string(),
            graph,
            name_to_node,
        })
    }

    /// The root module identifier.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Number of modules in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` if the graph has no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Check if a module is part of the graph.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_node.contains_key(name)
    }

    /// Get a node by module identifier.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.name_to_node.get(name).map(|&index| &self.graph[index])
    }

    /// Iterate over all nodes in lexicographic order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// Successor positions for every node, following `deps` order.
    pub(crate) fn adjacency(&self) -> Vec<Vec<usize>> {
        self.graph
            .node_weights()
            .map(|node| {
                node.deps
                    .iter()
                    .map(|dep| self.name_to_node[dep].index())
                    .collect()
            })
            .collect()
    }

    pub(crate) fn node_at(&self, position: usize) -> &GraphNode {
        &self.graph[NodeIndex::new(position)]
    }

    /// All modules reachable from `name`, excluding `name` itself, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownModule`] if `name` is not in the graph.
    pub fn transitive_deps(&self, name: &str) -> Result<Vec<String>> {
        let start = *self
            .name_to_node
            .get(name)
            .ok_or_else(|| Error::unknown_module(name))?;

        let mut reachable = BTreeSet::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(index) = dfs.next(&self.graph) {
            if index != start {
                reachable.insert(self.graph[index].name.clone());
            }
        }
        Ok(reachable.into_iter().collect())
    }

    /// Render the graph in Graphviz DOT format, labelled by module identifier.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let labelled = self.graph.map(|_, node| node.name.as_str(), |_, _| "");
        Dot::with_config(&labelled, &[Config::EdgeNoLabel]).to_string()
    }
}
