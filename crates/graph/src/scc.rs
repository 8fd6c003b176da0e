//! Strongly connected components via Tarjan's algorithm.
//!
//! The visitor keeps its discovery state in per-run tables and drives the DFS
//! with an explicit work stack, so no state survives between runs and depth is
//! bounded by the heap rather than the call stack.

use crate::ModuleGraph;
use crate::graph::ModuleRef;
use std::collections::BTreeSet;
use tracing::debug;

/// One strongly connected component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Members in stack-pop order.
    pub members: Vec<ModuleRef>,
    /// `true` for a multi-member component or a self-looped singleton.
    pub cyclic: bool,
}

impl Component {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the component has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The components of a graph in emission order, dependencies first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    /// Components in the order Tarjan's algorithm finalized them.
    pub components: Vec<Component>,
    /// Identifiers of every module that takes part in a cycle.
    pub circular: BTreeSet<String>,
}

/// Partition `graph` into strongly connected components.
#[must_use]
pub fn decompose(graph: &ModuleGraph) -> Decomposition {
    let decomposition = TarjanVisitor::new(graph).run();
    debug!(
        components = decomposition.components.len(),
        circular = decomposition.circular.len(),
        "Decomposed module graph"
    );
    decomposition
}

struct TarjanVisitor<'g> {
    graph: &'g ModuleGraph,
    adjacency: Vec<Vec<usize>>,
    index: Vec<Option<usize>>,
    scc_root: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    decomposition: Decomposition,
}

impl<'g> TarjanVisitor<'g> {
    fn new(graph: &'g ModuleGraph) -> Self {
        let len = graph.len();
        Self {
            graph,
            adjacency: graph.adjacency(),
            index: vec![None; len],
            scc_root: vec![0; len],
            on_stack: vec![false; len],
            stack: Vec::with_capacity(len),
            next_index: 0,
            decomposition: Decomposition::default(),
        }
    }

    fn run(mut self) -> Decomposition {
        for node in 0..self.adjacency.len() {
            if self.index[node].is_none() {
                self.visit(node);
            }
        }
        self.decomposition
    }

    fn discover(&mut self, node: usize) {
        self.index[node] = Some(self.next_index);
        self.scc_root[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    fn visit(&mut self, start: usize) {
        // (node, position of the next edge to follow)
        let mut work: Vec<(usize, usize)> = vec![(start, 0)];
        self.discover(start);

        while let Some(&(node, edge)) = work.last() {
            if let Some(&dep) = self.adjacency[node].get(edge) {
                if let Some(frame) = work.last_mut() {
                    frame.1 += 1;
                }
                if self.index[dep].is_none() {
                    self.discover(dep);
                    work.push((dep, 0));
                } else if self.on_stack[dep] {
                    self.scc_root[node] = self.scc_root[node].min(self.scc_root[dep]);
                }
                continue;
            }

            work.pop();
            if self.index[node] == Some(self.scc_root[node]) {
                self.emit(node);
            }
            if let Some(&(parent, _)) = work.last() {
                self.scc_root[parent] = self.scc_root[parent].min(self.scc_root[node]);
            }
        }
    }

    fn emit(&mut self, root: usize) {
        let mut members = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member] = false;
            members.push(member);
            if member == root {
                break;
            }
        }

        let cyclic = members.len() > 1 || self.adjacency[root].contains(&root);
        let members: Vec<ModuleRef> = members
            .into_iter()
            .map(|m| ModuleRef::from(self.graph.node_at(m)))
            .collect();

        if cyclic {
            self.decomposition
                .circular
                .extend(members.iter().map(|m| m.module.clone()));
        }
        self.decomposition
            .components
            .push(Component { members, cyclic });
    }
}
