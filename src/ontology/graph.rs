//! Class hierarchy stored as a petgraph [`DiGraph`].
//!
//! Edges point from child to parent (`child is_a parent`), so outgoing
//! neighbors are parents and incoming neighbors are children. The graph is
//! trusted to be acyclic; no cycle detection is performed.
//!
//! Queries against identities that are not part of the graph return empty
//! sets: an unknown class and a class without relatives look the same to
//! callers.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use petgraph::{
    graph::{DiGraph, NodeIndex},
    Direction,
};

use super::{entities::OntologyNode, value_objects::ClassId};

#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    inner: DiGraph<OntologyNode, ()>,
    index: HashMap<ClassId, NodeIndex>,
}

impl OntologyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            inner: DiGraph::with_capacity(nodes, edges),
            index: HashMap::with_capacity(nodes),
        }
    }

    /// Inserts a labeled class.
    ///
    /// An existing placeholder takes the supplied name; an already labeled
    /// class keeps its first label. Returns `true` when the name was recorded.
    pub fn add_node(&mut self, id: ClassId, name: impl Into<String>) -> bool {
        if let Some(&idx) = self.index.get(&id) {
            return self.inner[idx].apply_label(name);
        }
        let idx = self.inner.add_node(OntologyNode::new(id.clone(), name));
        self.index.insert(id, idx);
        true
    }

    /// Returns the node for `id`, creating an unnamed placeholder if needed.
    pub fn get_or_create_node(&mut self, id: &ClassId) -> &mut OntologyNode {
        let idx = self.upsert(id);
        &mut self.inner[idx]
    }

    /// Inserts the edge `child -> parent`, upserting both endpoints.
    ///
    /// Returns `false` when the edge already existed.
    pub fn add_edge(&mut self, child: &ClassId, parent: &ClassId) -> bool {
        let child_idx = self.upsert(child);
        let parent_idx = self.upsert(parent);
        if self.inner.contains_edge(child_idx, parent_idx) {
            return false;
        }
        self.inner.add_edge(child_idx, parent_idx, ());
        true
    }

    fn upsert(&mut self, id: &ClassId) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.inner.add_node(OntologyNode::placeholder(id.clone()));
        self.index.insert(id.clone(), idx);
        idx
    }

    #[must_use]
    pub fn contains(&self, id: &ClassId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn node(&self, id: &ClassId) -> Option<&OntologyNode> {
        self.index.get(id).map(|&idx| &self.inner[idx])
    }

    /// Iterates over every node in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &OntologyNode> + '_ {
        self.inner.node_weights()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Direct parents of `id`.
    #[must_use]
    pub fn parents(&self, id: &ClassId) -> BTreeSet<ClassId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Direct children of `id`.
    #[must_use]
    pub fn children(&self, id: &ClassId) -> BTreeSet<ClassId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// All subsumers of `id`, including `id` itself.
    #[must_use]
    pub fn ancestors(&self, id: &ClassId) -> BTreeSet<ClassId> {
        self.relatives(id, Direction::Outgoing)
    }

    /// All descendants of `id`, including `id` itself.
    #[must_use]
    pub fn descendants(&self, id: &ClassId) -> BTreeSet<ClassId> {
        self.relatives(id, Direction::Incoming)
    }

    /// Classes without parents, in identifier order.
    #[must_use]
    pub fn roots(&self) -> Vec<ClassId> {
        let mut roots: Vec<ClassId> = self
            .inner
            .node_indices()
            .filter(|&idx| {
                self.inner
                    .neighbors_directed(idx, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|idx| self.inner[idx].id().clone())
            .collect();
        roots.sort();
        roots
    }

    /// Walks up from the smallest identifier, always following the smallest
    /// parent, until a class without parents is reached.
    ///
    /// On a graph with several parentless classes only the one reachable
    /// from the start is returned. Returns `None` on an empty graph.
    #[must_use]
    pub fn find_root(&self) -> Option<ClassId> {
        let mut current = self.index.keys().min()?.clone();
        loop {
            match self.parents(&current).into_iter().next() {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    fn neighbors(&self, id: &ClassId, direction: Direction) -> BTreeSet<ClassId> {
        let Some(&idx) = self.index.get(id) else {
            return BTreeSet::new();
        };
        self.inner
            .neighbors_directed(idx, direction)
            .map(|neighbor| self.inner[neighbor].id().clone())
            .collect()
    }

    fn relatives(&self, id: &ClassId, direction: Direction) -> BTreeSet<ClassId> {
        let Some(&idx) = self.index.get(id) else {
            return BTreeSet::new();
        };
        self.closure(idx, direction)
            .into_iter()
            .map(|relative| self.inner[relative].id().clone())
            .collect()
    }

    pub(crate) fn index_of(&self, id: &ClassId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &OntologyNode {
        &self.inner[idx]
    }

    pub(crate) fn node_at_mut(&mut self, idx: NodeIndex) -> &mut OntologyNode {
        &mut self.inner[idx]
    }

    pub(crate) fn indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.inner.node_indices()
    }

    pub(crate) fn ancestor_indices(&self, idx: NodeIndex) -> HashSet<NodeIndex> {
        self.closure(idx, Direction::Outgoing)
    }

    pub(crate) fn descendant_indices(&self, idx: NodeIndex) -> HashSet<NodeIndex> {
        self.closure(idx, Direction::Incoming)
    }

    /// Breadth-first closure starting at (and including) `start`.
    fn closure(&self, start: NodeIndex, direction: Direction) -> HashSet<NodeIndex> {
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for next in self.inner.neighbors_directed(current, direction) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        visited
    }
}
