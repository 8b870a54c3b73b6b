//! Append-only directed acyclic graph keyed by content hash.
//!
//! Every parent of a vertex must already be present when the vertex is
//! inserted, so the stored structure is acyclic by construction and the
//! insertion order is a topological order. There is no update or delete:
//! new information enters only as new vertices.

use crate::{DagError, Hash, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A vertex: an identifier, an owned value and the ids it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex<V> {
    id: Hash,
    value: V,
    parents: BTreeSet<Hash>,
}

impl<V> Vertex<V> {
    pub fn new(id: Hash, value: V, parents: impl IntoIterator<Item = Hash>) -> Self {
        Self {
            id,
            value,
            parents: parents.into_iter().collect(),
        }
    }

    pub fn id(&self) -> &Hash {
        &self.id
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn parents(&self) -> &BTreeSet<Hash> {
        &self.parents
    }

    pub fn into_value(self) -> V {
        self.value
    }
}

/// Generic append-only DAG.
#[derive(Debug, Clone)]
pub struct Dag<V> {
    vertices: HashMap<Hash, Vertex<V>>,
    /// Ids in insertion order
    order: Vec<Hash>,
    /// Reverse edges: parent id -> ids of vertices referencing it
    children: HashMap<Hash, Vec<Hash>>,
}

impl<V> Default for Dag<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Dag<V> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            vertices: HashMap::new(),
            order: Vec::new(),
            children: HashMap::new(),
        }
    }

    /// Create a graph holding a single root vertex.
    ///
    /// A root that declares parents can never be satisfied and is rejected
    /// with [`DagError::UnknownParent`].
    pub fn with_root(root: Vertex<V>) -> Result<Self> {
        let mut dag = Self::new();
        dag.add_vertex(root)?;
        Ok(dag)
    }

    /// Insert a vertex. The graph is left untouched on error.
    pub fn add_vertex(&mut self, vertex: Vertex<V>) -> Result<()> {
        if self.vertices.contains_key(&vertex.id) {
            return Err(DagError::DuplicateId(vertex.id));
        }
        if let Some(missing) = vertex
            .parents
            .iter()
            .find(|p| !self.vertices.contains_key(p))
        {
            return Err(DagError::UnknownParent(*missing));
        }

        for parent in &vertex.parents {
            self.children.entry(*parent).or_default().push(vertex.id);
        }
        self.order.push(vertex.id);
        self.vertices.insert(vertex.id, vertex);
        Ok(())
    }

    pub fn get(&self, id: &Hash) -> Option<&Vertex<V>> {
        self.vertices.get(id)
    }

    pub fn value(&self, id: &Hash) -> Option<&V> {
        self.vertices.get(id).map(Vertex::value)
    }

    pub fn contains(&self, id: &Hash) -> bool {
        self.vertices.contains_key(id)
    }

    /// Every inserted id exactly once, in insertion order.
    pub fn ids(&self) -> &[Hash] {
        &self.order
    }

    /// Vertices in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Vertex<V>> {
        self.order.iter().filter_map(|id| self.vertices.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids of vertices that list `id` as a parent.
    pub fn children(&self, id: &Hash) -> &[Hash] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Transitive parents of `id`, excluding `id` itself.
    pub fn ancestors(&self, id: &Hash) -> HashSet<Hash> {
        let mut result = HashSet::new();
        let mut stack = vec![*id];
        while let Some(current) = stack.pop() {
            if let Some(vertex) = self.vertices.get(&current) {
                for parent in &vertex.parents {
                    if result.insert(*parent) {
                        stack.push(*parent);
                    }
                }
            }
        }
        result
    }

    /// True if `ancestor` is reachable from `descendant` through parent edges.
    pub fn is_ancestor(&self, ancestor: &Hash, descendant: &Hash) -> bool {
        if ancestor == descendant {
            return false;
        }
        let mut visited = HashSet::new();
        let mut stack = vec![*descendant];
        while let Some(current) = stack.pop() {
            let Some(vertex) = self.vertices.get(&current) else {
                continue;
            };
            for parent in &vertex.parents {
                if parent == ancestor {
                    return true;
                }
                if visited.insert(*parent) {
                    stack.push(*parent);
                }
            }
        }
        false
    }

    /// True if either vertex is an ancestor of the other.
    pub fn related(&self, a: &Hash, b: &Hash) -> bool {
        self.is_ancestor(a, b) || self.is_ancestor(b, a)
    }
}
