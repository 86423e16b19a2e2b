//! Parent links recomputed by traversal.

use alloc::vec::Vec;

use hashbrown::HashMap;

use super::{Accept, Visitor};
use crate::errors::Error;
use crate::node::{NodeId, NodeMeta};

/// Child-to-parent map built by walking a tree.
///
/// Unlike the cached [`Node::parent`](crate::Node::parent) links, the index
/// reflects exactly what the walk saw, so it stays correct after children are
/// moved around by code that forgot to relink them.
#[derive(Debug, Default)]
pub struct ParentIndex {
    parents: HashMap<NodeId, NodeId>,
    stack: Vec<NodeId>,
}

impl ParentIndex {
    /// Walks `root` and records the parent of every node below it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`] when the tree is nested deeper
    /// than the default ceiling.
    pub fn build<N: Accept + ?Sized>(root: &N) -> Result<Self, Error> {
        let mut index = Self::default();
        root.accept(&mut index)?;
        Ok(index)
    }

    /// Returns the parent of `node`, or `None` for the root and unknown nodes.
    #[must_use]
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied()
    }

    /// Iterates from the parent of `node` up to the root.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.parent_of(node), |&id| self.parent_of(id))
    }

    /// Number of nodes with a recorded parent.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns whether no parent links were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl Visitor for ParentIndex {
    fn enter_node(&mut self, meta: &NodeMeta) {
        if let Some(&parent) = self.stack.last() {
            self.parents.insert(meta.id(), parent);
        }
        self.stack.push(meta.id());
    }

    fn leave_node(&mut self, _meta: &NodeMeta) {
        self.stack.pop();
    }
}
