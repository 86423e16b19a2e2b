//! Identity, parent links and attributes shared by every AST node.
//!
//! Child slots own their children exclusively. The `parent` field is a cached,
//! non-owning navigation aid: setters install it on the child they store and
//! clear it on the child they hand back. [`ParentIndex`](crate::ParentIndex)
//! recomputes the same links by traversal when the cache cannot be trusted.

mod attributes;
mod id;

use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt::{self, Debug};

pub use attributes::{AttributeValue, Attributes, FORMAT_BODY_BEFORE_COMMENT};
pub use id::NodeId;

/// Bookkeeping embedded in every node.
///
/// Cloning a `NodeMeta` yields a fresh identity with no parent and no
/// attributes: a clone is a new, detached node.
pub struct NodeMeta {
    id: NodeId,
    parent: Option<NodeId>,
    attributes: Attributes,
}

impl NodeMeta {
    /// Creates bookkeeping for a new detached node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NodeId::fresh(),
            parent: None,
            attributes: Attributes::default(),
        }
    }

    /// Returns the node identity.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the cached parent link.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Overwrites the cached parent link without any validation.
    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// Returns the attribute bag.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the attribute bag mutably.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

impl Default for NodeMeta {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for NodeMeta {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl Debug for NodeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("NodeMeta");
        debug.field("id", &self.id).field("parent", &self.parent);
        if !self.attributes.is_empty() {
            debug.field("attributes", &self.attributes);
        }
        debug.finish()
    }
}

/// Capabilities every AST node has.
pub trait Node {
    /// Returns the node bookkeeping.
    fn meta(&self) -> &NodeMeta;

    /// Returns the node bookkeeping mutably.
    fn meta_mut(&mut self) -> &mut NodeMeta;

    /// Returns the node identity.
    fn node_id(&self) -> NodeId {
        self.meta().id()
    }

    /// Returns the identity of the node that last adopted this one.
    fn parent(&self) -> Option<NodeId> {
        self.meta().parent()
    }

    /// Installs a parent link. The would-be parent is not consulted.
    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.meta_mut().set_parent(parent);
    }

    /// Reads an attribute of type `T`.
    fn attribute<T: Any>(&self, key: &str) -> Option<&T>
    where
        Self: Sized,
    {
        self.meta().attributes().get(key)
    }

    /// Reads an attribute of type `T` mutably.
    fn attribute_mut<T: Any>(&mut self, key: &str) -> Option<&mut T>
    where
        Self: Sized,
    {
        self.meta_mut().attributes_mut().get_mut(key)
    }

    /// Stores an attribute, returning the value it displaced.
    fn put_attribute<T: Any + Send + Sync>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Option<AttributeValue>
    where
        Self: Sized,
    {
        self.meta_mut().attributes_mut().insert(key, value)
    }

    /// Removes an attribute.
    fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.meta_mut().attributes_mut().remove(key)
    }
}

impl<N: Node + ?Sized> Node for alloc::boxed::Box<N> {
    fn meta(&self) -> &NodeMeta {
        N::meta(self)
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        N::meta_mut(self)
    }
}

/// Links `child` to `parent` and returns it.
pub(crate) fn adopt<N: Node>(parent: NodeId, mut child: N) -> N {
    child.set_parent(Some(parent));
    child
}

/// Clears the parent link of `child` and returns it.
pub(crate) fn release<N: Node>(mut child: N) -> N {
    child.set_parent(None);
    child
}

/// Stores `value` in `slot` under `owner`, returning the previous occupant detached.
pub(crate) fn swap_slot<N: Node>(
    owner: NodeId,
    slot: &mut Option<N>,
    value: Option<N>,
) -> Option<N> {
    core::mem::replace(slot, value.map(|child| adopt(owner, child))).map(release)
}

/// Re-links every child in `children` to `owner`.
pub(crate) fn adopt_all<N: Node>(owner: NodeId, children: &mut [N]) {
    for child in children {
        child.set_parent(Some(owner));
    }
}

/// Detaches and returns every child of `children`.
pub(crate) fn release_all<N: Node>(children: Vec<N>) -> Vec<N> {
    children.into_iter().map(release).collect()
}
