//! Extension point for table-source kinds defined by dialect crates.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::any::Any;
use core::fmt::Debug;
use core::hash::Hasher;

use super::TableSourceCommon;
use crate::errors::Error;
use crate::expr::SqlExpr;
use crate::node::{Node, NodeId};
use crate::normalize::Normalizer;
use crate::replace::Replacement;
use crate::visitor::{Depth, Visitor};

/// A table-source kind the core does not know about.
///
/// Implementors keep their identity, alias, hints and flashback in a
/// [`TableSourceCommon`] and expose it through [`Self::common`], which is how
/// the shared table-source capabilities reach them.
///
/// Cloning is opt-in: the default [`Self::try_clone_boxed`] refuses with
/// [`Error::CloneUnsupported`] naming [`Self::variant_name`].
pub trait DialectTableSource: Debug + Send + Sync + Any {
    /// Stable name of the kind, used in errors and by visitors.
    fn variant_name(&self) -> &'static str;

    /// Identity and presentation state.
    fn common(&self) -> &TableSourceCommon;

    /// Identity and presentation state, mutably.
    fn common_mut(&mut self) -> &mut TableSourceCommon;

    /// `self` as [`Any`], for downcasting in [`Self::dyn_eq`].
    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another dialect source.
    ///
    /// Must ignore alias and hints, like the built-in kinds do.
    fn dyn_eq(&self, other: &dyn DialectTableSource) -> bool;

    /// Structural hash, consistent with [`Self::dyn_eq`].
    fn dyn_hash(&self, state: &mut dyn Hasher);

    /// Appends the SQL rendering to `buf`.
    fn output(&self, buf: &mut String);

    /// The effective alias. Defaults to the normalized explicit alias.
    fn compute_alias(&self, normalizer: &dyn Normalizer) -> Option<String> {
        self.common().normalized_alias(normalizer)
    }

    /// Deep copy under a fresh identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CloneUnsupported`] unless the kind overrides this.
    fn try_clone_boxed(&self) -> Result<Box<dyn DialectTableSource>, Error> {
        Err(Error::CloneUnsupported {
            variant: self.variant_name().to_string(),
        })
    }

    /// Replaces a direct child expression with identity `expr`.
    ///
    /// Defaults to looking at the flashback clause only.
    fn replace(&mut self, expr: NodeId, target: SqlExpr) -> Replacement {
        self.common_mut().replace_flashback(expr, target)
    }

    /// Accepts the children of this node, in the kind's own order.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::DepthLimitExceeded`] from nested accepts.
    fn accept_children(&self, _visitor: &mut dyn Visitor, _depth: Depth) -> Result<(), Error> {
        Ok(())
    }
}

impl dyn DialectTableSource {
    /// Downcasts to a concrete dialect kind.
    #[must_use]
    pub fn downcast_ref<T: DialectTableSource>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// The identity of this source.
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.common().node_id()
    }
}
