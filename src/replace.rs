//! Identity-based substitution of a direct child expression.

use crate::expr::SqlExpr;
use crate::node::{Node, NodeId, adopt, release};

/// Outcome of a `replace` call.
///
/// Ownership travels both ways: a successful replacement hands back the
/// detached previous child, a miss hands back the unused target.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum Replacement {
    /// The child was swapped; this is the detached previous child.
    Replaced(SqlExpr),
    /// No direct child had the requested identity; this is the unused target.
    NoMatch(SqlExpr),
}

impl Replacement {
    /// Returns whether a child was swapped.
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced(_))
    }

    /// Returns the carried expression, whichever the outcome.
    #[must_use]
    pub fn into_inner(self) -> SqlExpr {
        match self {
            Self::Replaced(expr) | Self::NoMatch(expr) => expr,
        }
    }

    /// Tries `next` with the unused target when nothing matched yet.
    pub(crate) fn or_else(self, next: impl FnOnce(SqlExpr) -> Self) -> Self {
        match self {
            Self::Replaced(previous) => Self::Replaced(previous),
            Self::NoMatch(target) => next(target),
        }
    }
}

/// Replaces the expression in `slot` when it has identity `expr`.
pub(crate) fn replace_in_slot(
    owner: NodeId,
    slot: &mut Option<SqlExpr>,
    expr: NodeId,
    target: SqlExpr,
) -> Replacement {
    match slot {
        Some(current) if current.node_id() == expr => {
            let previous = core::mem::replace(current, adopt(owner, target));
            tracing::trace!(%owner, replaced = %expr, "replaced child expression");
            Replacement::Replaced(release(previous))
        }
        _ => Replacement::NoMatch(target),
    }
}

/// Replaces the entry of `list` that has identity `expr`.
pub(crate) fn replace_in_list(
    owner: NodeId,
    list: &mut [SqlExpr],
    expr: NodeId,
    target: SqlExpr,
) -> Replacement {
    match list.iter_mut().find(|item| item.node_id() == expr) {
        Some(current) => {
            let previous = core::mem::replace(current, adopt(owner, target));
            tracing::trace!(%owner, replaced = %expr, "replaced list expression");
            Replacement::Replaced(release(previous))
        }
        None => Replacement::NoMatch(target),
    }
}
