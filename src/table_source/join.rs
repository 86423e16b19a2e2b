//! Join of two table sources.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use super::{JoinType, TableSource, TableSourceCommon};
use crate::errors::Error;
use crate::expr::SqlExpr;
use crate::format::{FormatSql, output_list};
use crate::node::{Node, NodeId, NodeMeta, adopt, adopt_all, release, swap_slot};
use crate::replace::{Replacement, replace_in_list, replace_in_slot};
use crate::visitor::{Accept, DEFAULT_MAX_DEPTH, Depth, Visitor, accept_child, accept_list, walk};

/// `left <join type> right [ON condition | USING (columns)]`.
///
/// Equality and hashing compare left, join type, right, condition, using
/// columns and the natural flag. Alias, hints and flashback are ignored.
#[derive(Debug, Default)]
pub struct JoinTableSource {
    common: TableSourceCommon,
    left: Option<Box<TableSource>>,
    join_type: JoinType,
    right: Option<Box<TableSource>>,
    condition: Option<SqlExpr>,
    using: Vec<SqlExpr>,
    natural: bool,
}

impl JoinTableSource {
    /// A join of `left` and `right`.
    #[must_use]
    pub fn new(
        left: impl Into<TableSource>,
        join_type: JoinType,
        right: impl Into<TableSource>,
        condition: Option<SqlExpr>,
    ) -> Self {
        let mut join = Self {
            join_type,
            ..Self::default()
        };
        join.set_left(Some(left.into()));
        join.set_right(Some(right.into()));
        join.set_condition(condition);
        join
    }

    /// Alias, hints and flashback.
    #[must_use]
    pub fn common(&self) -> &TableSourceCommon {
        &self.common
    }

    /// Alias, hints and flashback, mutably.
    pub fn common_mut(&mut self) -> &mut TableSourceCommon {
        &mut self.common
    }

    /// The explicit alias.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.common.alias()
    }

    /// Sets or clears the explicit alias, returning the previous one.
    pub fn set_alias(&mut self, alias: Option<String>) -> Option<String> {
        self.common.set_alias(alias)
    }

    /// The left side.
    #[must_use]
    pub fn left(&self) -> Option<&TableSource> {
        self.left.as_deref()
    }

    /// Sets or clears the left side, returning the previous one detached.
    pub fn set_left(&mut self, left: Option<TableSource>) -> Option<TableSource> {
        let owner = self.common.node_id();
        let left = left.map(|left| Box::new(adopt(owner, left)));
        core::mem::replace(&mut self.left, left).map(|previous| release(*previous))
    }

    /// The right side.
    #[must_use]
    pub fn right(&self) -> Option<&TableSource> {
        self.right.as_deref()
    }

    /// Sets or clears the right side, returning the previous one detached.
    pub fn set_right(&mut self, right: Option<TableSource>) -> Option<TableSource> {
        let owner = self.common.node_id();
        let right = right.map(|right| Box::new(adopt(owner, right)));
        core::mem::replace(&mut self.right, right).map(|previous| release(*previous))
    }

    /// The join kind.
    #[must_use]
    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    /// Changes the join kind.
    pub fn set_join_type(&mut self, join_type: JoinType) {
        self.join_type = join_type;
    }

    /// The `ON` condition.
    #[must_use]
    pub fn condition(&self) -> Option<&SqlExpr> {
        self.condition.as_ref()
    }

    /// Sets or clears the `ON` condition, returning the previous one detached.
    pub fn set_condition(&mut self, condition: Option<SqlExpr>) -> Option<SqlExpr> {
        swap_slot(self.common.node_id(), &mut self.condition, condition)
    }

    /// The `USING` columns, in order.
    #[must_use]
    pub fn using(&self) -> &[SqlExpr] {
        &self.using
    }

    /// Appends a `USING` column.
    pub fn add_using(&mut self, column: SqlExpr) {
        self.using.push(adopt(self.common.node_id(), column));
    }

    /// Whether the join was written with `NATURAL`.
    #[must_use]
    pub fn is_natural(&self) -> bool {
        self.natural
    }

    /// Sets the `NATURAL` flag.
    pub fn set_natural(&mut self, natural: bool) {
        self.natural = natural;
    }

    /// Replaces the condition, a `USING` column or the flashback clause when
    /// it has identity `expr`.
    ///
    /// The target is linked to this join. On a miss nothing changes and the
    /// target comes back in [`Replacement::NoMatch`].
    pub fn replace(&mut self, expr: NodeId, target: SqlExpr) -> Replacement {
        let owner = self.common.node_id();
        replace_in_slot(owner, &mut self.condition, expr, target)
            .or_else(|target| replace_in_list(owner, &mut self.using, expr, target))
            .or_else(|target| self.common.replace_flashback(expr, target))
    }

    /// Deep copy under a fresh identity, detached from any parent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CloneUnsupported`] when either side, at any depth,
    /// is a dialect source that cannot be cloned, and
    /// [`Error::DepthLimitExceeded`] when the sides nest deeper than
    /// [`DEFAULT_MAX_DEPTH`].
    pub fn try_clone(&self) -> Result<Self, Error> {
        self.try_clone_at(Depth::root(DEFAULT_MAX_DEPTH))
    }

    /// [`Self::try_clone`] with a custom nesting ceiling.
    ///
    /// # Errors
    ///
    /// As [`Self::try_clone`], with `limit` as the ceiling.
    pub fn try_clone_with_limit(&self, limit: usize) -> Result<Self, Error> {
        self.try_clone_at(Depth::root(limit))
    }

    pub(super) fn try_clone_at(&self, depth: Depth) -> Result<Self, Error> {
        let mut cloned = Self {
            common: self.common.clone(),
            left: None,
            join_type: self.join_type,
            right: None,
            condition: None,
            using: self.using.clone(),
            natural: self.natural,
        };
        if let Some(left) = self.left.as_deref() {
            cloned.set_left(Some(left.try_clone_at(depth.descend()?)?));
        }
        if let Some(right) = self.right.as_deref() {
            cloned.set_right(Some(right.try_clone_at(depth.descend()?)?));
        }
        cloned.set_condition(self.condition.clone());
        adopt_all(cloned.common.node_id(), &mut cloned.using);
        Ok(cloned)
    }

    /// Compares everything but the two sides.
    fn eq_shallow(&self, other: &Self) -> bool {
        self.natural == other.natural
            && self.join_type == other.join_type
            && self.condition == other.condition
            && self.using == other.using
            && self.left.is_some() == other.left.is_some()
            && self.right.is_some() == other.right.is_some()
    }

    /// Hashes everything but the two sides.
    fn hash_shallow<H: Hasher>(&self, state: &mut H) {
        self.join_type.hash(state);
        self.condition.hash(state);
        self.using.hash(state);
        self.natural.hash(state);
        self.left.is_some().hash(state);
        self.right.is_some().hash(state);
    }

    fn sides(&self) -> impl Iterator<Item = &TableSource> {
        self.left
            .as_deref()
            .into_iter()
            .chain(self.right.as_deref())
    }
}

/// Structural equality of two table sources.
///
/// Join spines are walked with an explicit stack, so comparison depth is not
/// bounded by the call stack.
pub(super) fn source_eq(a: &TableSource, b: &TableSource) -> bool {
    let mut pending = vec![(a, b)];
    while let Some(pair) = pending.pop() {
        match pair {
            (TableSource::Expr(a), TableSource::Expr(b)) => {
                if a != b {
                    return false;
                }
            }
            (TableSource::Join(a), TableSource::Join(b)) => {
                if !a.eq_shallow(b) {
                    return false;
                }
                pending.extend(a.sides().zip(b.sides()));
            }
            (TableSource::Dialect(a), TableSource::Dialect(b)) => {
                if !a.dyn_eq(b.as_ref()) {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

/// Structural hash of a table source, consistent with [`source_eq`].
///
/// Nodes are hashed in pre-order off an explicit stack.
pub(super) fn source_hash<H: Hasher>(source: &TableSource, state: &mut H) {
    let mut pending = vec![source];
    while let Some(source) = pending.pop() {
        core::mem::discriminant(source).hash(state);
        match source {
            TableSource::Expr(source) => source.hash(state),
            TableSource::Join(join) => {
                join.hash_shallow(state);
                pending.extend(join.right.as_deref());
                pending.extend(join.left.as_deref());
            }
            TableSource::Dialect(source) => {
                source.variant_name().hash(state);
                source.dyn_hash(state);
            }
        }
    }
}

impl PartialEq for JoinTableSource {
    fn eq(&self, other: &Self) -> bool {
        self.eq_shallow(other)
            && self
                .sides()
                .zip(other.sides())
                .all(|(a, b)| source_eq(a, b))
    }
}

impl Eq for JoinTableSource {}

impl Hash for JoinTableSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_shallow(state);
        for side in self.sides() {
            source_hash(side, state);
        }
    }
}

impl Node for JoinTableSource {
    fn meta(&self) -> &NodeMeta {
        self.common.meta()
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        self.common.meta_mut()
    }
}

impl FormatSql for JoinTableSource {
    fn output(&self, buf: &mut String) {
        if let Some(left) = &self.left {
            left.output(buf);
        }
        buf.push(' ');
        buf.push_str(self.join_type.keyword());
        buf.push(' ');
        if let Some(right) = &self.right {
            right.output(buf);
        }

        if let Some(condition) = &self.condition {
            buf.push_str(" ON ");
            condition.output(buf);
        } else if !self.using.is_empty() {
            buf.push_str(" USING (");
            output_list(&self.using, buf);
            buf.push(')');
        }
    }
}

impl Accept for JoinTableSource {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_join_table_source(self),
            |v, depth| {
                accept_child(v, self.left.as_deref(), depth)?;
                accept_child(v, self.right.as_deref(), depth)?;
                accept_child(v, self.condition.as_ref(), depth)?;
                accept_list(v, &self.using, depth)
            },
            |v| v.end_visit_join_table_source(self),
        )
    }
}
