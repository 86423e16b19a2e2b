//! Table sources naming a table, view or table-valued expression.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::{Hash, Hasher};

use super::TableSourceCommon;
use crate::errors::Error;
use crate::expr::SqlExpr;
use crate::format::FormatSql;
use crate::node::{Node, NodeId, NodeMeta, adopt, adopt_all, swap_slot};
use crate::normalize::{DelimiterNormalizer, Normalizer};
use crate::replace::{Replacement, replace_in_list, replace_in_slot};
use crate::visitor::{Accept, Depth, Visitor, accept_child, accept_list, walk};

/// Table or view metadata resolved by an external catalog.
pub trait SchemaObject: Debug + Send + Sync {
    /// The resolved object name.
    fn name(&self) -> &str;
}

/// A table source wrapping a name or table-valued expression.
///
/// Equality and hashing compare `expr` and `partitions` only. Alias, hints,
/// flashback and the resolved schema object are ignored, so two aliased
/// references to the same table are the same table source.
#[derive(Debug, Default)]
pub struct ExprTableSource {
    common: TableSourceCommon,
    expr: Option<SqlExpr>,
    partitions: Vec<SqlExpr>,
    schema_object: Option<Arc<dyn SchemaObject>>,
}

impl ExprTableSource {
    /// A source over `expr`.
    #[must_use]
    pub fn new(expr: SqlExpr) -> Self {
        let mut source = Self::default();
        source.set_expr(Some(expr));
        source
    }

    /// A source over `expr` with an explicit alias.
    #[must_use]
    pub fn with_alias(expr: SqlExpr, alias: impl Into<String>) -> Self {
        let mut source = Self::new(expr);
        source.set_alias(Some(alias.into()));
        source
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

    /// The wrapped expression.
    #[must_use]
    pub fn expr(&self) -> Option<&SqlExpr> {
        self.expr.as_ref()
    }

    /// Sets or clears the wrapped expression, returning the previous one detached.
    pub fn set_expr(&mut self, expr: Option<SqlExpr>) -> Option<SqlExpr> {
        swap_slot(self.common.node_id(), &mut self.expr, expr)
    }

    /// The wrapped expression when it is a name.
    #[must_use]
    pub fn name(&self) -> Option<&SqlExpr> {
        self.expr.as_ref().filter(|expr| expr.is_name())
    }

    /// The partition names, in order.
    #[must_use]
    pub fn partitions(&self) -> &[SqlExpr] {
        &self.partitions
    }

    /// Number of partitions.
    #[must_use]
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Appends a partition name.
    pub fn add_partition(&mut self, partition: SqlExpr) {
        self.partitions
            .push(adopt(self.common.node_id(), partition));
    }

    /// The resolved schema object, if a catalog pass attached one.
    #[must_use]
    pub fn schema_object(&self) -> Option<&Arc<dyn SchemaObject>> {
        self.schema_object.as_ref()
    }

    /// Attaches or clears the resolved schema object.
    pub fn set_schema_object(&mut self, schema_object: Option<Arc<dyn SchemaObject>>) {
        self.schema_object = schema_object;
    }

    /// The effective alias: the explicit one, else the simple name of a name
    /// expression, normalized by [`DelimiterNormalizer`].
    #[must_use]
    pub fn compute_alias(&self) -> Option<String> {
        self.compute_alias_with(&DelimiterNormalizer)
    }

    /// [`Self::compute_alias`] with a caller-chosen normalizer.
    #[must_use]
    pub fn compute_alias_with(&self, normalizer: &dyn Normalizer) -> Option<String> {
        self.common
            .alias()
            .or_else(|| self.expr.as_ref().and_then(SqlExpr::simple_name))
            .map(|alias| normalizer.normalize(alias))
    }

    /// Replaces the wrapped expression, a partition or the flashback clause
    /// when it has identity `expr`.
    pub fn replace(&mut self, expr: NodeId, target: SqlExpr) -> Replacement {
        let owner = self.common.node_id();
        replace_in_slot(owner, &mut self.expr, expr, target)
            .or_else(|target| replace_in_list(owner, &mut self.partitions, expr, target))
            .or_else(|target| self.common.replace_flashback(expr, target))
    }
}

impl Clone for ExprTableSource {
    /// Deep copy under a fresh identity. The resolved schema object is not carried over.
    fn clone(&self) -> Self {
        let mut cloned = Self {
            common: self.common.clone(),
            expr: self.expr.clone(),
            partitions: self.partitions.clone(),
            schema_object: None,
        };
        let id = cloned.common.node_id();
        if let Some(expr) = cloned.expr.as_mut() {
            expr.set_parent(Some(id));
        }
        adopt_all(id, &mut cloned.partitions);
        cloned
    }
}

impl PartialEq for ExprTableSource {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr && self.partitions == other.partitions
    }
}

impl Eq for ExprTableSource {}

impl Hash for ExprTableSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.expr.hash(state);
        self.partitions.hash(state);
    }
}

impl Node for ExprTableSource {
    fn meta(&self) -> &NodeMeta {
        self.common.meta()
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        self.common.meta_mut()
    }
}

impl FormatSql for ExprTableSource {
    fn output(&self, buf: &mut String) {
        if let Some(expr) = &self.expr {
            expr.output(buf);
        }
    }
}

impl Accept for ExprTableSource {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_expr_table_source(self),
            |v, depth| {
                accept_child(v, self.expr.as_ref(), depth)?;
                accept_list(v, &self.partitions, depth)
            },
            |v| v.end_visit_expr_table_source(self),
        )
    }
}
