//! Double-dispatch traversal protocol.
//!
//! Every node kind implements [`Accept`]. Accepting a visitor:
//!
//! 1. calls [`Visitor::enter_node`];
//! 2. calls the kind's `visit_*` hook;
//! 3. if that returned `true`, accepts the children in the kind's fixed order,
//!    skipping absent children;
//! 4. calls the kind's `end_visit_*` hook, whether or not step 3 ran or failed;
//! 5. calls [`Visitor::leave_node`].
//!
//! Steps 4 and 5 always pair with steps 1 and 2, so scope-tracking visitors can
//! push in `visit_*` and pop in `end_visit_*` without tracking pruning.

mod depth;
mod parent_index;

pub use depth::{DEFAULT_MAX_DEPTH, Depth};
pub use parent_index::ParentIndex;

use crate::create_table::{
    CheckConstraint, ColumnDefinition, CreateTableStatement, DialectTableElement, TableIndex,
    UniqueConstraint,
};
use crate::errors::Error;
use crate::expr::{SqlDataType, SqlExpr, SqlHint, SqlSelect};
use crate::node::{Node, NodeMeta};
use crate::parameter::Parameter;
use crate::table_source::{DialectTableSource, ExprTableSource, JoinTableSource};

macro_rules! visitor_hooks {
    ($($kind:literal: $visit:ident, $end_visit:ident => $node:ty;)*) => {
        /// Per-kind hooks called while a tree is walked.
        ///
        /// All hooks have defaults: visits descend, end visits do nothing.
        pub trait Visitor {
            /// Called before the kind-specific hook of every node.
            fn enter_node(&mut self, _meta: &NodeMeta) {}

            /// Called after the kind-specific end hook of every node.
            fn leave_node(&mut self, _meta: &NodeMeta) {}

            $(
                #[doc = concat!("Called on entering ", $kind, "; return `false` to skip its children.")]
                fn $visit(&mut self, _node: &$node) -> bool {
                    true
                }

                #[doc = concat!("Called on leaving ", $kind, ", even when its children were skipped.")]
                fn $end_visit(&mut self, _node: &$node) {}
            )*
        }
    };
}

visitor_hooks! {
    "an expression": visit_expr, end_visit_expr => SqlExpr;
    "a data type": visit_data_type, end_visit_data_type => SqlDataType;
    "an optimizer hint": visit_hint, end_visit_hint => SqlHint;
    "an AS-SELECT body": visit_select, end_visit_select => SqlSelect;
    "an expression table source": visit_expr_table_source, end_visit_expr_table_source => ExprTableSource;
    "a join table source": visit_join_table_source, end_visit_join_table_source => JoinTableSource;
    "a dialect table source": visit_dialect_table_source, end_visit_dialect_table_source => dyn DialectTableSource;
    "a CREATE TABLE statement": visit_create_table, end_visit_create_table => CreateTableStatement;
    "a column definition": visit_column_definition, end_visit_column_definition => ColumnDefinition;
    "a unique or primary key constraint": visit_unique_constraint, end_visit_unique_constraint => UniqueConstraint;
    "a named index": visit_table_index, end_visit_table_index => TableIndex;
    "a check constraint": visit_check_constraint, end_visit_check_constraint => CheckConstraint;
    "a dialect table element": visit_dialect_table_element, end_visit_dialect_table_element => dyn DialectTableElement;
    "a routine parameter": visit_parameter, end_visit_parameter => Parameter;
}

/// Nodes that can be walked by a [`Visitor`].
pub trait Accept {
    /// Walks this node at `depth`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`] when a descendant lies deeper than
    /// the ceiling carried by `depth`. End hooks of every entered node still run.
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error>;

    /// Walks this node with the [`DEFAULT_MAX_DEPTH`] ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`] for trees nested deeper than the ceiling.
    fn accept(&self, visitor: &mut dyn Visitor) -> Result<(), Error> {
        self.accept_at(visitor, Depth::root(DEFAULT_MAX_DEPTH))
    }

    /// Walks this node with a custom depth ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`] for trees nested deeper than `limit`.
    fn accept_with_limit(&self, visitor: &mut dyn Visitor, limit: usize) -> Result<(), Error> {
        self.accept_at(visitor, Depth::root(limit))
    }
}

impl<N: Accept + ?Sized> Accept for alloc::boxed::Box<N> {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        N::accept_at(self, visitor, depth)
    }
}

/// Runs the enter / visit / children / end visit / leave sequence for one node.
pub(crate) fn walk<N: Node + ?Sized>(
    visitor: &mut dyn Visitor,
    node: &N,
    depth: Depth,
    visit: impl FnOnce(&mut dyn Visitor) -> bool,
    children: impl FnOnce(&mut dyn Visitor, Depth) -> Result<(), Error>,
    end_visit: impl FnOnce(&mut dyn Visitor),
) -> Result<(), Error> {
    visitor.enter_node(node.meta());
    let result = if visit(&mut *visitor) {
        children(&mut *visitor, depth)
    } else {
        Ok(())
    };
    end_visit(&mut *visitor);
    visitor.leave_node(node.meta());
    result
}

/// Accepts an optional child one level below `depth`.
pub(crate) fn accept_child<N: Accept + ?Sized>(
    visitor: &mut dyn Visitor,
    child: Option<&N>,
    depth: Depth,
) -> Result<(), Error> {
    match child {
        Some(child) => child.accept_at(visitor, depth.descend()?),
        None => Ok(()),
    }
}

/// Accepts every child of a list, in order, one level below `depth`.
pub(crate) fn accept_list<N: Accept>(
    visitor: &mut dyn Visitor,
    children: &[N],
    depth: Depth,
) -> Result<(), Error> {
    if children.is_empty() {
        return Ok(());
    }
    let depth = depth.descend()?;
    children
        .iter()
        .try_for_each(|child| child.accept_at(visitor, depth))
}
