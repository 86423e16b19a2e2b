//! Key-bearing constraints, named indexes and check constraints.

use alloc::string::String;
use alloc::vec::Vec;

use super::KeyColumns;
use crate::errors::Error;
use crate::expr::SqlExpr;
use crate::format::{FormatSql, output_list};
use crate::node::{Node, NodeMeta, adopt, swap_slot};
use crate::visitor::{Accept, Depth, Visitor, accept_child, accept_list, walk};

/// `[CONSTRAINT name] UNIQUE (columns)` or `[CONSTRAINT name] PRIMARY KEY (columns)`.
#[derive(Debug, Default)]
pub struct UniqueConstraint {
    meta: NodeMeta,
    name: Option<SqlExpr>,
    columns: Vec<SqlExpr>,
    primary_key: bool,
}

impl UniqueConstraint {
    /// A `UNIQUE` constraint over `columns`.
    #[must_use]
    pub fn unique(columns: impl IntoIterator<Item = SqlExpr>) -> Self {
        let mut constraint = Self::default();
        for column in columns {
            constraint.add_column(column);
        }
        constraint
    }

    /// A `PRIMARY KEY` constraint over `columns`.
    #[must_use]
    pub fn primary_key(columns: impl IntoIterator<Item = SqlExpr>) -> Self {
        let mut constraint = Self::unique(columns);
        constraint.primary_key = true;
        constraint
    }

    /// The constraint name.
    #[must_use]
    pub fn name(&self) -> Option<&SqlExpr> {
        self.name.as_ref()
    }

    /// Sets or clears the constraint name, returning the previous one detached.
    pub fn set_name(&mut self, name: Option<SqlExpr>) -> Option<SqlExpr> {
        swap_slot(self.meta.id(), &mut self.name, name)
    }

    /// Appends a key column.
    pub fn add_column(&mut self, column: SqlExpr) {
        self.columns.push(adopt(self.meta.id(), column));
    }

    /// Whether this is a `PRIMARY KEY` rather than `UNIQUE`.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

impl KeyColumns for UniqueConstraint {
    fn key_columns(&self) -> &[SqlExpr] {
        &self.columns
    }
}

impl Node for UniqueConstraint {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

impl FormatSql for UniqueConstraint {
    fn output(&self, buf: &mut String) {
        output_constraint_name(self.name.as_ref(), buf);
        buf.push_str(if self.primary_key {
            "PRIMARY KEY ("
        } else {
            "UNIQUE ("
        });
        output_list(&self.columns, buf);
        buf.push(')');
    }
}

impl Accept for UniqueConstraint {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_unique_constraint(self),
            |v, depth| {
                accept_child(v, self.name.as_ref(), depth)?;
                accept_list(v, &self.columns, depth)
            },
            |v| v.end_visit_unique_constraint(self),
        )
    }
}

/// `[UNIQUE] INDEX name (columns)` declared inside the table body.
#[derive(Debug)]
pub struct TableIndex {
    meta: NodeMeta,
    name: SqlExpr,
    columns: Vec<SqlExpr>,
    unique: bool,
}

impl TableIndex {
    /// An index called `name` over `columns`.
    #[must_use]
    pub fn new(name: SqlExpr, columns: impl IntoIterator<Item = SqlExpr>) -> Self {
        let meta = NodeMeta::new();
        let id = meta.id();
        Self {
            name: adopt(id, name),
            columns: columns
                .into_iter()
                .map(|column| adopt(id, column))
                .collect(),
            unique: false,
            meta,
        }
    }

    /// The index name.
    #[must_use]
    pub fn name(&self) -> &SqlExpr {
        &self.name
    }

    /// Appends a key column.
    pub fn add_column(&mut self, column: SqlExpr) {
        self.columns.push(adopt(self.meta.id(), column));
    }

    /// Whether the index enforces uniqueness.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Sets the uniqueness flag.
    pub fn set_unique(&mut self, unique: bool) {
        self.unique = unique;
    }
}

impl KeyColumns for TableIndex {
    fn key_columns(&self) -> &[SqlExpr] {
        &self.columns
    }
}

impl Node for TableIndex {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

impl FormatSql for TableIndex {
    fn output(&self, buf: &mut String) {
        if self.unique {
            buf.push_str("UNIQUE ");
        }
        buf.push_str("INDEX ");
        self.name.output(buf);
        buf.push_str(" (");
        output_list(&self.columns, buf);
        buf.push(')');
    }
}

impl Accept for TableIndex {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_table_index(self),
            |v, depth| {
                accept_child(v, Some(&self.name), depth)?;
                accept_list(v, &self.columns, depth)
            },
            |v| v.end_visit_table_index(self),
        )
    }
}

/// `[CONSTRAINT name] CHECK (expr)`.
#[derive(Debug)]
pub struct CheckConstraint {
    meta: NodeMeta,
    name: Option<SqlExpr>,
    expr: SqlExpr,
}

impl CheckConstraint {
    /// A check of `expr`.
    #[must_use]
    pub fn new(expr: SqlExpr) -> Self {
        let meta = NodeMeta::new();
        let expr = adopt(meta.id(), expr);
        Self {
            meta,
            name: None,
            expr,
        }
    }

    /// The constraint name.
    #[must_use]
    pub fn name(&self) -> Option<&SqlExpr> {
        self.name.as_ref()
    }

    /// Sets or clears the constraint name, returning the previous one detached.
    pub fn set_name(&mut self, name: Option<SqlExpr>) -> Option<SqlExpr> {
        swap_slot(self.meta.id(), &mut self.name, name)
    }

    /// The checked expression.
    #[must_use]
    pub fn expr(&self) -> &SqlExpr {
        &self.expr
    }
}

impl Node for CheckConstraint {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

impl FormatSql for CheckConstraint {
    fn output(&self, buf: &mut String) {
        output_constraint_name(self.name.as_ref(), buf);
        buf.push_str("CHECK (");
        self.expr.output(buf);
        buf.push(')');
    }
}

impl Accept for CheckConstraint {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_check_constraint(self),
            |v, depth| {
                accept_child(v, self.name.as_ref(), depth)?;
                accept_child(v, Some(&self.expr), depth)
            },
            |v| v.end_visit_check_constraint(self),
        )
    }
}

fn output_constraint_name(name: Option<&SqlExpr>, buf: &mut String) {
    if let Some(name) = name {
        buf.push_str("CONSTRAINT ");
        name.output(buf);
        buf.push(' ');
    }
}
