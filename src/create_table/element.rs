//! The heterogeneous entries of a table body.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::Debug;

use super::{CheckConstraint, ColumnDefinition, TableIndex, UniqueConstraint};
use crate::errors::Error;
use crate::expr::SqlExpr;
use crate::format::FormatSql;
use crate::node::{Node, NodeMeta};
use crate::visitor::{Accept, Depth, Visitor, walk};

/// Elements carrying an ordered list of key columns.
///
/// Index lookups go through this capability rather than a fixed list of
/// element kinds, so dialect index kinds are found as long as they report it
/// from [`DialectTableElement::as_key_columns`].
pub trait KeyColumns {
    /// The key columns, in declaration order.
    fn key_columns(&self) -> &[SqlExpr];
}

/// A table element kind defined by a dialect crate.
pub trait DialectTableElement: Node + Debug + Send + Sync {
    /// Stable name of the kind.
    fn variant_name(&self) -> &'static str;

    /// Appends the SQL rendering to `buf`.
    fn output(&self, buf: &mut String);

    /// The key-column capability, for index-like kinds.
    fn as_key_columns(&self) -> Option<&dyn KeyColumns> {
        None
    }

    /// Accepts the children of this element, in the kind's own order.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::DepthLimitExceeded`] from nested accepts.
    fn accept_children(&self, _visitor: &mut dyn Visitor, _depth: Depth) -> Result<(), Error> {
        Ok(())
    }
}

impl Accept for dyn DialectTableElement {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_dialect_table_element(self),
            |v, depth| self.accept_children(v, depth),
            |v| v.end_visit_dialect_table_element(self),
        )
    }
}

/// One entry of a `CREATE TABLE` body.
#[derive(Debug)]
pub enum TableElement {
    /// A column definition.
    Column(ColumnDefinition),
    /// A `UNIQUE` or `PRIMARY KEY` constraint.
    Unique(UniqueConstraint),
    /// A named index.
    Index(TableIndex),
    /// A `CHECK` constraint.
    Check(CheckConstraint),
    /// A kind defined outside the core.
    Dialect(Box<dyn DialectTableElement>),
}

impl TableElement {
    /// The column definition, if this is one.
    #[must_use]
    pub fn as_column(&self) -> Option<&ColumnDefinition> {
        match self {
            Self::Column(column) => Some(column),
            _ => None,
        }
    }

    /// The key-column capability, if the element has it.
    #[must_use]
    pub fn as_key_columns(&self) -> Option<&dyn KeyColumns> {
        match self {
            Self::Unique(constraint) => Some(constraint),
            Self::Index(index) => Some(index),
            Self::Dialect(element) => element.as_key_columns(),
            Self::Column(_) | Self::Check(_) => None,
        }
    }
}

impl From<ColumnDefinition> for TableElement {
    fn from(column: ColumnDefinition) -> Self {
        Self::Column(column)
    }
}

impl From<UniqueConstraint> for TableElement {
    fn from(constraint: UniqueConstraint) -> Self {
        Self::Unique(constraint)
    }
}

impl From<TableIndex> for TableElement {
    fn from(index: TableIndex) -> Self {
        Self::Index(index)
    }
}

impl From<CheckConstraint> for TableElement {
    fn from(check: CheckConstraint) -> Self {
        Self::Check(check)
    }
}

impl From<Box<dyn DialectTableElement>> for TableElement {
    fn from(element: Box<dyn DialectTableElement>) -> Self {
        Self::Dialect(element)
    }
}

impl Node for TableElement {
    fn meta(&self) -> &NodeMeta {
        match self {
            Self::Column(column) => column.meta(),
            Self::Unique(constraint) => constraint.meta(),
            Self::Index(index) => index.meta(),
            Self::Check(check) => check.meta(),
            Self::Dialect(element) => element.meta(),
        }
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        match self {
            Self::Column(column) => column.meta_mut(),
            Self::Unique(constraint) => constraint.meta_mut(),
            Self::Index(index) => index.meta_mut(),
            Self::Check(check) => check.meta_mut(),
            Self::Dialect(element) => element.meta_mut(),
        }
    }
}

impl FormatSql for TableElement {
    fn output(&self, buf: &mut String) {
        match self {
            Self::Column(column) => column.output(buf),
            Self::Unique(constraint) => constraint.output(buf),
            Self::Index(index) => index.output(buf),
            Self::Check(check) => check.output(buf),
            Self::Dialect(element) => element.output(buf),
        }
    }
}

impl Accept for TableElement {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        match self {
            Self::Column(column) => column.accept_at(visitor, depth),
            Self::Unique(constraint) => constraint.accept_at(visitor, depth),
            Self::Index(index) => index.accept_at(visitor, depth),
            Self::Check(check) => check.accept_at(visitor, depth),
            Self::Dialect(element) => element.accept_at(visitor, depth),
        }
    }
}
