//! `CREATE TABLE` statements and the elements of their body.

mod column;
mod constraint;
mod element;
mod table_type;

use alloc::string::String;
use alloc::vec::Vec;

pub use column::ColumnDefinition;
pub use constraint::{CheckConstraint, TableIndex, UniqueConstraint};
pub use element::{DialectTableElement, KeyColumns, TableElement};
pub use table_type::TableType;

use crate::errors::Error;
use crate::expr::{SqlExpr, SqlSelect};
use crate::format::{FormatSql, output_list};
use crate::node::{FORMAT_BODY_BEFORE_COMMENT, Node, NodeMeta, adopt, release, swap_slot};
use crate::normalize::{DelimiterNormalizer, Normalizer, eq_ignore_case};
use crate::table_source::ExprTableSource;
use crate::visitor::{Accept, Depth, Visitor, accept_child, accept_list, walk};

/// A `CREATE TABLE` statement.
///
/// The table name is never stored on its own: [`Self::name`] and
/// [`Self::compute_name`] read it out of the table source.
#[derive(Debug, Default)]
pub struct CreateTableStatement {
    meta: NodeMeta,
    db_type: Option<String>,
    if_not_exists: bool,
    table_type: TableType,
    table_source: Option<ExprTableSource>,
    elements: Vec<TableElement>,
    inherits: Option<ExprTableSource>,
    select: Option<SqlSelect>,
}

impl CreateTableStatement {
    /// An empty statement with no name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty statement tagged with the dialect that produced it.
    #[must_use]
    pub fn with_db_type(db_type: impl Into<String>) -> Self {
        Self {
            db_type: Some(db_type.into()),
            ..Self::default()
        }
    }

    /// The dialect tag.
    #[must_use]
    pub fn db_type(&self) -> Option<&str> {
        self.db_type.as_deref()
    }

    /// The table name expression, when the table source wraps a name.
    #[must_use]
    pub fn name(&self) -> Option<&SqlExpr> {
        self.table_source.as_ref().and_then(ExprTableSource::name)
    }

    /// Names the table by wrapping `name` in a fresh table source.
    ///
    /// Returns the previous table source, detached.
    pub fn set_name(&mut self, name: SqlExpr) -> Option<ExprTableSource> {
        self.set_table_source(Some(ExprTableSource::new(name)))
    }

    /// The table source naming the table.
    #[must_use]
    pub fn table_source(&self) -> Option<&ExprTableSource> {
        self.table_source.as_ref()
    }

    /// Sets or clears the table source, returning the previous one detached.
    pub fn set_table_source(
        &mut self,
        table_source: Option<ExprTableSource>,
    ) -> Option<ExprTableSource> {
        swap_slot(self.meta.id(), &mut self.table_source, table_source)
    }

    /// Whether `IF NOT EXISTS` was given.
    #[must_use]
    pub fn if_not_exists(&self) -> bool {
        self.if_not_exists
    }

    /// Sets the `IF NOT EXISTS` flag.
    pub fn set_if_not_exists(&mut self, if_not_exists: bool) {
        self.if_not_exists = if_not_exists;
    }

    /// Permanent or temporary.
    #[must_use]
    pub fn table_type(&self) -> TableType {
        self.table_type
    }

    /// Changes the table kind.
    pub fn set_table_type(&mut self, table_type: TableType) {
        self.table_type = table_type;
    }

    /// The body elements, in declaration order.
    #[must_use]
    pub fn elements(&self) -> &[TableElement] {
        &self.elements
    }

    /// The body elements, mutably. Elements keep their parent links.
    pub fn elements_mut(&mut self) -> &mut [TableElement] {
        &mut self.elements
    }

    /// Appends an element.
    pub fn add_element(&mut self, element: impl Into<TableElement>) {
        self.elements.push(adopt(self.meta.id(), element.into()));
    }

    /// Removes and returns the element at `index`, detached.
    ///
    /// Returns `None` when `index` is out of bounds.
    pub fn remove_element(&mut self, index: usize) -> Option<TableElement> {
        (index < self.elements.len()).then(|| release(self.elements.remove(index)))
    }

    /// The table inherited from, for dialects with table inheritance.
    #[must_use]
    pub fn inherits(&self) -> Option<&ExprTableSource> {
        self.inherits.as_ref()
    }

    /// Sets or clears the inherited table, returning the previous one detached.
    pub fn set_inherits(&mut self, inherits: Option<ExprTableSource>) -> Option<ExprTableSource> {
        swap_slot(self.meta.id(), &mut self.inherits, inherits)
    }

    /// The `AS SELECT` body.
    #[must_use]
    pub fn select(&self) -> Option<&SqlSelect> {
        self.select.as_ref()
    }

    /// Sets or clears the `AS SELECT` body, returning the previous one detached.
    pub fn set_select(&mut self, select: Option<SqlSelect>) -> Option<SqlSelect> {
        swap_slot(self.meta.id(), &mut self.select, select)
    }

    /// The normalized simple name of the table, if the table source wraps a name.
    #[must_use]
    pub fn compute_name(&self) -> Option<String> {
        self.compute_name_with(&DelimiterNormalizer)
    }

    /// [`Self::compute_name`] with a caller-chosen normalizer.
    #[must_use]
    pub fn compute_name_with(&self, normalizer: &dyn Normalizer) -> Option<String> {
        self.name()
            .and_then(SqlExpr::simple_name)
            .map(|name| normalizer.normalize(name))
    }

    /// The first column whose computed alias matches `name`, ignoring case.
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.find_column_with(name, &DelimiterNormalizer)
    }

    /// [`Self::find_column`] with a caller-chosen normalizer.
    #[must_use]
    pub fn find_column_with(
        &self,
        name: &str,
        normalizer: &dyn Normalizer,
    ) -> Option<&ColumnDefinition> {
        let wanted = normalizer.normalize(name);
        self.columns().find(|column| {
            column
                .compute_alias_with(normalizer)
                .is_some_and(|alias| eq_ignore_case(&alias, &wanted))
        })
    }

    /// The first key-bearing element with a key column named `column`,
    /// ignoring case.
    ///
    /// Only plain identifier key columns are compared; expressions and
    /// qualified names never match.
    #[must_use]
    pub fn find_index(&self, column: &str) -> Option<&TableElement> {
        self.find_index_with(column, &DelimiterNormalizer)
    }

    /// [`Self::find_index`] with a caller-chosen normalizer.
    #[must_use]
    pub fn find_index_with(
        &self,
        column: &str,
        normalizer: &dyn Normalizer,
    ) -> Option<&TableElement> {
        let wanted = normalizer.normalize(column);
        self.elements.iter().find(|element| {
            element.as_key_columns().is_some_and(|key| {
                key.key_columns()
                    .iter()
                    .filter_map(SqlExpr::as_identifier)
                    .any(|name| eq_ignore_case(&normalizer.normalize(name), &wanted))
            })
        })
    }

    /// Calls `f` for each column definition, in declaration order.
    pub fn for_each_column(&self, f: impl FnMut(&ColumnDefinition)) {
        self.columns().for_each(f);
    }

    /// The column definitions, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.elements.iter().filter_map(TableElement::as_column)
    }

    /// Records the comments that appeared before the table body.
    ///
    /// Comments accumulate under [`FORMAT_BODY_BEFORE_COMMENT`] as a
    /// `Vec<String>`, in the order they were added. An empty batch leaves the
    /// attribute bag untouched.
    pub fn add_body_before_comment(
        &mut self,
        comments: impl IntoIterator<Item = impl Into<String>>,
    ) {
        let mut comments = comments.into_iter().map(Into::<String>::into).peekable();
        if comments.peek().is_none() {
            return;
        }
        match self.attribute_mut::<Vec<String>>(FORMAT_BODY_BEFORE_COMMENT) {
            Some(existing) => existing.extend(comments),
            None => {
                self.put_attribute(FORMAT_BODY_BEFORE_COMMENT, comments.collect::<Vec<_>>());
            }
        }
    }

    /// The comments recorded by [`Self::add_body_before_comment`].
    #[must_use]
    pub fn body_before_comments(&self) -> &[String] {
        self.attribute::<Vec<String>>(FORMAT_BODY_BEFORE_COMMENT)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether any comment appeared before the table body.
    #[must_use]
    pub fn has_body_before_comment(&self) -> bool {
        !self.body_before_comments().is_empty()
    }
}

impl Node for CreateTableStatement {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

impl FormatSql for CreateTableStatement {
    fn output(&self, buf: &mut String) {
        buf.push_str("CREATE ");
        if let Some(keyword) = self.table_type.keyword() {
            buf.push_str(keyword);
            buf.push(' ');
        }
        buf.push_str("TABLE ");
        if self.if_not_exists {
            buf.push_str("IF NOT EXISTS ");
        }
        if let Some(table_source) = &self.table_source {
            table_source.output(buf);
        }
        if !self.elements.is_empty() {
            buf.push_str(" (");
            output_list(&self.elements, buf);
            buf.push(')');
        }
        if let Some(inherits) = &self.inherits {
            buf.push_str(" INHERITS (");
            inherits.output(buf);
            buf.push(')');
        }
        if let Some(select) = &self.select {
            buf.push_str(" AS ");
            select.output(buf);
        }
    }
}

impl Accept for CreateTableStatement {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_create_table(self),
            |v, depth| {
                accept_child(v, self.table_source.as_ref(), depth)?;
                accept_list(v, &self.elements, depth)?;
                accept_child(v, self.inherits.as_ref(), depth)?;
                accept_child(v, self.select.as_ref(), depth)
            },
            |v| v.end_visit_create_table(self),
        )
    }
}
