//! Column definitions.

use alloc::string::String;

use crate::errors::Error;
use crate::expr::{SqlDataType, SqlExpr};
use crate::format::FormatSql;
use crate::node::{Node, NodeMeta, adopt, release, swap_slot};
use crate::normalize::{DelimiterNormalizer, Normalizer};
use crate::visitor::{Accept, Depth, Visitor, accept_child, walk};

/// `name [type] [NOT NULL] [DEFAULT value] [PRIMARY KEY]`.
#[derive(Debug)]
pub struct ColumnDefinition {
    meta: NodeMeta,
    name: SqlExpr,
    data_type: Option<SqlDataType>,
    default_value: Option<SqlExpr>,
    not_null: bool,
    primary_key: bool,
}

impl ColumnDefinition {
    /// A column called `name` with no type or constraints.
    #[must_use]
    pub fn new(name: SqlExpr) -> Self {
        let meta = NodeMeta::new();
        let name = adopt(meta.id(), name);
        Self {
            meta,
            name,
            data_type: None,
            default_value: None,
            not_null: false,
            primary_key: false,
        }
    }

    /// Sets the data type and returns the column.
    #[must_use]
    pub fn with_data_type(mut self, data_type: SqlDataType) -> Self {
        self.set_data_type(Some(data_type));
        self
    }

    /// The column name, as written.
    #[must_use]
    pub fn name(&self) -> &SqlExpr {
        &self.name
    }

    /// Renames the column, returning the previous name detached.
    pub fn set_name(&mut self, name: SqlExpr) -> SqlExpr {
        release(core::mem::replace(
            &mut self.name,
            adopt(self.meta.id(), name),
        ))
    }

    /// The declared type.
    #[must_use]
    pub fn data_type(&self) -> Option<&SqlDataType> {
        self.data_type.as_ref()
    }

    /// Sets or clears the declared type, returning the previous one detached.
    pub fn set_data_type(&mut self, data_type: Option<SqlDataType>) -> Option<SqlDataType> {
        swap_slot(self.meta.id(), &mut self.data_type, data_type)
    }

    /// The `DEFAULT` expression.
    #[must_use]
    pub fn default_value(&self) -> Option<&SqlExpr> {
        self.default_value.as_ref()
    }

    /// Sets or clears the `DEFAULT` expression, returning the previous one detached.
    pub fn set_default_value(&mut self, default_value: Option<SqlExpr>) -> Option<SqlExpr> {
        swap_slot(self.meta.id(), &mut self.default_value, default_value)
    }

    /// Whether the column is `NOT NULL`.
    #[must_use]
    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    /// Sets the `NOT NULL` flag.
    pub fn set_not_null(&mut self, not_null: bool) {
        self.not_null = not_null;
    }

    /// Whether the column is declared `PRIMARY KEY` inline.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Sets the inline `PRIMARY KEY` flag.
    pub fn set_primary_key(&mut self, primary_key: bool) {
        self.primary_key = primary_key;
    }

    /// The display name of the column: its simple name, normalized.
    #[must_use]
    pub fn compute_alias(&self) -> Option<String> {
        self.compute_alias_with(&DelimiterNormalizer)
    }

    /// [`Self::compute_alias`] with a caller-chosen normalizer.
    #[must_use]
    pub fn compute_alias_with(&self, normalizer: &dyn Normalizer) -> Option<String> {
        self.name
            .simple_name()
            .map(|name| normalizer.normalize(name))
    }
}

impl Node for ColumnDefinition {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

impl FormatSql for ColumnDefinition {
    fn output(&self, buf: &mut String) {
        self.name.output(buf);
        if let Some(data_type) = &self.data_type {
            buf.push(' ');
            data_type.output(buf);
        }
        if self.not_null {
            buf.push_str(" NOT NULL");
        }
        if let Some(default_value) = &self.default_value {
            buf.push_str(" DEFAULT ");
            default_value.output(buf);
        }
        if self.primary_key {
            buf.push_str(" PRIMARY KEY");
        }
    }
}

impl Accept for ColumnDefinition {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_column_definition(self),
            |v, depth| {
                accept_child(v, Some(&self.name), depth)?;
                accept_child(v, self.data_type.as_ref(), depth)?;
                accept_child(v, self.default_value.as_ref(), depth)
            },
            |v| v.end_visit_column_definition(self),
        )
    }
}
