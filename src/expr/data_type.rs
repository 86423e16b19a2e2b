//! Declared data types.

use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use crate::errors::Error;
use crate::expr::SqlExpr;
use crate::format::{FormatSql, output_list};
use crate::node::{Node, NodeMeta, adopt, adopt_all};
use crate::visitor::{Accept, Depth, Visitor, accept_list, walk};

/// A data type such as `INTEGER` or `VARCHAR(20)`.
#[derive(Debug)]
pub struct SqlDataType {
    meta: NodeMeta,
    name: String,
    arguments: Vec<SqlExpr>,
}

impl SqlDataType {
    /// A data type without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::new(),
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Appends a type argument and returns the type.
    #[must_use]
    pub fn with_argument(mut self, argument: SqlExpr) -> Self {
        self.add_argument(argument);
        self
    }

    /// Appends a type argument such as a length or precision.
    pub fn add_argument(&mut self, argument: SqlExpr) {
        self.arguments.push(adopt(self.meta.id(), argument));
    }

    /// The type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type arguments, in order.
    #[must_use]
    pub fn arguments(&self) -> &[SqlExpr] {
        &self.arguments
    }
}

impl Clone for SqlDataType {
    fn clone(&self) -> Self {
        let mut cloned = Self {
            meta: NodeMeta::new(),
            name: self.name.clone(),
            arguments: self.arguments.clone(),
        };
        adopt_all(cloned.meta.id(), &mut cloned.arguments);
        cloned
    }
}

impl PartialEq for SqlDataType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arguments == other.arguments
    }
}

impl Eq for SqlDataType {}

impl Hash for SqlDataType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.arguments.hash(state);
    }
}

impl Node for SqlDataType {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

impl FormatSql for SqlDataType {
    fn output(&self, buf: &mut String) {
        buf.push_str(&self.name);
        if !self.arguments.is_empty() {
            buf.push('(');
            output_list(&self.arguments, buf);
            buf.push(')');
        }
    }
}

impl Accept for SqlDataType {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_data_type(self),
            |v, depth| accept_list(v, &self.arguments, depth),
            |v| v.end_visit_data_type(self),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_with_arguments() {
        let varchar = SqlDataType::new("VARCHAR").with_argument(SqlExpr::literal(20));
        assert_eq!(varchar.format_sql(), "VARCHAR(20)");
        assert_eq!(SqlDataType::new("INTEGER").format_sql(), "INTEGER");
    }

    #[test]
    fn test_clone_relinks_arguments() {
        let decimal = SqlDataType::new("DECIMAL")
            .with_argument(SqlExpr::literal(10))
            .with_argument(SqlExpr::literal(2));
        let cloned = decimal.clone();
        assert_eq!(cloned, decimal);
        assert!(
            cloned
                .arguments()
                .iter()
                .all(|argument| argument.parent() == Some(cloned.node_id()))
        );
    }
}
