//! Leaf nodes handed to the core by the parser: expressions, names, data
//! types, hints and opaque query bodies.

mod data_type;
mod opaque;
mod value;

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};

pub use data_type::SqlDataType;
pub use opaque::{SqlHint, SqlSelect};
pub use value::SqlValue;

use crate::errors::Error;
use crate::format::FormatSql;
use crate::node::{Node, NodeMeta};
use crate::visitor::{Accept, Depth, Visitor, accept_child, walk};

/// Binary operators understood by the canonical renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "testing", derive(arbitrary::Arbitrary))]
pub enum BinaryOperator {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `||`
    Concat,
}

impl BinaryOperator {
    /// The operator as written in SQL.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Concat => "||",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The shape of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// An unqualified name, as written (quotes included).
    Identifier(String),
    /// A qualified name `owner.name`.
    Property {
        /// The qualifier, itself a name.
        owner: Box<SqlExpr>,
        /// The last path segment.
        name: String,
    },
    /// A literal value.
    Literal(SqlValue),
    /// `left op right`.
    Binary {
        /// Left operand.
        left: Box<SqlExpr>,
        /// The operator.
        op: BinaryOperator,
        /// Right operand.
        right: Box<SqlExpr>,
    },
}

/// An expression node.
///
/// Equality and hashing look at the [`ExprKind`] only; identity, parent
/// links and attributes are ignored.
#[derive(Debug)]
pub struct SqlExpr {
    meta: NodeMeta,
    kind: ExprKind,
}

impl SqlExpr {
    /// Creates an expression and links its operands to it.
    #[must_use]
    pub fn new(kind: ExprKind) -> Self {
        let mut expr = Self {
            meta: NodeMeta::new(),
            kind,
        };
        expr.adopt_operands();
        expr
    }

    /// An unqualified name.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Identifier(name.into()))
    }

    /// A qualified name `owner.name`.
    #[must_use]
    pub fn property(owner: SqlExpr, name: impl Into<String>) -> Self {
        Self::new(ExprKind::Property {
            owner: Box::new(owner),
            name: name.into(),
        })
    }

    /// A name path such as `["db", "orders"]` for `db.orders`.
    ///
    /// Returns `None` for an empty path.
    #[must_use]
    pub fn path<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Option<Self> {
        let mut segments = segments.into_iter();
        let first = Self::identifier(segments.next()?);
        Some(segments.fold(first, |owner, name| Self::property(owner, name)))
    }

    /// A literal.
    #[must_use]
    pub fn literal(value: impl Into<SqlValue>) -> Self {
        Self::new(ExprKind::Literal(value.into()))
    }

    /// A binary operation.
    #[must_use]
    pub fn binary(left: SqlExpr, op: BinaryOperator, right: SqlExpr) -> Self {
        Self::new(ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    /// The shape of this expression.
    #[must_use]
    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// Returns whether this expression is a name (plain or qualified).
    #[must_use]
    pub fn is_name(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Identifier(_) | ExprKind::Property { .. }
        )
    }

    /// The unqualified last segment of a name, as written.
    #[must_use]
    pub fn simple_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) | ExprKind::Property { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// The name of a plain identifier, `None` for anything else.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name.as_str()),
            _ => None,
        }
    }

    fn adopt_operands(&mut self) {
        let id = self.meta.id();
        match &mut self.kind {
            ExprKind::Property { owner, .. } => owner.set_parent(Some(id)),
            ExprKind::Binary { left, right, .. } => {
                left.set_parent(Some(id));
                right.set_parent(Some(id));
            }
            ExprKind::Identifier(_) | ExprKind::Literal(_) => {}
        }
    }
}

impl Clone for SqlExpr {
    fn clone(&self) -> Self {
        Self::new(self.kind.clone())
    }
}

impl PartialEq for SqlExpr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for SqlExpr {}

impl Hash for SqlExpr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl Node for SqlExpr {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

impl FormatSql for SqlExpr {
    fn output(&self, buf: &mut String) {
        match &self.kind {
            ExprKind::Identifier(name) => buf.push_str(name),
            ExprKind::Property { owner, name } => {
                owner.output(buf);
                buf.push('.');
                buf.push_str(name);
            }
            ExprKind::Literal(value) => {
                use core::fmt::Write;
                // Writing into a String cannot fail.
                let _ = write!(buf, "{value}");
            }
            ExprKind::Binary { left, op, right } => {
                left.output(buf);
                buf.push(' ');
                buf.push_str(op.symbol());
                buf.push(' ');
                right.output(buf);
            }
        }
    }
}

impl Accept for SqlExpr {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_expr(self),
            |v, depth| match &self.kind {
                ExprKind::Property { owner, .. } => accept_child(v, Some(owner), depth),
                ExprKind::Binary { left, right, .. } => {
                    accept_child(v, Some(left), depth)?;
                    accept_child(v, Some(right), depth)
                }
                ExprKind::Identifier(_) | ExprKind::Literal(_) => Ok(()),
            },
            |v| v.end_visit_expr(self),
        )
    }
}
