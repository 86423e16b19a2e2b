//! Things a query selects from: named or expression sources, joins of two
//! sources, and dialect-defined kinds.

mod common;
mod dialect;
mod expr_source;
mod join;
mod join_type;

use alloc::boxed::Box;
use alloc::string::String;
use core::hash::{Hash, Hasher};

pub use common::TableSourceCommon;
pub use dialect::DialectTableSource;
pub use expr_source::{ExprTableSource, SchemaObject};
pub use join::JoinTableSource;
pub use join_type::JoinType;

use crate::errors::Error;
use crate::expr::{SqlExpr, SqlHint};
use crate::format::FormatSql;
use crate::node::{Node, NodeId, NodeMeta};
use crate::normalize::{DelimiterNormalizer, Normalizer};
use crate::replace::Replacement;
use crate::visitor::{Accept, DEFAULT_MAX_DEPTH, Depth, Visitor, walk};

/// A table source of any kind.
///
/// Equality and hashing are structural and ignore alias and hints: callers
/// keying maps by table source must not expect aliases to tell occurrences
/// apart.
#[derive(Debug)]
pub enum TableSource {
    /// A name or table-valued expression.
    Expr(ExprTableSource),
    /// A join of two sources.
    Join(JoinTableSource),
    /// A kind defined outside the core.
    Dialect(Box<dyn DialectTableSource>),
}

impl TableSource {
    /// Name of the variant, as reported in errors.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Expr(_) => "ExprTableSource",
            Self::Join(_) => "JoinTableSource",
            Self::Dialect(source) => source.variant_name(),
        }
    }

    /// Alias, hints and flashback.
    #[must_use]
    pub fn common(&self) -> &TableSourceCommon {
        match self {
            Self::Expr(source) => source.common(),
            Self::Join(source) => source.common(),
            Self::Dialect(source) => source.common(),
        }
    }

    /// Alias, hints and flashback, mutably.
    pub fn common_mut(&mut self) -> &mut TableSourceCommon {
        match self {
            Self::Expr(source) => source.common_mut(),
            Self::Join(source) => source.common_mut(),
            Self::Dialect(source) => source.common_mut(),
        }
    }

    /// The explicit alias.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.common().alias()
    }

    /// Sets or clears the explicit alias, returning the previous one.
    pub fn set_alias(&mut self, alias: Option<String>) -> Option<String> {
        self.common_mut().set_alias(alias)
    }

    /// The optimizer hints.
    #[must_use]
    pub fn hints(&self) -> &[SqlHint] {
        self.common().hints()
    }

    /// Appends an optimizer hint.
    pub fn add_hint(&mut self, hint: SqlHint) {
        self.common_mut().add_hint(hint);
    }

    /// The flashback expression.
    #[must_use]
    pub fn flashback(&self) -> Option<&SqlExpr> {
        self.common().flashback()
    }

    /// Sets or clears the flashback expression, returning the previous one detached.
    pub fn set_flashback(&mut self, flashback: Option<SqlExpr>) -> Option<SqlExpr> {
        self.common_mut().set_flashback(flashback)
    }

    /// The effective alias, normalized by [`DelimiterNormalizer`].
    ///
    /// Expression sources fall back to the simple name of their name
    /// expression; other kinds only report an explicit alias.
    #[must_use]
    pub fn compute_alias(&self) -> Option<String> {
        self.compute_alias_with(&DelimiterNormalizer)
    }

    /// [`Self::compute_alias`] with a caller-chosen normalizer.
    #[must_use]
    pub fn compute_alias_with(&self, normalizer: &dyn Normalizer) -> Option<String> {
        match self {
            Self::Expr(source) => source.compute_alias_with(normalizer),
            Self::Join(source) => source.common().normalized_alias(normalizer),
            Self::Dialect(source) => source.compute_alias(normalizer),
        }
    }

    /// Deep copy under a fresh identity, detached from any parent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CloneUnsupported`] when this source, or a source
    /// nested in it, is a dialect kind without a clone implementation, and
    /// [`Error::DepthLimitExceeded`] when joins nest deeper than
    /// [`DEFAULT_MAX_DEPTH`].
    pub fn try_clone(&self) -> Result<Self, Error> {
        self.try_clone_with_limit(DEFAULT_MAX_DEPTH)
    }

    /// [`Self::try_clone`] with a custom nesting ceiling.
    ///
    /// # Errors
    ///
    /// As [`Self::try_clone`], with `limit` as the ceiling.
    pub fn try_clone_with_limit(&self, limit: usize) -> Result<Self, Error> {
        let cloned = self.try_clone_at(Depth::root(limit));
        if let Err(error) = &cloned {
            tracing::debug!(variant = self.variant_name(), %error, "table source clone refused");
        }
        cloned
    }

    fn try_clone_at(&self, depth: Depth) -> Result<Self, Error> {
        match self {
            Self::Expr(source) => Ok(Self::Expr(source.clone())),
            Self::Join(source) => source.try_clone_at(depth).map(Self::Join),
            Self::Dialect(source) => source.try_clone_boxed().map(Self::Dialect),
        }
    }

    /// Replaces a direct child expression that has identity `expr` with `target`.
    pub fn replace(&mut self, expr: NodeId, target: SqlExpr) -> Replacement {
        match self {
            Self::Expr(source) => source.replace(expr, target),
            Self::Join(source) => source.replace(expr, target),
            Self::Dialect(source) => source.replace(expr, target),
        }
    }

    /// The expression source, if this is one.
    #[must_use]
    pub fn as_expr(&self) -> Option<&ExprTableSource> {
        match self {
            Self::Expr(source) => Some(source),
            _ => None,
        }
    }

    /// The join, if this is one.
    #[must_use]
    pub fn as_join(&self) -> Option<&JoinTableSource> {
        match self {
            Self::Join(source) => Some(source),
            _ => None,
        }
    }

    /// The join, mutably, if this is one.
    pub fn as_join_mut(&mut self) -> Option<&mut JoinTableSource> {
        match self {
            Self::Join(source) => Some(source),
            _ => None,
        }
    }
}

impl From<ExprTableSource> for TableSource {
    fn from(source: ExprTableSource) -> Self {
        Self::Expr(source)
    }
}

impl From<JoinTableSource> for TableSource {
    fn from(source: JoinTableSource) -> Self {
        Self::Join(source)
    }
}

impl From<Box<dyn DialectTableSource>> for TableSource {
    fn from(source: Box<dyn DialectTableSource>) -> Self {
        Self::Dialect(source)
    }
}

impl PartialEq for TableSource {
    fn eq(&self, other: &Self) -> bool {
        join::source_eq(self, other)
    }
}

impl Eq for TableSource {}

impl Hash for TableSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        join::source_hash(self, state);
    }
}

impl Node for TableSource {
    fn meta(&self) -> &NodeMeta {
        self.common().meta()
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        self.common_mut().meta_mut()
    }
}

impl FormatSql for TableSource {
    fn output(&self, buf: &mut String) {
        match self {
            Self::Expr(source) => source.output(buf),
            Self::Join(source) => source.output(buf),
            Self::Dialect(source) => source.output(buf),
        }
    }
}

impl Accept for TableSource {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        match self {
            Self::Expr(source) => source.accept_at(visitor, depth),
            Self::Join(source) => source.accept_at(visitor, depth),
            Self::Dialect(source) => source.accept_at(visitor, depth),
        }
    }
}

impl Accept for dyn DialectTableSource {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self.common(),
            depth,
            |v| v.visit_dialect_table_source(self),
            |v, depth| self.accept_children(v, depth),
            |v| v.end_visit_dialect_table_source(self),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::BinaryOperator;
    use alloc::string::ToString;
    use core::any::Any;

    #[derive(Debug, Default)]
    struct Unnest {
        common: TableSourceCommon,
        column: String,
    }

    impl DialectTableSource for Unnest {
        fn variant_name(&self) -> &'static str {
            "Unnest"
        }

        fn common(&self) -> &TableSourceCommon {
            &self.common
        }

        fn common_mut(&mut self) -> &mut TableSourceCommon {
            &mut self.common
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn dyn_eq(&self, other: &dyn DialectTableSource) -> bool {
            other
                .as_any()
                .downcast_ref::<Self>()
                .is_some_and(|other| other.column == self.column)
        }

        fn dyn_hash(&self, mut state: &mut dyn Hasher) {
            self.column.hash(&mut state);
        }

        fn output(&self, buf: &mut String) {
            buf.push_str("UNNEST(");
            buf.push_str(&self.column);
            buf.push(')');
        }
    }

    #[derive(Debug, Default, Clone)]
    struct GenerateSeries {
        common: TableSourceCommon,
        stop: i64,
    }

    impl DialectTableSource for GenerateSeries {
        fn variant_name(&self) -> &'static str {
            "GenerateSeries"
        }

        fn common(&self) -> &TableSourceCommon {
            &self.common
        }

        fn common_mut(&mut self) -> &mut TableSourceCommon {
            &mut self.common
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn dyn_eq(&self, other: &dyn DialectTableSource) -> bool {
            other
                .as_any()
                .downcast_ref::<Self>()
                .is_some_and(|other| other.stop == self.stop)
        }

        fn dyn_hash(&self, mut state: &mut dyn Hasher) {
            self.stop.hash(&mut state);
        }

        fn output(&self, buf: &mut String) {
            buf.push_str("generate_series(1, ");
            buf.push_str(&self.stop.to_string());
            buf.push(')');
        }

        fn try_clone_boxed(&self) -> Result<Box<dyn DialectTableSource>, Error> {
            Ok(Box::new(self.clone()))
        }
    }

    fn unnest(column: &str) -> TableSource {
        TableSource::Dialect(Box::new(Unnest {
            column: column.to_string(),
            ..Unnest::default()
        }))
    }

    fn table(name: &str) -> TableSource {
        ExprTableSource::new(SqlExpr::identifier(name)).into()
    }

    #[test]
    fn test_dialect_clone_is_refused_with_variant_name() {
        let error = unnest("tags").try_clone().unwrap_err();
        assert_eq!(
            error,
            Error::CloneUnsupported {
                variant: "Unnest".to_string(),
            }
        );
        assert!(error.to_string().contains("Unnest"));
    }

    #[test]
    fn test_nested_dialect_blocks_join_clone() {
        let join = TableSource::from(JoinTableSource::new(
            table("t"),
            JoinType::CrossApply,
            unnest("tags"),
            None,
        ));
        assert!(matches!(
            join.try_clone(),
            Err(Error::CloneUnsupported { .. })
        ));
    }

    #[test]
    fn test_dialect_clone_override_relinks_common_children() {
        let mut source = TableSource::Dialect(Box::new(GenerateSeries {
            stop: 10,
            ..GenerateSeries::default()
        }));
        source.set_alias(Some("s".to_string()));
        source.add_hint(SqlHint::new("NOLOCK"));
        source.set_flashback(Some(SqlExpr::literal("2024-01-01")));

        let cloned = source.try_clone().unwrap();
        assert_eq!(cloned, source);
        assert_eq!(cloned.format_sql(), "generate_series(1, 10)");
        assert_ne!(cloned.node_id(), source.node_id());
        assert!(cloned.parent().is_none());
        assert_eq!(cloned.alias(), Some("s"));
        assert_eq!(cloned.hints()[0].parent(), Some(cloned.node_id()));
        assert_eq!(cloned.flashback().unwrap().parent(), Some(cloned.node_id()));
        assert_eq!(source.hints()[0].parent(), Some(source.node_id()));
    }

    #[test]
    fn test_dialect_equality_and_output() {
        assert_eq!(unnest("a"), unnest("a"));
        assert_ne!(unnest("a"), unnest("b"));
        assert_ne!(unnest("a"), table("a"));
        assert_eq!(unnest("a").format_sql(), "UNNEST(a)");
    }

    #[test]
    fn test_dialect_alias_and_downcast() {
        let mut source = unnest("tags");
        source.set_alias(Some("\"T\"".to_string()));
        assert_eq!(source.compute_alias().as_deref(), Some("T"));
        let TableSource::Dialect(dialect) = &source else {
            panic!("expected a dialect source");
        };
        assert_eq!(dialect.downcast_ref::<Unnest>().unwrap().column, "tags");
        assert_eq!(dialect.node_id(), source.node_id());
    }

    #[test]
    fn test_join_alias_is_explicit_only() {
        let mut join = TableSource::from(JoinTableSource::new(
            table("a"),
            JoinType::Join,
            table("b"),
            None,
        ));
        assert!(join.compute_alias().is_none());
        join.set_alias(Some("j".to_string()));
        assert_eq!(join.compute_alias().as_deref(), Some("j"));
    }

    #[test]
    fn test_replace_dispatches_to_flashback() {
        let mut source = table("t");
        source.set_flashback(Some(SqlExpr::literal("2024-01-01")));
        let flashback = source.flashback().unwrap().node_id();
        let outcome = source.replace(
            flashback,
            SqlExpr::binary(
                SqlExpr::identifier("now"),
                BinaryOperator::Subtract,
                SqlExpr::literal(1),
            ),
        );
        assert!(outcome.is_replaced());
        assert_eq!(source.flashback().unwrap().format_sql(), "now - 1");
        assert_eq!(source.flashback().unwrap().parent(), Some(source.node_id()));
    }
}
