//! Tests for the visitor protocol.
//!
//! This module tests:
//! - Children are visited in each kind's fixed order
//! - Returning `false` skips children but still runs the end hook
//! - Deep trees stop at the depth ceiling with balanced hooks
//! - Deep clones stop at the same ceiling instead of exhausting the stack
//! - Parent links recomputed by traversal

use std::any::Any;
use std::hash::{Hash, Hasher};

use pretty_assertions::assert_eq;
use sql_ast_core::{
    Accept, BinaryOperator, ColumnDefinition, CreateTableStatement, DEFAULT_MAX_DEPTH, Depth,
    DialectTableSource, Error, ExprTableSource, FormatSql, JoinTableSource, JoinType, Node,
    NodeMeta, Parameter, ParameterType, ParentIndex, SqlDataType, SqlExpr, SqlSelect, TableSource,
    TableSourceCommon, UniqueConstraint, Visitor,
};

/// Records every hook as a readable event.
#[derive(Debug, Default)]
struct Recorder {
    events: Vec<String>,
    skip_tables: bool,
    open: usize,
}

impl Recorder {
    fn push(&mut self, event: String) {
        self.events.push(event);
    }
}

impl Visitor for Recorder {
    fn enter_node(&mut self, _meta: &NodeMeta) {
        self.open += 1;
    }

    fn leave_node(&mut self, _meta: &NodeMeta) {
        self.open -= 1;
    }

    fn visit_expr(&mut self, node: &SqlExpr) -> bool {
        self.push(format!("expr {}", node.format_sql()));
        true
    }

    fn end_visit_expr(&mut self, node: &SqlExpr) {
        self.push(format!("/expr {}", node.format_sql()));
    }

    fn visit_data_type(&mut self, node: &SqlDataType) -> bool {
        self.push(format!("type {}", node.format_sql()));
        true
    }

    fn visit_select(&mut self, node: &SqlSelect) -> bool {
        self.push(format!("select {}", node.text()));
        true
    }

    fn visit_expr_table_source(&mut self, node: &ExprTableSource) -> bool {
        self.push(format!("table {}", node.format_sql()));
        !self.skip_tables
    }

    fn end_visit_expr_table_source(&mut self, node: &ExprTableSource) {
        self.push(format!("/table {}", node.format_sql()));
    }

    fn visit_join_table_source(&mut self, node: &JoinTableSource) -> bool {
        self.push(format!("join {}", node.join_type()));
        true
    }

    fn end_visit_join_table_source(&mut self, node: &JoinTableSource) {
        self.push(format!("/join {}", node.join_type()));
    }

    fn visit_dialect_table_source(&mut self, node: &dyn DialectTableSource) -> bool {
        self.push(format!("dialect {}", node.variant_name()));
        true
    }

    fn end_visit_dialect_table_source(&mut self, node: &dyn DialectTableSource) {
        self.push(format!("/dialect {}", node.variant_name()));
    }

    fn visit_create_table(&mut self, _node: &CreateTableStatement) -> bool {
        self.push("create".to_string());
        true
    }

    fn visit_column_definition(&mut self, node: &ColumnDefinition) -> bool {
        self.push(format!("column {}", node.name().format_sql()));
        false
    }

    fn visit_unique_constraint(&mut self, _node: &UniqueConstraint) -> bool {
        self.push("unique".to_string());
        false
    }

    fn visit_parameter(&mut self, node: &Parameter) -> bool {
        self.push(format!("parameter {:?}", node.param_type()));
        true
    }
}

fn table(name: &str) -> ExprTableSource {
    ExprTableSource::new(SqlExpr::identifier(name))
}

fn join() -> JoinTableSource {
    JoinTableSource::new(
        table("orders"),
        JoinType::LeftOuterJoin,
        table("customers"),
        Some(SqlExpr::binary(
            SqlExpr::identifier("x"),
            BinaryOperator::Equal,
            SqlExpr::identifier("y"),
        )),
    )
}

/// `t0 JOIN t1 JOIN ... JOIN t{n-1}`, nested to the left.
fn join_chain(tables: usize) -> TableSource {
    (1..tables).fold(TableSource::from(table("t0")), |chain, i| {
        JoinTableSource::new(chain, JoinType::Join, table(&format!("t{i}")), None).into()
    })
}

// =============================================================================
// Order and pruning
// =============================================================================

#[test]
fn test_join_visit_order() {
    let mut recorder = Recorder::default();
    join().accept(&mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        [
            "join LEFT JOIN",
            "table orders",
            "expr orders",
            "/expr orders",
            "/table orders",
            "table customers",
            "expr customers",
            "/expr customers",
            "/table customers",
            "expr x = y",
            "expr x",
            "/expr x",
            "expr y",
            "/expr y",
            "/expr x = y",
            "/join LEFT JOIN",
        ]
    );
    assert_eq!(recorder.open, 0);
}

#[test]
fn test_pruned_children_still_get_end_visit() {
    let mut recorder = Recorder {
        skip_tables: true,
        ..Recorder::default()
    };
    table("orders").accept(&mut recorder).unwrap();
    assert_eq!(recorder.events, ["table orders", "/table orders"]);
    assert_eq!(recorder.open, 0);
}

#[test]
fn test_create_table_visit_order() {
    let mut statement = CreateTableStatement::new();
    statement.set_name(SqlExpr::identifier("archive"));
    statement.add_element(ColumnDefinition::new(SqlExpr::identifier("id")));
    statement.add_element(UniqueConstraint::unique([SqlExpr::identifier("id")]));
    statement.set_inherits(Some(table("base")));
    statement.set_select(Some(SqlSelect::new("SELECT 1")));

    let mut recorder = Recorder {
        skip_tables: true,
        ..Recorder::default()
    };
    statement.accept(&mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        [
            "create",
            "table archive",
            "/table archive",
            "column id",
            "unique",
            "table base",
            "/table base",
            "select SELECT 1",
        ]
    );
}

#[test]
fn test_parameter_visit_order() {
    let mut parameter = Parameter::new(SqlExpr::identifier("p"), SqlDataType::new("NUMBER"));
    parameter.set_param_type(ParameterType::Out);
    parameter.set_default_value(Some(SqlExpr::literal(1)));
    parameter.set_cursor_name(Some(SqlExpr::identifier("cur")));
    let mut inner = Parameter::default();
    inner.set_param_type(ParameterType::In);
    parameter.add_cursor_parameter(inner);

    let mut recorder = Recorder::default();
    parameter.accept(&mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        [
            "parameter Out",
            "expr p",
            "/expr p",
            "type NUMBER",
            "expr 1",
            "/expr 1",
            "expr cur",
            "/expr cur",
            "parameter In",
        ]
    );
}

// =============================================================================
// Dialect kinds
// =============================================================================

#[derive(Debug, Default)]
struct Lateral {
    common: TableSourceCommon,
    function: Option<SqlExpr>,
}

impl DialectTableSource for Lateral {
    fn variant_name(&self) -> &'static str {
        "Lateral"
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
            .is_some_and(|other| other.function == self.function)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.function.hash(&mut state);
    }

    fn output(&self, buf: &mut String) {
        buf.push_str("LATERAL ");
        if let Some(function) = &self.function {
            function.output(buf);
        }
    }

    fn accept_children(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        match &self.function {
            Some(function) => function.accept_at(visitor, depth.descend()?),
            None => Ok(()),
        }
    }
}

#[test]
fn test_dialect_source_is_walked_through_its_hooks() {
    let lateral = Lateral {
        function: Some(SqlExpr::identifier("generate_series")),
        ..Lateral::default()
    };
    let source = JoinTableSource::new(
        table("t"),
        JoinType::CrossJoin,
        TableSource::Dialect(Box::new(lateral)),
        None,
    );
    let mut recorder = Recorder {
        skip_tables: true,
        ..Recorder::default()
    };
    source.accept(&mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        [
            "join CROSS JOIN",
            "table t",
            "/table t",
            "dialect Lateral",
            "expr generate_series",
            "/expr generate_series",
            "/dialect Lateral",
            "/join CROSS JOIN",
        ]
    );
    assert_eq!(source.format_sql(), "t CROSS JOIN LATERAL generate_series");
}

// =============================================================================
// Depth ceiling
// =============================================================================

#[test]
fn test_depth_ceiling_stops_deep_trees() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let chain = join_chain(40);
    let mut recorder = Recorder::default();
    assert_eq!(
        chain.accept_with_limit(&mut recorder, 32),
        Err(Error::DepthLimitExceeded { limit: 32 })
    );
    assert_eq!(recorder.open, 0);
    let events = &recorder.events;
    let opened = events.iter().filter(|e| !e.starts_with('/')).count();
    let closed = events.iter().filter(|e| e.starts_with('/')).count();
    assert_eq!(opened, closed);

    let mut recorder = Recorder::default();
    chain.accept(&mut recorder).unwrap();
    assert_eq!(
        recorder.events.first().map(String::as_str),
        Some("join JOIN")
    );
}

#[test]
fn test_clone_stops_at_depth_ceiling() {
    assert!(join_chain(9).try_clone_with_limit(8).is_ok());
    assert_eq!(
        join_chain(10).try_clone_with_limit(8),
        Err(Error::DepthLimitExceeded { limit: 8 })
    );

    let deep = join_chain(DEFAULT_MAX_DEPTH + 45);
    assert_eq!(
        deep.try_clone().unwrap_err(),
        Error::DepthLimitExceeded {
            limit: DEFAULT_MAX_DEPTH,
        }
    );
    assert!(join_chain(DEFAULT_MAX_DEPTH + 1).try_clone().is_ok());
}

#[test]
fn test_custom_limit() {
    let mut recorder = Recorder::default();
    assert!(join().accept_with_limit(&mut recorder, 1).is_err());
    assert!(join().accept_with_limit(&mut recorder, 3).is_ok());
}

// =============================================================================
// Parent index
// =============================================================================

#[test]
fn test_parent_index_matches_links() {
    let source = join();
    let index = ParentIndex::build(&source).unwrap();
    let left = source.left().unwrap();
    let left_expr = left.as_expr().unwrap().expr().unwrap();

    assert_eq!(index.parent_of(source.node_id()), None);
    assert_eq!(index.parent_of(left.node_id()), Some(source.node_id()));
    assert_eq!(index.parent_of(left_expr.node_id()), left_expr.parent());
    assert_eq!(
        index.ancestors(left_expr.node_id()).collect::<Vec<_>>(),
        [left.node_id(), source.node_id()]
    );
    // orders, its name, customers, its name, the condition and its two operands
    assert_eq!(index.len(), 7);
}

#[test]
fn test_trees_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TableSource>();
    assert_send_sync::<CreateTableStatement>();
    assert_send_sync::<Parameter>();
}
