//! Benchmark for deep cloning and walking table-source trees.
//!
//! Measures the performance of:
//! 1. Deep-cloning left-deep join chains
//! 2. Hashing join chains, which recurses through both sides
//! 3. Walking join chains with a parent index
//! 4. Column and index lookups on wide `CREATE TABLE` statements

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sql_ast_core::{
    BinaryOperator, ColumnDefinition, CreateTableStatement, ExprTableSource, JoinTableSource,
    JoinType, ParentIndex, SqlDataType, SqlExpr, TableIndex, TableSource,
};
use std::hash::BuildHasher;
use std::hint::black_box;

/// Join chain sizes, kept below the default depth ceiling.
const CHAIN_SIZES: [usize; 3] = [10, 50, 200];

/// Table `t{i}` aliased `a{i}`.
fn table(i: usize) -> ExprTableSource {
    ExprTableSource::with_alias(SqlExpr::identifier(format!("t{i}")), format!("a{i}"))
}

/// Build `t0 JOIN t1 ON t0.id = t1.id JOIN t2 ON ...` with `tables` tables.
fn join_chain(tables: usize) -> TableSource {
    let mut chain = TableSource::from(table(0));
    for i in 1..tables {
        let condition = SqlExpr::binary(
            SqlExpr::path([format!("t{}", i - 1), "id".to_string()]).unwrap(),
            BinaryOperator::Equal,
            SqlExpr::path([format!("t{i}"), "id".to_string()]).unwrap(),
        );
        let join = JoinTableSource::new(chain, JoinType::LeftOuterJoin, table(i), Some(condition));
        chain = join.into();
    }
    chain
}

/// Build a table with `columns` columns and one index per ten columns.
fn wide_table(columns: usize) -> CreateTableStatement {
    let mut statement = CreateTableStatement::new();
    statement.set_name(SqlExpr::identifier("wide"));
    for i in 0..columns {
        statement.add_element(
            ColumnDefinition::new(SqlExpr::identifier(format!("Col{i}")))
                .with_data_type(SqlDataType::new("INTEGER")),
        );
    }
    for i in (0..columns).step_by(10) {
        statement.add_element(TableIndex::new(
            SqlExpr::identifier(format!("idx{i}")),
            [SqlExpr::identifier(format!("col{i}"))],
        ));
    }
    statement
}

fn benchmark_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_chain_clone");
    for tables in CHAIN_SIZES {
        let chain = join_chain(tables);
        group.throughput(Throughput::Elements(tables as u64));
        group.bench_with_input(BenchmarkId::new("try_clone", tables), &chain, |b, chain| {
            b.iter(|| black_box(chain.try_clone().unwrap()));
        });
    }
    group.finish();
}

fn benchmark_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_chain_hash");
    let hasher = hashbrown::DefaultHashBuilder::default();
    for tables in CHAIN_SIZES {
        let chain = join_chain(tables);
        group.throughput(Throughput::Elements(tables as u64));
        group.bench_with_input(BenchmarkId::new("hash_one", tables), &chain, |b, chain| {
            b.iter(|| black_box(hasher.hash_one(black_box(chain))));
        });
    }
    group.finish();
}

fn benchmark_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_chain_walk");
    for tables in CHAIN_SIZES {
        let chain = join_chain(tables);
        group.throughput(Throughput::Elements(tables as u64));
        group.bench_with_input(
            BenchmarkId::new("parent_index", tables),
            &chain,
            |b, chain| {
                b.iter(|| black_box(ParentIndex::build(black_box(chain)).unwrap()));
            },
        );
    }
    group.finish();
}

fn benchmark_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_table_lookups");
    let statement = wide_table(500);

    group.bench_function("find_column_last", |b| {
        b.iter(|| black_box(statement.find_column(black_box("COL499"))));
    });

    group.bench_function("find_index_last", |b| {
        b.iter(|| black_box(statement.find_index(black_box("COL490"))));
    });

    group.bench_function("find_column_missing", |b| {
        b.iter(|| black_box(statement.find_column(black_box("missing"))));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_clone,
    benchmark_hash,
    benchmark_walk,
    benchmark_lookups,
);
criterion_main!(benches);
