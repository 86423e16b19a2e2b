//! Helpers shared by the fuzz harness, the fuzz regression tests and the benches.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`SourceShape`]: an `arbitrary`-generated description of a table-source tree
//! - [`check_table_source_invariants`]: panics if a table source breaks clone,
//!   equality, hashing or traversal guarantees
//! - [`test_table_source_invariants`]: the fuzz entry point over raw bytes
//! - [`replay_crash_dir`]: replays every saved crash input in a directory

extern crate std;

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::hash::BuildHasher;
use std::path::Path;

use arbitrary::{Arbitrary, Unstructured};
use hashbrown::DefaultHashBuilder;

use crate::expr::{BinaryOperator, SqlExpr, SqlHint};
use crate::node::{Node, NodeId, NodeMeta};
use crate::table_source::{ExprTableSource, JoinTableSource, JoinType, TableSource};
use crate::visitor::{Accept, ParentIndex, Visitor};

/// Deepest join nesting [`SourceShape`] generates.
pub const MAX_SHAPE_DEPTH: usize = 6;

const NAMES: &[&str] = &["id", "Id", "orders", "\"Orders\"", "`users`", "[t1]", "p0"];

/// Description of a table-source tree, built into nodes by [`SourceShape::build`].
#[derive(Debug, Clone)]
pub enum SourceShape {
    /// A named table.
    Table {
        /// Dotted name segments, never empty.
        path: Vec<String>,
        /// Explicit alias.
        alias: Option<String>,
        /// Partition names.
        partitions: Vec<String>,
        /// Hint bodies.
        hints: Vec<String>,
        /// Flashback literal.
        flashback: Option<i64>,
    },
    /// A join of two shapes.
    Join {
        /// Left side.
        left: Box<SourceShape>,
        /// Join kind.
        join_type: JoinType,
        /// Right side.
        right: Box<SourceShape>,
        /// `ON left = right` columns.
        on: Option<(String, String)>,
        /// `USING` columns.
        using: Vec<String>,
        /// `NATURAL` flag.
        natural: bool,
        /// Explicit alias.
        alias: Option<String>,
    },
}

impl SourceShape {
    fn arbitrary_at(u: &mut Unstructured<'_>, depth: usize) -> arbitrary::Result<Self> {
        if depth >= MAX_SHAPE_DEPTH || u.ratio(3, 5)? {
            let segments: usize = u.int_in_range(1..=3)?;
            return Ok(Self::Table {
                path: (0..segments)
                    .map(|_| arbitrary_name(u))
                    .collect::<arbitrary::Result<_>>()?,
                alias: arbitrary_optional_name(u)?,
                partitions: arbitrary_names(u, 3)?,
                hints: arbitrary_names(u, 2)?,
                flashback: u.arbitrary()?,
            });
        }
        Ok(Self::Join {
            left: Box::new(Self::arbitrary_at(u, depth + 1)?),
            join_type: u.arbitrary()?,
            right: Box::new(Self::arbitrary_at(u, depth + 1)?),
            on: if u.arbitrary()? {
                Some((arbitrary_name(u)?, arbitrary_name(u)?))
            } else {
                None
            },
            using: arbitrary_names(u, 3)?,
            natural: u.arbitrary()?,
            alias: arbitrary_optional_name(u)?,
        })
    }

    /// Builds the described tree.
    #[must_use]
    pub fn build(&self) -> TableSource {
        match self {
            Self::Table {
                path,
                alias,
                partitions,
                hints,
                flashback,
            } => {
                let Some(expr) = SqlExpr::path(path.iter().cloned()) else {
                    return ExprTableSource::default().into();
                };
                let mut source = ExprTableSource::new(expr);
                source.set_alias(alias.clone());
                for partition in partitions {
                    source.add_partition(SqlExpr::identifier(partition.clone()));
                }
                for hint in hints {
                    source.common_mut().add_hint(SqlHint::new(hint.clone()));
                }
                source
                    .common_mut()
                    .set_flashback(flashback.map(SqlExpr::literal));
                source.into()
            }
            Self::Join {
                left,
                join_type,
                right,
                on,
                using,
                natural,
                alias,
            } => {
                let condition = on.as_ref().map(|(l, r)| {
                    SqlExpr::binary(
                        SqlExpr::identifier(l.clone()),
                        BinaryOperator::Equal,
                        SqlExpr::identifier(r.clone()),
                    )
                });
                let mut join =
                    JoinTableSource::new(left.build(), *join_type, right.build(), condition);
                for column in using {
                    join.add_using(SqlExpr::identifier(column.clone()));
                }
                join.set_natural(*natural);
                join.set_alias(alias.clone());
                join.into()
            }
        }
    }
}

impl<'a> Arbitrary<'a> for SourceShape {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Self::arbitrary_at(u, 0)
    }
}

fn arbitrary_name(u: &mut Unstructured<'_>) -> arbitrary::Result<String> {
    if u.arbitrary()? {
        Ok((*u.choose(NAMES)?).to_string())
    } else {
        u.arbitrary()
    }
}

fn arbitrary_optional_name(u: &mut Unstructured<'_>) -> arbitrary::Result<Option<String>> {
    if u.arbitrary()? {
        arbitrary_name(u).map(Some)
    } else {
        Ok(None)
    }
}

fn arbitrary_names(u: &mut Unstructured<'_>, max: usize) -> arbitrary::Result<Vec<String>> {
    let len = u.int_in_range(0..=max)?;
    (0..len).map(|_| arbitrary_name(u)).collect()
}

/// Checks that enter, visit, end visit and leave pair up, and records the
/// parent link each node carries.
#[derive(Debug, Default)]
struct BalanceVisitor {
    stack: Vec<NodeId>,
    entered: usize,
    visits: usize,
    end_visits: usize,
    links: Vec<(NodeId, Option<NodeId>)>,
}

impl Visitor for BalanceVisitor {
    fn enter_node(&mut self, meta: &NodeMeta) {
        self.entered += 1;
        self.stack.push(meta.id());
        self.links.push((meta.id(), meta.parent()));
    }

    fn leave_node(&mut self, meta: &NodeMeta) {
        assert_eq!(
            self.stack.pop(),
            Some(meta.id()),
            "leave without matching enter"
        );
    }

    fn visit_expr_table_source(&mut self, _node: &ExprTableSource) -> bool {
        self.visits += 1;
        true
    }

    fn end_visit_expr_table_source(&mut self, _node: &ExprTableSource) {
        self.end_visits += 1;
    }

    fn visit_join_table_source(&mut self, _node: &JoinTableSource) -> bool {
        self.visits += 1;
        true
    }

    fn end_visit_join_table_source(&mut self, _node: &JoinTableSource) {
        self.end_visits += 1;
    }
}

fn hash_of(source: &TableSource, hasher: &DefaultHashBuilder) -> u64 {
    hasher.hash_one(source)
}

/// Asserts the clone, equality, hashing and traversal guarantees of `source`.
///
/// `source` must not contain dialect kinds.
///
/// # Panics
///
/// Panics with a description of the first broken guarantee.
pub fn check_table_source_invariants(source: &TableSource) {
    let hasher = DefaultHashBuilder::default();

    let mut cloned = source.try_clone().expect("built-in table sources clone");
    assert_eq!(&cloned, source, "clone must be structurally equal");
    assert_eq!(hash_of(&cloned, &hasher), hash_of(source, &hasher));
    assert_ne!(
        cloned.node_id(),
        source.node_id(),
        "clone must get a fresh identity"
    );
    assert!(cloned.parent().is_none(), "clone must start detached");

    cloned.set_alias(Some("fuzz_alias".to_string()));
    cloned.add_hint(SqlHint::new("FUZZ"));
    assert_eq!(&cloned, source, "alias and hints must not affect equality");
    assert_eq!(hash_of(&cloned, &hasher), hash_of(source, &hasher));
    assert_eq!(cloned.hints().len(), source.hints().len() + 1);

    if let TableSource::Expr(expr_source) = &mut cloned {
        expr_source.add_partition(SqlExpr::identifier("fuzz_partition"));
        assert_ne!(&cloned, source, "partitions must affect equality");
    }

    let mut balance = BalanceVisitor::default();
    source
        .accept(&mut balance)
        .expect("shapes stay below the depth ceiling");
    assert!(balance.stack.is_empty(), "unbalanced enter/leave");
    assert_eq!(
        balance.visits, balance.end_visits,
        "unbalanced visit/end visit"
    );
    assert!(balance.entered >= balance.visits);

    let index = ParentIndex::build(source).expect("shapes stay below the depth ceiling");
    assert_eq!(index.len() + 1, balance.entered);
    for (id, parent) in balance.links.iter().skip(1) {
        assert_eq!(index.parent_of(*id), *parent, "stale parent link on {id}");
    }
}

/// Decodes a [`SourceShape`] from `data` and checks the built tree.
///
/// Inputs that do not decode are ignored.
pub fn test_table_source_invariants(data: &[u8]) {
    let mut u = Unstructured::new(data);
    let Ok(shape) = SourceShape::arbitrary(&mut u) else {
        return;
    };
    check_table_source_invariants(&shape.build());
}

/// Runs `check` on every file in `dir`, in name order.
///
/// A missing directory counts as empty.
///
/// # Panics
///
/// Panics if a file cannot be read, or if `check` does.
pub fn replay_crash_dir(dir: impl AsRef<Path>, check: impl Fn(&[u8])) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    for path in paths {
        let data = std::fs::read(&path).expect("crash input is readable");
        std::eprintln!("replaying {}", path.display());
        check(&data);
    }
}
