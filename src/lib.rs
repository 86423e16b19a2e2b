#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod create_table;
pub mod errors;
pub mod expr;
pub mod format;
pub mod node;
pub mod normalize;
pub mod parameter;
pub mod replace;
pub mod table_source;
#[cfg(feature = "testing")]
pub mod testing;
pub mod visitor;

// Re-export main types
pub use create_table::{
    CheckConstraint, ColumnDefinition, CreateTableStatement, DialectTableElement, KeyColumns,
    TableElement, TableIndex, TableType, UniqueConstraint,
};
pub use expr::{BinaryOperator, ExprKind, SqlDataType, SqlExpr, SqlHint, SqlSelect, SqlValue};
pub use format::FormatSql;
pub use node::{AttributeValue, Attributes, FORMAT_BODY_BEFORE_COMMENT, Node, NodeId, NodeMeta};
pub use normalize::{CaseFoldNormalizer, DelimiterNormalizer, Normalizer};
pub use parameter::{Parameter, ParameterType};
pub use replace::Replacement;
pub use table_source::{
    DialectTableSource, ExprTableSource, JoinTableSource, JoinType, SchemaObject, TableSource,
    TableSourceCommon,
};
pub use visitor::{Accept, DEFAULT_MAX_DEPTH, Depth, ParentIndex, Visitor};

// Re-export errors
pub use errors::Error;
