//! Nodes whose content is owned by other components: optimizer hints and
//! AS-SELECT bodies. The core only carries, compares and renders them.

use alloc::string::String;
use core::hash::{Hash, Hasher};

use crate::errors::Error;
use crate::format::FormatSql;
use crate::node::{Node, NodeMeta};
use crate::visitor::{Accept, Depth, Visitor, walk};

/// An optimizer directive attached to a table source.
#[derive(Debug, Clone)]
pub struct SqlHint {
    meta: NodeMeta,
    text: String,
}

impl SqlHint {
    /// A hint with the given body, without comment delimiters.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::new(),
            text: text.into(),
        }
    }

    /// The hint body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The query body of `CREATE TABLE ... AS SELECT`, as built by the query parser.
#[derive(Debug, Clone)]
pub struct SqlSelect {
    meta: NodeMeta,
    text: String,
}

impl SqlSelect {
    /// A select body with the given SQL text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::new(),
            text: text.into(),
        }
    }

    /// The select SQL text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

macro_rules! opaque_node {
    ($node:ty, $visit:ident, $end_visit:ident) => {
        impl PartialEq for $node {
            fn eq(&self, other: &Self) -> bool {
                self.text == other.text
            }
        }

        impl Eq for $node {}

        impl Hash for $node {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.text.hash(state);
            }
        }

        impl Node for $node {
            fn meta(&self) -> &NodeMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut NodeMeta {
                &mut self.meta
            }
        }

        impl Accept for $node {
            fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
                walk(
                    visitor,
                    self,
                    depth,
                    |v| v.$visit(self),
                    |_, _| Ok(()),
                    |v| v.$end_visit(self),
                )
            }
        }
    };
}

opaque_node!(SqlHint, visit_hint, end_visit_hint);
opaque_node!(SqlSelect, visit_select, end_visit_select);

impl FormatSql for SqlHint {
    fn output(&self, buf: &mut String) {
        buf.push_str("/*+ ");
        buf.push_str(&self.text);
        buf.push_str(" */");
    }
}

impl FormatSql for SqlSelect {
    fn output(&self, buf: &mut String) {
        buf.push_str(&self.text);
    }
}
