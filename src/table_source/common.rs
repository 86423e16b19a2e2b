//! State every table-source variant carries: identity, alias, hints and
//! flashback clause.

use alloc::string::String;
use alloc::vec::Vec;

use crate::expr::{SqlExpr, SqlHint};
use crate::node::{Node, NodeId, NodeMeta, adopt, adopt_all, release_all, swap_slot};
use crate::normalize::Normalizer;
use crate::replace::{Replacement, replace_in_slot};

/// Identity and presentation state shared by all table sources.
///
/// None of this takes part in table-source equality: two sources that differ
/// only by alias, hints or flashback compare equal when their structure does.
#[derive(Debug, Default)]
pub struct TableSourceCommon {
    meta: NodeMeta,
    alias: Option<String>,
    hints: Vec<SqlHint>,
    flashback: Option<SqlExpr>,
}

impl TableSourceCommon {
    /// Fresh state with no alias, hints or flashback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The explicit alias, as written.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Sets or clears the explicit alias, returning the previous one.
    pub fn set_alias(&mut self, alias: Option<String>) -> Option<String> {
        core::mem::replace(&mut self.alias, alias)
    }

    /// The explicit alias, normalized.
    #[must_use]
    pub fn normalized_alias(&self, normalizer: &dyn Normalizer) -> Option<String> {
        self.alias
            .as_deref()
            .map(|alias| normalizer.normalize(alias))
    }

    /// The optimizer hints, in order.
    #[must_use]
    pub fn hints(&self) -> &[SqlHint] {
        &self.hints
    }

    /// Number of hints, without touching storage.
    #[must_use]
    pub fn hint_count(&self) -> usize {
        self.hints.len()
    }

    /// Appends an optimizer hint.
    pub fn add_hint(&mut self, hint: SqlHint) {
        self.hints.push(adopt(self.meta.id(), hint));
    }

    /// Replaces all hints, returning the previous ones detached.
    pub fn set_hints(&mut self, hints: Vec<SqlHint>) -> Vec<SqlHint> {
        let mut hints = hints;
        adopt_all(self.meta.id(), &mut hints);
        release_all(core::mem::replace(&mut self.hints, hints))
    }

    /// The flashback (time-travel) expression.
    #[must_use]
    pub fn flashback(&self) -> Option<&SqlExpr> {
        self.flashback.as_ref()
    }

    /// Sets or clears the flashback expression, returning the previous one detached.
    pub fn set_flashback(&mut self, flashback: Option<SqlExpr>) -> Option<SqlExpr> {
        swap_slot(self.meta.id(), &mut self.flashback, flashback)
    }

    /// Replaces the flashback expression when it has identity `expr`.
    pub fn replace_flashback(&mut self, expr: NodeId, target: SqlExpr) -> Replacement {
        replace_in_slot(self.meta.id(), &mut self.flashback, expr, target)
    }
}

impl Clone for TableSourceCommon {
    /// Copies the alias and deep-clones hints and flashback under a fresh identity.
    fn clone(&self) -> Self {
        let mut cloned = Self {
            meta: NodeMeta::new(),
            alias: self.alias.clone(),
            hints: self.hints.clone(),
            flashback: self.flashback.clone(),
        };
        let id = cloned.meta.id();
        adopt_all(id, &mut cloned.hints);
        if let Some(flashback) = cloned.flashback.as_mut() {
            flashback.set_parent(Some(id));
        }
        cloned
    }
}

impl Node for TableSourceCommon {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}
