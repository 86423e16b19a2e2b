//! Table persistence kinds.

/// Whether a table is permanent or temporary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TableType {
    /// A regular table.
    #[default]
    Default,
    /// `GLOBAL TEMPORARY`.
    GlobalTemporary,
    /// `LOCAL TEMPORARY`.
    LocalTemporary,
}

impl TableType {
    /// The keyword placed before `TABLE`, if any.
    #[must_use]
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::GlobalTemporary => Some("GLOBAL TEMPORARY"),
            Self::LocalTemporary => Some("LOCAL TEMPORARY"),
        }
    }
}
