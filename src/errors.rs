//! Submodule defining the errors used across the crate.

use alloc::string::String;

/// Errors raised by AST operations that cannot produce a meaningful value.
///
/// Lookups never fail: they return `None`. A `replace` that finds nothing
/// returns [`Replacement::NoMatch`](crate::Replacement::NoMatch).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The table-source variant does not implement deep cloning.
    #[error("clone is not supported by table source variant `{variant}`")]
    CloneUnsupported {
        /// Name of the variant that refused the clone.
        variant: String,
    },
    /// Traversal went deeper than the configured ceiling.
    #[error("traversal exceeded the maximum depth of {limit} nested nodes")]
    DepthLimitExceeded {
        /// The ceiling that was hit.
        limit: usize,
    },
}
