//! Nesting ceiling for recursive traversal.

use crate::errors::Error;

/// Ceiling used by [`Accept::accept`](crate::Accept::accept).
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Position of a node below the traversal root, with the ceiling to enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    current: usize,
    limit: usize,
}

impl Depth {
    /// Depth of a traversal root under the given ceiling.
    #[must_use]
    pub fn root(limit: usize) -> Self {
        Self { current: 0, limit }
    }

    /// Levels below the root.
    #[must_use]
    pub fn current(self) -> usize {
        self.current
    }

    /// The ceiling being enforced.
    #[must_use]
    pub fn limit(self) -> usize {
        self.limit
    }

    /// Returns the depth one level further down.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`] when that level is past the ceiling.
    pub fn descend(self) -> Result<Self, Error> {
        if self.current >= self.limit {
            tracing::debug!(limit = self.limit, "traversal depth ceiling reached");
            return Err(Error::DepthLimitExceeded { limit: self.limit });
        }
        Ok(Self {
            current: self.current + 1,
            limit: self.limit,
        })
    }
}
