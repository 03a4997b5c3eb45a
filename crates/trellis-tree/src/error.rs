//! Error types for the placement tree.

use crate::{MemberCode, Side};
use thiserror::Error;

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised by placement, propagation and snapshot checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The named sponsor is not in the tree.
    #[error("sponsor not found: {0}")]
    SponsorNotFound(MemberCode),

    /// The same-side chain below the sponsor ended in a missing node or a cycle.
    #[error("no available position under {sponsor} on the {side} side")]
    PositionUnavailable { sponsor: MemberCode, side: Side },

    /// A side string other than `left` or `right`.
    #[error("invalid side {0:?}: expected \"left\" or \"right\"")]
    InvalidSide(String),

    /// The snapshot violates a structural invariant.
    #[error("corrupt tree: {0}")]
    Corrupt(String),
}
