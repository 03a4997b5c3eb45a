//! Same-side spill placement.
//!
//! A new member names a sponsor and a preferred side. If that slot is free
//! the member goes straight there. Otherwise placement spills down the chain
//! of same-side children:
//!
//! ```text
//!        S             preferred = left
//!       /
//!      A               S.left taken  -> look at A.left
//!     /
//!    B                 A.left taken  -> look at B.left
//!   /
//!  (new)               B.left free   -> place under B on the left
//! ```
//!
//! The walk never looks at the opposite side at any level, so the chosen slot
//! is always on the sponsor's preferred lineage even when shallower slots on
//! the other side are open.

use crate::error::{Result, TreeError};
use crate::{MemberCode, MemberTree, Side};
use std::collections::HashSet;

/// Where a new member is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Member whose child slot is taken
    pub parent: MemberCode,
    /// Slot taken under `parent`
    pub side: Side,
}

/// Resolve the attachment point for a member sponsored by `sponsor`.
///
/// Returns [`TreeError::SponsorNotFound`] if the sponsor is not in the tree,
/// and [`TreeError::PositionUnavailable`] if the same-side chain reaches a
/// missing member or loops back on itself.
pub fn resolve(tree: &MemberTree, sponsor: &str, preferred: Side) -> Result<Placement> {
    let sponsor_member = tree
        .get(sponsor)
        .ok_or_else(|| TreeError::SponsorNotFound(MemberCode::new(sponsor)))?;

    let unavailable = || TreeError::PositionUnavailable {
        sponsor: sponsor_member.code.clone(),
        side: preferred,
    };

    let mut current = sponsor_member;
    let mut visited: HashSet<&MemberCode> = HashSet::new();
    visited.insert(&current.code);

    loop {
        let Some(next_code) = current.child(preferred) else {
            return Ok(Placement {
                parent: current.code.clone(),
                side: preferred,
            });
        };

        if !visited.insert(next_code) {
            return Err(unavailable());
        }
        current = tree.get(next_code.as_str()).ok_or_else(unavailable)?;
    }
}

/// Length of the same-side chain hanging below `code` on `side`.
///
/// This is the number of hops [`resolve`] takes before it finds a free slot.
/// Returns `None` for an unknown member or a malformed chain.
pub fn spill_depth(tree: &MemberTree, code: &str, side: Side) -> Option<usize> {
    let mut current = tree.get(code)?;
    let mut depth = 0;
    let mut visited: HashSet<&MemberCode> = HashSet::new();
    visited.insert(&current.code);

    while let Some(next_code) = current.child(side) {
        if !visited.insert(next_code) {
            return None;
        }
        current = tree.get(next_code.as_str())?;
        depth += 1;
    }
    Some(depth)
}
