//! Ancestor counter propagation.
//!
//! After a member is attached under `parent` on `side`, every member from
//! `parent` up to the root gets its `side` counter bumped by one. The side is
//! fixed for the whole walk: an ancestor whose path to the new member goes
//! through its *right* child still has its *left* counter bumped when the
//! placement side was left. Reports built on these counters depend on this
//! exact behaviour.

use crate::error::{Result, TreeError};
use crate::{MemberCode, MemberTree, Side};
use std::collections::HashSet;

/// Increment the `side` counter of `parent` and of every ancestor above it.
///
/// Returns the codes that were updated, parent first and root last. On a
/// missing ancestor or a cycle the walk stops with [`TreeError::Corrupt`];
/// counters already bumped in this snapshot stay bumped, so callers must not
/// persist a tree after a failed propagation.
pub fn propagate(tree: &mut MemberTree, parent: &str, side: Side) -> Result<Vec<MemberCode>> {
    let mut updated = Vec::new();
    let mut seen = HashSet::new();
    let mut next = Some(MemberCode::new(parent));

    while let Some(code) = next.take() {
        if !seen.insert(code.clone()) {
            return Err(TreeError::Corrupt(format!("ancestor cycle through {code}")));
        }

        let member = tree
            .get_mut(code.as_str())
            .ok_or_else(|| TreeError::Corrupt(format!("missing ancestor {code}")))?;
        *member.count_mut(side) += 1;
        next = member.sponsor_code.clone();
        updated.push(code);
    }

    Ok(updated)
}

/// Ancestors of `code`, nearest first, ending at the root.
///
/// Stops early (without error) at a missing ancestor or a cycle.
pub fn ancestors(tree: &MemberTree, code: &str) -> Vec<MemberCode> {
    let mut chain = Vec::new();
    let mut seen: HashSet<&MemberCode> = HashSet::new();
    let mut current = tree.get(code);

    while let Some(parent_code) = current.and_then(|m| m.sponsor_code.as_ref()) {
        if !seen.insert(parent_code) {
            break;
        }
        chain.push(parent_code.clone());
        current = tree.get(parent_code.as_str());
    }
    chain
}
