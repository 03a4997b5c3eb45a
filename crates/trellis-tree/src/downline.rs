//! Read-only downline traversal.

use crate::{Member, MemberTree, Side};
use std::collections::HashSet;

/// The two subtrees under a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downline<'a> {
    /// Member the downline belongs to
    pub member: &'a Member,
    /// Left subtree in pre-order
    pub left: Vec<&'a Member>,
    /// Right subtree in pre-order
    pub right: Vec<&'a Member>,
}

impl<'a> Downline<'a> {
    /// Subtree listing for `side`.
    pub fn side(&self, side: Side) -> &[&'a Member] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Collect both subtrees of `code`, or `None` if the member is unknown.
pub fn downline<'a>(tree: &'a MemberTree, code: &str) -> Option<Downline<'a>> {
    let member = tree.get(code)?;
    Some(Downline {
        member,
        left: subtree(tree, member, Side::Left),
        right: subtree(tree, member, Side::Right),
    })
}

/// Pre-order listing of the subtree hanging off `member` on `side`.
///
/// Each node is followed by its whole left subtree, then its right subtree.
/// Uses an explicit stack so deep spill chains cannot overflow the call
/// stack. Missing children are skipped and each member is listed at most once.
pub fn subtree<'a>(tree: &'a MemberTree, member: &'a Member, side: Side) -> Vec<&'a Member> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    seen.insert(&member.code);

    let mut stack: Vec<&str> = member.child(side).map(|c| c.as_str()).into_iter().collect();

    while let Some(code) = stack.pop() {
        let Some(node) = tree.get(code) else {
            continue;
        };
        if !seen.insert(&node.code) {
            continue;
        }
        out.push(node);

        // Right first so the left subtree is popped (and listed) first.
        if let Some(right) = &node.right_child {
            stack.push(right.as_str());
        }
        if let Some(left) = &node.left_child {
            stack.push(left.as_str());
        }
    }

    out
}
