//! Trellis Placement Tree
//!
//! Strict binary tree of members with same-side spill placement and
//! incrementally maintained subtree counters.
//!
//! # Placement
//!
//! Each new member names a sponsor and a preferred side. The member lands in
//! the sponsor's slot on that side if it is free; otherwise it spills down the
//! chain of same-side children until the first free slot on that side. See
//! [`placement`](crate::resolve) for the exact walk.
//!
//! # Counters
//!
//! Every member carries `left_count` and `right_count`. After each
//! attachment the counter for the placement side is bumped on the parent and
//! on every ancestor up to the root, using the same side at every level.
//!
//! # Snapshots
//!
//! All operations work on a [`MemberTree`], an indexed in-memory snapshot.
//! The crate does no I/O; loading and persisting snapshots is left to the
//! caller so a whole registration can be committed as one write.

mod code;
mod downline;
mod error;
mod member;
mod placement;
mod propagation;
mod side;
mod tree;

pub use code::{next_code, MemberCode, CODE_PREFIX, CODE_WIDTH};
pub use downline::{downline, subtree, Downline};
pub use error::{Result, TreeError};
pub use member::{Enrollment, Member};
pub use placement::{resolve, spill_depth, Placement};
pub use propagation::{ancestors, propagate};
pub use side::Side;
pub use tree::MemberTree;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn enroll(n: usize) -> Enrollment {
        Enrollment {
            name: format!("member {n}"),
            email: format!("m{n}@example.com"),
            mobile: "555-0100".to_string(),
            credential: "opaque".to_string(),
            joined_at: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
        }
    }

    fn side_from(bit: bool) -> Side {
        if bit {
            Side::Right
        } else {
            Side::Left
        }
    }

    proptest! {
        /// Random registration sequences keep the tree well formed and bump
        /// exactly the fixed-side counter of every ancestor of the parent.
        #[test]
        fn registrations_preserve_invariants(
            steps in prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 1..60)
        ) {
            let mut tree = MemberTree::new();
            tree.attach(Member::root(tree.next_code().unwrap(), enroll(0))).unwrap();

            for (i, (pick, bit)) in steps.into_iter().enumerate() {
                let sponsor = tree.members()[pick.index(tree.len())].code.clone();
                let side = side_from(bit);

                let before: Vec<(MemberCode, u64, u64)> = tree
                    .members()
                    .iter()
                    .map(|m| (m.code.clone(), m.left_count, m.right_count))
                    .collect();

                let placement = resolve(&tree, sponsor.as_str(), side).unwrap();
                prop_assert_eq!(placement.side, side);

                let code = tree.next_code().unwrap();
                let parent = placement.parent.clone();
                let member = Member::placed(code.clone(), enroll(i + 1), parent, side);
                tree.attach(member).unwrap();
                let updated = propagate(&mut tree, placement.parent.as_str(), side).unwrap();

                let mut path = vec![placement.parent.clone()];
                path.extend(ancestors(&tree, placement.parent.as_str()));
                prop_assert_eq!(&updated, &path);
                prop_assert_eq!(updated.last(), tree.root().map(|r| &r.code));

                for (prev_code, left, right) in before {
                    let now = tree.get(prev_code.as_str()).unwrap();
                    let bumped = u64::from(path.contains(&prev_code));
                    let (exp_left, exp_right) = match side {
                        Side::Left => (left + bumped, right),
                        Side::Right => (left, right + bumped),
                    };
                    prop_assert_eq!((now.left_count, now.right_count), (exp_left, exp_right));
                }

                prop_assert_eq!(code.ordinal(), Some(tree.len() as u64));
                prop_assert!(tree.validate().is_ok());
            }
        }

        /// Counters summed over both sides equal the number of descendants
        /// when every registration prefers the same side from the root.
        #[test]
        fn single_lineage_counts_match_downline(count in 1usize..40, bit in any::<bool>()) {
            let side = side_from(bit);
            let mut tree = MemberTree::new();
            tree.attach(Member::root(tree.next_code().unwrap(), enroll(0))).unwrap();
            let root = tree.root().unwrap().code.clone();

            for i in 0..count {
                let placement = resolve(&tree, root.as_str(), side).unwrap();
                let code = tree.next_code().unwrap();
                let member = Member::placed(code, enroll(i + 1), placement.parent.clone(), side);
                tree.attach(member).unwrap();
                propagate(&mut tree, placement.parent.as_str(), side).unwrap();
            }

            let d = downline(&tree, root.as_str()).unwrap();
            prop_assert_eq!(d.side(side).len(), count);
            prop_assert!(d.side(side.opposite()).is_empty());
            prop_assert_eq!(d.member.count(side), count as u64);
            prop_assert_eq!(spill_depth(&tree, root.as_str(), side), Some(count));
        }
    }
}
