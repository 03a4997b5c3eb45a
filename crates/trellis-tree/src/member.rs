//! The member record.

use crate::{MemberCode, Side};
use chrono::{DateTime, Utc};

/// A node of the placement tree.
///
/// Everything except the child pointers and the subtree counters is fixed
/// when the member is created.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    /// Unique sequential identifier
    pub code: MemberCode,

    /// Display name
    pub name: String,

    /// Unique login key
    pub email: String,

    /// Contact number
    pub mobile: String,

    /// Hashed secret; opaque to the tree
    pub credential: String,

    /// Placement parent, `None` only for the root
    pub sponsor_code: Option<MemberCode>,

    /// Slot occupied under the placement parent, `None` only for the root
    pub side: Option<Side>,

    /// Code of the left child
    #[cfg_attr(feature = "serde", serde(default))]
    pub left_child: Option<MemberCode>,

    /// Code of the right child
    #[cfg_attr(feature = "serde", serde(default))]
    pub right_child: Option<MemberCode>,

    /// Descendants counted on the left
    #[cfg_attr(feature = "serde", serde(default))]
    pub left_count: u64,

    /// Descendants counted on the right
    #[cfg_attr(feature = "serde", serde(default))]
    pub right_count: u64,

    /// Creation time
    pub joined_at: DateTime<Utc>,
}

/// Contact and credential data for a member that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub credential: String,
    pub joined_at: DateTime<Utc>,
}

impl Member {
    /// Create the root member.
    pub fn root(code: MemberCode, enrollment: Enrollment) -> Self {
        Self::build(code, enrollment, None, None)
    }

    /// Create a member placed under `parent` on `side`.
    ///
    /// Only the new record is built; linking it into the parent is the job of
    /// [`MemberTree::attach`](crate::MemberTree::attach).
    pub fn placed(
        code: MemberCode,
        enrollment: Enrollment,
        parent: MemberCode,
        side: Side,
    ) -> Self {
        Self::build(code, enrollment, Some(parent), Some(side))
    }

    fn build(
        code: MemberCode,
        enrollment: Enrollment,
        sponsor_code: Option<MemberCode>,
        side: Option<Side>,
    ) -> Self {
        Self {
            code,
            name: enrollment.name,
            email: enrollment.email,
            mobile: enrollment.mobile,
            credential: enrollment.credential,
            sponsor_code,
            side,
            left_child: None,
            right_child: None,
            left_count: 0,
            right_count: 0,
            joined_at: enrollment.joined_at,
        }
    }

    /// Whether this member is the root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.sponsor_code.is_none()
    }

    /// Child occupying `side`, if any.
    #[inline]
    pub fn child(&self, side: Side) -> Option<&MemberCode> {
        match side {
            Side::Left => self.left_child.as_ref(),
            Side::Right => self.right_child.as_ref(),
        }
    }

    /// Descendant counter for `side`.
    #[inline]
    pub fn count(&self, side: Side) -> u64 {
        match side {
            Side::Left => self.left_count,
            Side::Right => self.right_count,
        }
    }

    pub(crate) fn child_slot_mut(&mut self, side: Side) -> &mut Option<MemberCode> {
        match side {
            Side::Left => &mut self.left_child,
            Side::Right => &mut self.right_child,
        }
    }

    pub(crate) fn count_mut(&mut self, side: Side) -> &mut u64 {
        match side {
            Side::Left => &mut self.left_count,
            Side::Right => &mut self.right_count,
        }
    }
}

#[cfg(test)]
pub(crate) fn enrollment(email: &str) -> Enrollment {
    Enrollment {
        name: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        mobile: "555-0100".to_string(),
        credential: "opaque".to_string(),
        joined_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_parent_or_side() {
        let root = Member::root(MemberCode::from_ordinal(1), enrollment("root@example.com"));
        assert!(root.is_root());
        assert_eq!(root.side, None);
        assert_eq!((root.left_count, root.right_count), (0, 0));
        assert_eq!(root.child(Side::Left), None);
        assert_eq!(root.child(Side::Right), None);
    }

    #[test]
    fn placed_member_records_parent_and_side() {
        let m = Member::placed(
            MemberCode::from_ordinal(2),
            enrollment("a@example.com"),
            MemberCode::from_ordinal(1),
            Side::Right,
        );
        assert!(!m.is_root());
        assert_eq!(m.sponsor_code, Some(MemberCode::from_ordinal(1)));
        assert_eq!(m.side, Some(Side::Right));
        assert_eq!(m.name, "a");
    }

    #[test]
    fn side_accessors() {
        let mut m = Member::root(MemberCode::from_ordinal(1), enrollment("r@example.com"));
        *m.count_mut(Side::Right) += 3;
        *m.child_slot_mut(Side::Left) = Some(MemberCode::from_ordinal(2));
        assert_eq!(m.count(Side::Right), 3);
        assert_eq!(m.count(Side::Left), 0);
        assert_eq!(m.child(Side::Left), Some(&MemberCode::from_ordinal(2)));
    }
}
