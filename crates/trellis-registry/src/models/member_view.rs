//! Public views of members - everything except the credential.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trellis_tree::{Downline, Member, Side};

/// A member as exposed outside the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberView {
    pub member_code: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    /// Placement parent (`None` for the root)
    pub sponsor_code: Option<String>,
    /// Slot under the placement parent (`None` for the root)
    pub position: Option<Side>,
    pub left_member: Option<String>,
    pub right_member: Option<String>,
    pub left_count: u64,
    pub right_count: u64,
    pub joining_date: DateTime<Utc>,
}

impl From<&Member> for MemberView {
    fn from(m: &Member) -> Self {
        Self {
            member_code: m.code.to_string(),
            name: m.name.clone(),
            email: m.email.clone(),
            mobile: m.mobile.clone(),
            sponsor_code: m.sponsor_code.as_ref().map(ToString::to_string),
            position: m.side,
            left_member: m.left_child.as_ref().map(ToString::to_string),
            right_member: m.right_child.as_ref().map(ToString::to_string),
            left_count: m.left_count,
            right_count: m.right_count,
            joining_date: m.joined_at,
        }
    }
}

/// One row of a downline listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownlineEntry {
    pub member_code: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub position: Option<Side>,
    pub joining_date: DateTime<Utc>,
    pub left_count: u64,
    pub right_count: u64,
}

impl From<&Member> for DownlineEntry {
    fn from(m: &Member) -> Self {
        Self {
            member_code: m.code.to_string(),
            name: m.name.clone(),
            email: m.email.clone(),
            mobile: m.mobile.clone(),
            position: m.side,
            joining_date: m.joined_at,
            left_count: m.left_count,
            right_count: m.right_count,
        }
    }
}

/// Downline report for one member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownlineReport {
    /// The member's left counter
    pub total_left: u64,
    /// The member's right counter
    pub total_right: u64,
    /// Left subtree, pre-order
    pub left_downline: Vec<DownlineEntry>,
    /// Right subtree, pre-order
    pub right_downline: Vec<DownlineEntry>,
    pub direct_left: Option<MemberView>,
    pub direct_right: Option<MemberView>,
}

impl From<&Downline<'_>> for DownlineReport {
    fn from(d: &Downline<'_>) -> Self {
        // Pre-order puts the direct child first in each listing.
        let direct = |list: &[&Member]| list.first().map(|m| MemberView::from(*m));
        Self {
            total_left: d.member.count(Side::Left),
            total_right: d.member.count(Side::Right),
            left_downline: d.left.iter().map(|m| DownlineEntry::from(*m)).collect(),
            right_downline: d.right.iter().map(|m| DownlineEntry::from(*m)).collect(),
            direct_left: direct(&d.left),
            direct_right: direct(&d.right),
        }
    }
}
