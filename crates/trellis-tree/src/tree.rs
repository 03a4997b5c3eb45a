//! In-memory snapshot of the whole member set.
//!
//! A [`MemberTree`] is loaded once per operation, mutated in memory by
//! attachment and count propagation, and handed back to the store as one
//! ordered snapshot. Members keep their load order; the code and email
//! indexes point into that vector.

use crate::error::{Result, TreeError};
use crate::{next_code, Member, MemberCode, Side};
use std::collections::HashMap;

/// Indexed snapshot of members.
#[derive(Debug, Clone, Default)]
pub struct MemberTree {
    members: Vec<Member>,
    by_code: HashMap<MemberCode, usize>,
    by_email: HashMap<String, usize>,
}

impl MemberTree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a stored snapshot.
    ///
    /// Fails if two members share a code or an email.
    pub fn from_members(members: Vec<Member>) -> Result<Self> {
        let mut by_code = HashMap::with_capacity(members.len());
        let mut by_email = HashMap::with_capacity(members.len());

        for (idx, member) in members.iter().enumerate() {
            if by_code.insert(member.code.clone(), idx).is_some() {
                return Err(TreeError::Corrupt(format!("duplicate code {}", member.code)));
            }
            if by_email.insert(member.email.clone(), idx).is_some() {
                return Err(TreeError::Corrupt(format!("duplicate email {}", member.email)));
            }
        }

        Ok(Self {
            members,
            by_code,
            by_email,
        })
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the tree has no members (no root yet).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Look up a member by code.
    pub fn get(&self, code: &str) -> Option<&Member> {
        self.by_code.get(code).map(|&idx| &self.members[idx])
    }

    pub(crate) fn get_mut(&mut self, code: &str) -> Option<&mut Member> {
        let idx = *self.by_code.get(code)?;
        Some(&mut self.members[idx])
    }

    /// Whether a member with this code exists.
    #[inline]
    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Look up a member by email.
    pub fn find_by_email(&self, email: &str) -> Option<&Member> {
        self.by_email.get(email).map(|&idx| &self.members[idx])
    }

    /// The first member without a placement parent.
    pub fn root(&self) -> Option<&Member> {
        self.members.iter().find(|m| m.is_root())
    }

    /// Members in snapshot order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Give the snapshot back for persisting.
    pub fn into_members(self) -> Vec<Member> {
        self.members
    }

    /// Code the next registered member will receive.
    pub fn next_code(&self) -> Result<MemberCode> {
        next_code(self.members.iter().map(|m| &m.code))
    }

    /// Insert a new member and link it into its placement parent.
    ///
    /// A member without `sponsor_code` becomes the root and is only accepted
    /// into an empty tree. Otherwise the parent must exist and its slot on
    /// the member's side must be free.
    pub fn attach(&mut self, member: Member) -> Result<()> {
        if self.by_code.contains_key(&member.code) {
            return Err(TreeError::Corrupt(format!("duplicate code {}", member.code)));
        }
        if self.by_email.contains_key(&member.email) {
            return Err(TreeError::Corrupt(format!("duplicate email {}", member.email)));
        }

        match (&member.sponsor_code, member.side) {
            (None, None) => {
                if !self.is_empty() {
                    return Err(TreeError::Corrupt(format!(
                        "second root {} in a non-empty tree",
                        member.code
                    )));
                }
            }
            (Some(parent_code), Some(side)) => {
                let parent = self
                    .get_mut(parent_code.as_str())
                    .ok_or_else(|| TreeError::SponsorNotFound(parent_code.clone()))?;
                let slot = parent.child_slot_mut(side);
                if let Some(occupant) = slot.as_ref() {
                    return Err(TreeError::Corrupt(format!(
                        "{} slot of {} already holds {}",
                        side, parent_code, occupant
                    )));
                }
                *slot = Some(member.code.clone());
            }
            _ => {
                return Err(TreeError::Corrupt(format!(
                    "{} has a parent without a side or a side without a parent",
                    member.code
                )));
            }
        }

        let idx = self.members.len();
        self.by_code.insert(member.code.clone(), idx);
        self.by_email.insert(member.email.clone(), idx);
        self.members.push(member);
        Ok(())
    }

    /// Check the structural invariants of the whole snapshot.
    ///
    /// Exactly one root, every non-root parent exists, and every child pointer
    /// names a member whose parent and side point back.
    pub fn validate(&self) -> Result<()> {
        let roots = self.members.iter().filter(|m| m.is_root()).count();
        if !self.is_empty() && roots != 1 {
            return Err(TreeError::Corrupt(format!("expected one root, found {roots}")));
        }

        for member in &self.members {
            if let Some(parent_code) = &member.sponsor_code {
                let parent = self.get(parent_code.as_str()).ok_or_else(|| {
                    let msg = format!("{} has missing parent {}", member.code, parent_code);
                    TreeError::Corrupt(msg)
                })?;
                let side = member.side.ok_or_else(|| {
                    TreeError::Corrupt(format!("{} has a parent but no side", member.code))
                })?;
                if parent.child(side) != Some(&member.code) {
                    return Err(TreeError::Corrupt(format!(
                        "{} is not linked as the {} child of {}",
                        member.code, side, parent_code
                    )));
                }
            }

            for side in Side::BOTH {
                if let Some(child_code) = member.child(side) {
                    let child = self.get(child_code.as_str()).ok_or_else(|| {
                        let msg = format!("{} links missing child {}", member.code, child_code);
                        TreeError::Corrupt(msg)
                    })?;
                    let points_back = child.side == Some(side)
                        && child.sponsor_code.as_ref() == Some(&member.code);
                    if !points_back {
                        return Err(TreeError::Corrupt(format!(
                            "{} child {} does not point back",
                            member.code, child_code
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::enrollment;

    fn code(n: u64) -> MemberCode {
        MemberCode::from_ordinal(n)
    }

    fn rooted() -> MemberTree {
        let mut tree = MemberTree::new();
        tree.attach(Member::root(code(1), enrollment("root@example.com")))
            .unwrap();
        tree
    }

    #[test]
    fn empty_tree() {
        let tree = MemberTree::new();
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert_eq!(tree.next_code().unwrap(), code(1));
        tree.validate().unwrap();
    }

    #[test]
    fn attach_links_parent_slot() {
        let mut tree = rooted();
        tree.attach(Member::placed(code(2), enrollment("a@example.com"), code(1), Side::Left))
            .unwrap();

        let root = tree.get("MEM00001").unwrap();
        assert_eq!(root.left_child, Some(code(2)));
        assert_eq!(root.right_child, None);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.next_code().unwrap(), code(3));
        tree.validate().unwrap();
    }

    #[test]
    fn attach_rejects_occupied_slot() {
        let mut tree = rooted();
        tree.attach(Member::placed(code(2), enrollment("a@example.com"), code(1), Side::Left))
            .unwrap();
        let err = tree
            .attach(Member::placed(code(3), enrollment("b@example.com"), code(1), Side::Left))
            .unwrap_err();
        assert!(matches!(err, TreeError::Corrupt(_)));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn attach_rejects_second_root() {
        let mut tree = rooted();
        let err = tree
            .attach(Member::root(code(2), enrollment("other@example.com")))
            .unwrap_err();
        assert!(matches!(err, TreeError::Corrupt(_)));
    }

    #[test]
    fn attach_rejects_missing_parent() {
        let mut tree = rooted();
        let err = tree
            .attach(Member::placed(code(2), enrollment("a@example.com"), code(9), Side::Right))
            .unwrap_err();
        assert_eq!(err, TreeError::SponsorNotFound(code(9)));
    }

    #[test]
    fn from_members_rejects_duplicate_email() {
        let a = Member::root(code(1), enrollment("same@example.com"));
        let b = Member::placed(code(2), enrollment("same@example.com"), code(1), Side::Left);
        assert!(matches!(
            MemberTree::from_members(vec![a, b]),
            Err(TreeError::Corrupt(_))
        ));
    }

    #[test]
    fn find_by_email() {
        let tree = rooted();
        assert_eq!(
            tree.find_by_email("root@example.com").map(|m| &m.code),
            Some(&code(1))
        );
        assert!(tree.find_by_email("nobody@example.com").is_none());
    }

    #[test]
    fn validate_detects_dangling_child() {
        let mut root = Member::root(code(1), enrollment("root@example.com"));
        root.right_child = Some(code(7));
        let tree = MemberTree::from_members(vec![root]).unwrap();
        assert!(matches!(tree.validate(), Err(TreeError::Corrupt(_))));
    }
}
