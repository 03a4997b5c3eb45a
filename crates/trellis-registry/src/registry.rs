//! Registration orchestration.
//!
//! A registration is one unit of work against one snapshot:
//!
//! 1. load the member set
//! 2. validate the request
//! 3. resolve the placement (same-side spill)
//! 4. attach the new member under the resolved parent
//! 5. bump ancestor counters
//! 6. save the member set once
//!
//! Nothing is written before step 6, so a failure at any earlier step leaves
//! the stored tree exactly as it was. Registrations are serialized by a
//! registry-wide write lock because code generation and placement both need
//! the latest committed snapshot.

use crate::error::{Error, Result};
use crate::models::{
    DownlineReport, MemberView, Registration, RegistrationRequest, RegistryStats, SponsorStatus,
};
use crate::storage::MemberStore;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use trellis_tree::{self as tree, Enrollment, Member, MemberTree, Side};

/// Registration front end over a member store.
pub struct Registry {
    store: Arc<dyn MemberStore>,
    write_lock: Mutex<()>,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(())
}

impl Registry {
    /// Create a registry over `store`.
    pub fn new(store: Arc<dyn MemberStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn snapshot(&self) -> Result<MemberTree> {
        Ok(MemberTree::from_members(self.store.load_all()?)?)
    }

    /// Enroll a new member.
    ///
    /// The first member becomes the root and must not name a sponsor. Every
    /// later member must name an existing sponsor and is placed by
    /// same-side spill from that sponsor.
    pub fn register(&self, req: RegistrationRequest) -> Result<Registration> {
        require("name", &req.name)?;
        require("email", &req.email)?;
        require("mobile", &req.mobile)?;
        require("credential", &req.credential)?;

        let sponsor = req.sponsor_code.filter(|s| !s.trim().is_empty());

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::Storage("registry write lock poisoned".into()))?;

        let mut members = self.snapshot()?;

        if members.find_by_email(&req.email).is_some() {
            return Err(Error::DuplicateEmail(req.email));
        }

        let placement = match (members.is_empty(), sponsor) {
            (true, Some(_)) => {
                return Err(Error::Validation(
                    "first member must not have a sponsor".into(),
                ))
            }
            (true, None) => None,
            (false, None) => return Err(Error::Validation("sponsor code is required".into())),
            (false, Some(sponsor)) => {
                let placement = tree::resolve(&members, &sponsor, req.position)?;
                if placement.parent.as_str() != sponsor {
                    tracing::debug!(
                        sponsor = %sponsor,
                        parent = %placement.parent,
                        side = %placement.side,
                        "spilled placement"
                    );
                }
                Some(placement)
            }
        };

        let code = members.next_code()?;
        let enrollment = Enrollment {
            name: req.name,
            email: req.email,
            mobile: req.mobile,
            credential: req.credential,
            joined_at: Utc::now(),
        };

        let registration = match placement {
            None => {
                members.attach(Member::root(code.clone(), enrollment))?;
                Registration {
                    member_code: code.to_string(),
                    placed_under: None,
                    position: None,
                }
            }
            Some(placement) => {
                members.attach(Member::placed(
                    code.clone(),
                    enrollment,
                    placement.parent.clone(),
                    placement.side,
                ))?;
                let updated =
                    tree::propagate(&mut members, placement.parent.as_str(), placement.side)?;
                tracing::debug!(
                    member = %code,
                    side = %placement.side,
                    ancestors = updated.len(),
                    "propagated subtree counts"
                );
                Registration {
                    member_code: code.to_string(),
                    placed_under: Some(placement.parent.to_string()),
                    position: Some(placement.side),
                }
            }
        };

        self.store.save_all(members.members())?;

        tracing::info!(
            member = %registration.member_code,
            placed_under = registration.placed_under.as_deref().unwrap_or("ROOT"),
            "registered member"
        );
        Ok(registration)
    }

    /// Slot availability of a prospective sponsor.
    pub fn resolve_sponsor(&self, code: &str) -> Result<SponsorStatus> {
        let members = self.snapshot()?;
        let sponsor = members
            .get(code)
            .ok_or_else(|| Error::NotFound(format!("member {code}")))?;
        Ok(SponsorStatus {
            member_code: sponsor.code.to_string(),
            name: sponsor.name.clone(),
            left_filled: sponsor.child(Side::Left).is_some(),
            right_filled: sponsor.child(Side::Right).is_some(),
            left_depth: tree::spill_depth(&members, code, Side::Left),
            right_depth: tree::spill_depth(&members, code, Side::Right),
        })
    }

    /// Placement parents of a member, nearest first, ending at the root.
    pub fn upline(&self, code: &str) -> Result<Vec<String>> {
        let members = self.snapshot()?;
        if !members.contains(code) {
            return Err(Error::NotFound(format!("member {code}")));
        }
        Ok(tree::ancestors(&members, code)
            .into_iter()
            .map(String::from)
            .collect())
    }

    /// Public view of one member.
    pub fn get_member(&self, code: &str) -> Result<MemberView> {
        let members = self.snapshot()?;
        members
            .get(code)
            .map(MemberView::from)
            .ok_or_else(|| Error::NotFound(format!("member {code}")))
    }

    /// Both subtrees of a member with their counters.
    pub fn downline(&self, code: &str) -> Result<DownlineReport> {
        let members = self.snapshot()?;
        let downline = tree::downline(&members, code)
            .ok_or_else(|| Error::NotFound(format!("member {code}")))?;
        Ok(DownlineReport::from(&downline))
    }

    /// Every member in registration order.
    pub fn list_members(&self) -> Result<Vec<MemberView>> {
        let members = self.snapshot()?;
        Ok(members.members().iter().map(MemberView::from).collect())
    }

    /// Member count, root and next code.
    pub fn stats(&self) -> Result<RegistryStats> {
        let members = self.snapshot()?;
        Ok(RegistryStats {
            members: members.len(),
            root: members.root().map(|r| r.code.to_string()),
            next_code: members.next_code()?.to_string(),
        })
    }
}
