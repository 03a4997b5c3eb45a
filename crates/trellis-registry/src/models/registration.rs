//! Registration request and outcome types.

use serde::{Deserialize, Serialize};
use trellis_tree::Side;

/// Input to [`Registry::register`](crate::Registry::register).
///
/// `credential` must already be hashed; the registry stores it as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub credential: String,
    /// Referring member; must be absent for the first member and present for
    /// everyone else
    pub sponsor_code: Option<String>,
    /// Preferred slot under the sponsor
    pub position: Side,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registration {
    /// Code assigned to the new member
    pub member_code: String,
    /// Actual placement parent, `None` when the member became the root
    pub placed_under: Option<String>,
    /// Slot taken under `placed_under`, `None` for the root
    pub position: Option<Side>,
}

/// Slot availability of a prospective sponsor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SponsorStatus {
    pub member_code: String,
    pub name: String,
    pub left_filled: bool,
    pub right_filled: bool,
    /// Hops a left-preferring registration spills before landing, `None` if
    /// the chain is malformed
    pub left_depth: Option<usize>,
    pub right_depth: Option<usize>,
}

/// Registry-wide counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of members
    pub members: usize,
    /// Root member code, if any member exists
    pub root: Option<String>,
    /// Code the next registration will receive
    pub next_code: String,
}
