//! Registry models.
//!
//! The stored record is [`trellis_tree::Member`]; the types here are what
//! the registry accepts and hands out.
//!
//! # Requests and outcomes
//!
//! - [`RegistrationRequest`] - Input to a registration
//! - [`Registration`] - Assigned code and actual placement
//! - [`SponsorStatus`] - Slot availability of a sponsor
//! - [`RegistryStats`] - Member count and root
//!
//! # Views
//!
//! - [`MemberView`] - A member without its credential
//! - [`DownlineEntry`] / [`DownlineReport`] - Subtree listings

mod member_view;
mod registration;

pub use member_view::{DownlineEntry, DownlineReport, MemberView};
pub use registration::{Registration, RegistrationRequest, RegistryStats, SponsorStatus};
