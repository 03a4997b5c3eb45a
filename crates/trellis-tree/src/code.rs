//! Member codes and the sequential code generator.
//!
//! A code is the fixed prefix followed by a zero-padded ordinal:
//!
//! ```text
//! MEM00001, MEM00002, ..., MEM99999, MEM100000, ...
//! ```
//!
//! The next code is always one past the highest ordinal currently present, so
//! codes are gap-free as long as generation happens on a committed snapshot.

use crate::error::{Result, TreeError};
use std::borrow::Borrow;

/// Prefix shared by every generated code.
pub const CODE_PREFIX: &str = "MEM";

/// Minimum number of ordinal digits (zero-padded).
pub const CODE_WIDTH: usize = 5;

/// Unique, immutable member identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MemberCode(String);

impl MemberCode {
    /// Wrap an existing code string without checking its shape.
    ///
    /// Lookups accept arbitrary user input, so any string is a valid key.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Build the canonical code for an ordinal.
    pub fn from_ordinal(ordinal: u64) -> Self {
        Self(format!("{CODE_PREFIX}{ordinal:0width$}", width = CODE_WIDTH))
    }

    /// Numeric ordinal encoded in the code, if it has the canonical shape.
    pub fn ordinal(&self) -> Option<u64> {
        let digits = self.0.strip_prefix(CODE_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// The code as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MemberCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<MemberCode> for String {
    fn from(value: MemberCode) -> Self {
        value.0
    }
}

impl Borrow<str> for MemberCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MemberCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Next code after every code in `existing`.
///
/// Codes without the canonical prefix and numeric ordinal are ignored. An
/// empty input yields ordinal 1. Fails with [`TreeError::Corrupt`] when the
/// highest ordinal has no successor.
pub fn next_code<'a, I>(existing: I) -> Result<MemberCode>
where
    I: IntoIterator<Item = &'a MemberCode>,
{
    let max = existing
        .into_iter()
        .filter_map(MemberCode::ordinal)
        .max()
        .unwrap_or(0);
    let next = max
        .checked_add(1)
        .ok_or_else(|| TreeError::Corrupt(format!("member code ordinal {max} is exhausted")))?;
    Ok(MemberCode::from_ordinal(next))
}
