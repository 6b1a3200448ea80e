//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A short tandem repeat marker and how often it is expected to occur.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerRecord {
    text: String,
    expected_count: u32,
}

impl MarkerRecord {
    pub fn new(text: impl Into<String>, expected_count: u32) -> Self {
        Self {
            text: text.into(),
            expected_count,
        }
    }

    /// Marker string searched for in the unknown sequences
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Combined occurrence count a matching person would produce
    pub fn expected_count(&self) -> u32 {
        self.expected_count
    }
}

impl fmt::Display for MarkerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.text, self.expected_count)
    }
}

/// Marker set of one registered person plus its derived interest status.
///
/// The marker list is fixed at construction. Only the interest flag changes,
/// and only from `false` to `true` (see [`Profile::mark_of_interest`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    markers: Vec<MarkerRecord>,
    of_interest: bool,
}

impl Profile {
    pub fn new(markers: Vec<MarkerRecord>) -> Self {
        Self {
            markers,
            of_interest: false,
        }
    }

    pub fn markers(&self) -> &[MarkerRecord] {
        &self.markers
    }

    pub fn is_of_interest(&self) -> bool {
        self.of_interest
    }

    /// Flag the profile. The flag is never cleared.
    pub(crate) fn mark_of_interest(&mut self) {
        self.of_interest = true;
    }
}

impl From<Vec<MarkerRecord>> for Profile {
    fn from(markers: Vec<MarkerRecord>) -> Self {
        Self::new(markers)
    }
}

/// What [`crate::domain::Registry::insert`] does with a name that is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail with [`crate::domain::DomainError::DuplicateKey`]
    #[default]
    Reject,
    /// Replace the stored profile (its interest flag starts over)
    Overwrite,
    /// Insert another node; equal keys route to the right subtree
    InsertRight,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DuplicatePolicy::Reject => "reject",
            DuplicatePolicy::Overwrite => "overwrite",
            DuplicatePolicy::InsertRight => "insert-right",
        };
        f.write_str(s)
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(DuplicatePolicy::Reject),
            "overwrite" => Ok(DuplicatePolicy::Overwrite),
            "insert-right" | "insert_right" => Ok(DuplicatePolicy::InsertRight),
            other => Err(format!(
                "unknown duplicate policy '{other}' (expected reject, overwrite or insert-right)"
            )),
        }
    }
}
