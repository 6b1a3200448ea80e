//! Marker counting and the agreement rule that decides whether a profile is of interest.

use crate::domain::entities::{MarkerRecord, Profile};

/// Count successive non-overlapping occurrences of `marker` in `sequence`.
///
/// Scans left to right; after each hit the search resumes behind the end of
/// the match. Returns 0 when the marker is longer than the sequence, absent,
/// or empty.
pub fn count_non_overlapping(sequence: &str, marker: &str) -> usize {
    if marker.is_empty() || marker.len() > sequence.len() {
        return 0;
    }
    sequence.matches(marker).count()
}

/// Number of agreeing markers a profile needs: half its markers, rounded up.
pub fn agreement_threshold(marker_count: usize) -> usize {
    marker_count.div_ceil(2)
}

/// Combined occurrence count of one marker across both unknown sequences.
pub fn occurrences(marker: &MarkerRecord, sequence_a: &str, sequence_b: &str) -> usize {
    count_non_overlapping(sequence_a, marker.text()) + count_non_overlapping(sequence_b, marker.text())
}

impl MarkerRecord {
    /// True when the marker occurs exactly as often as expected.
    pub fn agrees_with(&self, sequence_a: &str, sequence_b: &str) -> bool {
        occurrences(self, sequence_a, sequence_b) == self.expected_count() as usize
    }
}

impl Profile {
    /// Number of markers whose occurrence count agrees with the sequences.
    pub fn agreeing_markers(&self, sequence_a: &str, sequence_b: &str) -> usize {
        self.markers()
            .iter()
            .filter(|m| m.agrees_with(sequence_a, sequence_b))
            .count()
    }

    /// Whether enough markers agree for the profile to count as a match.
    pub fn matches(&self, sequence_a: &str, sequence_b: &str) -> bool {
        self.agreeing_markers(sequence_a, sequence_b) >= agreement_threshold(self.markers().len())
    }
}
