//! Occlusion candidate list
//!
//! Scratch list filled by one visibility query: objects that passed the frustum
//! test, each with its squared distance to the eye. Distances are computed once at
//! insertion and never revalidated, even if the eye moves before the list is used.

use std::cmp::Ordering;
use std::ops::Range;

use crate::scene::ObjectId;

/// An object that passed a frustum test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcclusionCandidate {
    /// Object that passed the test
    pub object: ObjectId,
    /// Squared distance from the eye to the object's bounding-sphere center
    pub distance_sq: f32,
}

/// Ascending by distance, NaN last
fn by_distance(a: &OcclusionCandidate, b: &OcclusionCandidate) -> Ordering {
    match (a.distance_sq.is_nan(), b.distance_sq.is_nan()) {
        (false, false) => a.distance_sq.total_cmp(&b.distance_sq),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Insertion-ordered candidates, sortable by distance
///
/// Every sort is stable: candidates at equal distances keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct OcclusionList {
    candidates: Vec<OcclusionCandidate>,
}

impl OcclusionList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every candidate, keeping the allocation
    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    /// Append a candidate without sorting
    pub fn insert(&mut self, object: ObjectId, distance_sq: f32) {
        self.candidates.push(OcclusionCandidate { object, distance_sq });
    }

    /// Sort every candidate near-to-far
    pub fn sort(&mut self) {
        self.candidates.sort_by(by_distance);
    }

    /// Sort the candidates in `range` near-to-far, leaving the rest in place
    ///
    /// The range is clamped to the list length.
    pub fn sort_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.candidates.len());
        let start = range.start.min(end);
        self.candidates[start..end].sort_by(by_distance);
    }

    /// Sort every candidate far-to-near, NaN distances still last
    pub fn sort_descending(&mut self) {
        self.candidates.sort_by(|a, b| match (a.distance_sq.is_nan(), b.distance_sq.is_nan()) {
            (false, false) => b.distance_sq.total_cmp(&a.distance_sq),
            _ => by_distance(a, b),
        });
    }

    /// Candidates in their current order
    pub fn iter(&self) -> std::slice::Iter<'_, OcclusionCandidate> {
        self.candidates.iter()
    }

    /// Candidates in their current order
    pub fn as_slice(&self) -> &[OcclusionCandidate] {
        &self.candidates
    }

    /// Object ids in their current order
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.candidates.iter().map(|c| c.object)
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<'a> IntoIterator for &'a OcclusionList {
    type Item = &'a OcclusionCandidate;
    type IntoIter = std::slice::Iter<'a, OcclusionCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
