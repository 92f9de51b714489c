//! Decomposition of two sets into intersection and exclusive differences.

use serde::Serialize;

use crate::set::ElementSet;

/// The three disjoint regions of a two-set comparison.
///
/// Each region is a sorted element list. Sizes always satisfy
/// `|A| = intersection + only_a` and `|B| = intersection + only_b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// Elements present in both sets.
    pub intersection: Vec<String>,
    /// Elements present in A and absent from B.
    pub only_a: Vec<String>,
    /// Elements present in B and absent from A.
    pub only_b: Vec<String>,
}

impl Partition {
    /// Split `a` and `b` into their three regions.
    #[must_use]
    pub fn of(a: &ElementSet, b: &ElementSet) -> Self {
        Self {
            intersection: a.intersection(b).map(str::to_owned).collect(),
            only_a: a.difference(b).map(str::to_owned).collect(),
            only_b: b.difference(a).map(str::to_owned).collect(),
        }
    }

    #[must_use]
    pub fn intersection_size(&self) -> usize {
        self.intersection.len()
    }

    #[must_use]
    pub fn only_a_size(&self) -> usize {
        self.only_a.len()
    }

    #[must_use]
    pub fn only_b_size(&self) -> usize {
        self.only_b.len()
    }

    /// Size of the union of both sets.
    #[must_use]
    pub fn union_size(&self) -> usize {
        self.intersection.len() + self.only_a.len() + self.only_b.len()
    }

    /// The same partition seen from B's side (only-A and only-B exchanged).
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            intersection: self.intersection.clone(),
            only_a: self.only_b.clone(),
            only_b: self.only_a.clone(),
        }
    }
}
