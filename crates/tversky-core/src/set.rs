//! Element sets: labeled string members with deterministic iteration order.
//!
//! Members are kept in a [`BTreeSet`], so every listing produced from a set
//! (trace payloads, CLI output) is lexicographically sorted by byte order.
//! Members are stored exactly as given: case and inner whitespace matter.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A finite set of string elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementSet(BTreeSet<String>);

impl ElementSet {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse a comma-delimited element list.
    ///
    /// Each token is trimmed of surrounding whitespace, empty tokens are
    /// dropped, and duplicates collapse.
    ///
    /// ```
    /// use tversky_core::ElementSet;
    ///
    /// let set = ElementSet::parse(" b, a ,, b,A ");
    /// assert_eq!(set.to_sorted_vec(), vec!["A", "a", "b"]);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        text.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, element: &str) -> bool {
        self.0.contains(element)
    }

    /// Insert one element; returns `false` if it was already present.
    pub fn insert(&mut self, element: impl Into<String>) -> bool {
        self.0.insert(element.into())
    }

    /// Iterate members in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Members in sorted order, cloned into a vector.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    /// Members of `self` that are also in `other`, sorted.
    pub fn intersection<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = &'a str> + 'a {
        self.0.intersection(&other.0).map(String::as_str)
    }

    /// Members of `self` that are not in `other`, sorted.
    pub fn difference<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = &'a str> + 'a {
        self.0.difference(&other.0).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ElementSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a ElementSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, element) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(element)?;
        }
        f.write_str("}")
    }
}
