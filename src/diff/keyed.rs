//! Diff of a map of named elements

use std::collections::BTreeMap;

use serde::Serialize;

use super::DiffNode;
use crate::deprecation::DeprecationFindings;

/// Added, deleted and modified entries of a keyed collection.
///
/// Entries are matched strictly by key. Entries present on one side only are
/// listed by key and never compared further. Deleted entries that were
/// deprecated in the base document carry their sunset findings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyedDiff<D> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified: BTreeMap<String, D>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sunset: BTreeMap<String, DeprecationFindings>,
}

impl<D> Default for KeyedDiff<D> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            deleted: Vec::new(),
            modified: BTreeMap::new(),
            sunset: BTreeMap::new(),
        }
    }
}

impl<D> DiffNode for KeyedDiff<D> {
    fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.deleted.is_empty()
            && self.modified.is_empty()
            && self.sunset.is_empty()
    }
}

impl<D: DiffNode> KeyedDiff<D> {
    /// Compare two maps entry by entry.
    ///
    /// `compare` is called with the key for keys present on both sides;
    /// `deprecation` evaluates a deleted entry.
    pub fn compute<T>(
        from: &BTreeMap<String, T>,
        to: &BTreeMap<String, T>,
        mut compare: impl FnMut(&str, &T, &T) -> D,
        deprecation: impl Fn(&T) -> Option<DeprecationFindings>,
    ) -> Self {
        let mut result = Self::default();

        for (key, from_value) in from {
            match to.get(key) {
                None => {
                    result.deleted.push(key.clone());
                    if let Some(findings) = deprecation(from_value) {
                        result.sunset.insert(key.clone(), findings);
                    }
                }
                Some(to_value) => {
                    let diff = compare(key, from_value, to_value);
                    if !diff.is_empty() {
                        result.modified.insert(key.clone(), diff);
                    }
                }
            }
        }

        result.added = to
            .keys()
            .filter(|key| !from.contains_key(*key))
            .cloned()
            .collect();

        result
    }

    /// Drop every entry whose key fails the predicate
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.added.retain(|key| keep(key));
        self.deleted.retain(|key| keep(key));
        self.modified.retain(|key, _| keep(key));
        self.sunset.retain(|key, _| keep(key));
    }
}
