//! Leaf comparators for scalar facets and unordered lists

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use super::DiffNode;

/// A facet whose value changed. A missing side means the facet is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
}

impl DiffNode for ValueDiff {
    fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Compare two facets, returning `None` when they are equal.
///
/// A side that serializes to `null` (such as an unset `Option`) is reported as
/// absent. Use [`option_diff`] where an explicit `null` must stay distinct.
pub fn value_diff<T: Serialize + PartialEq + ?Sized>(from: &T, to: &T) -> Option<ValueDiff> {
    if from == to {
        return None;
    }

    let diff = ValueDiff {
        from: to_json(from).filter(|v| !v.is_null()),
        to: to_json(to).filter(|v| !v.is_null()),
    };
    // Distinct values can still serialize identically (e.g. NaN)
    super::non_empty(diff)
}

/// Compare two optional facets, keeping `Some(null)` apart from `None`
pub fn option_diff<T: Serialize + PartialEq>(from: &Option<T>, to: &Option<T>) -> Option<ValueDiff> {
    if from == to {
        return None;
    }

    let diff = ValueDiff {
        from: from.as_ref().and_then(to_json),
        to: to.as_ref().and_then(to_json),
    };
    super::non_empty(diff)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

/// Set difference between two string lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StringsDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<String>,
}

impl DiffNode for StringsDiff {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Compare two string lists as sets; output is sorted and deduplicated
pub fn strings_diff<S: AsRef<str>>(from: &[S], to: &[S]) -> StringsDiff {
    let from: BTreeSet<&str> = from.iter().map(AsRef::as_ref).collect();
    let to: BTreeSet<&str> = to.iter().map(AsRef::as_ref).collect();

    StringsDiff {
        added: to.difference(&from).map(|s| s.to_string()).collect(),
        deleted: from.difference(&to).map(|s| s.to_string()).collect(),
    }
}

/// Set difference between two lists of arbitrary values (`enum`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValuesDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<Value>,
}

impl DiffNode for ValuesDiff {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Compare two value lists ignoring order and duplicates
pub fn values_diff(from: &[Value], to: &[Value]) -> ValuesDiff {
    ValuesDiff {
        added: missing_from(to, from),
        deleted: missing_from(from, to),
    }
}

fn missing_from(values: &[Value], other: &[Value]) -> Vec<Value> {
    let mut missing: Vec<Value> = Vec::new();
    for value in values {
        if !other.contains(value) && !missing.contains(value) {
            missing.push(value.clone());
        }
    }
    missing
}
