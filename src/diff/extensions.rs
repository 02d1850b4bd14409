//! Vendor extension comparison

use std::collections::BTreeMap;

use serde::Serialize;

use super::{option_diff, DiffContext, DiffNode, ValueDiff};
use crate::openapi::{is_vendor_extension, Extensions};

/// Changes to the `x-` keys of an element
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtensionsDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified: BTreeMap<String, ValueDiff>,
}

impl DiffNode for ExtensionsDiff {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

/// Compare vendor extensions, skipping non-`x-` keys and configured exclusions
pub fn extensions_diff(ctx: &DiffContext, from: &Extensions, to: &Extensions) -> ExtensionsDiff {
    let relevant = |key: &String| is_vendor_extension(key) && !ctx.extension_excluded(key);
    let mut result = ExtensionsDiff::default();

    for (key, from_value) in from.iter().filter(|(key, _)| relevant(*key)) {
        match to.get(key) {
            None => result.deleted.push(key.clone()),
            Some(to_value) => {
                if let Some(diff) = option_diff(&Some(from_value), &Some(to_value)) {
                    result.modified.insert(key.clone(), diff);
                }
            }
        }
    }

    result.added = to
        .keys()
        .filter(|key| relevant(*key) && !from.contains_key(*key))
        .cloned()
        .collect();

    result
}
