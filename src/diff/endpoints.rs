//! Endpoint view of the paths diff: one entry per (path, method) pair

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{DiffNode, PathsDiff};
use crate::openapi::PathItem;

/// An operation identified by path template and upper-case HTTP method
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Endpoint {
    pub path: String,
    pub method: String,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EndpointsDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<Endpoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<Endpoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modified: Vec<Endpoint>,
}

impl DiffNode for EndpointsDiff {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

impl EndpointsDiff {
    /// Flatten both path maps into endpoints and classify each one.
    ///
    /// Modified endpoints are taken from `paths`, so an operation counts as
    /// modified exactly when its `MethodDiff` is non-empty.
    pub fn compute(paths: &PathsDiff, from: &BTreeMap<String, &PathItem>, to: &BTreeMap<String, &PathItem>) -> Self {
        let from_endpoints = endpoints(from);
        let to_endpoints = endpoints(to);

        let modified = paths
            .modified
            .iter()
            .filter_map(|(path, diff)| diff.operations.as_ref().map(|ops| (path, ops)))
            .flat_map(|(path, ops)| ops.modified.keys().map(move |method| Endpoint::new(path, method)))
            .collect();

        Self {
            added: to_endpoints.difference(&from_endpoints).cloned().collect(),
            deleted: from_endpoints.difference(&to_endpoints).cloned().collect(),
            modified,
        }
    }

    /// Drop every endpoint whose path fails the predicate
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.added.retain(|e| keep(&e.path));
        self.deleted.retain(|e| keep(&e.path));
        self.modified.retain(|e| keep(&e.path));
    }
}

fn endpoints(paths: &BTreeMap<String, &PathItem>) -> BTreeSet<Endpoint> {
    paths
        .iter()
        .flat_map(|(path, item)| item.operations().into_keys().map(move |method| Endpoint::new(path, method)))
        .collect()
}
