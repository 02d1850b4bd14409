//! Path item comparison

use std::collections::BTreeMap;

use serde::Serialize;

use super::operations::operations_diff;
use super::parameters::parameters_diff;
use super::{extensions_diff, non_empty, value_diff};
use super::{DiffContext, DiffNode, ExtensionsDiff, KeyedDiff, OperationsDiff, ParametersDiff, ValueDiff};
use crate::openapi::PathItem;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations: Option<OperationsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParametersDiff>,
}

impl DiffNode for PathDiff {
    fn is_empty(&self) -> bool {
        self.extensions.is_none()
            && self.summary.is_none()
            && self.description.is_none()
            && self.operations.is_none()
            && self.parameters.is_none()
    }
}

/// Path items keyed by path template
pub type PathsDiff = KeyedDiff<PathDiff>;

pub fn path_diff(ctx: &DiffContext, from: &PathItem, to: &PathItem) -> PathDiff {
    let mut result = PathDiff {
        extensions: non_empty(extensions_diff(ctx, &from.extensions, &to.extensions)),
        operations: non_empty(operations_diff(ctx, from, to)),
        parameters: ctx.within("parameters", || non_empty(parameters_diff(ctx, &from.parameters, &to.parameters))),
        ..PathDiff::default()
    };
    if !ctx.exclude_description() {
        result.summary = value_diff(&from.summary, &to.summary);
        result.description = value_diff(&from.description, &to.description);
    }

    result
}

/// Path items left after `filter_extension` is applied
pub(crate) fn included_paths<'a>(ctx: &DiffContext, paths: &'a BTreeMap<String, PathItem>) -> BTreeMap<String, &'a PathItem> {
    paths
        .iter()
        .filter(|(path, item)| {
            let excluded = ctx.path_item_excluded(item);
            if excluded {
                tracing::debug!(path = path.as_str(), "path excluded by extension filter");
            }
            !excluded
        })
        .map(|(path, item)| (path.clone(), item))
        .collect()
}

pub(crate) fn paths_diff(
    ctx: &DiffContext,
    from: &BTreeMap<String, &PathItem>,
    to: &BTreeMap<String, &PathItem>,
) -> PathsDiff {
    KeyedDiff::compute(from, to, |path, a, b| ctx.within(path, || path_diff(ctx, a, b)), |_| None)
}
