//! Parameter comparison
//!
//! Parameters of an operation or path item are matched by location and name.

use std::collections::BTreeMap;

use serde::Serialize;

use super::schema::schema_diff_or_skip;
use super::{content_diff, extensions_diff, non_empty, option_diff, value_diff};
use super::{ContentDiff, DiffContext, DiffNode, ExtensionsDiff, SchemaDiff, ValueDiff};
use crate::deprecation::DeprecationFindings;
use crate::openapi::{Parameter, ParameterLocation};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_empty_value: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<DeprecationFindings>,
}

impl DiffNode for ParameterDiff {
    fn is_empty(&self) -> bool {
        self.extensions.is_none()
            && self.description.is_none()
            && self.required.is_none()
            && self.deprecated.is_none()
            && self.allow_empty_value.is_none()
            && self.style.is_none()
            && self.explode.is_none()
            && self.schema.is_none()
            && self.content.is_none()
            && self.example.is_none()
            && self.deprecation.is_none()
    }
}

pub fn parameter_diff(ctx: &DiffContext, from: &Parameter, to: &Parameter) -> ParameterDiff {
    let mut result = ParameterDiff {
        extensions: non_empty(extensions_diff(ctx, &from.extensions, &to.extensions)),
        required: value_diff(&from.required, &to.required),
        deprecated: value_diff(&from.deprecated, &to.deprecated),
        allow_empty_value: value_diff(&from.allow_empty_value, &to.allow_empty_value),
        style: value_diff(&from.style, &to.style),
        explode: value_diff(&from.explode, &to.explode),
        schema: ctx.within("schema", || schema_diff_or_skip(ctx, from.schema.as_ref(), to.schema.as_ref())),
        content: ctx.within("content", || non_empty(content_diff(ctx, &from.content, &to.content))),
        ..ParameterDiff::default()
    };

    if !ctx.exclude_description() {
        result.description = value_diff(&from.description, &to.description);
    }
    if ctx.include_examples() {
        result.example = option_diff(&from.example, &to.example);
    }

    if !result.is_empty() {
        result.deprecation = ctx.findings(to.deprecated, &to.extensions);
    }

    result
}

/// Parameter names grouped by location
pub type ParamNamesByLocation = BTreeMap<ParameterLocation, Vec<String>>;

/// Changes to a parameter list, grouped by location
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParametersDiff {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub added: ParamNamesByLocation,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub deleted: ParamNamesByLocation,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified: BTreeMap<ParameterLocation, BTreeMap<String, ParameterDiff>>,
    /// Findings for deleted parameters that were deprecated
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sunset: BTreeMap<ParameterLocation, BTreeMap<String, DeprecationFindings>>,
}

impl DiffNode for ParametersDiff {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty() && self.sunset.is_empty()
    }
}

impl ParametersDiff {
    pub fn added_count(&self) -> usize {
        self.added.values().map(Vec::len).sum()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.values().map(Vec::len).sum()
    }

    pub fn modified_count(&self) -> usize {
        self.modified.values().map(BTreeMap::len).sum()
    }
}

pub(crate) fn parameters_diff(ctx: &DiffContext, from: &[Parameter], to: &[Parameter]) -> ParametersDiff {
    let from_index = index_by_key(from);
    let to_index = index_by_key(to);
    let mut result = ParametersDiff::default();

    for ((location, name), &i) in &from_index {
        let from_param = &from[i];
        match to_index.get(&(*location, name.clone())) {
            None => {
                result.deleted.entry(*location).or_default().push(name.clone());
                if let Some(findings) = ctx.findings(from_param.deprecated, &from_param.extensions) {
                    result.sunset.entry(*location).or_default().insert(name.clone(), findings);
                }
            }
            Some(&j) => {
                let diff = ctx.within(&j.to_string(), || parameter_diff(ctx, from_param, &to[j]));
                if !diff.is_empty() {
                    result.modified.entry(*location).or_default().insert(name.clone(), diff);
                }
            }
        }
    }

    for (location, name) in to_index.keys() {
        if !from_index.contains_key(&(*location, name.clone())) {
            result.added.entry(*location).or_default().push(name.clone());
        }
    }

    result
}

/// Position of each parameter keyed by (location, name)
fn index_by_key(params: &[Parameter]) -> BTreeMap<(ParameterLocation, String), usize> {
    params
        .iter()
        .enumerate()
        .map(|(i, param)| ((param.location, param.name.clone()), i))
        .collect()
}
