//! Operation comparison, keyed by HTTP method

use std::collections::BTreeMap;

use serde::Serialize;

use super::parameters::parameters_diff;
use super::request_body::request_body_diff;
use super::responses::responses_diff;
use super::{extensions_diff, non_empty, strings_diff, value_diff};
use super::{DiffContext, DiffNode, ExtensionsDiff, KeyedDiff, ParametersDiff, RequestBodyDiff, ResponsesDiff, StringsDiff, ValueDiff};
use crate::deprecation::DeprecationFindings;
use crate::openapi::{Operation, PathItem};

/// Diff of a single operation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<StringsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(rename = "operationID", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParametersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<ResponsesDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<DeprecationFindings>,
}

impl DiffNode for MethodDiff {
    fn is_empty(&self) -> bool {
        self.extensions.is_none()
            && self.tags.is_none()
            && self.summary.is_none()
            && self.description.is_none()
            && self.operation_id.is_none()
            && self.parameters.is_none()
            && self.request_body.is_none()
            && self.responses.is_none()
            && self.deprecated.is_none()
            && self.deprecation.is_none()
    }
}

/// Operations of a path keyed by upper-case method
pub type OperationsDiff = KeyedDiff<MethodDiff>;

pub fn method_diff(ctx: &DiffContext, from: &Operation, to: &Operation) -> MethodDiff {
    let mut result = MethodDiff {
        extensions: non_empty(extensions_diff(ctx, &from.extensions, &to.extensions)),
        tags: non_empty(strings_diff(&from.tags, &to.tags)),
        operation_id: value_diff(&from.operation_id, &to.operation_id),
        parameters: ctx.within("parameters", || non_empty(parameters_diff(ctx, &from.parameters, &to.parameters))),
        request_body: ctx.within("requestBody", || {
            non_empty(request_body_diff(ctx, from.request_body.as_ref(), to.request_body.as_ref()))
        }),
        responses: ctx.within("responses", || non_empty(responses_diff(ctx, &from.responses, &to.responses))),
        deprecated: value_diff(&from.deprecated, &to.deprecated),
        ..MethodDiff::default()
    };
    if !ctx.exclude_description() {
        result.summary = value_diff(&from.summary, &to.summary);
        result.description = value_diff(&from.description, &to.description);
    }

    if !result.is_empty() {
        result.deprecation = ctx.findings(to.deprecated, &to.extensions);
    }

    result
}

pub(crate) fn operations_diff(ctx: &DiffContext, from: &PathItem, to: &PathItem) -> OperationsDiff {
    KeyedDiff::compute(
        &by_method(from),
        &by_method(to),
        |method, a, b| ctx.within(&method.to_ascii_lowercase(), || method_diff(ctx, a, b)),
        |op| ctx.findings(op.deprecated, &op.extensions),
    )
}

fn by_method(item: &PathItem) -> BTreeMap<String, &Operation> {
    item.operations()
        .into_iter()
        .map(|(method, op)| (method.to_string(), op))
        .collect()
}
