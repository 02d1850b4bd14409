//! Response comparison, keyed by status code

use std::collections::BTreeMap;

use serde::Serialize;

use super::headers::headers_diff;
use super::{content_diff, extensions_diff, non_empty, value_diff};
use super::{ContentDiff, DiffContext, DiffNode, ExtensionsDiff, HeadersDiff, KeyedDiff, ValueDiff};
use crate::openapi::Response;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HeadersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentDiff>,
}

impl DiffNode for ResponseDiff {
    fn is_empty(&self) -> bool {
        self.extensions.is_none() && self.description.is_none() && self.headers.is_none() && self.content.is_none()
    }
}

/// Responses keyed by status code (or component name)
pub type ResponsesDiff = KeyedDiff<ResponseDiff>;

pub fn response_diff(ctx: &DiffContext, from: &Response, to: &Response) -> ResponseDiff {
    let mut result = ResponseDiff {
        extensions: non_empty(extensions_diff(ctx, &from.extensions, &to.extensions)),
        headers: ctx.within("headers", || non_empty(headers_diff(ctx, &from.headers, &to.headers))),
        content: ctx.within("content", || non_empty(content_diff(ctx, &from.content, &to.content))),
        ..ResponseDiff::default()
    };
    if !ctx.exclude_description() {
        result.description = value_diff(&from.description, &to.description);
    }

    result
}

pub(crate) fn responses_diff(
    ctx: &DiffContext,
    from: &BTreeMap<String, Response>,
    to: &BTreeMap<String, Response>,
) -> ResponsesDiff {
    KeyedDiff::compute(from, to, |status, a, b| ctx.within(status, || response_diff(ctx, a, b)), |_| None)
}
