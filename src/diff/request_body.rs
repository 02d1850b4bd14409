//! Request body comparison

use std::collections::BTreeMap;

use serde::Serialize;

use super::{content_diff, extensions_diff, is_false, non_empty, value_diff};
use super::{ContentDiff, DiffContext, DiffNode, ExtensionsDiff, KeyedDiff, ValueDiff};
use crate::openapi::RequestBody;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBodyDiff {
    #[serde(skip_serializing_if = "is_false")]
    pub added: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentDiff>,
}

impl DiffNode for RequestBodyDiff {
    fn is_empty(&self) -> bool {
        !self.added
            && !self.deleted
            && self.extensions.is_none()
            && self.description.is_none()
            && self.required.is_none()
            && self.content.is_none()
    }
}

pub fn request_body_diff(ctx: &DiffContext, from: Option<&RequestBody>, to: Option<&RequestBody>) -> RequestBodyDiff {
    let (from, to) = match (from, to) {
        (None, None) => return RequestBodyDiff::default(),
        (None, Some(_)) => {
            return RequestBodyDiff {
                added: true,
                ..RequestBodyDiff::default()
            }
        }
        (Some(_), None) => {
            return RequestBodyDiff {
                deleted: true,
                ..RequestBodyDiff::default()
            }
        }
        (Some(from), Some(to)) => (from, to),
    };

    let mut result = RequestBodyDiff {
        extensions: non_empty(extensions_diff(ctx, &from.extensions, &to.extensions)),
        required: value_diff(&from.required, &to.required),
        content: ctx.within("content", || non_empty(content_diff(ctx, &from.content, &to.content))),
        ..RequestBodyDiff::default()
    };
    if !ctx.exclude_description() {
        result.description = value_diff(&from.description, &to.description);
    }

    result
}

/// Request bodies keyed by component name
pub type RequestBodiesDiff = KeyedDiff<RequestBodyDiff>;

pub(crate) fn request_bodies_diff(
    ctx: &DiffContext,
    from: &BTreeMap<String, RequestBody>,
    to: &BTreeMap<String, RequestBody>,
) -> RequestBodiesDiff {
    KeyedDiff::compute(
        from,
        to,
        |name, a, b| ctx.within(name, || request_body_diff(ctx, Some(a), Some(b))),
        |_| None,
    )
}
