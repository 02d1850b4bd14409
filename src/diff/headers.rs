//! Header comparison (response headers, encoding headers, components)

use std::collections::BTreeMap;

use serde::Serialize;

use super::schema::schema_diff_or_skip;
use super::{content_diff, extensions_diff, non_empty, value_diff, ContentDiff, DiffContext, DiffNode, ExtensionsDiff, KeyedDiff, SchemaDiff, ValueDiff};
use crate::deprecation::DeprecationFindings;
use crate::openapi::Header;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<DeprecationFindings>,
}

impl DiffNode for HeaderDiff {
    fn is_empty(&self) -> bool {
        self.extensions.is_none()
            && self.description.is_none()
            && self.deprecated.is_none()
            && self.required.is_none()
            && self.schema.is_none()
            && self.content.is_none()
            && self.deprecation.is_none()
    }
}

/// Headers keyed by header name
pub type HeadersDiff = KeyedDiff<HeaderDiff>;

pub fn header_diff(ctx: &DiffContext, from: &Header, to: &Header) -> HeaderDiff {
    let mut result = HeaderDiff {
        extensions: non_empty(extensions_diff(ctx, &from.extensions, &to.extensions)),
        deprecated: value_diff(&from.deprecated, &to.deprecated),
        required: value_diff(&from.required, &to.required),
        schema: ctx.within("schema", || schema_diff_or_skip(ctx, from.schema.as_ref(), to.schema.as_ref())),
        content: ctx.within("content", || non_empty(content_diff(ctx, &from.content, &to.content))),
        ..HeaderDiff::default()
    };

    if !ctx.exclude_description() {
        result.description = value_diff(&from.description, &to.description);
    }

    if !result.is_empty() {
        result.deprecation = ctx.findings(to.deprecated, &to.extensions);
    }

    result
}

pub(crate) fn headers_diff(
    ctx: &DiffContext,
    from: &BTreeMap<String, Header>,
    to: &BTreeMap<String, Header>,
) -> HeadersDiff {
    KeyedDiff::compute(
        from,
        to,
        |name, a, b| ctx.within(name, || header_diff(ctx, a, b)),
        |header| ctx.findings(header.deprecated, &header.extensions),
    )
}
