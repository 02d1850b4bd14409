//! Media-type encoding comparison

use std::collections::BTreeMap;

use serde::Serialize;

use super::headers::headers_diff;
use super::{extensions_diff, non_empty, value_diff, DiffContext, DiffNode, ExtensionsDiff, HeadersDiff, KeyedDiff, ValueDiff};
use crate::openapi::Encoding;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HeadersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_reserved: Option<ValueDiff>,
}

impl DiffNode for EncodingDiff {
    fn is_empty(&self) -> bool {
        self.extensions.is_none()
            && self.content_type.is_none()
            && self.headers.is_none()
            && self.style.is_none()
            && self.explode.is_none()
            && self.allow_reserved.is_none()
    }
}

/// Encodings keyed by property name
pub type EncodingsDiff = KeyedDiff<EncodingDiff>;

pub fn encoding_diff(ctx: &DiffContext, from: &Encoding, to: &Encoding) -> EncodingDiff {
    EncodingDiff {
        extensions: non_empty(extensions_diff(ctx, &from.extensions, &to.extensions)),
        content_type: value_diff(&from.content_type, &to.content_type),
        headers: ctx.within("headers", || non_empty(headers_diff(ctx, &from.headers, &to.headers))),
        style: value_diff(&from.style, &to.style),
        explode: value_diff(&from.explode, &to.explode),
        allow_reserved: value_diff(&from.allow_reserved, &to.allow_reserved),
    }
}

pub fn encodings_diff(
    ctx: &DiffContext,
    from: &BTreeMap<String, Encoding>,
    to: &BTreeMap<String, Encoding>,
) -> EncodingsDiff {
    KeyedDiff::compute(from, to, |name, a, b| ctx.within(name, || encoding_diff(ctx, a, b)), |_| None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoding(content_type: &str) -> Encoding {
        Encoding {
            content_type: Some(content_type.to_string()),
            ..Encoding::default()
        }
    }

    #[test]
    fn test_encodings_diff() {
        let ctx = DiffContext::default();
        let from: BTreeMap<_, _> = [
            ("avatar".to_string(), encoding("image/png")),
            ("legacy".to_string(), encoding("text/plain")),
        ]
        .into();
        let to: BTreeMap<_, _> = [
            ("avatar".to_string(), encoding("image/jpeg")),
            ("profile".to_string(), encoding("application/json")),
        ]
        .into();

        let diff = encodings_diff(&ctx, &from, &to);
        assert_eq!(diff.added, vec!["profile"]);
        assert_eq!(diff.deleted, vec!["legacy"]);
        let avatar = &diff.modified["avatar"];
        assert_eq!(avatar.content_type.as_ref().unwrap().to, Some(json!("image/jpeg")));
        assert!(avatar.style.is_none());
    }

    #[test]
    fn test_identical_encodings() {
        let ctx = DiffContext::default();
        let map: BTreeMap<_, _> = [("file".to_string(), encoding("image/png"))].into();
        assert!(encodings_diff(&ctx, &map, &map).is_empty());
    }
}
