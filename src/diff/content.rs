//! Content (media-type map) comparison
//!
//! A content map is expected to hold a single media type. Maps on both sides
//! are compared only when each has exactly one entry; multi-type content is
//! reported as unchanged. Presence and absence of content is always reported.

use serde::Serialize;

use super::schema::schema_diff_or_skip;
use super::{encodings_diff, extensions_diff, is_false, non_empty, option_diff};
use super::{DiffContext, DiffNode, EncodingsDiff, ExtensionsDiff, SchemaDiff, ValueDiff};
use crate::error::{DiffError, Result};
use crate::openapi::{Content, MediaType};

/// Diff between two content maps each holding one media-type object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDiff {
    #[serde(skip_serializing_if = "is_false")]
    pub media_type_added: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub media_type_deleted: bool,
    #[serde(rename = "mediaType", skip_serializing_if = "is_false")]
    pub media_type_diff: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ValueDiff>,
    #[serde(rename = "encoding", skip_serializing_if = "Option::is_none")]
    pub encodings: Option<EncodingsDiff>,
}

impl DiffNode for ContentDiff {
    fn is_empty(&self) -> bool {
        !self.media_type_added
            && !self.media_type_deleted
            && !self.media_type_diff
            && self.extensions.is_none()
            && self.schema.is_none()
            && self.example.is_none()
            && self.encodings.is_none()
    }
}

pub fn content_diff(ctx: &DiffContext, from: &Content, to: &Content) -> ContentDiff {
    let mut result = ContentDiff::default();

    match (from.is_empty(), to.is_empty()) {
        (true, true) => return result,
        (true, false) => {
            result.media_type_added = true;
            return result;
        }
        (false, true) => {
            result.media_type_deleted = true;
            return result;
        }
        (false, false) => {}
    }

    let ((from_type, from_media), (to_type, to_media)) = match (single_media_type(from), single_media_type(to)) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(err), _) | (_, Err(err)) => {
            tracing::debug!(error = %err, "content not compared");
            return result;
        }
    };

    if from_type != to_type {
        result.media_type_diff = true;
        return result;
    }

    let _media = ctx.enter(to_type);
    result.extensions = non_empty(extensions_diff(ctx, &from_media.extensions, &to_media.extensions));
    result.schema = ctx.within("schema", || schema_diff_or_skip(ctx, from_media.schema.as_ref(), to_media.schema.as_ref()));
    if ctx.include_examples() {
        result.example = option_diff(&from_media.example, &to_media.example);
    }
    result.encodings = ctx.within("encoding", || non_empty(encodings_diff(ctx, &from_media.encoding, &to_media.encoding)));

    result
}

/// The single media-type entry of a content map
fn single_media_type(content: &Content) -> Result<(&str, &MediaType)> {
    let mut entries = content.iter();
    match (entries.next(), entries.next()) {
        (Some((media_type, value)), None) => Ok((media_type.as_str(), value)),
        _ => Err(DiffError::MalformedContent { count: content.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiffConfig;
    use crate::openapi::{Encoding, Schema};
    use serde_json::json;

    fn schema(schema_type: &str) -> Schema {
        Schema {
            schema_type: Some(json!(schema_type)),
            ..Schema::default()
        }
    }

    fn content(pairs: &[(&str, Schema)]) -> Content {
        pairs
            .iter()
            .map(|(media_type, schema)| {
                (
                    media_type.to_string(),
                    MediaType {
                        schema: Some(schema.clone()),
                        ..MediaType::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_both_empty() {
        let ctx = DiffContext::default();
        assert!(content_diff(&ctx, &Content::new(), &Content::new()).is_empty());
    }

    #[test]
    fn test_media_type_added_short_circuits() {
        let ctx = DiffContext::default();
        let diff = content_diff(&ctx, &Content::new(), &content(&[("application/json", schema("object"))]));
        assert_eq!(
            diff,
            ContentDiff {
                media_type_added: true,
                ..ContentDiff::default()
            }
        );
    }

    #[test]
    fn test_media_type_deleted_short_circuits() {
        let ctx = DiffContext::default();
        let diff = content_diff(&ctx, &content(&[("application/json", schema("object"))]), &Content::new());
        assert!(diff.media_type_deleted);
        assert!(diff.schema.is_none());
    }

    #[test]
    fn test_different_media_types_stop_comparison() {
        let ctx = DiffContext::default();
        let diff = content_diff(
            &ctx,
            &content(&[("application/json", schema("object"))]),
            &content(&[("application/xml", schema("string"))]),
        );
        assert_eq!(
            diff,
            ContentDiff {
                media_type_diff: true,
                ..ContentDiff::default()
            }
        );
    }

    #[test]
    fn test_multiple_media_types_yield_empty_diff() {
        let ctx = DiffContext::default();
        let from = content(&[("application/json", schema("object")), ("text/plain", schema("string"))]);
        let to = content(&[("application/json", schema("integer"))]);
        assert!(content_diff(&ctx, &from, &to).is_empty());
        assert!(content_diff(&ctx, &to, &from).is_empty());
    }

    #[test]
    fn test_schema_change_is_attached() {
        let ctx = DiffContext::default();
        let diff = content_diff(
            &ctx,
            &content(&[("application/json", schema("object"))]),
            &content(&[("application/json", schema("array"))]),
        );
        assert!(diff.schema.unwrap().type_diff.is_some());
        assert!(diff.encodings.is_none());
        assert!(diff.extensions.is_none());
    }

    #[test]
    fn test_example_gated_by_config() {
        let mut from = content(&[("application/json", schema("object"))]);
        let mut to = from.clone();
        from.get_mut("application/json").unwrap().example = Some(json!({"id": 1}));
        to.get_mut("application/json").unwrap().example = Some(json!({"id": 2}));

        let ctx = DiffContext::default();
        assert!(content_diff(&ctx, &from, &to).is_empty());

        let config = DiffConfig {
            include_examples: true,
            ..DiffConfig::default()
        };
        let ctx = DiffContext::new(&config).unwrap();
        let diff = content_diff(&ctx, &from, &to);
        assert_eq!(diff.example.unwrap().to, Some(json!({"id": 2})));
    }

    #[test]
    fn test_encoding_change() {
        let ctx = DiffContext::default();
        let from = content(&[("multipart/form-data", schema("object"))]);
        let mut to = from.clone();
        to.get_mut("multipart/form-data").unwrap().encoding.insert(
            "avatar".to_string(),
            Encoding {
                content_type: Some("image/png".to_string()),
                ..Encoding::default()
            },
        );

        let diff = content_diff(&ctx, &from, &to);
        assert_eq!(diff.encodings.unwrap().added, vec!["avatar"]);
    }
}
