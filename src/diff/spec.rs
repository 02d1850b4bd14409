//! Root of the diff tree

use regex::Regex;
use serde::Serialize;

use super::headers::headers_diff;
use super::paths::{included_paths, paths_diff};
use super::request_body::request_bodies_diff;
use super::responses::responses_diff;
use super::{extensions_diff, non_empty, parameter_diff, strings_diff, value_diff};
use super::{
    DiffContext, DiffNode, EndpointsDiff, ExtensionsDiff, HeadersDiff, KeyedDiff, ParameterDiff, PathsDiff,
    RequestBodiesDiff, ResponsesDiff, SchemasDiff, SkippedElement, StringsDiff, ValueDiff,
};
use crate::openapi::{Info, OpenApi};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
}

impl DiffNode for InfoDiff {
    fn is_empty(&self) -> bool {
        self.extensions.is_none() && self.title.is_none() && self.version.is_none() && self.description.is_none()
    }
}

fn info_diff(ctx: &DiffContext, from: &Info, to: &Info) -> InfoDiff {
    let mut result = InfoDiff {
        extensions: non_empty(extensions_diff(ctx, &from.extensions, &to.extensions)),
        title: value_diff(&from.title, &to.title),
        version: value_diff(&from.version, &to.version),
        ..InfoDiff::default()
    };
    if !ctx.exclude_description() {
        result.description = value_diff(&from.description, &to.description);
    }
    result
}

/// Differences between two OpenAPI documents
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<StringsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<StringsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<EndpointsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<SchemasDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<KeyedDiff<ParameterDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HeadersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_bodies: Option<RequestBodiesDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<ResponsesDiff>,
}

impl DiffNode for SpecDiff {
    fn is_empty(&self) -> bool {
        self.extensions.is_none()
            && self.openapi.is_none()
            && self.info.is_none()
            && self.servers.is_none()
            && self.tags.is_none()
            && self.paths.is_none()
            && self.endpoints.is_none()
            && self.schemas.is_none()
            && self.parameters.is_none()
            && self.headers.is_none()
            && self.request_bodies.is_none()
            && self.responses.is_none()
    }
}

impl SpecDiff {
    /// Walk both documents and build the full, unfiltered diff tree.
    ///
    /// Elements that cannot be compared are returned as skipped elements,
    /// sorted by location; everything else is still diffed.
    pub(crate) fn compute(ctx: &DiffContext, base: &OpenApi, revision: &OpenApi) -> (Self, Vec<SkippedElement>) {
        let from_paths = included_paths(ctx, &base.paths);
        let to_paths = included_paths(ctx, &revision.paths);
        let paths = ctx.within("paths", || paths_diff(ctx, &from_paths, &to_paths));
        let endpoints = EndpointsDiff::compute(&paths, &from_paths, &to_paths);

        let from_components = &base.components;
        let to_components = &revision.components;
        let (schemas, failures) = SchemasDiff::compute(ctx, &from_components.schemas, &to_components.schemas);
        let mut skipped: Vec<SkippedElement> = failures
            .into_iter()
            .map(|(name, err)| SkippedElement {
                path: format!("#/components/schemas/{name}"),
                reason: err.to_string(),
            })
            .collect();

        let server_urls = |doc: &OpenApi| doc.servers.iter().map(|s| s.url.clone()).collect::<Vec<_>>();
        let tag_names = |doc: &OpenApi| doc.tags.iter().map(|t| t.name.clone()).collect::<Vec<_>>();

        let diff = Self {
            extensions: non_empty(extensions_diff(ctx, &base.extensions, &revision.extensions)),
            openapi: value_diff(&base.openapi, &revision.openapi),
            info: non_empty(info_diff(ctx, &base.info, &revision.info)),
            servers: non_empty(strings_diff(&server_urls(base), &server_urls(revision))),
            tags: non_empty(strings_diff(&tag_names(base), &tag_names(revision))),
            paths: non_empty(paths),
            endpoints: non_empty(endpoints),
            schemas: non_empty(schemas),
            parameters: ctx.within("components", || {
                ctx.within("parameters", || {
                    non_empty(KeyedDiff::compute(
                        &from_components.parameters,
                        &to_components.parameters,
                        |name, a, b| ctx.within(name, || parameter_diff(ctx, a, b)),
                        |p| ctx.findings(p.deprecated, &p.extensions),
                    ))
                })
            }),
            headers: ctx.within("components", || {
                ctx.within("headers", || {
                    non_empty(headers_diff(ctx, &from_components.headers, &to_components.headers))
                })
            }),
            request_bodies: ctx.within("components", || {
                ctx.within("requestBodies", || {
                    non_empty(request_bodies_diff(
                        ctx,
                        &from_components.request_bodies,
                        &to_components.request_bodies,
                    ))
                })
            }),
            responses: ctx.within("components", || {
                ctx.within("responses", || {
                    non_empty(responses_diff(ctx, &from_components.responses, &to_components.responses))
                })
            }),
        };

        skipped.extend(ctx.take_skipped());
        skipped.sort_by(|a, b| a.path.cmp(&b.path));

        (diff, skipped)
    }

    /// Keep only the paths and endpoints whose path matches `filter`
    pub fn filter_by_regex(&mut self, filter: &Regex) {
        if let Some(mut paths) = self.paths.take() {
            paths.retain(|path| filter.is_match(path));
            self.paths = non_empty(paths);
        }
        if let Some(mut endpoints) = self.endpoints.take() {
            endpoints.retain(|path| filter.is_match(path));
            self.endpoints = non_empty(endpoints);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::{Server, Tag};
    use serde_json::json;

    fn document(value: serde_json::Value) -> OpenApi {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_identical_documents() {
        let ctx = DiffContext::default();
        let doc = document(json!({
            "openapi": "3.0.3",
            "info": { "title": "Users", "version": "1.0.0" },
            "paths": { "/users": { "get": { "responses": { "200": { "description": "ok" } } } } },
            "components": { "schemas": { "User": { "type": "object" } } }
        }));

        let (diff, skipped) = SpecDiff::compute(&ctx, &doc, &doc);
        assert!(diff.is_empty());
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_servers_and_tags() {
        let ctx = DiffContext::default();
        let mut from = OpenApi::default();
        from.servers.push(Server {
            url: "https://api.example.com".to_string(),
            ..Server::default()
        });
        let mut to = from.clone();
        to.servers.clear();
        to.tags.push(Tag {
            name: "pets".to_string(),
            ..Tag::default()
        });

        let (diff, _) = SpecDiff::compute(&ctx, &from, &to);
        assert_eq!(diff.servers.unwrap().deleted, vec!["https://api.example.com"]);
        assert_eq!(diff.tags.unwrap().added, vec!["pets"]);
    }

    #[test]
    fn test_filter_by_regex() {
        let ctx = DiffContext::default();
        let from = document(json!({ "paths": { "/users": {}, "/pets": {} } }));
        let to = document(json!({ "paths": { "/admin": { "get": {} } } }));

        let (mut diff, _) = SpecDiff::compute(&ctx, &from, &to);
        diff.filter_by_regex(&Regex::new("^/pets").unwrap());

        let paths = diff.paths.unwrap();
        assert_eq!(paths.deleted, vec!["/pets"]);
        assert!(paths.added.is_empty());
        assert!(diff.endpoints.is_none());
    }

    #[test]
    fn test_broken_component_schema_is_skipped() {
        let ctx = DiffContext::default();
        let from = document(json!({ "components": { "schemas": { "Bad": { "anyOf": [] } } } }));
        let to = document(json!({ "components": { "schemas": { "Bad": { "anyOf": [{ "type": "string" }] } } } }));

        let (diff, skipped) = SpecDiff::compute(&ctx, &from, &to);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, "#/components/schemas/Bad");
        assert!(diff.schemas.is_none());
    }
}
