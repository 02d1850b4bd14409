//! End-to-end diff tests over fixture documents

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use openapi_diff::diff::{DetailName, Endpoint, SchemaDiff, StringsDiff, SummaryDetails};
use openapi_diff::openapi::ParameterLocation;
use openapi_diff::{get_with_context, DiffConfig, DiffContext, DiffNode, OpenApi};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn load(name: &str) -> OpenApi {
    OpenApi::load(fixture(name)).unwrap()
}

fn context(config: DiffConfig) -> DiffContext {
    DiffContext::new(&config)
        .unwrap()
        .with_today(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
}

fn details(added: usize, deleted: usize, modified: usize) -> SummaryDetails {
    SummaryDetails {
        added,
        deleted,
        modified,
    }
}

// =============================================================================
// Reflexivity
// =============================================================================

#[test]
fn test_identical_documents_have_no_diff() {
    let ctx = context(DiffConfig {
        include_examples: true,
        deprecation_days: 30,
        ..DiffConfig::default()
    });

    for name in ["users_v1.yaml", "users_v2.yaml", "user_v1.json"] {
        let doc = load(name);
        let diff = get_with_context(&ctx, &doc, &doc);
        assert!(diff.is_empty(), "{name} differs from itself");
        assert!(!diff.summary.diff);
        assert!(diff.summary.details.is_empty());
        assert!(diff.skipped.is_empty());
    }
}

#[test]
fn test_identical_documents_serialize_empty() {
    let doc = load("users_v1.yaml");
    let diff = openapi_diff::get(&DiffConfig::default(), &doc, &doc).unwrap();
    let value = serde_json::to_value(&diff).unwrap();
    assert!(value.get("spec").is_none());
    assert_eq!(value["summary"]["diff"], serde_json::json!(false));
}

// =============================================================================
// Schemas
// =============================================================================

#[test]
fn test_added_required_property() {
    let ctx = context(DiffConfig::default());
    let diff = get_with_context(&ctx, &load("user_v1.json"), &load("user_v2.json"));

    let schemas = diff.spec.schemas.as_ref().unwrap();
    assert!(schemas.added.is_empty() && schemas.deleted.is_empty());
    assert_eq!(schemas.modified.len(), 1);

    let expected = SchemaDiff {
        required: Some(StringsDiff {
            added: vec!["email".to_string()],
            deleted: Vec::new(),
        }),
        ..SchemaDiff::default()
    };
    assert_eq!(schemas.modified.get("User"), Some(&expected));

    assert_eq!(diff.summary.get(DetailName::Schemas), details(0, 0, 1));
    assert_eq!(diff.summary.details.len(), 1);
}

#[test]
fn test_deleted_deprecated_schema_carries_findings() {
    let ctx = context(DiffConfig {
        deprecation_days: 30,
        ..DiffConfig::default()
    });
    let diff = get_with_context(&ctx, &load("users_v1.yaml"), &load("users_v2.yaml"));

    let schemas = diff.spec.schemas.as_ref().unwrap();
    assert_eq!(schemas.deleted, vec!["Legacy"]);
    let findings = schemas.sunset["Legacy"];
    assert_eq!(findings.sunset, NaiveDate::from_ymd_opt(2024, 6, 1));
    assert!(!findings.sunset_allowed);
    assert!(findings.period_sufficient);
}

// =============================================================================
// Paths and endpoints
// =============================================================================

#[test]
fn test_full_diff() {
    let ctx = context(DiffConfig::default());
    let diff = get_with_context(&ctx, &load("users_v1.yaml"), &load("users_v2.yaml"));
    let spec = &diff.spec;

    assert!(spec.info.as_ref().unwrap().version.is_some());
    assert!(spec.openapi.is_none());

    let paths = spec.paths.as_ref().unwrap();
    assert_eq!(paths.added, vec!["/pets"]);
    assert!(paths.deleted.is_empty());
    assert_eq!(paths.modified.len(), 3);

    let list_users = &paths.modified["/users"].operations.as_ref().unwrap().modified["GET"];
    let parameters = list_users.parameters.as_ref().unwrap();
    assert_eq!(parameters.added[&ParameterLocation::Query], vec!["cursor"]);
    let limit = &parameters.modified[&ParameterLocation::Query]["limit"];
    assert!(limit.schema.as_ref().unwrap().maximum.is_some());

    let user_ops = paths.modified["/users/{id}"].operations.as_ref().unwrap();
    assert_eq!(user_ops.deleted, vec!["DELETE"]);
    assert!(user_ops.sunset["DELETE"].sunset_allowed);

    let endpoints = spec.endpoints.as_ref().unwrap();
    assert_eq!(endpoints.added, vec![Endpoint::new("/pets", "GET")]);
    assert_eq!(endpoints.deleted, vec![Endpoint::new("/users/{id}", "DELETE")]);
    assert_eq!(
        endpoints.modified,
        vec![Endpoint::new("/internal/metrics", "GET"), Endpoint::new("/users", "GET")]
    );

    let summary = &diff.summary;
    assert!(summary.diff);
    assert_eq!(summary.get(DetailName::Paths), details(1, 0, 3));
    assert_eq!(summary.get(DetailName::Endpoints), details(1, 1, 2));
    assert_eq!(summary.get(DetailName::Schemas), details(0, 1, 1));
    assert_eq!(summary.get(DetailName::Servers), details(1, 1, 0));
    assert_eq!(summary.get(DetailName::Tags), details(1, 0, 0));
    assert!(!summary.details.contains_key(&DetailName::Responses));
}

#[test]
fn test_path_filter() {
    let ctx = context(DiffConfig {
        path_filter: Some("^/users".to_string()),
        ..DiffConfig::default()
    });
    let diff = get_with_context(&ctx, &load("users_v1.yaml"), &load("users_v2.yaml"));

    let paths = diff.spec.paths.as_ref().unwrap();
    assert!(paths.added.is_empty());
    assert!(paths.modified.keys().all(|path| path.starts_with("/users")));
    assert_eq!(diff.summary.get(DetailName::Paths), details(0, 0, 2));
    assert_eq!(diff.summary.get(DetailName::Endpoints), details(0, 1, 1));

    // components are not path-scoped
    assert_eq!(diff.summary.get(DetailName::Schemas), details(0, 1, 1));
}

#[test]
fn test_filter_matching_nothing() {
    let ctx = context(DiffConfig {
        path_filter: Some("^/orders".to_string()),
        ..DiffConfig::default()
    });
    let diff = get_with_context(&ctx, &load("users_v1.yaml"), &load("users_v2.yaml"));
    assert!(diff.spec.paths.is_none());
    assert!(diff.spec.endpoints.is_none());
    assert!(!diff.summary.details.contains_key(&DetailName::Paths));
}

#[test]
fn test_filter_extension() {
    let ctx = context(DiffConfig {
        filter_extension: Some("^x-internal$".to_string()),
        ..DiffConfig::default()
    });
    let diff = get_with_context(&ctx, &load("users_v1.yaml"), &load("users_v2.yaml"));

    let paths = diff.spec.paths.as_ref().unwrap();
    assert!(!paths.modified.contains_key("/internal/metrics"));
    assert_eq!(diff.summary.get(DetailName::Endpoints), details(1, 1, 1));
}

#[test]
fn test_invalid_filter_is_rejected() {
    let doc = load("user_v1.json");
    let config = DiffConfig {
        path_filter: Some("[unclosed".to_string()),
        ..DiffConfig::default()
    };
    let err = openapi_diff::get(&config, &doc, &doc).unwrap_err();
    assert!(err.to_string().contains("[unclosed"));
}

// =============================================================================
// Partial failure
// =============================================================================

#[test]
fn test_malformed_schema_is_skipped() {
    let base = OpenApi::from_json_str(
        r#"{ "components": { "schemas": {
            "Choice": { "oneOf": [] },
            "Name": { "type": "string" }
        } } }"#,
    )
    .unwrap();
    let revision = OpenApi::from_json_str(
        r#"{ "components": { "schemas": {
            "Choice": { "oneOf": [{ "type": "string" }] },
            "Name": { "type": "string", "maxLength": 64 }
        } } }"#,
    )
    .unwrap();

    let diff = get_with_context(&context(DiffConfig::default()), &base, &revision);
    assert_eq!(diff.skipped.len(), 1);
    assert_eq!(diff.skipped[0].path, "#/components/schemas/Choice");

    let schemas = diff.spec.schemas.as_ref().unwrap();
    assert!(schemas.modified.contains("Name"));
    assert!(!schemas.modified.contains("Choice"));
    assert!(!diff.spec.is_empty());
}

#[test]
fn test_malformed_request_body_schema_is_skipped() {
    let base = OpenApi::from_json_str(
        r#"{ "paths": { "/u": { "post": { "requestBody": { "content": { "application/json": { "schema": {
            "type": "object", "oneOf": [], "properties": { "a": { "type": "string" } }
        } } } } } } } }"#,
    )
    .unwrap();
    let revision = OpenApi::from_json_str(
        r#"{ "paths": { "/u": { "post": { "requestBody": { "content": { "application/json": { "schema": {
            "type": "object", "oneOf": [], "properties": { "a": { "type": "integer" } }
        } } } } } } } }"#,
    )
    .unwrap();

    let diff = get_with_context(&context(DiffConfig::default()), &base, &revision);
    assert_eq!(diff.skipped.len(), 1);
    assert_eq!(diff.skipped[0].path, "#/paths/~1u/post/requestBody/content/application~1json/schema");
    assert!(diff.skipped[0].reason.contains("oneOf"));
    assert!(diff.spec.is_empty());
    assert!(diff.summary.diff);
    assert!(!diff.is_empty());

    let filtered = get_with_context(
        &context(DiffConfig {
            path_filter: Some("^/other".to_string()),
            ..DiffConfig::default()
        }),
        &base,
        &revision,
    );
    assert!(filtered.skipped.is_empty());
    assert!(filtered.is_empty());
}

#[test]
fn test_added_null_default_is_reported() {
    let base = OpenApi::from_json_str(r#"{ "components": { "schemas": { "Name": { "type": "string" } } } }"#).unwrap();
    let revision =
        OpenApi::from_json_str(r#"{ "components": { "schemas": { "Name": { "type": "string", "default": null } } } }"#)
            .unwrap();

    let diff = get_with_context(&context(DiffConfig::default()), &base, &revision);
    let schemas = diff.spec.schemas.as_ref().unwrap();
    let default = schemas.modified.get("Name").unwrap().default.as_ref().unwrap();
    assert_eq!(default.from, None);
    assert_eq!(default.to, Some(serde_json::Value::Null));
    assert!(diff.summary.diff);
}
