//! Named-schema collections: object properties and `components/schemas`

use std::collections::BTreeMap;

use serde::Serialize;

use super::schema::schema_diff_at;
use super::{DiffContext, DiffNode, SchemaDiff};
use crate::deprecation::DeprecationFindings;
use crate::error::{DiffError, Result};
use crate::openapi::Schema;

/// Schema names mapped to their diffs. Never holds an empty diff.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ModifiedSchemas(BTreeMap<String, SchemaDiff>);

impl ModifiedSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare two schemas sharing a name and record the diff if it is non-empty
    pub fn add_schema_diff(&mut self, ctx: &DiffContext, name: &str, from: &Schema, to: &Schema) -> Result<()> {
        self.add_at(ctx, name, from, to, 0)
    }

    fn add_at(&mut self, ctx: &DiffContext, name: &str, from: &Schema, to: &Schema, depth: usize) -> Result<()> {
        let diff = schema_diff_at(ctx, Some(from), Some(to), depth)?;
        if !diff.is_empty() {
            self.0.insert(name.to_string(), diff);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&SchemaDiff> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SchemaDiff)> {
        self.0.iter()
    }
}

/// Added, deleted and modified schemas of a named collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemasDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<String>,
    #[serde(skip_serializing_if = "ModifiedSchemas::is_empty")]
    pub modified: ModifiedSchemas,
    /// Findings for deleted schemas that were deprecated
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sunset: BTreeMap<String, DeprecationFindings>,
}

impl DiffNode for SchemasDiff {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty() && self.sunset.is_empty()
    }
}

impl SchemasDiff {
    /// Compare two named-schema collections.
    ///
    /// A schema that cannot be compared is left out of the result and returned
    /// alongside it with the reason; the other schemas are unaffected.
    pub fn compute(
        ctx: &DiffContext,
        from: &BTreeMap<String, Schema>,
        to: &BTreeMap<String, Schema>,
    ) -> (Self, Vec<(String, DiffError)>) {
        let mut failures = Vec::new();
        let result = Self::build(ctx, from, to, 0, |name, err| {
            tracing::warn!(schema = name, error = %err, "schema diff unavailable");
            failures.push((name.to_string(), err));
            Ok(())
        });

        match result {
            Ok(diff) => (diff, failures),
            // the error handler above never fails
            Err(_) => (Self::default(), failures),
        }
    }

    /// Compare nested properties, failing as a whole on the first error
    pub(crate) fn compute_nested(
        ctx: &DiffContext,
        from: &BTreeMap<String, Schema>,
        to: &BTreeMap<String, Schema>,
        depth: usize,
    ) -> Result<Self> {
        Self::build(ctx, from, to, depth, |_, err| Err(err))
    }

    fn build(
        ctx: &DiffContext,
        from: &BTreeMap<String, Schema>,
        to: &BTreeMap<String, Schema>,
        depth: usize,
        mut on_error: impl FnMut(&str, DiffError) -> Result<()>,
    ) -> Result<Self> {
        let mut result = Self::default();

        for (name, from_schema) in from {
            match to.get(name) {
                None => {
                    result.deleted.push(name.clone());
                    if let Some(findings) = ctx.findings(from_schema.deprecated, &from_schema.extensions) {
                        result.sunset.insert(name.clone(), findings);
                    }
                }
                Some(to_schema) => {
                    if let Err(err) = result.modified.add_at(ctx, name, from_schema, to_schema, depth) {
                        on_error(name, err)?;
                    }
                }
            }
        }

        result.added = to.keys().filter(|name| !from.contains_key(*name)).cloned().collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn schemas(value: serde_json::Value) -> BTreeMap<String, Schema> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unchanged_schema_is_not_registered() {
        let ctx = DiffContext::default();
        let user = schemas(json!({ "User": { "type": "object", "properties": { "id": { "type": "string" } } } }));
        let (diff, failures) = SchemasDiff::compute(&ctx, &user, &user);
        assert!(diff.is_empty());
        assert!(!diff.modified.contains("User"));
        assert!(failures.is_empty());
    }

    #[test]
    fn test_one_sided_schemas_are_added_or_deleted() {
        let ctx = DiffContext::default();
        let from = schemas(json!({ "Pet": { "type": "object" }, "Old": { "type": "string" } }));
        let to = schemas(json!({ "Pet": { "type": "object" }, "New": { "type": "string" } }));

        let (diff, _) = SchemasDiff::compute(&ctx, &from, &to);
        assert_eq!(diff.added, vec!["New"]);
        assert_eq!(diff.deleted, vec!["Old"]);
        assert!(diff.modified.is_empty());
    }

    #[test]
    fn test_add_schema_diff_skips_empty() {
        let ctx = DiffContext::default();
        let schema: Schema = serde_json::from_value(json!({ "type": "string" })).unwrap();
        let other: Schema = serde_json::from_value(json!({ "type": "integer" })).unwrap();

        let mut modified = ModifiedSchemas::new();
        modified.add_schema_diff(&ctx, "Same", &schema, &schema).unwrap();
        modified.add_schema_diff(&ctx, "Changed", &schema, &other).unwrap();

        assert_eq!(modified.len(), 1);
        assert!(modified.get("Changed").is_some());
    }

    #[test]
    fn test_failure_is_isolated_to_one_schema() {
        let ctx = DiffContext::default();
        let from = schemas(json!({
            "Broken": { "oneOf": [] },
            "Fine": { "type": "string" }
        }));
        let to = schemas(json!({
            "Broken": { "oneOf": [{ "type": "string" }] },
            "Fine": { "type": "integer" }
        }));

        let (diff, failures) = SchemasDiff::compute(&ctx, &from, &to);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "Broken");
        assert!(diff.modified.contains("Fine"));
        assert!(!diff.modified.contains("Broken"));
    }

    #[test]
    fn test_deleted_deprecated_schema_findings() {
        let ctx = DiffContext::default().with_today(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let from = schemas(json!({
            "Legacy": { "type": "object", "deprecated": true, "x-sunset": "2024-03-01" }
        }));

        let (diff, _) = SchemasDiff::compute(&ctx, &from, &BTreeMap::new());
        let findings = diff.sunset["Legacy"];
        assert!(!findings.sunset_allowed);
        assert!(findings.period_sufficient);
    }
}
