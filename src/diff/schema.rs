//! Recursive schema comparison
//!
//! Schemas are walked depth-first. Scalar facets are compared directly,
//! `enum` and `required` as sets, `properties` by name, and the composition
//! keywords (`oneOf`, `anyOf`, `allOf`) by position: branch `i` on one side is
//! compared with branch `i` on the other, and branches without a counterpart
//! are reported as added or deleted. Reordering branches therefore shows up as
//! modifications.

use std::collections::BTreeMap;

use serde::Serialize;

use super::schemas::SchemasDiff;
use super::{extensions_diff, is_false, non_empty, option_diff, strings_diff, value_diff, values_diff};
use super::{DiffContext, DiffNode, ExtensionsDiff, StringsDiff, ValueDiff, ValuesDiff};
use crate::deprecation::DeprecationFindings;
use crate::error::{DiffError, Result};
use crate::openapi::{AdditionalProperties, Schema};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDiff {
    #[serde(skip_serializing_if = "is_false")]
    pub schema_added: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub schema_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsDiff>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_diff: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ValueDiff>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_diff: Option<ValuesDiff>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<SchemaListDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<SchemaListDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<SchemaListDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaDiff>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SchemasDiff>,
    /// Change between a flag and a schema, or between two flags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties_schema: Option<Box<SchemaDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<StringsDiff>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<ValueDiff>,

    /// Sunset findings when the revised schema is deprecated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<DeprecationFindings>,
}

impl DiffNode for SchemaDiff {
    fn is_empty(&self) -> bool {
        let facets = [
            &self.type_diff,
            &self.format,
            &self.title,
            &self.description,
            &self.nullable,
            &self.read_only,
            &self.write_only,
            &self.deprecated,
            &self.default,
            &self.example,
            &self.additional_properties,
            &self.minimum,
            &self.maximum,
            &self.exclusive_minimum,
            &self.exclusive_maximum,
            &self.multiple_of,
            &self.min_length,
            &self.max_length,
            &self.pattern,
            &self.min_items,
            &self.max_items,
            &self.unique_items,
            &self.min_properties,
            &self.max_properties,
        ];

        !self.schema_added
            && !self.schema_deleted
            && self.extensions.is_none()
            && facets.iter().all(|facet| facet.is_none())
            && self.enum_diff.is_none()
            && self.one_of.is_none()
            && self.any_of.is_none()
            && self.all_of.is_none()
            && self.not.is_none()
            && self.items.is_none()
            && self.properties.is_none()
            && self.additional_properties_schema.is_none()
            && self.required.is_none()
            && self.deprecation.is_none()
    }
}

/// Positional diff of a composition keyword
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaListDiff {
    /// Branch indices present only in the revision
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<usize>,
    /// Branch indices present only in the base
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<usize>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified: BTreeMap<usize, SchemaDiff>,
}

impl DiffNode for SchemaListDiff {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

/// Compare two optional schemas.
///
/// Fails when either tree contains an empty composition list or nests deeper
/// than the configured limit.
pub fn schema_diff(ctx: &DiffContext, from: Option<&Schema>, to: Option<&Schema>) -> Result<SchemaDiff> {
    schema_diff_at(ctx, from, to, 0)
}

/// Schema diff for elements that cannot fail (content, parameters, headers)
pub(crate) fn schema_diff_or_skip(ctx: &DiffContext, from: Option<&Schema>, to: Option<&Schema>) -> Option<SchemaDiff> {
    match schema_diff(ctx, from, to) {
        Ok(diff) => non_empty(diff),
        Err(err) => {
            ctx.skip(&err);
            None
        }
    }
}

pub(crate) fn schema_diff_at(
    ctx: &DiffContext,
    from: Option<&Schema>,
    to: Option<&Schema>,
    depth: usize,
) -> Result<SchemaDiff> {
    let (from, to) = match (from, to) {
        (None, None) => return Ok(SchemaDiff::default()),
        (None, Some(_)) => {
            return Ok(SchemaDiff {
                schema_added: true,
                ..SchemaDiff::default()
            })
        }
        (Some(_), None) => {
            return Ok(SchemaDiff {
                schema_deleted: true,
                ..SchemaDiff::default()
            })
        }
        (Some(from), Some(to)) => (from, to),
    };

    if let Err(err) = check_comparable(ctx, from, to, depth) {
        // identical subtrees are equal even when they cannot be walked
        return if from == to { Ok(SchemaDiff::default()) } else { Err(err) };
    }

    let mut result = SchemaDiff {
        extensions: non_empty(extensions_diff(ctx, &from.extensions, &to.extensions)),
        type_diff: option_diff(&from.schema_type, &to.schema_type),
        format: value_diff(&from.format, &to.format),
        nullable: value_diff(&from.nullable, &to.nullable),
        read_only: value_diff(&from.read_only, &to.read_only),
        write_only: value_diff(&from.write_only, &to.write_only),
        deprecated: value_diff(&from.deprecated, &to.deprecated),
        default: option_diff(&from.default, &to.default),
        enum_diff: non_empty(values_diff(&from.enumeration, &to.enumeration)),
        ..SchemaDiff::default()
    };

    if !ctx.exclude_description() {
        result.title = value_diff(&from.title, &to.title);
        result.description = value_diff(&from.description, &to.description);
    }
    if ctx.include_examples() {
        result.example = option_diff(&from.example, &to.example);
    }

    result.one_of = list_diff(ctx, from.one_of.as_deref(), to.one_of.as_deref(), depth)?;
    result.any_of = list_diff(ctx, from.any_of.as_deref(), to.any_of.as_deref(), depth)?;
    result.all_of = list_diff(ctx, from.all_of.as_deref(), to.all_of.as_deref(), depth)?;
    result.not = boxed(schema_diff_at(ctx, from.not.as_deref(), to.not.as_deref(), depth + 1)?);
    result.items = boxed(schema_diff_at(ctx, from.items.as_deref(), to.items.as_deref(), depth + 1)?);

    result.properties = non_empty(SchemasDiff::compute_nested(ctx, &from.properties, &to.properties, depth + 1)?);
    match (&from.additional_properties, &to.additional_properties) {
        (Some(AdditionalProperties::Schema(a)), Some(AdditionalProperties::Schema(b))) => {
            result.additional_properties_schema = boxed(schema_diff_at(ctx, Some(a.as_ref()), Some(b.as_ref()), depth + 1)?);
        }
        (a, b) => result.additional_properties = value_diff(a, b),
    }
    result.required = non_empty(strings_diff(&from.required, &to.required));

    result.minimum = value_diff(&from.minimum, &to.minimum);
    result.maximum = value_diff(&from.maximum, &to.maximum);
    result.exclusive_minimum = option_diff(&from.exclusive_minimum, &to.exclusive_minimum);
    result.exclusive_maximum = option_diff(&from.exclusive_maximum, &to.exclusive_maximum);
    result.multiple_of = value_diff(&from.multiple_of, &to.multiple_of);
    result.min_length = value_diff(&from.min_length, &to.min_length);
    result.max_length = value_diff(&from.max_length, &to.max_length);
    result.pattern = value_diff(&from.pattern, &to.pattern);
    result.min_items = value_diff(&from.min_items, &to.min_items);
    result.max_items = value_diff(&from.max_items, &to.max_items);
    result.unique_items = value_diff(&from.unique_items, &to.unique_items);
    result.min_properties = value_diff(&from.min_properties, &to.min_properties);
    result.max_properties = value_diff(&from.max_properties, &to.max_properties);

    if !result.is_empty() {
        result.deprecation = ctx.findings(to.deprecated, &to.extensions);
    }

    Ok(result)
}

fn boxed(diff: SchemaDiff) -> Option<Box<SchemaDiff>> {
    non_empty(diff).map(Box::new)
}

/// Composition keywords must list at least one schema when present
fn check_comparable(ctx: &DiffContext, from: &Schema, to: &Schema, depth: usize) -> Result<()> {
    let max_depth = ctx.config().max_schema_depth;
    if depth > max_depth {
        return Err(DiffError::SchemaDepthExceeded { depth: max_depth });
    }
    check_composition(from)?;
    check_composition(to)
}

fn check_composition(schema: &Schema) -> Result<()> {
    let lists = [
        ("oneOf", &schema.one_of),
        ("anyOf", &schema.any_of),
        ("allOf", &schema.all_of),
    ];
    for (keyword, list) in lists {
        if matches!(list, Some(branches) if branches.is_empty()) {
            return Err(DiffError::MalformedComposition { keyword });
        }
    }
    Ok(())
}

fn list_diff(
    ctx: &DiffContext,
    from: Option<&[Schema]>,
    to: Option<&[Schema]>,
    depth: usize,
) -> Result<Option<SchemaListDiff>> {
    let from = from.unwrap_or_default();
    let to = to.unwrap_or_default();
    let mut result = SchemaListDiff::default();

    for index in 0..from.len().max(to.len()) {
        match (from.get(index), to.get(index)) {
            (Some(a), Some(b)) => {
                let diff = schema_diff_at(ctx, Some(a), Some(b), depth + 1)?;
                if !diff.is_empty() {
                    result.modified.insert(index, diff);
                }
            }
            (Some(_), None) => result.deleted.push(index),
            (None, Some(_)) => result.added.push(index),
            (None, None) => {}
        }
    }

    Ok(non_empty(result))
}
