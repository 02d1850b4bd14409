//! Diff computation between two OpenAPI documents
//!
//! The entry point is [`get`]. It walks both documents top-down and builds a
//! tree of diff nodes, one node type per element kind. Every node records only
//! what differs; comparing an element with itself yields an empty node, and
//! empty nodes are never attached to their parent.
//!
//! ```text
//! SpecDiff
//! ├── paths ─── PathDiff ─── operations ─── MethodDiff
//! │                                          ├── parameters ─── ParameterDiff
//! │                                          ├── requestBody ── ContentDiff
//! │                                          └── responses ──── ResponseDiff
//! ├── endpoints
//! ├── schemas ── ModifiedSchemas ── SchemaDiff (recursive)
//! └── parameters, headers, requestBodies, responses (components)
//! ```

mod content;
mod context;
mod encodings;
mod endpoints;
mod extensions;
mod headers;
mod keyed;
mod operations;
mod parameters;
mod paths;
mod request_body;
mod responses;
mod schema;
mod schemas;
mod spec;
mod summary;
mod value;

use serde::Serialize;

use crate::config::DiffConfig;
use crate::error::Result;
use crate::openapi::OpenApi;

pub use content::{content_diff, ContentDiff};
pub use context::DiffContext;
pub use encodings::{encodings_diff, EncodingDiff, EncodingsDiff};
pub use endpoints::{Endpoint, EndpointsDiff};
pub use extensions::{extensions_diff, ExtensionsDiff};
pub use headers::{header_diff, HeaderDiff, HeadersDiff};
pub use keyed::KeyedDiff;
pub use operations::{method_diff, MethodDiff, OperationsDiff};
pub use parameters::{parameter_diff, ParameterDiff, ParametersDiff};
pub use paths::{path_diff, PathDiff, PathsDiff};
pub use request_body::{request_body_diff, RequestBodiesDiff, RequestBodyDiff};
pub use responses::{response_diff, ResponseDiff, ResponsesDiff};
pub use schema::{schema_diff, SchemaDiff, SchemaListDiff};
pub use schemas::{ModifiedSchemas, SchemasDiff};
pub use spec::{InfoDiff, SpecDiff};
pub use summary::{DetailName, Summary, SummaryDetails};
pub use value::{option_diff, strings_diff, value_diff, values_diff, StringsDiff, ValueDiff, ValuesDiff};

/// A diff node, empty when the compared elements are equivalent
pub trait DiffNode {
    fn is_empty(&self) -> bool;
}

/// Keep a node only when it carries a difference
pub(crate) fn non_empty<D: DiffNode>(diff: D) -> Option<D> {
    if diff.is_empty() {
        None
    } else {
        Some(diff)
    }
}

pub(crate) fn is_false(flag: &bool) -> bool {
    !*flag
}

/// An element whose diff could not be computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedElement {
    /// JSON pointer of the element, e.g. `#/components/schemas/User`
    pub path: String,
    pub reason: String,
}

impl SkippedElement {
    /// Path template of an element under `#/paths`
    fn path_template(&self) -> Option<String> {
        let segment = self.path.strip_prefix("#/paths/")?.split('/').next()?;
        Some(segment.replace("~1", "/").replace("~0", "~"))
    }
}

/// Changes between two OpenAPI documents including a summary of the changes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diff {
    #[serde(skip_serializing_if = "DiffNode::is_empty")]
    pub spec: SpecDiff,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedElement>,
}

impl Diff {
    /// True when the filtered documents are equivalent and nothing was skipped
    pub fn is_empty(&self) -> bool {
        self.spec.is_empty() && self.skipped.is_empty()
    }
}

/// Compute the diff between two OpenAPI documents.
///
/// References must already be resolved in both documents; loaders normally do
/// this. Fails only when the configuration itself is invalid. Elements that
/// cannot be compared are reported in [`Diff::skipped`] and the rest of the tree
/// is still returned.
pub fn get(config: &DiffConfig, base: &OpenApi, revision: &OpenApi) -> Result<Diff> {
    let ctx = DiffContext::new(config)?;
    Ok(get_with_context(&ctx, base, revision))
}

/// Compute the diff with a prepared context (fixed clock, compiled filters)
pub fn get_with_context(ctx: &DiffContext, base: &OpenApi, revision: &OpenApi) -> Diff {
    let _span = tracing::debug_span!("openapi_diff", today = %ctx.today()).entered();

    let (mut spec, mut skipped) = SpecDiff::compute(ctx, base, revision);
    if let Some(filter) = ctx.path_filter() {
        spec.filter_by_regex(filter);
        skipped.retain(|element| element.path_template().map_or(true, |path| filter.is_match(&path)));
    }
    let mut summary = spec.summary();
    summary.diff |= !skipped.is_empty();

    tracing::debug!(changed = summary.diff, skipped = skipped.len(), "diff complete");

    Diff {
        spec,
        summary,
        skipped,
    }
}
