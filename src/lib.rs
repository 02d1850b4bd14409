//! OpenAPI Diff
//!
//! A structured, machine-readable diff between two OpenAPI 3 documents.
//!
//! ## Features
//!
//! - **Element-by-element diff**: paths, operations, parameters, request bodies,
//!   responses, headers, content and recursive schemas
//! - **Omit-empty output**: identical elements produce no diff node at all
//! - **Deprecation policy**: sunset dates (`x-sunset`) and minimum deprecation
//!   windows are evaluated for deprecated elements
//! - **Path filtering**: restrict the diff to paths matching a regular expression
//! - **Summary**: added/deleted/modified counts per element kind
//!
//! ## Usage
//!
//! ```no_run
//! use openapi_diff::{DiffConfig, OpenApi};
//!
//! let base = OpenApi::load("base.yaml")?;
//! let revision = OpenApi::load("revision.yaml")?;
//! let diff = openapi_diff::get(&DiffConfig::default(), &base, &revision)?;
//! println!("{}", serde_json::to_string_pretty(&diff)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod deprecation;
pub mod diff;
pub mod error;
pub mod openapi;

pub use config::DiffConfig;
pub use deprecation::{
    deprecation_period_sufficient, sunset_allowed, sunset_date, Clock, DeprecationFindings, FixedClock, SystemClock,
};
pub use diff::{get, get_with_context, Diff, DiffContext, DiffNode, SkippedElement, Summary};
pub use error::{DiffError, Result};
pub use openapi::OpenApi;
