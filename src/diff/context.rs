//! Per-run state shared by every comparator
//!
//! Configuration and filters are fixed for the run. The walk state tracks the
//! JSON pointer of the element being compared and collects elements whose
//! schemas could not be compared.

use std::cell::RefCell;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use regex::Regex;

use crate::config::DiffConfig;
use crate::deprecation::{Clock, DeprecationFindings, SystemClock};
use crate::error::{DiffError, Result};
use crate::openapi::{Extensions, PathItem};

use super::SkippedElement;

/// Configuration, compiled filters and the current date for one diff run
#[derive(Debug, Clone)]
pub struct DiffContext {
    config: DiffConfig,
    path_filter: Option<Regex>,
    filter_extension: Option<Regex>,
    excluded_extensions: BTreeSet<String>,
    today: NaiveDate,
    walk: RefCell<Walk>,
}

#[derive(Debug, Clone, Default)]
struct Walk {
    pointer: Vec<String>,
    skipped: Vec<SkippedElement>,
}

/// Pops its pointer segment when dropped
pub(crate) struct Scope<'a> {
    ctx: &'a DiffContext,
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.ctx.walk.borrow_mut().pointer.pop();
    }
}

impl DiffContext {
    /// Compile a configuration, reading today's date from the system clock
    pub fn new(config: &DiffConfig) -> Result<Self> {
        Self::with_clock(config, &SystemClock)
    }

    /// Compile a configuration with an explicit clock
    pub fn with_clock(config: &DiffConfig, clock: &dyn Clock) -> Result<Self> {
        Ok(Self {
            path_filter: compile(config.path_filter.as_deref())?,
            filter_extension: compile(config.filter_extension.as_deref())?,
            excluded_extensions: config.excluded_extensions.iter().cloned().collect(),
            config: config.clone(),
            today: clock.today(),
            walk: RefCell::default(),
        })
    }

    /// Replace the current date
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn include_examples(&self) -> bool {
        self.config.include_examples
    }

    pub fn exclude_description(&self) -> bool {
        self.config.exclude_description
    }

    pub fn path_filter(&self) -> Option<&Regex> {
        self.path_filter.as_ref()
    }

    /// Whether an extension key is ignored by the extensions comparator
    pub fn extension_excluded(&self, key: &str) -> bool {
        self.excluded_extensions.contains(key)
    }

    /// Whether a path item is taken out of the comparison by `filter_extension`
    pub fn path_item_excluded(&self, item: &PathItem) -> bool {
        match &self.filter_extension {
            Some(re) => item.extensions.keys().any(|key| re.is_match(key)),
            None => false,
        }
    }

    /// Evaluate sunset policy for an element using this run's date and window
    pub fn findings(&self, deprecated: bool, extensions: &Extensions) -> Option<DeprecationFindings> {
        DeprecationFindings::evaluate(deprecated, extensions, self.config.deprecation_days, self.today)
    }

    /// Descend into `segment` until the returned scope is dropped
    pub(crate) fn enter(&self, segment: &str) -> Scope<'_> {
        self.walk.borrow_mut().pointer.push(escape(segment));
        Scope { ctx: self }
    }

    /// Run `f` with `segment` appended to the current pointer
    pub(crate) fn within<T>(&self, segment: &str, f: impl FnOnce() -> T) -> T {
        let _scope = self.enter(segment);
        f()
    }

    /// JSON pointer of the element being compared
    pub fn pointer(&self) -> String {
        let walk = self.walk.borrow();
        std::iter::once("#")
            .chain(walk.pointer.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Record that the element at the current pointer could not be compared
    pub(crate) fn skip(&self, err: &DiffError) {
        let path = self.pointer();
        tracing::warn!(path = path.as_str(), error = %err, "element skipped");
        self.walk.borrow_mut().skipped.push(SkippedElement {
            path,
            reason: err.to_string(),
        });
    }

    /// Drain the elements recorded by [`DiffContext::skip`]
    pub(crate) fn take_skipped(&self) -> Vec<SkippedElement> {
        std::mem::take(&mut self.walk.borrow_mut().skipped)
    }
}

impl Default for DiffContext {
    fn default() -> Self {
        Self {
            config: DiffConfig::default(),
            path_filter: None,
            filter_extension: None,
            excluded_extensions: BTreeSet::new(),
            today: SystemClock.today(),
            walk: RefCell::default(),
        }
    }
}

/// JSON pointer escaping of a single reference token
fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// An empty pattern matches everything and is treated as no filter
fn compile(pattern: Option<&str>) -> Result<Option<Regex>> {
    match pattern {
        None | Some("") => Ok(None),
        Some(pattern) => Regex::new(pattern)
            .map(Some)
            .map_err(|source| DiffError::InvalidFilter {
                pattern: pattern.to_string(),
                source,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deprecation::FixedClock;

    #[test]
    fn test_invalid_filter_is_rejected() {
        let config = DiffConfig {
            path_filter: Some("(unclosed".to_string()),
            ..DiffConfig::default()
        };
        let err = DiffContext::new(&config).unwrap_err();
        assert!(matches!(err, DiffError::InvalidFilter { .. }));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let config = DiffConfig {
            path_filter: Some(String::new()),
            ..DiffConfig::default()
        };
        assert!(DiffContext::new(&config).unwrap().path_filter().is_none());
    }

    #[test]
    fn test_filter_extension() {
        let config = DiffConfig {
            filter_extension: Some("^x-internal$".to_string()),
            ..DiffConfig::default()
        };
        let ctx = DiffContext::new(&config).unwrap();

        let mut item = PathItem::default();
        assert!(!ctx.path_item_excluded(&item));
        item.extensions.insert("x-internal".to_string(), serde_json::Value::Bool(true));
        assert!(ctx.path_item_excluded(&item));
    }

    #[test]
    fn test_clock_is_injected() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let ctx = DiffContext::with_clock(&DiffConfig::default(), &FixedClock(day)).unwrap();
        assert_eq!(ctx.today(), day);
    }

    #[test]
    fn test_pointer_follows_scopes() {
        let ctx = DiffContext::default();
        assert_eq!(ctx.pointer(), "#");

        ctx.within("paths", || {
            let _path = ctx.enter("/users/{id}");
            assert_eq!(ctx.pointer(), "#/paths/~1users~1{id}");
            ctx.within("a~b", || assert_eq!(ctx.pointer(), "#/paths/~1users~1{id}/a~0b"));
        });
        assert_eq!(ctx.pointer(), "#");
    }

    #[test]
    fn test_skip_records_current_pointer() {
        let ctx = DiffContext::default();
        ctx.within("components", || ctx.within("headers", || ctx.skip(&DiffError::MalformedContent { count: 2 })));

        let skipped = ctx.take_skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, "#/components/headers");
        assert!(ctx.take_skipped().is_empty());
    }
}
