//! Change counts per element kind

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DiffNode, KeyedDiff, SpecDiff};

/// Element kinds counted in the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DetailName {
    Paths,
    Endpoints,
    Schemas,
    Parameters,
    Headers,
    RequestBodies,
    Responses,
    Tags,
    Servers,
    Extensions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryDetails {
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
}

impl SummaryDetails {
    pub fn total(&self) -> usize {
        self.added + self.deleted + self.modified
    }
}

impl<D> From<&KeyedDiff<D>> for SummaryDetails {
    fn from(diff: &KeyedDiff<D>) -> Self {
        Self {
            added: diff.added.len(),
            deleted: diff.deleted.len(),
            modified: diff.modified.len(),
        }
    }
}

/// Overview of a diff: whether anything changed and how much, per kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub diff: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<DetailName, SummaryDetails>,
}

impl Summary {
    /// Counts for a kind; zero when the kind did not change
    pub fn get(&self, name: DetailName) -> SummaryDetails {
        self.details.get(&name).copied().unwrap_or_default()
    }

    fn add(&mut self, name: DetailName, details: SummaryDetails) {
        if details.total() > 0 {
            self.details.insert(name, details);
        }
    }
}

impl SpecDiff {
    /// Count the entries of the (already filtered) tree
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();

        if let Some(paths) = &self.paths {
            summary.add(DetailName::Paths, paths.into());
        }
        if let Some(endpoints) = &self.endpoints {
            summary.add(
                DetailName::Endpoints,
                SummaryDetails {
                    added: endpoints.added.len(),
                    deleted: endpoints.deleted.len(),
                    modified: endpoints.modified.len(),
                },
            );
        }
        if let Some(schemas) = &self.schemas {
            summary.add(
                DetailName::Schemas,
                SummaryDetails {
                    added: schemas.added.len(),
                    deleted: schemas.deleted.len(),
                    modified: schemas.modified.len(),
                },
            );
        }
        if let Some(parameters) = &self.parameters {
            summary.add(DetailName::Parameters, parameters.into());
        }
        if let Some(headers) = &self.headers {
            summary.add(DetailName::Headers, headers.into());
        }
        if let Some(request_bodies) = &self.request_bodies {
            summary.add(DetailName::RequestBodies, request_bodies.into());
        }
        if let Some(responses) = &self.responses {
            summary.add(DetailName::Responses, responses.into());
        }
        if let Some(tags) = &self.tags {
            summary.add(
                DetailName::Tags,
                SummaryDetails {
                    added: tags.added.len(),
                    deleted: tags.deleted.len(),
                    modified: 0,
                },
            );
        }
        if let Some(servers) = &self.servers {
            summary.add(
                DetailName::Servers,
                SummaryDetails {
                    added: servers.added.len(),
                    deleted: servers.deleted.len(),
                    modified: 0,
                },
            );
        }
        if let Some(extensions) = &self.extensions {
            summary.add(
                DetailName::Extensions,
                SummaryDetails {
                    added: extensions.added.len(),
                    deleted: extensions.deleted.len(),
                    modified: extensions.modified.len(),
                },
            );
        }

        summary.diff = !self.is_empty();
        summary
    }
}
