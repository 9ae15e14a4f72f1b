//! Runs query variables and the handle rows read them through.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::filter::{FilterKind, FilterToken};
use super::model::{Run, RunStatus, Tag};
use crate::error::{Result, RunboardError};

/// Identifier of the run listing query
pub const RUNS_ROOT_QUERY: &str = "RunsRootQuery";

/// Variables of the run listing query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunsQueryVariables {
    pub filter: RunsFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Criteria a run must satisfy to be listed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunsFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl RunsFilter {
    /// Build a filter from search tokens.
    ///
    /// Tag values split on the first `=`, so `k=a=b` filters key `k` for
    /// value `a=b`. Tokens that cannot be interpreted are skipped.
    pub fn from_tokens(tokens: &[FilterToken]) -> Self {
        let mut filter = Self::default();
        for token in tokens {
            if let Err(e) = filter.apply(token) {
                warn!(token = %token, error = %e, "ignoring filter token");
            }
        }
        filter
    }

    /// Like [`RunsFilter::from_tokens`], but fails on the first token that
    /// cannot be interpreted
    pub fn try_from_tokens(tokens: &[FilterToken]) -> Result<Self> {
        let mut filter = Self::default();
        for token in tokens {
            filter.apply(token)?;
        }
        Ok(filter)
    }

    fn apply(&mut self, token: &FilterToken) -> Result<()> {
        let invalid = || RunboardError::InvalidFilterToken {
            raw: token.to_string(),
        };
        match token.kind().ok_or_else(invalid)? {
            FilterKind::Id => self.run_id = Some(token.value.clone()),
            FilterKind::Pipeline => self.pipeline_name = Some(token.value.clone()),
            FilterKind::Status => self.status = Some(token.value.parse()?),
            FilterKind::Tag => {
                let (key, value) = token.value.split_once('=').ok_or_else(invalid)?;
                self.tags.push(Tag::new(key, value));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.run_id.is_none()
            && self.pipeline_name.is_none()
            && self.status.is_none()
            && self.tags.is_empty()
    }

    /// Whether a run passes every criterion
    pub fn matches(&self, run: &Run) -> bool {
        if let Some(run_id) = &self.run_id {
            if &run.run_id != run_id {
                return false;
            }
        }
        if let Some(name) = &self.pipeline_name {
            if &run.pipeline_name != name {
                return false;
            }
        }
        if let Some(status) = self.status {
            if run.status != status {
                return false;
            }
        }
        self.tags.iter().all(|wanted| run.tags.contains(wanted))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Shared handle to the current query variables.
///
/// The owner replaces the value between renders; rows call
/// [`QueryVariablesContext::current`] while rendering and never keep the
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct QueryVariablesContext {
    inner: Arc<RwLock<RunsQueryVariables>>,
}

impl QueryVariablesContext {
    pub fn new(variables: RunsQueryVariables) -> Self {
        Self {
            inner: Arc::new(RwLock::new(variables)),
        }
    }

    pub fn current(&self) -> RunsQueryVariables {
        self.inner.read().clone()
    }

    pub fn replace(&self, variables: RunsQueryVariables) {
        *self.inner.write() = variables;
    }

    /// Swap the filter, keeping limit and dropping the cursor
    pub fn set_filter(&self, filter: RunsFilter) {
        let mut guard = self.inner.write();
        guard.filter = filter;
        guard.cursor = None;
    }
}

/// Query plus variables handed to the action menu so it can refresh the
/// listing after a mutating action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefetchDirective {
    pub query: &'static str,
    pub variables: RunsQueryVariables,
}

impl RefetchDirective {
    pub fn runs_root(variables: RunsQueryVariables) -> Self {
        Self {
            query: RUNS_ROOT_QUERY,
            variables,
        }
    }
}
