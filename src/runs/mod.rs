//! Runs - data model, filter tokens and query plumbing for the run table

pub mod derive;
pub mod filter;
pub mod model;
pub mod query;
pub mod source;

pub use derive::{pipeline_link, run_link, tag_filter_token, title_for_run};
pub use filter::{FilterKind, FilterQueue, FilterToken, OnSetFilter};
pub use model::{ensure_unique_run_ids, Run, RunStats, RunStatus, Tag};
pub use query::{
    QueryVariablesContext, RefetchDirective, RunsFilter, RunsQueryVariables, RUNS_ROOT_QUERY,
};
pub use source::{FileRunSource, MockRunSource, RunSource};
