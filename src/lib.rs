//! Runboard - terminal run table for pipeline executions

pub mod config;
pub mod error;
pub mod runs;
pub mod tui;

pub use config::RunboardConfig;
pub use error::{FixSuggestion, Result, RunboardError};
pub use runs::{
    FileRunSource, FilterToken, MockRunSource, QueryVariablesContext, Run, RunSource, RunStatus,
    RunsFilter, RunsQueryVariables, Tag,
};
pub use tui::widgets::{RunListView, RunRow, TagBadgeList};
