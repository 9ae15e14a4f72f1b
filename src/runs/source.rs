//! Run Sources - Connector Layer
//!
//! Stand-ins for the runs query engine: they own the run collection and
//! answer a query with the runs matching its variables.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use super::model::{ensure_unique_run_ids, Run, RunStats, RunStatus, Tag};
use super::query::RunsQueryVariables;
use crate::error::{Result, RunboardError};

// ─────────────────────────────────────────────────────────────────────────────
// Run Source Trait
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait RunSource: Send + Sync {
    /// Runs matching `variables`, in source order
    async fn fetch(&self, variables: &RunsQueryVariables) -> Result<Vec<Run>>;

    /// Short label for headers and logs
    fn describe(&self) -> String;
}

/// Apply filter, cursor and limit to a full collection.
///
/// The cursor is the id of the last run of the previous page.
pub fn select_runs(runs: &[Run], variables: &RunsQueryVariables) -> Vec<Run> {
    let start = variables
        .cursor
        .as_deref()
        .and_then(|cursor| runs.iter().position(|r| r.run_id == cursor))
        .map_or(0, |idx| idx + 1);

    let matching = runs[start..]
        .iter()
        .filter(|run| variables.filter.matches(run))
        .cloned();

    match variables.limit {
        Some(limit) => matching.take(limit).collect(),
        None => matching.collect(),
    }
}

/// Parse a run file, choosing the format by extension
pub fn parse_runs(path: &Path, content: &str) -> Result<Vec<Run>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") => Ok(serde_json::from_str(content)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(content)?),
        _ => Err(RunboardError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Source
// ─────────────────────────────────────────────────────────────────────────────

/// Runs read from a JSON or YAML file on every fetch
pub struct FileRunSource {
    path: PathBuf,
}

impl FileRunSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and validate the whole file
    pub async fn load_all(&self) -> Result<Vec<Run>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let runs = parse_runs(&self.path, &content)?;
        ensure_unique_run_ids(&runs)?;
        info!(path = %self.path.display(), count = runs.len(), "loaded run file");
        Ok(runs)
    }
}

#[async_trait]
impl RunSource for FileRunSource {
    async fn fetch(&self, variables: &RunsQueryVariables) -> Result<Vec<Run>> {
        let runs = self.load_all().await?;
        let selected = select_runs(&runs, variables);
        debug!(total = runs.len(), selected = selected.len(), "fetched runs");
        Ok(selected)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Source
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory runs for demos and tests
pub struct MockRunSource {
    runs: Vec<Run>,
}

impl MockRunSource {
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// A small mixed set of runs across two pipelines
    pub fn demo() -> Self {
        let base = 1_700_000_000.0;
        let run = |id: &str, pipeline: &str, status: RunStatus, start: f64, end: Option<f64>| Run {
            run_id: id.to_string(),
            status,
            steps_to_execute: None,
            can_terminate: status.is_in_progress(),
            mode: "default".to_string(),
            root_run_id: None,
            parent_run_id: None,
            pipeline_snapshot_id: format!("{}-snapshot", pipeline),
            pipeline_name: pipeline.to_string(),
            solid_selection: None,
            tags: Vec::new(),
            stats: Some(RunStats {
                start_time: Some(start),
                end_time: end,
            }),
        };

        let mut nightly = run(
            "8c5e2a1f-3b7d-4e0a-9f21-6d4c8b0a1e37",
            "etl_nightly",
            RunStatus::Success,
            base,
            Some(base + 754.0),
        );
        nightly.tags = vec![
            Tag::new("dagster/schedule_name", "nightly"),
            Tag::new("owner", "data-platform"),
        ];

        let mut failed = run(
            "1f9d7c30-aa42-4f6b-8e55-0b3c2d9e7f10",
            "etl_nightly",
            RunStatus::Failure,
            base - 86_400.0,
            Some(base - 86_400.0 + 92.0),
        );
        failed.tags = vec![
            Tag::new("dagster/schedule_name", "nightly"),
            Tag::new("owner", "data-platform"),
        ];

        let mut retry = run(
            "b27e4d19-5c88-4a3f-b0d6-91e2f4a7c6d5",
            "etl_nightly",
            RunStatus::Started,
            base + 900.0,
            None,
        );
        retry.parent_run_id = Some(failed.run_id.clone());
        retry.root_run_id = Some(failed.run_id.clone());
        retry.steps_to_execute = Some(vec!["load_warehouse.compute".to_string()]);
        retry.tags = vec![
            Tag::new("dagster/parent_run_id", failed.run_id.clone()),
            Tag::new("owner", "data-platform"),
        ];

        let mut adhoc = run(
            "e4403b6a-71c2-4d89-a3f0-5b1d2c6e8a94",
            "model_training",
            RunStatus::Queued,
            base + 1_200.0,
            None,
        );
        adhoc.mode = "gpu".to_string();
        adhoc.solid_selection = Some(vec!["featurize".to_string(), "train".to_string()]);

        Self::new(vec![retry, nightly, adhoc, failed])
    }
}

#[async_trait]
impl RunSource for MockRunSource {
    async fn fetch(&self, variables: &RunsQueryVariables) -> Result<Vec<Run>> {
        Ok(select_runs(&self.runs, variables))
    }

    fn describe(&self) -> String {
        "demo runs".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::filter::FilterToken;
    use crate::runs::model::fixtures::run;
    use crate::runs::query::RunsFilter;

    fn ids(runs: &[Run]) -> Vec<&str> {
        runs.iter().map(|r| r.run_id.as_str()).collect()
    }

    #[test]
    fn test_select_runs_keeps_source_order() {
        let runs = vec![run("c", "p"), run("a", "p"), run("b", "p")];
        let selected = select_runs(&runs, &RunsQueryVariables::default());
        assert_eq!(ids(&selected), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_select_runs_cursor_and_limit() {
        let runs = vec![run("a", "p"), run("b", "p"), run("c", "p"), run("d", "p")];
        let variables = RunsQueryVariables {
            cursor: Some("a".to_string()),
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(ids(&select_runs(&runs, &variables)), vec!["b", "c"]);
    }

    #[test]
    fn test_select_runs_filters() {
        let runs = vec![run("a", "p"), run("b", "q")];
        let variables = RunsQueryVariables {
            filter: RunsFilter::from_tokens(&[FilterToken::new("pipeline", "q")]),
            ..Default::default()
        };
        assert_eq!(ids(&select_runs(&runs, &variables)), vec!["b"]);
    }

    #[test]
    fn test_parse_runs_by_extension() {
        let yaml = r#"
- runId: a
  status: SUCCESS
  mode: default
  pipelineSnapshotId: s1
  pipelineName: p
"#;
        let runs = parse_runs(Path::new("runs.yml"), yaml).unwrap();
        assert_eq!(runs.len(), 1);
        assert!(runs[0].tags.is_empty());

        let err = parse_runs(Path::new("runs.txt"), yaml).unwrap_err();
        assert!(matches!(err, RunboardError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_demo_ids_are_unique() {
        let source = MockRunSource::demo();
        assert!(ensure_unique_run_ids(&source.runs).is_ok());
    }

    #[tokio::test]
    async fn test_mock_fetch_applies_tag_filter() {
        let source = MockRunSource::demo();
        let variables = RunsQueryVariables {
            filter: RunsFilter::from_tokens(&[FilterToken::new(
                "tag",
                "dagster/schedule_name=nightly",
            )]),
            ..Default::default()
        };
        let runs = source.fetch(&variables).await.unwrap();
        assert_eq!(runs.len(), 2);
    }

    #[tokio::test]
    async fn test_file_source_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.json");
        let runs = vec![run("a", "p"), run("a", "p")];
        std::fs::write(&path, serde_json::to_string(&runs).unwrap()).unwrap();

        let err = FileRunSource::new(&path)
            .fetch(&RunsQueryVariables::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RunboardError::DuplicateRunId { .. }));
    }
}
