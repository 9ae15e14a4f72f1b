//! Run records as delivered by the query layer.
//!
//! Wire names are camelCase to match the run listing payload.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RunboardError};

/// One pipeline execution record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    /// Opaque unique id, also the row key
    pub run_id: String,
    pub status: RunStatus,
    /// Selected step keys; `None` or empty means all steps
    #[serde(default, alias = "stepKeysToExecute")]
    pub steps_to_execute: Option<Vec<String>>,
    #[serde(default)]
    pub can_terminate: bool,
    pub mode: String,
    #[serde(default)]
    pub root_run_id: Option<String>,
    #[serde(default)]
    pub parent_run_id: Option<String>,
    pub pipeline_snapshot_id: String,
    pub pipeline_name: String,
    #[serde(default)]
    pub solid_selection: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Timing fields, only read by the timing renderer
    #[serde(default)]
    pub stats: Option<RunStats>,
}

impl Run {
    /// Step subset, if the run did not execute every step
    pub fn step_subset(&self) -> Option<&[String]> {
        self.steps_to_execute
            .as_deref()
            .filter(|steps| !steps.is_empty())
    }

    pub fn start_time(&self) -> Option<f64> {
        self.stats.as_ref().and_then(|s| s.start_time)
    }

    pub fn end_time(&self) -> Option<f64> {
        self.stats.as_ref().and_then(|s| s.end_time)
    }
}

/// Key/value label attached to a run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Start/end timestamps in unix seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Run Status
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Queued,
    NotStarted,
    Managed,
    Started,
    Success,
    Failure,
    Canceling,
    Canceled,
}

impl RunStatus {
    pub const ALL: [RunStatus; 8] = [
        Self::Queued,
        Self::NotStarted,
        Self::Managed,
        Self::Started,
        Self::Success,
        Self::Failure,
        Self::Canceling,
        Self::Canceled,
    ];

    /// Wire name, e.g. `NOT_STARTED`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::NotStarted => "NOT_STARTED",
            Self::Managed => "MANAGED",
            Self::Started => "STARTED",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Canceling => "CANCELING",
            Self::Canceled => "CANCELED",
        }
    }

    /// Runs whose elapsed time is still growing
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Self::Queued | Self::NotStarted | Self::Managed | Self::Started | Self::Canceling
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = RunboardError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| RunboardError::UnknownStatus { raw: s.to_string() })
    }
}

/// Reject collections where two runs share an id.
///
/// Rows are keyed by `run_id`, so a duplicate would make two rows
/// indistinguishable.
pub fn ensure_unique_run_ids(runs: &[Run]) -> Result<()> {
    let mut seen = HashSet::with_capacity(runs.len());
    for run in runs {
        if !seen.insert(run.run_id.as_str()) {
            return Err(RunboardError::DuplicateRunId {
                run_id: run.run_id.clone(),
            });
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::run;
    use super::*;

    #[test]
    fn test_deserialize_camel_case_payload() {
        let json = r#"{
            "runId": "f0a1b2c3-0000-4000-8000-000000000001",
            "status": "NOT_STARTED",
            "stepKeysToExecute": ["load.compute"],
            "canTerminate": true,
            "mode": "default",
            "rootRunId": null,
            "parentRunId": null,
            "pipelineSnapshotId": "snap",
            "pipelineName": "etl",
            "solidSelection": null,
            "tags": [{"key": "dagster/schedule", "value": "daily"}],
            "stats": {"startTime": 1700000000.0, "endTime": null}
        }"#;
        let run: Run = serde_json::from_str(json).unwrap();
        assert_eq!(run.status, RunStatus::NotStarted);
        assert_eq!(run.step_subset(), Some(&["load.compute".to_string()][..]));
        assert!(run.can_terminate);
        assert_eq!(run.tags, vec![Tag::new("dagster/schedule", "daily")]);
        assert_eq!(run.start_time(), Some(1_700_000_000.0));
        assert_eq!(run.end_time(), None);
    }

    #[test]
    fn test_empty_step_list_means_all_steps() {
        let mut r = run("a", "p");
        r.steps_to_execute = Some(Vec::new());
        assert_eq!(r.step_subset(), None);
    }

    #[test]
    fn test_status_from_str_is_case_insensitive() {
        assert_eq!("failure".parse::<RunStatus>().unwrap(), RunStatus::Failure);
        assert_eq!(
            "Not_Started".parse::<RunStatus>().unwrap(),
            RunStatus::NotStarted
        );
        assert!("DONE".parse::<RunStatus>().is_err());
    }

    #[test]
    fn test_status_display_matches_wire_name() {
        for status in RunStatus::ALL {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_ensure_unique_run_ids() {
        let runs = vec![run("a", "p"), run("b", "p")];
        assert!(ensure_unique_run_ids(&runs).is_ok());

        let runs = vec![run("a", "p"), run("b", "p"), run("a", "q")];
        match ensure_unique_run_ids(&runs) {
            Err(RunboardError::DuplicateRunId { run_id }) => assert_eq!(run_id, "a"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }
}
