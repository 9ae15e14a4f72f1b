//! Row delegates
//!
//! The run row hands timing text and the action trigger to these
//! collaborators. Swap them to change how time is shown or which menu opens.

use chrono::{DateTime, Local, TimeZone, Utc};
use ratatui::text::Span;
use tracing::info;

use super::utils::format_duration;
use crate::runs::{title_for_run, RefetchDirective, Run};
use crate::tui::theme::{icons, RunboardTheme};

/// Timing text for a run
pub trait RunTiming {
    /// Start time, if the run has started
    fn started(&self, run: &Run) -> Option<String>;

    /// Elapsed wall time, if the run has started
    fn elapsed(&self, run: &Run) -> Option<String>;
}

/// Action menu attached to each row
pub trait ActionMenu {
    /// Text drawn in the actions column
    fn trigger(&self, run: &Run, refetch: &RefetchDirective) -> Span<'static>;

    /// Open the menu; returns a status line for the shell
    fn open(&self, run: &Run, refetch: &RefetchDirective) -> String;
}

/// Everything a row delegates, bundled so the list can pass it down once
pub struct RowDelegates<'a> {
    pub timing: &'a dyn RunTiming,
    pub actions: &'a dyn ActionMenu,
    pub theme: &'a RunboardTheme,
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock Timing
// ─────────────────────────────────────────────────────────────────────────────

/// Formats start as `%b %d, %H:%M` and elapsed as `HH:MM:SS`.
///
/// Runs without an end time that are still in progress are measured up to
/// `now`.
#[derive(Debug, Clone, Copy)]
pub struct ClockTiming {
    now: DateTime<Utc>,
    utc: bool,
}

impl ClockTiming {
    pub fn new(now: DateTime<Utc>, utc: bool) -> Self {
        Self { now, utc }
    }

    /// Timing measured against the current wall clock
    pub fn now(utc: bool) -> Self {
        Self::new(Utc::now(), utc)
    }
}

fn to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    Utc.timestamp_opt(whole as i64, nanos).single()
}

impl RunTiming for ClockTiming {
    fn started(&self, run: &Run) -> Option<String> {
        let start = to_datetime(run.start_time()?)?;
        let text = if self.utc {
            start.format("%b %d, %H:%M").to_string()
        } else {
            start.with_timezone(&Local).format("%b %d, %H:%M").to_string()
        };
        Some(text)
    }

    fn elapsed(&self, run: &Run) -> Option<String> {
        let start = run.start_time()?;
        let end = match run.end_time() {
            Some(end) => end,
            None if run.status.is_in_progress() => self.now.timestamp() as f64,
            None => return None,
        };
        let secs = (end - start).max(0.0) as u64;
        Some(format!("{} {}", icons::TIMER, format_duration(secs)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ellipsis Menu
// ─────────────────────────────────────────────────────────────────────────────

/// Default menu: an ellipsis trigger that reports what it would refresh
pub struct EllipsisMenu<'a> {
    theme: &'a RunboardTheme,
}

impl<'a> EllipsisMenu<'a> {
    pub fn new(theme: &'a RunboardTheme) -> Self {
        Self { theme }
    }
}

impl ActionMenu for EllipsisMenu<'_> {
    fn trigger(&self, run: &Run, _refetch: &RefetchDirective) -> Span<'static> {
        let style = if run.can_terminate {
            self.theme.accent()
        } else {
            self.theme.dimmed()
        };
        Span::styled(format!("[{}]", icons::ACTIONS), style)
    }

    fn open(&self, run: &Run, refetch: &RefetchDirective) -> String {
        info!(
            run_id = %run.run_id,
            query = refetch.query,
            "action menu opened"
        );
        let terminate = if run.can_terminate { ", terminate" } else { "" };
        format!(
            "Run {}: re-execute{} (refreshes {})",
            title_for_run(&run.run_id),
            terminate,
            refetch.query
        )
    }
}
