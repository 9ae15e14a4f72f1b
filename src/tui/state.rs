//! AppState - Domain Layer
//!
//! Runs currently listed, the active filter and keyboard selection.

use ratatui::layout::Rect;

use crate::runs::{FilterToken, Run, RunStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Ready,
    Error,
}

/// Main application state
#[derive(Debug)]
pub struct AppState {
    pub source_name: String,
    pub status: ViewStatus,

    pub runs: Vec<Run>,
    /// Tokens of the active filter, as last emitted
    pub filter: Vec<FilterToken>,

    // Selection
    pub selected: Option<usize>,
    pub selected_tag: Option<usize>,
    pub offset: usize,

    /// Where the run list was last drawn, for mouse hit tests
    pub list_area: Rect,
    pub message: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            status: ViewStatus::Loading,
            runs: Vec::new(),
            filter: Vec::new(),
            selected: None,
            selected_tag: None,
            offset: 0,
            list_area: Rect::default(),
            message: None,
            should_quit: false,
        }
    }

    /// Replace the listed runs, keeping the selection on the same run id when
    /// it is still present
    pub fn set_runs(&mut self, runs: Vec<Run>) {
        let previous = self.selected_run().map(|run| run.run_id.clone());
        self.runs = runs;
        self.status = ViewStatus::Ready;

        self.selected = match previous {
            Some(id) => self
                .runs
                .iter()
                .position(|run| run.run_id == id)
                .or(if self.runs.is_empty() { None } else { Some(0) }),
            None if !self.runs.is_empty() => Some(0),
            None => None,
        };
        self.selected_tag = None;
        self.offset = self.offset.min(self.selected.unwrap_or(0));
    }

    pub fn selected_run(&self) -> Option<&Run> {
        self.selected.and_then(|i| self.runs.get(i))
    }

    pub fn select_next(&mut self) {
        if self.runs.is_empty() {
            return;
        }
        let next = self.selected.map_or(0, |i| (i + 1).min(self.runs.len() - 1));
        self.select(next);
    }

    pub fn select_prev(&mut self) {
        if self.runs.is_empty() {
            return;
        }
        let prev = self.selected.map_or(0, |i| i.saturating_sub(1));
        self.select(prev);
    }

    fn select(&mut self, index: usize) {
        if self.selected != Some(index) {
            self.selected_tag = None;
        }
        self.selected = Some(index);
        if index < self.offset {
            self.offset = index;
        }
    }

    /// Move the offset so the selected row fits in `available` lines.
    ///
    /// `heights` holds each row's height, `available` excludes the header.
    pub fn scroll_into_view(&mut self, heights: &[u16], available: u16) {
        let Some(selected) = self.selected else {
            return;
        };
        if selected >= heights.len() {
            return;
        }
        let mut offset = self.offset.min(selected);
        let span = |from: usize| -> u32 { heights[from..=selected].iter().map(|h| *h as u32).sum() };
        while offset < selected && span(offset) > available as u32 {
            offset += 1;
        }
        self.offset = offset;
    }

    /// Cycle forward through the selected run's tags
    pub fn next_tag(&mut self) {
        let count = self.selected_run().map_or(0, |run| run.tags.len());
        if count == 0 {
            self.selected_tag = None;
            return;
        }
        self.selected_tag = Some(self.selected_tag.map_or(0, |t| (t + 1) % count));
    }

    pub fn prev_tag(&mut self) {
        let count = self.selected_run().map_or(0, |run| run.tags.len());
        if count == 0 {
            self.selected_tag = None;
            return;
        }
        self.selected_tag = Some(self.selected_tag.map_or(count - 1, |t| (t + count - 1) % count));
    }

    /// Run count per status, in status order, zero counts omitted
    pub fn status_counts(&self) -> Vec<(RunStatus, usize)> {
        RunStatus::ALL
            .iter()
            .filter_map(|status| {
                let count = self.runs.iter().filter(|run| run.status == *status).count();
                (count > 0).then_some((*status, count))
            })
            .collect()
    }

    pub fn filter_label(&self) -> String {
        if self.filter.is_empty() {
            return String::from("none");
        }
        self.filter
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
