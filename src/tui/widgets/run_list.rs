//! Run List View
//!
//! Header plus one [`RunRow`] per run, in input order. An empty collection
//! renders the empty-state placeholder instead.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::delegates::RowDelegates;
use super::run_row::{column_areas, RunRow};
use crate::runs::{OnSetFilter, QueryVariablesContext, Run};
use crate::tui::theme::{icons, RunboardTheme};

/// Column titles: status, run, pipeline + tags, execution params, timing, actions
pub const HEADER_LABELS: [&str; 6] = ["", "Run", "Pipeline", "Execution Params", "Timing", ""];

pub const EMPTY_TITLE: &str = "Pipeline Runs";
pub const EMPTY_DESCRIPTION: &str = "No runs to display. Use the Playground to start a pipeline.";

// ─────────────────────────────────────────────────────────────────────────────
// Empty State
// ─────────────────────────────────────────────────────────────────────────────

/// Placeholder shown when there is nothing to list
pub struct EmptyState<'a> {
    theme: &'a RunboardTheme,
}

impl<'a> EmptyState<'a> {
    /// Blank lines above the placeholder
    const TOP_MARGIN: u16 = 4;

    pub fn new(theme: &'a RunboardTheme) -> Self {
        Self { theme }
    }
}

impl Widget for EmptyState<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let margin = Self::TOP_MARGIN.min(area.height.saturating_sub(3));
        let inner = Rect::new(
            area.x,
            area.y + margin,
            area.width,
            area.height.saturating_sub(margin),
        );

        let lines = vec![
            Line::from(Span::styled(icons::HISTORY, self.theme.dimmed())),
            Line::from(Span::styled(EMPTY_TITLE, self.theme.header())),
            Line::from(Span::styled(EMPTY_DESCRIPTION, self.theme.dimmed())),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Run List
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub struct RunListView<'a> {
    runs: &'a [Run],
    on_set_filter: OnSetFilter<'a>,
    variables: &'a QueryVariablesContext,
    delegates: &'a RowDelegates<'a>,
    selected: Option<usize>,
    selected_tag: Option<usize>,
    offset: usize,
}

impl<'a> RunListView<'a> {
    pub fn new(
        runs: &'a [Run],
        on_set_filter: OnSetFilter<'a>,
        variables: &'a QueryVariablesContext,
        delegates: &'a RowDelegates<'a>,
    ) -> Self {
        Self {
            runs,
            on_set_filter,
            variables,
            delegates,
            selected: None,
            selected_tag: None,
            offset: 0,
        }
    }

    pub fn select(mut self, row: Option<usize>, tag: Option<usize>) -> Self {
        self.selected = row;
        self.selected_tag = tag;
        self
    }

    /// First row drawn below the header
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<RunRow<'a>> {
        let run = self.runs.get(index)?;
        Some(
            RunRow::new(run, self.on_set_filter, self.variables, self.delegates)
                .selected(self.selected == Some(index))
                .selected_tag(self.selected_tag),
        )
    }

    /// One row per run, same order as the input
    pub fn rows(&self) -> Vec<RunRow<'a>> {
        (0..self.runs.len()).filter_map(|i| self.row(i)).collect()
    }

    /// Row keys in display order
    pub fn keys(&self) -> Vec<&'a str> {
        self.runs.iter().map(|run| run.run_id.as_str()).collect()
    }

    /// Areas of the rows visible in `area`, starting at the offset.
    ///
    /// The last row may be cut short by the bottom edge.
    pub fn row_areas(&self, area: Rect) -> Vec<(usize, Rect)> {
        let mut areas = Vec::new();
        if self.is_empty() || area.height < 2 {
            return areas;
        }

        let bottom = area.y + area.height;
        let mut y = area.y + 1;
        for (index, row) in self.rows().iter().enumerate().skip(self.offset) {
            if y >= bottom {
                break;
            }
            let height = row.height(area.width).min(bottom - y);
            areas.push((index, Rect::new(area.x, y, area.width, height)));
            y += height;
        }
        areas
    }

    /// Route a click to the row under `position`
    pub fn click(&self, area: Rect, position: Position) -> bool {
        self.row_areas(area)
            .into_iter()
            .find(|(_, rect)| rect.contains(position))
            .and_then(|(index, rect)| self.row(index).map(|row| row.click(rect, position)))
            .unwrap_or(false)
    }

    /// Emit the filter for the selected tag of the selected row
    pub fn activate_selection(&self) -> bool {
        match (self.selected.and_then(|i| self.row(i)), self.selected_tag) {
            (Some(row), Some(tag)) => row.activate_tag(tag),
            _ => false,
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let theme = self.delegates.theme;
        for (column, label) in column_areas(area).iter().zip(HEADER_LABELS) {
            buf.set_stringn(column.x, column.y, label, column.width as usize, theme.header());
        }
    }
}

impl Widget for &RunListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.is_empty() {
            EmptyState::new(self.delegates.theme).render(area, buf);
            return;
        }
        if area.is_empty() {
            return;
        }

        self.render_header(Rect::new(area.x, area.y, area.width, 1), buf);
        for (index, rect) in self.row_areas(area) {
            if let Some(row) = self.row(index) {
                (&row).render(rect, buf);
            }
        }
    }
}
