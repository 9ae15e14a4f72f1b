//! Run Row Widget
//!
//! One run across the six table columns:
//!
//! ```text
//!  ●  8c5e2a1f   ⑂ etl_nightly                 Mode: default            Nov 14, 22:13    [⋯]
//!                [owner: data-platform]                                 ⏱ 00:12:34
//! ───────────────────────────────────────────────────────────────────────────────────────────
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::Widget,
};

use super::delegates::RowDelegates;
use super::tag_badges::TagBadgeList;
use crate::runs::{
    pipeline_link, run_link, tag_filter_token, title_for_run, OnSetFilter,
    QueryVariablesContext, RefetchDirective, Run, Tag,
};
use crate::tui::theme::{icons, status_glyph};

pub const STATUS_WIDTH: u16 = 3;
pub const TITLE_WIDTH: u16 = 10;
pub const EXECUTION_WIDTH: u16 = 24;
pub const TIMING_WIDTH: u16 = 16;
pub const ACTIONS_WIDTH: u16 = 4;

/// Status, run, pipeline + tags, execution params, timing, actions
pub fn column_areas(area: Rect) -> [Rect; 6] {
    Layout::horizontal([
        Constraint::Length(STATUS_WIDTH),
        Constraint::Length(TITLE_WIDTH),
        Constraint::Fill(1),
        Constraint::Length(EXECUTION_WIDTH),
        Constraint::Length(TIMING_WIDTH),
        Constraint::Length(ACTIONS_WIDTH),
    ])
    .spacing(1)
    .areas(area)
}

pub struct RunRow<'a> {
    run: &'a Run,
    on_set_filter: OnSetFilter<'a>,
    variables: &'a QueryVariablesContext,
    delegates: &'a RowDelegates<'a>,
    selected: bool,
    selected_tag: Option<usize>,
}

impl<'a> RunRow<'a> {
    pub fn new(
        run: &'a Run,
        on_set_filter: OnSetFilter<'a>,
        variables: &'a QueryVariablesContext,
        delegates: &'a RowDelegates<'a>,
    ) -> Self {
        Self {
            run,
            on_set_filter,
            variables,
            delegates,
            selected: false,
            selected_tag: None,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn selected_tag(mut self, index: Option<usize>) -> Self {
        self.selected_tag = index;
        self
    }

    pub fn run(&self) -> &'a Run {
        self.run
    }

    /// Row key
    pub fn key(&self) -> &'a str {
        &self.run.run_id
    }

    pub fn title(&self) -> &'a str {
        title_for_run(&self.run.run_id)
    }

    pub fn run_link(&self) -> String {
        run_link(&self.run.pipeline_name, &self.run.run_id)
    }

    pub fn pipeline_link(&self) -> String {
        pipeline_link(&self.run.pipeline_name, &self.run.pipeline_snapshot_id)
    }

    /// Replace the active filter with this tag
    pub fn on_tag_click(&self, tag: &Tag) {
        (self.on_set_filter)(vec![tag_filter_token(tag)]);
    }

    /// Emit the filter for the tag at `index`; false when out of range
    pub fn activate_tag(&self, index: usize) -> bool {
        match self.run.tags.get(index) {
            Some(tag) => {
                self.on_tag_click(tag);
                true
            }
            None => false,
        }
    }

    /// Listing query with the variables current at call time
    pub fn refetch_directive(&self) -> RefetchDirective {
        RefetchDirective::runs_root(self.variables.current())
    }

    /// Open the action menu for this run
    pub fn open_actions(&self) -> String {
        self.delegates
            .actions
            .open(self.run, &self.refetch_directive())
    }

    /// Lines of the execution params column
    pub fn execution_params(&self) -> Vec<String> {
        let mut lines = vec![format!("Mode: {}", self.run.mode)];
        if let Some(steps) = self.run.step_subset() {
            lines.push(format!("Steps: {}", steps.len()));
        }
        if let Some(solids) = self.run.solid_selection.as_deref() {
            if !solids.is_empty() {
                lines.push(format!("Solids: {}", solids.join(", ")));
            }
        }
        if let Some(parent) = self.run.parent_run_id.as_deref() {
            lines.push(format!("Re-execution of {}", title_for_run(parent)));
        }
        lines
    }

    fn timing_lines(&self) -> Vec<String> {
        let timing = self.delegates.timing;
        [timing.started(self.run), timing.elapsed(self.run)]
            .into_iter()
            .flatten()
            .collect()
    }

    fn badges(&self) -> TagBadgeList<'a> {
        let theme = self.delegates.theme;
        TagBadgeList::new(&self.run.tags)
            .style(theme.badge())
            .highlight_style(theme.badge_selected())
            .highlight(if self.selected { self.selected_tag } else { None })
    }

    /// Tag area below the pipeline name, clipped to the row
    fn tag_area(&self, area: Rect) -> Rect {
        let [_, _, pipeline, _, _, _] = column_areas(area);
        let tags_height = self.badges().height(pipeline.width);
        let available = area.height.saturating_sub(1);
        Rect::new(
            pipeline.x,
            area.y.saturating_add(1),
            pipeline.width,
            tags_height.min(available),
        )
    }

    fn content_height(&self, width: u16) -> u16 {
        let [_, _, pipeline, _, _, _] = column_areas(Rect::new(0, 0, width, 1));
        let tags = self.badges().height(pipeline.width);
        let exec = self.execution_params().len() as u16;
        let timing = self.timing_lines().len() as u16;
        (1 + tags).max(exec).max(timing)
    }

    /// Rows needed at `width`, including the separator line
    pub fn height(&self, width: u16) -> u16 {
        self.content_height(width) + 1
    }

    /// Route a click inside `area` to the tag badge under it
    pub fn click(&self, area: Rect, position: Position) -> bool {
        if !area.contains(position) {
            return false;
        }
        let handler = |tag: &Tag| self.on_tag_click(tag);
        self.badges()
            .on_click(&handler)
            .click(self.tag_area(area), position)
    }
}

impl Widget for &RunRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let theme = self.delegates.theme;
        let [status, title, pipeline, exec, timing, actions] = column_areas(area);

        if self.selected {
            buf.set_style(area, theme.selected_row());
            buf.set_string(status.x, status.y, "▶", theme.accent());
        }

        // Status
        buf.set_string(
            status.x + 1,
            status.y,
            status_glyph(self.run.status),
            theme.status(self.run.status),
        );

        // Run identity
        buf.set_stringn(title.x, title.y, self.title(), title.width as usize, theme.link());

        // Pipeline + tags
        let pipeline_line = Line::from(vec![
            Span::styled(icons::PIPELINE, theme.dimmed()),
            Span::raw(" "),
            Span::styled(self.run.pipeline_name.as_str(), theme.link()),
        ]);
        buf.set_line(pipeline.x, pipeline.y, &pipeline_line, pipeline.width);
        (&self.badges()).render(self.tag_area(area), buf);

        // Execution params
        let content_bottom = area.y + area.height.saturating_sub(1).max(1);
        for (i, line) in self.execution_params().iter().enumerate() {
            let y = exec.y + i as u16;
            if y >= content_bottom {
                break;
            }
            let style = if i == 0 { theme.text() } else { theme.dimmed() };
            buf.set_stringn(exec.x, y, line, exec.width as usize, style);
        }

        // Timing
        for (i, line) in self.timing_lines().iter().enumerate() {
            let y = timing.y + i as u16;
            if y >= content_bottom {
                break;
            }
            buf.set_stringn(timing.x, y, line, timing.width as usize, theme.text());
        }

        // Actions
        let trigger = self
            .delegates
            .actions
            .trigger(self.run, &self.refetch_directive());
        buf.set_span(actions.x, actions.y, &trigger, actions.width);

        // Separator
        if area.height > 1 {
            let y = area.y + area.height - 1;
            buf.set_string(
                area.x,
                y,
                "─".repeat(area.width as usize),
                theme.separator(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::model::fixtures::run;
    use crate::runs::{FilterToken, RunsFilter, RunsQueryVariables};
    use crate::tui::theme::RunboardTheme;
    use crate::tui::widgets::delegates::{ClockTiming, EllipsisMenu};
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;

    struct Fixture {
        theme: RunboardTheme,
        timing: ClockTiming,
        variables: QueryVariablesContext,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                theme: RunboardTheme::new(),
                timing: ClockTiming::new(Utc.timestamp_opt(1_700_000_600, 0).unwrap(), true),
                variables: QueryVariablesContext::default(),
            }
        }
    }

    fn line(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_derived_links_and_title() {
        let fx = Fixture::new();
        let menu = EllipsisMenu::new(&fx.theme);
        let delegates = RowDelegates {
            timing: &fx.timing,
            actions: &menu,
            theme: &fx.theme,
        };
        let noop = |_: Vec<FilterToken>| {};
        let mut r = run("abc123", "p");
        r.pipeline_snapshot_id = "s1".to_string();
        let row = RunRow::new(&r, &noop, &fx.variables, &delegates);

        assert_eq!(row.title(), "abc123");
        assert_eq!(row.key(), "abc123");
        assert_eq!(row.pipeline_link(), "/pipeline/p@s1/");
        assert_eq!(row.run_link(), "/runs/p/abc123");
        assert_eq!(row.pipeline_link(), row.pipeline_link());
    }

    #[test]
    fn test_tag_click_emits_single_token() {
        let fx = Fixture::new();
        let menu = EllipsisMenu::new(&fx.theme);
        let delegates = RowDelegates {
            timing: &fx.timing,
            actions: &menu,
            theme: &fx.theme,
        };
        let calls = RefCell::new(Vec::new());
        let on_set_filter = |tokens: Vec<FilterToken>| calls.borrow_mut().push(tokens);
        let mut r = run("abc123", "p");
        r.tags = vec![Tag::new("dagster/pipeline", "etl"), Tag::new("owner", "x")];
        let row = RunRow::new(&r, &on_set_filter, &fx.variables, &delegates);

        row.on_tag_click(&r.tags[0]);
        assert!(row.activate_tag(1));
        assert!(!row.activate_tag(2));

        assert_eq!(
            calls.into_inner(),
            vec![
                vec![FilterToken::new("tag", "dagster/pipeline=etl")],
                vec![FilterToken::new("tag", "owner=x")],
            ]
        );
    }

    #[test]
    fn test_refetch_directive_reads_current_variables() {
        let fx = Fixture::new();
        let menu = EllipsisMenu::new(&fx.theme);
        let delegates = RowDelegates {
            timing: &fx.timing,
            actions: &menu,
            theme: &fx.theme,
        };
        let noop = |_: Vec<FilterToken>| {};
        let r = run("abc", "p");
        let row = RunRow::new(&r, &noop, &fx.variables, &delegates);

        assert_eq!(row.refetch_directive().variables, RunsQueryVariables::default());

        fx.variables
            .set_filter(RunsFilter::from_tokens(&[FilterToken::new("tag", "a=1")]));
        let directive = row.refetch_directive();
        assert_eq!(directive.query, "RunsRootQuery");
        assert_eq!(directive.variables.filter.tags, vec![Tag::new("a", "1")]);
    }

    #[test]
    fn test_execution_params() {
        let fx = Fixture::new();
        let menu = EllipsisMenu::new(&fx.theme);
        let delegates = RowDelegates {
            timing: &fx.timing,
            actions: &menu,
            theme: &fx.theme,
        };
        let noop = |_: Vec<FilterToken>| {};
        let mut r = run("abc", "p");
        r.mode = "gpu".to_string();
        r.steps_to_execute = Some(vec!["a".to_string(), "b".to_string()]);
        r.solid_selection = Some(vec!["x".to_string(), "y".to_string()]);
        r.parent_run_id = Some("1f9d7c30-aa42".to_string());
        let row = RunRow::new(&r, &noop, &fx.variables, &delegates);

        assert_eq!(
            row.execution_params(),
            vec![
                "Mode: gpu".to_string(),
                "Steps: 2".to_string(),
                "Solids: x, y".to_string(),
                "Re-execution of 1f9d7c30".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_row() {
        let fx = Fixture::new();
        let menu = EllipsisMenu::new(&fx.theme);
        let delegates = RowDelegates {
            timing: &fx.timing,
            actions: &menu,
            theme: &fx.theme,
        };
        let noop = |_: Vec<FilterToken>| {};
        let mut r = run("abc123", "etl");
        r.tags = vec![Tag::new("owner", "data")];
        let row = RunRow::new(&r, &noop, &fx.variables, &delegates);

        let width = 100;
        assert_eq!(row.height(width), 3);
        let area = Rect::new(0, 0, width, row.height(width));
        let mut buf = Buffer::empty(area);
        (&row).render(area, &mut buf);

        let first = line(&buf, 0);
        assert!(first.contains("●"));
        assert!(first.contains("abc123"));
        assert!(first.contains("⑂ etl"));
        assert!(first.contains("Mode: default"));
        assert!(first.contains("[⋯]"));
        assert!(line(&buf, 1).contains("[owner: data]"));
        assert!(line(&buf, 2).starts_with("───"));
    }

    #[test]
    fn test_row_without_tags_has_no_tag_line() {
        let fx = Fixture::new();
        let menu = EllipsisMenu::new(&fx.theme);
        let delegates = RowDelegates {
            timing: &fx.timing,
            actions: &menu,
            theme: &fx.theme,
        };
        let noop = |_: Vec<FilterToken>| {};
        let r = run("abc", "p");
        let row = RunRow::new(&r, &noop, &fx.variables, &delegates);
        assert_eq!(row.height(100), 2);
    }

    #[test]
    fn test_click_on_badge() {
        let fx = Fixture::new();
        let menu = EllipsisMenu::new(&fx.theme);
        let delegates = RowDelegates {
            timing: &fx.timing,
            actions: &menu,
            theme: &fx.theme,
        };
        let calls = RefCell::new(Vec::new());
        let on_set_filter = |tokens: Vec<FilterToken>| calls.borrow_mut().push(tokens);
        let mut r = run("abc", "p");
        r.tags = vec![Tag::new("owner", "data")];
        let row = RunRow::new(&r, &on_set_filter, &fx.variables, &delegates);

        let area = Rect::new(0, 10, 100, row.height(100));
        let [_, _, pipeline, _, _, _] = column_areas(area);

        assert!(!row.click(area, Position::new(pipeline.x, 10)));
        assert!(row.click(area, Position::new(pipeline.x + 1, 11)));
        assert_eq!(
            calls.into_inner(),
            vec![vec![FilterToken::new("tag", "owner=data")]]
        );
    }
}
