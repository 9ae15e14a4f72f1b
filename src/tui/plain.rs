//! One-shot rendering of the run list as plain text
//!
//! Draws the same widget the interactive shell uses into an off-screen
//! buffer sized to fit every row, then flattens it line by line.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use super::theme::RunboardTheme;
use super::widgets::{EllipsisMenu, RowDelegates, RunListView, RunTiming};
use crate::runs::{FilterToken, QueryVariablesContext, Run};

/// Lines reserved for the empty-state placeholder
const EMPTY_HEIGHT: u16 = 8;

/// Render `runs` at `width` columns, trailing spaces trimmed
pub fn render_plain(
    runs: &[Run],
    width: u16,
    timing: &dyn RunTiming,
    variables: &QueryVariablesContext,
) -> String {
    let theme = RunboardTheme::new();
    let menu = EllipsisMenu::new(&theme);
    let delegates = RowDelegates {
        timing,
        actions: &menu,
        theme: &theme,
    };
    let ignore = |_: Vec<FilterToken>| {};
    let view = RunListView::new(runs, &ignore, variables, &delegates);

    let height = if view.is_empty() {
        EMPTY_HEIGHT
    } else {
        let rows: u32 = view.rows().iter().map(|row| row.height(width) as u32).sum();
        (1 + rows).min(u16::MAX as u32) as u16
    };

    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    (&view).render(area, &mut buf);
    buffer_to_string(&buf)
}

fn buffer_to_string(buf: &Buffer) -> String {
    let mut out = String::new();
    for y in 0..buf.area.height {
        let mut line = String::new();
        for x in 0..buf.area.width {
            line.push_str(buf[(x, y)].symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::model::fixtures::run;
    use crate::runs::Tag;
    use crate::tui::widgets::ClockTiming;
    use chrono::{TimeZone, Utc};

    fn timing() -> ClockTiming {
        ClockTiming::new(Utc.timestamp_opt(1_700_000_600, 0).unwrap(), true)
    }

    #[test]
    fn test_plain_empty() {
        let out = render_plain(&[], 80, &timing(), &QueryVariablesContext::default());
        assert!(out.contains("Pipeline Runs"));
        assert!(out.contains("Use the Playground to start a pipeline."));
    }

    #[test]
    fn test_plain_rows_fit() {
        let mut first = run("aaaa-1111", "alpha");
        first.tags = vec![Tag::new("owner", "x")];
        let runs = vec![first, run("bbbb-2222", "beta")];
        let out = render_plain(&runs, 100, &timing(), &QueryVariablesContext::default());

        let lines: Vec<&str> = out.lines().collect();
        // header + (3 + 2) row lines
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("    Run"));
        assert!(lines[1].contains("aaaa"));
        assert!(lines[2].contains("[owner: x]"));
        assert!(lines[4].contains("bbbb"));
        assert!(lines.iter().all(|l| !l.ends_with(' ')));
    }
}
