//! TUI Application - Main entry point and run loop

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::{info, warn};

use super::events::{handle_key_event, handle_mouse_event, poll_event, Action};
use super::state::{AppState, ViewStatus};
use super::theme::{icons, status_glyph, RunboardTheme};
use super::widgets::utils::truncate;
use super::widgets::{ClockTiming, EllipsisMenu, RowDelegates, RunListView};
use crate::runs::{
    FilterQueue, FilterToken, QueryVariablesContext, RunSource, RunStatus, RunsFilter,
    RunsQueryVariables,
};

/// TUI Application
pub struct TuiApp {
    state: AppState,
    theme: RunboardTheme,
    source: Box<dyn RunSource>,
    variables: QueryVariablesContext,
    queue: FilterQueue,
    utc: bool,
}

impl TuiApp {
    /// Create a new TUI application over `source`
    pub fn new(source: Box<dyn RunSource>, limit: Option<usize>, utc: bool) -> Self {
        let state = AppState::new(source.describe());
        let variables = QueryVariablesContext::new(RunsQueryVariables {
            limit,
            ..Default::default()
        });

        Self {
            state,
            theme: RunboardTheme::new(),
            source,
            variables,
            queue: FilterQueue::new(),
            utc,
        }
    }

    /// Run the TUI application
    pub async fn run(mut self, initial_filter: Vec<FilterToken>) -> anyhow::Result<()> {
        let mut terminal = self.setup_terminal()?;

        self.apply_filter(initial_filter).await;
        let result = self.main_loop(&mut terminal).await;

        self.restore_terminal(&mut terminal)?;

        result
    }

    /// Setup terminal for TUI
    fn setup_terminal(&self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(100);

        loop {
            terminal.draw(|frame| self.render(frame))?;

            if let Some(event) = poll_event(tick_rate)? {
                let action = match event {
                    Event::Key(key) => handle_key_event(key, &mut self.state),
                    Event::Mouse(mouse) => handle_mouse_event(mouse),
                    _ => Action::None,
                };
                self.dispatch(action).await;
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply an input action, then any filter requests it produced
    async fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::SelectNext | Action::SelectPrev => self.scroll_selection_into_view(),
            Action::Click(position) => {
                let area = self.state.list_area;
                self.with_view(|view| view.click(area, position));
            }
            Action::ApplyTag => {
                self.with_view(|view| view.activate_selection());
            }
            Action::ClearFilter => self.apply_filter(Vec::new()).await,
            Action::Refresh => self.refetch().await,
            Action::OpenActions => {
                let selected = self.state.selected;
                let message = self.with_view(|view| {
                    selected
                        .and_then(|i| view.row(i))
                        .map(|row| row.open_actions())
                });
                if message.is_some() {
                    self.state.message = message;
                }
            }
            Action::NextTag | Action::PrevTag | Action::None => {}
        }

        // Each request replaces the filter, so only the latest one matters.
        if let Some(tokens) = self.queue.drain().pop() {
            self.apply_filter(tokens).await;
        }
    }

    /// Make `tokens` the active filter and refetch
    async fn apply_filter(&mut self, tokens: Vec<FilterToken>) {
        self.variables.set_filter(RunsFilter::from_tokens(&tokens));
        self.state.filter = tokens;
        self.state.offset = 0;
        info!(filter = %self.state.filter_label(), "filter applied");
        self.refetch().await;
    }

    async fn refetch(&mut self) {
        self.state.status = ViewStatus::Loading;
        let variables = self.variables.current();
        match self.source.fetch(&variables).await {
            Ok(runs) => {
                info!(count = runs.len(), "runs refetched");
                self.state.set_runs(runs);
                self.state.message = None;
            }
            Err(e) => {
                warn!(error = %e, "run fetch failed");
                self.state.status = ViewStatus::Error;
                self.state.message = Some(format!("Fetch failed: {}", e));
            }
        }
    }

    /// Build the run list over the current state and hand it to `f`
    fn with_view<R>(&self, f: impl FnOnce(&RunListView<'_>) -> R) -> R {
        let timing = ClockTiming::now(self.utc);
        let menu = EllipsisMenu::new(&self.theme);
        let delegates = RowDelegates {
            timing: &timing,
            actions: &menu,
            theme: &self.theme,
        };
        let emit = self.queue.emitter();
        let view = RunListView::new(&self.state.runs, &emit, &self.variables, &delegates)
            .select(self.state.selected, self.state.selected_tag)
            .offset(self.state.offset);
        f(&view)
    }

    fn scroll_selection_into_view(&mut self) {
        let area = self.state.list_area;
        let heights: Vec<u16> =
            self.with_view(|view| view.rows().iter().map(|row| row.height(area.width)).collect());
        self.state
            .scroll_into_view(&heights, area.height.saturating_sub(1));
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let [header, filter_bar, list, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.state.list_area = list;

        self.render_header(frame, header);
        self.render_filter_bar(frame, filter_bar);
        self.with_view(|view| frame.render_widget(view, list));
        self.render_footer(frame, footer);
    }

    /// Render header
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(format!("{} RUNBOARD", icons::HISTORY), self.theme.header()),
            Span::raw("  │  "),
            Span::styled(truncate(&self.state.source_name, 40), self.theme.accent()),
            Span::raw("  │  "),
            Span::styled(format!("{} runs", self.state.runs.len()), self.theme.text()),
        ];

        for (status, count) in self.state.status_counts() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{} {}", status_glyph(status), count),
                self.theme.status(status),
            ));
        }

        match self.state.status {
            ViewStatus::Loading => {
                spans.push(Span::raw("  │  "));
                spans.push(Span::styled("LOADING", self.theme.dimmed()));
            }
            ViewStatus::Error => {
                spans.push(Span::raw("  │  "));
                spans.push(Span::styled("ERROR", self.theme.status(RunStatus::Failure)));
            }
            ViewStatus::Ready => {}
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.header())
            .title(" PIPELINE RUNS ");

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    /// Render the active filter, or the last status message
    fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.state.message {
            Some(message) => Line::from(Span::styled(format!(" {}", message), self.theme.accent())),
            None => Line::from(vec![
                Span::styled(" Filter: ", self.theme.dimmed()),
                Span::styled(self.state.filter_label(), self.theme.text()),
            ]),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render footer
    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help = Line::from(vec![
            Span::styled(" [q]", self.theme.accent()),
            Span::styled("uit  ", self.theme.dimmed()),
            Span::styled("[↑↓]", self.theme.accent()),
            Span::styled(" run  ", self.theme.dimmed()),
            Span::styled("[Tab]", self.theme.accent()),
            Span::styled(" tag  ", self.theme.dimmed()),
            Span::styled("[Enter]", self.theme.accent()),
            Span::styled(" filter  ", self.theme.dimmed()),
            Span::styled("[c]", self.theme.accent()),
            Span::styled("lear  ", self.theme.dimmed()),
            Span::styled("[r]", self.theme.accent()),
            Span::styled("efresh  ", self.theme.dimmed()),
            Span::styled("[a]", self.theme.accent()),
            Span::styled("ctions", self.theme.dimmed()),
        ]);

        frame.render_widget(Paragraph::new(help), area);
    }
}
