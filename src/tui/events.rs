//! Event Handling - Keyboard and mouse input processing

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;
use std::time::Duration;

use super::state::AppState;

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SelectNext,
    SelectPrev,
    NextTag,
    PrevTag,
    /// Emit the filter for the selected tag
    ApplyTag,
    ClearFilter,
    Refresh,
    OpenActions,
    Click(Position),
    None,
}

/// Handle keyboard events
pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Action {
    match (key.modifiers, key.code) {
        // Quit: q or Ctrl+C
        (KeyModifiers::NONE, KeyCode::Char('q')) => return Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Action::Quit,

        // Tag selection: Tab / Shift+Tab
        (KeyModifiers::NONE, KeyCode::Tab) => {
            state.next_tag();
            return Action::NextTag;
        }
        (KeyModifiers::SHIFT, KeyCode::BackTab) => {
            state.prev_tag();
            return Action::PrevTag;
        }

        _ => {}
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            state.select_next();
            Action::SelectNext
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.select_prev();
            Action::SelectPrev
        }
        KeyCode::Enter if state.selected_tag.is_some() => Action::ApplyTag,
        KeyCode::Esc | KeyCode::Char('c') if !state.filter.is_empty() => Action::ClearFilter,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('a') if state.selected.is_some() => Action::OpenActions,
        _ => Action::None,
    }
}

/// Left clicks become [`Action::Click`]; everything else is ignored
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            Action::Click(Position::new(mouse.column, mouse.row))
        }
        _ => Action::None,
    }
}

/// Poll for key or mouse events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        match event::read()? {
            ev @ (Event::Key(_) | Event::Mouse(_)) => return Ok(Some(ev)),
            _ => {}
        }
    }
    Ok(None)
}
