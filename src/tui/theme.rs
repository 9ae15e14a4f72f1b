//! Run table theme - colors, styles and glyphs
//!
//! Violet/amber palette shared by every widget in the run table.

use ratatui::style::{Color, Modifier, Style};

use crate::runs::RunStatus;

/// Color palette
#[derive(Debug, Clone)]
pub struct RunboardTheme {
    // Primary palette
    pub violet: Color,
    pub amber: Color,
    pub cyan: Color,
    pub white: Color,
    pub gray: Color,

    // Status colors
    pub success_green: Color,
    pub warning_orange: Color,
    pub error_red: Color,

    // Dimmed versions
    pub dim_violet: Color,
    pub dim_cyan: Color,
}

impl Default for RunboardTheme {
    fn default() -> Self {
        Self {
            violet: Color::Rgb(138, 43, 226), // #8A2BE2
            amber: Color::Rgb(255, 191, 0),   // #FFBF00
            cyan: Color::Rgb(0, 255, 255),    // #00FFFF
            white: Color::Rgb(230, 237, 243), // #E6EDF3
            gray: Color::Rgb(128, 128, 128),

            success_green: Color::Rgb(63, 185, 80),   // #3FB950
            warning_orange: Color::Rgb(210, 153, 34), // #D29922
            error_red: Color::Rgb(248, 81, 73),       // #F85149

            dim_violet: Color::Rgb(88, 28, 143),
            dim_cyan: Color::Rgb(0, 153, 153),
        }
    }
}

impl RunboardTheme {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Text Styles
    // ─────────────────────────────────────────────────────────────────────

    pub fn text(&self) -> Style {
        Style::default().fg(self.white)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.gray)
    }

    /// Column header style
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.violet)
            .add_modifier(Modifier::BOLD)
    }

    /// Navigable text (run title, pipeline name)
    pub fn link(&self) -> Style {
        Style::default()
            .fg(self.cyan)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.amber)
    }

    pub fn badge(&self) -> Style {
        Style::default().fg(self.white).bg(self.dim_violet)
    }

    pub fn badge_selected(&self) -> Style {
        Style::default()
            .fg(self.violet)
            .bg(self.amber)
            .add_modifier(Modifier::BOLD)
    }

    /// Background of the selected row
    pub fn selected_row(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn separator(&self) -> Style {
        Style::default().fg(Color::Rgb(48, 54, 61))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Run Status
    // ─────────────────────────────────────────────────────────────────────

    pub fn status_color(&self, status: RunStatus) -> Color {
        match status {
            RunStatus::Queued | RunStatus::NotStarted | RunStatus::Managed => self.gray,
            RunStatus::Started => self.amber,
            RunStatus::Success => self.success_green,
            RunStatus::Failure => self.error_red,
            RunStatus::Canceling => self.warning_orange,
            RunStatus::Canceled => self.dim_cyan,
        }
    }

    pub fn status(&self, status: RunStatus) -> Style {
        Style::default().fg(self.status_color(status))
    }
}

/// Glyph for a run status, always one cell wide
pub fn status_glyph(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Queued => icons::QUEUED,
        RunStatus::NotStarted | RunStatus::Managed => icons::PENDING,
        RunStatus::Started => icons::RUNNING,
        RunStatus::Success => icons::SUCCESS,
        RunStatus::Failure => icons::FAILURE,
        RunStatus::Canceling | RunStatus::Canceled => icons::CANCELED,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Icons and Symbols
// ─────────────────────────────────────────────────────────────────────────────

pub mod icons {
    // Status glyphs
    pub const QUEUED: &str = "◌";
    pub const PENDING: &str = "○";
    pub const RUNNING: &str = "◉";
    pub const SUCCESS: &str = "●";
    pub const FAILURE: &str = "⊗";
    pub const CANCELED: &str = "⊘";

    // Element icons
    pub const HISTORY: &str = "↺";
    pub const PIPELINE: &str = "⑂";
    pub const ACTIONS: &str = "⋯";
    pub const TIMER: &str = "⏱";
}
