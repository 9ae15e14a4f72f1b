//! TUI Module - Pipeline run table
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        UI LAYER (widgets/)                          │
//! │  RunListView → RunRow → TagBadgeList. Stateless, emits tokens.      │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲            │
//!                   runs + selection         │ Vec<FilterToken>
//!                               │            ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   DOMAIN LAYER (state.rs, app.rs)                   │
//! │  AppState. Drains the FilterQueue and updates query variables.      │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲            │
//!                          Vec<Run>          │ RunsQueryVariables
//!                               │            ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   CONNECTOR LAYER (runs::source)                    │
//! │  RunSource trait. FileRunSource + MockRunSource.                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod plain;
mod state;

pub mod theme;
pub mod widgets;

pub use app::TuiApp;
pub use plain::render_plain;
pub use state::{AppState, ViewStatus};
pub use theme::RunboardTheme;

use crate::runs::{FilterToken, RunSource};

/// Run the interactive run table
pub async fn run(
    source: Box<dyn RunSource>,
    filter: Vec<FilterToken>,
    limit: Option<usize>,
    utc: bool,
) -> anyhow::Result<()> {
    let app = TuiApp::new(source, limit, utc);
    app.run(filter).await
}
