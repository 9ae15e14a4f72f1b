//! TUI Widgets - UI Components
//!
//! Each widget is a stateless renderer over borrowed run data. Clicks are
//! routed back through the same widget that drew them, so hit areas always
//! match what is on screen.

pub mod delegates;
pub mod run_list;
pub mod run_row;
pub mod tag_badges;

pub use delegates::{ActionMenu, ClockTiming, EllipsisMenu, RowDelegates, RunTiming};
pub use run_list::{EmptyState, RunListView};
pub use run_row::RunRow;
pub use tag_badges::{BadgeSlot, TagBadgeList};

/// Common widget utilities
pub mod utils {
    /// Format duration as HH:MM:SS
    pub fn format_duration(secs: u64) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    }

    /// Truncate string with ellipsis, counting chars
    pub fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else if max_len <= 3 {
            s.chars().take(max_len).collect()
        } else {
            let head: String = s.chars().take(max_len - 3).collect();
            format!("{}...", head)
        }
    }
}
