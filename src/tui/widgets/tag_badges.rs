//! Tag Badge List Widget
//!
//! One clickable `[key: value]` badge per tag, wrapping inside its area.
//!
//! ```text
//! [dagster/schedule_name: nightly] [owner: data-platform]
//! [dagster/parent_run_id: 1f9d7c30-...]
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    text::Span,
    widgets::Widget,
};

use crate::runs::Tag;

/// Columns between two badges on the same line
const BADGE_GAP: u16 = 1;

/// Position of one badge relative to the list's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeSlot {
    /// Index into the tag slice
    pub index: usize,
    pub x: u16,
    pub y: u16,
    pub width: u16,
}

impl BadgeSlot {
    fn area_in(&self, area: Rect) -> Rect {
        Rect::new(area.x + self.x, area.y + self.y, self.width, 1)
    }
}

pub fn badge_label(tag: &Tag) -> String {
    format!("[{}: {}]", tag.key, tag.value)
}

pub struct TagBadgeList<'a> {
    tags: &'a [Tag],
    on_click: Option<&'a dyn Fn(&Tag)>,
    highlighted: Option<usize>,
    style: Style,
    highlight_style: Style,
}

impl<'a> TagBadgeList<'a> {
    pub fn new(tags: &'a [Tag]) -> Self {
        Self {
            tags,
            on_click: None,
            highlighted: None,
            style: Style::default(),
            highlight_style: Style::default(),
        }
    }

    pub fn on_click(mut self, handler: &'a dyn Fn(&Tag)) -> Self {
        self.on_click = Some(handler);
        self
    }

    /// Badge drawn with the highlight style (keyboard selection)
    pub fn highlight(mut self, index: Option<usize>) -> Self {
        self.highlighted = index;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    pub fn tags(&self) -> &'a [Tag] {
        self.tags
    }

    /// Badge positions for a given width.
    ///
    /// `None` when there are no tags: the list takes no space at all rather
    /// than an empty line.
    pub fn layout(&self, width: u16) -> Option<Vec<BadgeSlot>> {
        if self.tags.is_empty() {
            return None;
        }

        let mut slots = Vec::with_capacity(self.tags.len());
        let (mut x, mut y) = (0u16, 0u16);
        for (index, tag) in self.tags.iter().enumerate() {
            let full = Span::raw(badge_label(tag)).width();
            let badge_width = u16::try_from(full).unwrap_or(u16::MAX).min(width);
            if x > 0 && x.saturating_add(badge_width) > width {
                x = 0;
                y += 1;
            }
            slots.push(BadgeSlot {
                index,
                x,
                y,
                width: badge_width,
            });
            x = x.saturating_add(badge_width).saturating_add(BADGE_GAP);
        }
        Some(slots)
    }

    /// Lines needed at `width`; 0 without tags
    pub fn height(&self, width: u16) -> u16 {
        self.layout(width)
            .and_then(|slots| slots.last().map(|slot| slot.y + 1))
            .unwrap_or(0)
    }

    /// Invoke the click handler for the badge under `position`.
    ///
    /// Returns `true` when a handler ran; badges without a handler are inert.
    pub fn click(&self, area: Rect, position: Position) -> bool {
        let Some(handler) = self.on_click else {
            return false;
        };
        let Some(slots) = self.layout(area.width) else {
            return false;
        };

        let hit = slots
            .iter()
            .filter(|slot| slot.y < area.height)
            .find(|slot| slot.area_in(area).contains(position));

        match hit {
            Some(slot) => {
                handler(&self.tags[slot.index]);
                true
            }
            None => false,
        }
    }
}

impl Widget for &TagBadgeList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(slots) = self.layout(area.width) else {
            return;
        };

        for slot in slots {
            // overflow hidden
            if slot.y >= area.height {
                break;
            }
            let style = if self.highlighted == Some(slot.index) {
                self.highlight_style
            } else {
                self.style
            };
            buf.set_stringn(
                area.x + slot.x,
                area.y + slot.y,
                badge_label(&self.tags[slot.index]),
                slot.width as usize,
                style,
            );
        }
    }
}
