//! Root layout: tab bar, main content, status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Below this height the tab bar is dropped to leave room for content.
pub const HIDE_TABS_THRESHOLD: u16 = 8;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Tab bar (None on very short terminals).
    pub tabs: Option<Rect>,
    pub main: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect) -> Self {
        if area.height < HIDE_TABS_THRESHOLD {
            let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
            return AppLayout {
                tabs: None,
                main: rows[0],
                status: rows[1],
            };
        }

        let rows = Layout::vertical([
            Constraint::Length(1), // Tabs
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        AppLayout {
            tabs: Some(rows[0]),
            main: rows[1],
            status: rows[2],
        }
    }
}
