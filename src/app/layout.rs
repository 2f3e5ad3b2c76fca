//! Layout calculation for the main screen.
//!
//! [`calculate_main_layout`] is the single source of truth for panel sizes:
//! `App::update_layout` caches its result and both scrolling and rendering
//! read from that cache.

use ratatui::layout::{Constraint, Layout, Rect};

/// Height of the input panel, identical for all modes so switching modes
/// does not move the result panel.
pub const INPUT_PANEL_HEIGHT: u16 = 8;

/// Layout of the main screen, top to bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainLayout {
    /// Application name and mode tabs (1 line).
    pub header: Rect,
    /// Editors of the active mode.
    pub input: Rect,
    /// Pending / idle / error line (2 lines).
    pub status: Rect,
    /// Result table and metrics (grows).
    pub results: Rect,
    /// Key hints (1 line).
    pub footer: Rect,
    /// Lines inside the result panel borders.
    pub results_inner_height: u16,
}

const MAIN_LAYOUT_CONSTRAINTS: [Constraint; 5] = [
    Constraint::Length(1),
    Constraint::Length(INPUT_PANEL_HEIGHT),
    Constraint::Length(2),
    Constraint::Min(4),
    Constraint::Length(1),
];

/// Calculates the main screen layout for `area`.
#[must_use]
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::vertical(MAIN_LAYOUT_CONSTRAINTS).split(area);
    let results = chunks[3];

    MainLayout {
        header: chunks[0],
        input: chunks[1],
        status: chunks[2],
        results,
        footer: chunks[4],
        results_inner_height: results.height.saturating_sub(2),
    }
}
