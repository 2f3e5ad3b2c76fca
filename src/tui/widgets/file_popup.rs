//! File suggestion popup widget for the path editors.
//!
//! Lists files under the working directory that match what the operator
//! typed. Data files (csv, tsv, txt) are drawn normally, anything else is
//! muted since the service will most likely reject it.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Widget},
};

use crate::file_search::FileMatch;
use crate::tui::Theme;

/// Maximum number of visible rows in the popup.
pub const MAX_POPUP_ROWS: usize = 8;

/// Width of the popup in cells.
const POPUP_WIDTH: u16 = 56;

/// State of the file suggestion popup.
#[derive(Debug, Clone, Default)]
pub enum PopupState {
    /// No popup should be shown.
    #[default]
    Hidden,
    /// A search is running.
    Loading,
    /// The last search found nothing.
    NoMatches,
    /// Showing file suggestions.
    Showing {
        matches: Vec<FileMatch>,
        /// Currently selected index (0-indexed).
        selected: usize,
    },
}

impl PopupState {
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    #[must_use]
    pub fn match_count(&self) -> usize {
        match self {
            Self::Showing { matches, .. } => matches.len(),
            _ => 0,
        }
    }

    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        match self {
            Self::Showing { selected, .. } => Some(*selected),
            _ => None,
        }
    }
}

/// A popup widget for displaying file suggestions.
pub struct FileSuggestionPopup<'a> {
    state: &'a PopupState,
    /// The typed path (displayed in the title).
    query: &'a str,
    theme: &'a Theme,
}

impl<'a> FileSuggestionPopup<'a> {
    #[must_use]
    pub const fn new(state: &'a PopupState, query: &'a str, theme: &'a Theme) -> Self {
        Self {
            state,
            query,
            theme,
        }
    }

    /// Returns (width, height) in terminal cells, borders included.
    #[must_use]
    pub fn preferred_size(&self) -> (u16, u16) {
        let height = match self.state {
            PopupState::Hidden => 0,
            PopupState::Loading | PopupState::NoMatches => 3,
            PopupState::Showing { matches, .. } => {
                // MAX_POPUP_ROWS fits in u16
                #[allow(clippy::cast_possible_truncation)]
                let rows = matches.len().min(MAX_POPUP_ROWS) as u16;
                rows + 2
            }
        };
        (POPUP_WIDTH, height)
    }

    fn title(&self) -> String {
        if self.query.is_empty() {
            " Files ".to_string()
        } else {
            format!(" Files matching {} ", self.query)
        }
    }
}

impl Widget for FileSuggestionPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if matches!(self.state, PopupState::Hidden) {
            return;
        }

        Clear.render(area, buf);

        let block = Block::default()
            .title(self.title())
            .title_style(self.theme.header_style())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());

        let inner = block.inner(area);
        block.render(area, buf);

        match self.state {
            PopupState::Hidden => {}
            PopupState::Loading => {
                let text = Line::from("Searching...").style(self.theme.muted_style());
                Widget::render(text, inner, buf);
            }
            PopupState::NoMatches => {
                let text = Line::from("No matching files").style(self.theme.muted_style());
                Widget::render(text, inner, buf);
            }
            PopupState::Showing { matches, selected } => {
                let items: Vec<ListItem> = matches
                    .iter()
                    .enumerate()
                    .take(MAX_POPUP_ROWS)
                    .map(|(i, file_match)| {
                        let is_selected = i == *selected;
                        let style = if is_selected {
                            self.theme.highlight_style()
                        } else if file_match.is_data {
                            self.theme.normal_style()
                        } else {
                            self.theme.muted_style()
                        };
                        let prefix = if is_selected { "> " } else { "  " };
                        ListItem::new(Line::from(vec![
                            Span::styled(prefix, style),
                            Span::styled(file_match.path.display().to_string(), style),
                        ]))
                    })
                    .collect();

                Widget::render(List::new(items), inner, buf);
            }
        }
    }
}
