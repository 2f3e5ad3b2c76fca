//! Custom TUI widgets.

pub mod file_popup;
pub mod results;
pub mod status_indicator;

pub use file_popup::{FileSuggestionPopup, MAX_POPUP_ROWS, PopupState};
pub use results::{ResultsWidget, visible_table_rows};
pub use status_indicator::StatusIndicatorWidget;
