//! Application state structures.
//!
//! - **`EditorState`**: the title/body editors and the file path editors
//!   with their suggestion popup
//! - **`SettingsState`**: request timeout and result retention, plus the
//!   per-run overrides from the command line
//! - **`LayoutState`** / **`ScrollState`**: layout cache and result panel
//!   scrolling

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::core::{DEFAULT_SERVER_URL, FileSlot, Mode, Settlement, SwitchPolicy};
use crate::file_search::SearchResult;
use crate::tui::widgets::{PopupState, visible_table_rows};

const TITLE_PLACEHOLDER: &str = "Title";
const BODY_PLACEHOLDER: &str = "Description";
const PATH_PLACEHOLDER: &str = "Type to search for a file...";

/// How long a request may run before it is reported as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestTimeout {
    Ten,
    #[default]
    Thirty,
    Sixty,
    TwoMinutes,
}

impl RequestTimeout {
    /// Cycles to the next option.
    #[must_use]
    pub fn next(&self) -> Self {
        match self {
            Self::Ten => Self::Thirty,
            Self::Thirty => Self::Sixty,
            Self::Sixty => Self::TwoMinutes,
            Self::TwoMinutes => Self::Ten,
        }
    }

    /// Returns the display name for this option.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ten => "10s",
            Self::Thirty => "30s",
            Self::Sixty => "60s",
            Self::TwoMinutes => "120s",
        }
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        match self {
            Self::Ten => Duration::from_secs(10),
            Self::Thirty => Duration::from_secs(30),
            Self::Sixty => Duration::from_secs(60),
            Self::TwoMinutes => Duration::from_secs(120),
        }
    }

    /// Returns all options in display order.
    #[must_use]
    pub const fn all() -> &'static [RequestTimeout] {
        &[Self::Ten, Self::Thirty, Self::Sixty, Self::TwoMinutes]
    }
}

/// Identifiers for settings items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    RequestTimeout,
    ResultsOnSwitch,
}

impl SettingsItem {
    /// Returns all settings items in display order.
    #[must_use]
    pub fn all() -> &'static [SettingsItem] {
        &[SettingsItem::RequestTimeout, SettingsItem::ResultsOnSwitch]
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RequestTimeout => "Request Timeout",
            Self::ResultsOnSwitch => "Results on Switch",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::RequestTimeout => "How long to wait for the service",
            Self::ResultsOnSwitch => "Keep or clear a mode's results when leaving it",
        }
    }
}

/// Events delivered to the UI loop by background tasks.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A dispatched request finished (or failed).
    Settled(Settlement),
    /// File search result received from background task.
    SearchResult {
        /// The generation of the search request (for cancellation).
        generation: u64,
        /// The search result containing matches.
        result: SearchResult,
    },
}

/// Query sent to the background file search task.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Text typed in the path editor.
    pub query: String,
    /// The working directory to search in.
    pub working_dir: PathBuf,
    /// Generation counter for cancellation.
    pub generation: u64,
}

/// Top-level screen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Mode tabs, input panel and results.
    #[default]
    Main,
    /// Settings panel overlay (Ctrl+S).
    Settings,
}

/// Which single-record field receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingleField {
    #[default]
    Title,
    Body,
}

impl SingleField {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Title => Self::Body,
            Self::Body => Self::Title,
        }
    }
}

fn textarea(placeholder: &str) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text(placeholder);
    textarea
}

/// Editors for every mode plus the file suggestion popup.
///
/// The editors hold what is on screen; the session's input collector holds
/// what will be submitted. They are kept in step by the event handlers.
pub struct EditorState {
    pub title: TextArea<'static>,
    pub body: TextArea<'static>,
    pub batch_path: TextArea<'static>,
    pub retrain_path: TextArea<'static>,
    pub focus: SingleField,
    /// File suggestion popup state.
    pub file_popup_state: PopupState,
    /// Last file search query.
    pub(crate) last_search_query: Option<String>,
    /// Channel sender for file search queries to background task.
    pub(crate) search_tx: mpsc::Sender<SearchQuery>,
    /// Current search generation (incremented for each new search).
    pub(crate) search_generation: u64,
}

impl EditorState {
    #[must_use]
    pub fn new(search_tx: mpsc::Sender<SearchQuery>) -> Self {
        Self {
            title: textarea(TITLE_PLACEHOLDER),
            body: textarea(BODY_PLACEHOLDER),
            batch_path: textarea(PATH_PLACEHOLDER),
            retrain_path: textarea(PATH_PLACEHOLDER),
            focus: SingleField::default(),
            file_popup_state: PopupState::default(),
            last_search_query: None,
            search_tx,
            search_generation: 0,
        }
    }

    /// Returns the editor of the focused single-record field.
    pub fn focused_single_mut(&mut self) -> &mut TextArea<'static> {
        match self.focus {
            SingleField::Title => &mut self.title,
            SingleField::Body => &mut self.body,
        }
    }

    #[must_use]
    pub fn path(&self, slot: FileSlot) -> &TextArea<'static> {
        match slot {
            FileSlot::Batch => &self.batch_path,
            FileSlot::Retrain => &self.retrain_path,
        }
    }

    pub fn path_mut(&mut self, slot: FileSlot) -> &mut TextArea<'static> {
        match slot {
            FileSlot::Batch => &mut self.batch_path,
            FileSlot::Retrain => &mut self.retrain_path,
        }
    }

    /// Returns the text of a path editor with surrounding whitespace removed.
    #[must_use]
    pub fn path_text(&self, slot: FileSlot) -> String {
        self.path(slot).lines().join("").trim().to_string()
    }

    /// Replaces the content of a path editor, leaving the cursor at the end.
    pub fn set_path_text(&mut self, slot: FileSlot, text: &str) {
        let mut editor = TextArea::new(vec![text.to_string()]);
        editor.set_placeholder_text(PATH_PLACEHOLDER);
        editor.move_cursor(tui_textarea::CursorMove::End);
        *self.path_mut(slot) = editor;
    }

    /// Clears the editors owned by `mode`.
    pub fn reset_mode(&mut self, mode: Mode) {
        match FileSlot::for_mode(mode) {
            None => {
                self.title = textarea(TITLE_PLACEHOLDER);
                self.body = textarea(BODY_PLACEHOLDER);
                self.focus = SingleField::Title;
            }
            Some(slot) => {
                *self.path_mut(slot) = textarea(PATH_PLACEHOLDER);
            }
        }
    }

    /// Hides the suggestion popup.
    pub fn dismiss_popup(&mut self) {
        self.file_popup_state = PopupState::Hidden;
        self.last_search_query = None;
    }
}

/// State for the settings panel.
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// Currently selected index in the settings list.
    pub selected_index: usize,
    /// Service address stored in the settings file.
    pub server_url: String,
    pub request_timeout: RequestTimeout,
    pub results_on_switch: SwitchPolicy,
    /// `--server-url` for this run; never saved.
    pub server_url_override: Option<String>,
    /// `--timeout` for this run; never saved. Cleared when the timeout is
    /// changed in the panel.
    pub timeout_override: Option<Duration>,
    /// Previous mode to return to when closing settings.
    pub previous_mode: Option<AppMode>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            selected_index: 0,
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: RequestTimeout::default(),
            results_on_switch: SwitchPolicy::default(),
            server_url_override: None,
            timeout_override: None,
            previous_mode: None,
        }
    }
}

impl SettingsState {
    /// Returns the service address in use for this run.
    #[must_use]
    pub fn effective_server_url(&self) -> &str {
        self.server_url_override
            .as_deref()
            .unwrap_or(&self.server_url)
    }

    /// Returns the request timeout in use for this run.
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        self.timeout_override
            .unwrap_or_else(|| self.request_timeout.duration())
    }

    /// Returns the timeout as shown in the settings panel.
    #[must_use]
    pub fn timeout_label(&self) -> String {
        match self.timeout_override {
            Some(timeout) => format!("{}s (--timeout)", timeout.as_secs()),
            None => self.request_timeout.name().to_string(),
        }
    }
}

/// Dynamic layout tracking state.
///
/// Stores the [`MainLayout`] calculated once per frame so scrolling and
/// rendering agree on panel sizes.
///
/// [`MainLayout`]: crate::app::MainLayout
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutState {
    pub main: crate::app::MainLayout,
}

impl LayoutState {
    /// Returns the number of table rows visible in the results panel.
    #[must_use]
    pub fn results_visible_rows(&self, has_metrics: bool) -> usize {
        visible_table_rows(self.main.results_inner_height, has_metrics)
    }
}

/// Scroll state for a panel.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    /// Index of the first visible row.
    pub offset: usize,
}

impl ScrollState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scrolls back to the first row.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, content_len: usize, visible_height: usize) {
        let max_scroll = content_len.saturating_sub(visible_height);
        self.offset = (self.offset + 1).min(max_scroll);
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.offset = self.offset.saturating_sub(page_size);
    }

    pub fn page_down(&mut self, content_len: usize, visible_height: usize, page_size: usize) {
        let max_scroll = content_len.saturating_sub(visible_height);
        self.offset = (self.offset + page_size).min(max_scroll);
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self, content_len: usize, visible_height: usize) {
        self.offset = content_len.saturating_sub(visible_height);
    }

    /// Pulls the offset back inside the content, e.g. after it shrank.
    pub fn clamp(&mut self, content_len: usize, visible_height: usize) {
        self.offset = self.offset.min(content_len.saturating_sub(visible_height));
    }
}
