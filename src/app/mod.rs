//! Main application state and logic.
//!
//! The [`App`] owns the interaction [`Session`] and everything the terminal
//! needs around it, organized into submodules:
//! - `events` - key handling, settings panel, background event processing
//! - `input` - editor updates and paste handling
//! - `layout` - panel geometry
//! - `render` - drawing
//! - `state` - state structures
//!
//! ## Screens
//!
//! - **`Main`**: mode tabs, the input panel of the active mode, a status line
//!   and the result panel.
//! - **`Settings`**: overlay for request timeout and result retention
//!   (Ctrl+S). Changes apply immediately and are saved on close.

pub mod events;
mod input;
mod layout;
mod render;
pub mod state;

#[cfg(test)]
mod tests;

pub use input::normalize_paste;
pub use layout::{INPUT_PANEL_HEIGHT, MainLayout, calculate_main_layout};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::core::{
    ClassificationService, FileRef, FileSlot, HttpClassificationService, Mode, SentInput,
    Session, SubmitOutcome,
};
use crate::file_search::FileMatch;
use crate::fs::AppPaths;
use crate::tui::Theme;
use crate::tui::widgets::PopupState;

pub use self::state::{
    AppEvent, AppMode, EditorState, LayoutState, RequestTimeout, ScrollState, SearchQuery,
    SettingsItem, SettingsState, SingleField,
};

/// Channel buffer size for app events.
const EVENT_CHANNEL_SIZE: usize = 256;

/// Values from the command line that take precedence over saved settings
/// for this run.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub timeout: Option<Duration>,
}

/// Main application state.
pub struct App {
    /// Configuration paths (settings and log file).
    pub(crate) paths: AppPaths,
    /// Modes, inputs, results, errors and the request dispatcher.
    pub(crate) session: Session,
    pub(crate) theme: Theme,
    /// Current screen.
    pub(crate) mode: AppMode,
    should_quit: bool,

    /// Receives settlements and search results from background tasks.
    event_rx: mpsc::Receiver<AppEvent>,

    pub(crate) editor: EditorState,
    pub(crate) settings: SettingsState,
    pub(crate) results_scroll: ScrollState,
    pub(crate) layout: LayoutState,
    /// Non-request warnings (settings load/save failures).
    pub(crate) notice: Option<String>,
    /// Directory the file picker searches and relative paths resolve
    /// against.
    pub(crate) working_dir: PathBuf,
}

/// Spawns a background task that handles file search queries.
///
/// Runs `search_files` on the blocking pool (the `ignore` walker is
/// blocking) and reports back with the query's generation so stale results
/// can be ignored.
fn spawn_search_task(mut search_rx: mpsc::Receiver<SearchQuery>, event_tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        while let Some(query) = search_rx.recv().await {
            let SearchQuery {
                query,
                working_dir,
                generation,
            } = query;

            let search_result = tokio::task::spawn_blocking(move || {
                crate::file_search::search_files(&query, &working_dir)
            })
            .await;

            match search_result {
                Ok(result) => {
                    if result.had_errors {
                        tracing::debug!(
                            inaccessible_dirs = result.inaccessible_dirs,
                            "file search skipped some entries"
                        );
                    }
                    let _ = event_tx
                        .send(AppEvent::SearchResult { generation, result })
                        .await;
                }
                Err(e) => tracing::warn!(error = %e, "file search task failed"),
            }
        }
    });
}

impl App {
    /// Creates the application from saved settings and command-line
    /// overrides, talking to the service over HTTP.
    ///
    /// A settings file that cannot be read is reported in the UI and the
    /// defaults are used. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn new(paths: AppPaths, overrides: Overrides) -> Self {
        let mut settings = SettingsState::default();
        let mut notice = None;
        match paths.load_settings() {
            Ok(persisted) => persisted.apply_to(&mut settings),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to load settings");
                notice = Some(format!("Failed to load settings: {e:#}"));
            }
        }
        settings.server_url_override = overrides.server_url;
        settings.timeout_override = overrides.timeout;

        let service = Arc::new(HttpClassificationService::new(
            settings.effective_server_url(),
        ));
        tracing::info!(
            server_url = service.base_url(),
            timeout = ?settings.effective_timeout(),
            "starting session"
        );
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let mut app = Self::with_service(paths, settings, service, working_dir);
        app.notice = notice;
        app
    }

    /// Creates the application around an arbitrary service.
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn with_service(
        paths: AppPaths,
        settings: SettingsState,
        service: Arc<dyn ClassificationService>,
        working_dir: PathBuf,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
        let (search_tx, search_rx) = mpsc::channel(16);
        spawn_search_task(search_rx, event_tx.clone());
        Self::assemble(paths, settings, service, working_dir, (event_tx, event_rx), search_tx)
    }

    fn assemble(
        paths: AppPaths,
        settings: SettingsState,
        service: Arc<dyn ClassificationService>,
        working_dir: PathBuf,
        (event_tx, event_rx): (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>),
        search_tx: mpsc::Sender<SearchQuery>,
    ) -> Self {
        let mut session = Session::new(service, event_tx);
        session.set_timeout(settings.effective_timeout());
        session.set_policy(settings.results_on_switch);

        Self {
            paths,
            session,
            theme: Theme::default(),
            mode: AppMode::Main,
            should_quit: false,
            event_rx,
            editor: EditorState::new(search_tx),
            settings,
            results_scroll: ScrollState::new(),
            layout: LayoutState::default(),
            notice: None,
            working_dir,
        }
    }

    /// Returns true if the application should quit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Calculates and caches the layout for this frame.
    pub fn update_layout(&mut self, terminal_area: Rect) {
        self.layout.main = calculate_main_layout(terminal_area);
    }

    /// Cancels in-flight requests and asks the main loop to stop.
    pub(crate) fn quit(&mut self) {
        self.session.cancel_all();
        self.should_quit = true;
    }

    // =========================================================================
    // Modes and submission
    // =========================================================================

    /// Returns the file slot of the active mode, if it has one.
    #[must_use]
    pub fn active_slot(&self) -> Option<FileSlot> {
        FileSlot::for_mode(self.session.active_mode())
    }

    /// Switches the active mode. In-flight requests keep running.
    pub(crate) fn switch_mode(&mut self, mode: Mode) {
        let previous = self.session.set_mode(mode);
        if previous != mode {
            tracing::debug!(from = previous.name(), to = mode.name(), "mode switched");
            self.editor.dismiss_popup();
            self.results_scroll.reset();
        }
    }

    /// Submits the active mode's input.
    pub(crate) fn submit(&mut self) -> SubmitOutcome {
        self.editor.dismiss_popup();
        self.session.submit()
    }

    /// Number of result rows of the active mode.
    pub(crate) fn result_row_count(&self) -> usize {
        self.session
            .results()
            .prediction(self.session.active_mode())
            .map_or(0, |prediction| prediction.len())
    }

    /// Number of result rows visible at once for the active mode.
    ///
    /// Retrain results give up one line to the metrics.
    pub(crate) fn result_visible_rows(&self) -> usize {
        let has_metrics = self.session.active_mode() == Mode::Retrain
            && self.session.results().metrics().is_some();
        self.layout.results_visible_rows(has_metrics)
    }

    // =========================================================================
    // File Search Integration
    // =========================================================================

    /// Sends a search for `query` to the background task.
    ///
    /// Results arrive as `AppEvent::SearchResult` and are applied in
    /// `process_events` only if their generation is still current.
    pub(crate) fn perform_file_search(&mut self, query: &str) {
        if self.editor.last_search_query.as_deref() != Some(query)
            && let PopupState::Showing { selected, .. } = &mut self.editor.file_popup_state
        {
            *selected = 0;
        }

        self.editor.last_search_query = Some(query.to_string());
        self.editor.search_generation = self.editor.search_generation.wrapping_add(1);
        self.editor.file_popup_state = PopupState::Loading;

        let search_query = SearchQuery {
            query: query.to_string(),
            working_dir: self.working_dir.clone(),
            generation: self.editor.search_generation,
        };
        // A full channel only delays suggestions; the next keystroke searches again.
        let _ = self.editor.search_tx.try_send(search_query);
    }

    /// Returns the text typed in the active path editor.
    #[must_use]
    pub fn current_path_query(&self) -> String {
        self.active_slot()
            .map(|slot| self.editor.path_text(slot))
            .unwrap_or_default()
    }

    /// Returns true if the file suggestion popup should be shown.
    #[must_use]
    pub fn should_show_file_popup(&self) -> bool {
        if self.active_slot().is_none() {
            return false;
        }
        match &self.editor.file_popup_state {
            PopupState::Hidden => false,
            PopupState::Loading | PopupState::NoMatches => true,
            PopupState::Showing { matches, .. } => !matches.is_empty(),
        }
    }

    pub(crate) fn file_popup_up(&mut self) {
        if let PopupState::Showing { selected, .. } = &mut self.editor.file_popup_state {
            *selected = selected.saturating_sub(1);
        }
    }

    pub(crate) fn file_popup_down(&mut self) {
        if let PopupState::Showing { matches, selected } = &mut self.editor.file_popup_state {
            let max_index = matches.len().saturating_sub(1);
            *selected = (*selected + 1).min(max_index);
        }
    }

    /// Returns the currently selected file match, if any.
    #[must_use]
    pub fn selected_file_match(&self) -> Option<&FileMatch> {
        if let PopupState::Showing { matches, selected } = &self.editor.file_popup_state {
            matches.get(*selected)
        } else {
            None
        }
    }

    /// Returns true if the popup has matches that can be selected.
    #[must_use]
    pub fn has_file_matches(&self) -> bool {
        matches!(
            &self.editor.file_popup_state,
            PopupState::Showing { matches, .. } if !matches.is_empty()
        )
    }

    // =========================================================================
    // File Selection
    // =========================================================================

    /// Puts the highlighted suggestion into the active file slot.
    pub(crate) fn select_file_from_popup(&mut self) {
        let Some(slot) = self.active_slot() else {
            return;
        };
        let Some(path) = self.selected_file_match().map(|m| m.path.clone()) else {
            return;
        };
        self.editor.set_path_text(slot, &path.display().to_string());
        self.choose_file(slot, path);
        self.editor.dismiss_popup();
    }

    /// Puts the typed path into the active file slot.
    ///
    /// The file is not opened here; an unreadable path is reported when the
    /// request is submitted.
    pub(crate) fn confirm_typed_path(&mut self) {
        let Some(slot) = self.active_slot() else {
            return;
        };
        let text = self.editor.path_text(slot);
        if text.is_empty() {
            return;
        }
        self.choose_file(slot, PathBuf::from(text));
        self.editor.dismiss_popup();
    }

    /// Empties the active file slot and its editor.
    pub(crate) fn clear_file_slot(&mut self) {
        let Some(slot) = self.active_slot() else {
            return;
        };
        self.session.inputs_mut().clear_file(slot);
        self.editor.reset_mode(slot.mode());
        self.editor.dismiss_popup();
    }

    /// Empties the editor `sent` was taken from once the session has
    /// cleared that input.
    ///
    /// A path typed after submitting refers to another file and stays.
    pub(crate) fn clear_sent_editor(&mut self, sent: &SentInput) {
        match sent {
            SentInput::Single(_) => self.editor.reset_mode(Mode::Single),
            SentInput::File(slot, file) => {
                let typed = self.resolve_path(PathBuf::from(self.editor.path_text(*slot)));
                if typed == file.path() {
                    self.editor.reset_mode(slot.mode());
                }
            }
        }
    }

    /// Interprets `path` relative to the working directory.
    fn resolve_path(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path
        } else {
            self.working_dir.join(path)
        }
    }

    fn choose_file(&mut self, slot: FileSlot, path: PathBuf) {
        let path = self.resolve_path(path);
        tracing::debug!(slot = ?slot, path = %path.display(), "file selected");
        self.session
            .inputs_mut()
            .select_file(slot, FileRef::new(path));
    }
}
