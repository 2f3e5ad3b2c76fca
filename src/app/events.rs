//! Event handling logic for the App.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::App;
use crate::app::state::SettingsItem;
use crate::app::{AppEvent, AppMode, SingleField};
use crate::core::{Applied, Mode};
use crate::file_search::SearchResult;
use crate::fs::PersistedSettings;
use crate::tui::widgets::PopupState;

/// Scroll page size for the result panel.
const SCROLL_PAGE_SIZE: usize = 10;

impl App {
    /// Handles a key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            AppMode::Main => self.handle_main_key(key),
            AppMode::Settings => self.handle_settings_key(key),
        }
    }

    /// Opens the settings panel.
    pub(crate) fn open_settings(&mut self) {
        if self.mode == AppMode::Settings {
            return;
        }
        self.settings.previous_mode = Some(self.mode);
        self.settings.selected_index = 0;
        self.mode = AppMode::Settings;
    }

    /// Closes the settings panel, saving it to `<config>/settings.json`.
    pub(crate) fn close_settings(&mut self) {
        let persisted = PersistedSettings::from(&self.settings);
        match self.paths.save_settings(&persisted) {
            Ok(()) => tracing::debug!(path = %self.paths.settings_file().display(), "settings saved"),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to save settings");
                self.notice = Some(format!("Failed to save settings: {e:#}"));
            }
        }

        self.settings.previous_mode = None;
        self.mode = AppMode::Main;
    }

    /// Handles key events on the main screen.
    ///
    /// Priorities:
    /// 1. Global shortcuts (quit, settings, mode switch, submit)
    /// 2. File popup navigation (when visible)
    /// 3. Esc clears the error
    /// 4. Result scrolling
    /// 5. Editing of the active mode's input
    fn handle_main_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Priority 1: global shortcuts
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.quit();
                return;
            }
            KeyCode::Char('s') if ctrl => {
                self.open_settings();
                return;
            }
            KeyCode::F(n) => {
                if let Some(mode) = Mode::from_hotkey(n) {
                    self.switch_mode(mode);
                } else if n == 5 {
                    self.submit();
                }
                return;
            }
            KeyCode::BackTab => {
                self.switch_mode(self.session.active_mode().next());
                return;
            }
            KeyCode::Char('d') if ctrl => {
                self.submit();
                return;
            }
            KeyCode::Enter if ctrl => {
                self.submit();
                return;
            }
            _ => {}
        }

        // Priority 2: file popup
        if self.should_show_file_popup() {
            match key.code {
                KeyCode::Up => {
                    self.file_popup_up();
                    return;
                }
                KeyCode::Down => {
                    self.file_popup_down();
                    return;
                }
                KeyCode::Tab | KeyCode::Enter if self.has_file_matches() => {
                    self.select_file_from_popup();
                    return;
                }
                KeyCode::Esc => {
                    self.editor.dismiss_popup();
                    return;
                }
                _ => {}
            }
        }

        // Priority 3: Esc dismisses the error
        if key.code == KeyCode::Esc {
            self.session.dismiss_error();
            return;
        }

        // Priority 4: result scrolling
        match key.code {
            KeyCode::PageUp => {
                self.results_scroll.page_up(SCROLL_PAGE_SIZE);
                return;
            }
            KeyCode::PageDown => {
                let rows = self.result_row_count();
                self.results_scroll
                    .page_down(rows, self.result_visible_rows(), SCROLL_PAGE_SIZE);
                return;
            }
            KeyCode::Up if ctrl => {
                self.results_scroll.scroll_up();
                return;
            }
            KeyCode::Down if ctrl => {
                let rows = self.result_row_count();
                self.results_scroll
                    .scroll_down(rows, self.result_visible_rows());
                return;
            }
            KeyCode::Home if ctrl => {
                self.results_scroll.scroll_to_top();
                return;
            }
            KeyCode::End if ctrl => {
                let rows = self.result_row_count();
                self.results_scroll
                    .scroll_to_bottom(rows, self.result_visible_rows());
                return;
            }
            _ => {}
        }

        // Priority 5: editing
        match self.active_slot() {
            None => self.handle_single_key(key),
            Some(_) => self.handle_file_key(key),
        }
    }

    /// Editing keys of the single-record mode.
    ///
    /// - `Tab` toggles between title and body
    /// - `Enter` in the title moves to the body
    /// - `Enter` in the body submits; `Shift+Enter` / `Alt+Enter` insert a newline
    fn handle_single_key(&mut self, key: KeyEvent) {
        let newline = key
            .modifiers
            .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);

        match (key.code, self.editor.focus) {
            (KeyCode::Tab, focus) => {
                self.editor.focus = focus.toggle();
            }
            (KeyCode::Enter, SingleField::Title) => {
                self.editor.focus = SingleField::Body;
            }
            (KeyCode::Enter, SingleField::Body) if newline => {
                self.insert_body_newline();
            }
            (KeyCode::Enter, SingleField::Body) => {
                self.submit();
            }
            _ => self.edit_single(key),
        }
    }

    /// Editing keys of the file-based modes.
    ///
    /// - `Enter` puts the typed path into the file slot
    /// - `Ctrl+U` empties the file slot
    fn handle_file_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.confirm_typed_path(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear_file_slot();
            }
            KeyCode::Tab => self.refresh_path_search(),
            _ => self.edit_path(key),
        }
    }

    /// Handles key events in the settings panel.
    fn handle_settings_key(&mut self, key: KeyEvent) {
        let max_index = SettingsItem::all().len().saturating_sub(1);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('p') if ctrl => {
                self.settings.selected_index = self.settings.selected_index.saturating_sub(1);
            }
            KeyCode::Char('n') if ctrl => {
                self.settings.selected_index = (self.settings.selected_index + 1).min(max_index);
            }
            // Ctrl+C in settings closes settings instead of quitting
            KeyCode::Char('c') if ctrl => {
                self.close_settings();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.settings.selected_index = self.settings.selected_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.settings.selected_index = (self.settings.selected_index + 1).min(max_index);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.cycle_current_setting();
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.close_settings();
            }
            _ => {}
        }
    }

    /// Cycles the selected setting and applies it to the session.
    fn cycle_current_setting(&mut self) {
        let Some(item) = SettingsItem::all().get(self.settings.selected_index) else {
            return;
        };

        match item {
            SettingsItem::RequestTimeout => {
                self.settings.request_timeout = if self.settings.timeout_override.is_some() {
                    self.settings.request_timeout
                } else {
                    self.settings.request_timeout.next()
                };
                self.settings.timeout_override = None;
                self.session.set_timeout(self.settings.effective_timeout());
            }
            SettingsItem::ResultsOnSwitch => {
                self.settings.results_on_switch = self.settings.results_on_switch.next();
                self.session.set_policy(self.settings.results_on_switch);
            }
        }
    }

    /// Drains events from background tasks.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::Settled(settlement) => {
                    if let Applied::Stored { mode, cleared } = self.session.apply(settlement) {
                        if let Some(sent) = cleared {
                            self.clear_sent_editor(&sent);
                        }
                        if mode == self.session.active_mode() {
                            self.results_scroll.reset();
                        }
                    }
                }
                AppEvent::SearchResult { generation, result } => {
                    self.handle_search_result(generation, result);
                }
            }
        }
    }

    /// Applies a file search result if it belongs to the latest query.
    fn handle_search_result(&mut self, generation: u64, result: SearchResult) {
        if generation != self.editor.search_generation
            || matches!(self.editor.file_popup_state, PopupState::Hidden)
        {
            return;
        }

        let matches = result.matches;
        self.editor.file_popup_state = if matches.is_empty() {
            PopupState::NoMatches
        } else {
            let selected = match &self.editor.file_popup_state {
                PopupState::Showing { selected, .. } => {
                    (*selected).min(matches.len().saturating_sub(1))
                }
                _ => 0,
            };
            PopupState::Showing { matches, selected }
        };
    }
}
