//! Editor updates for the App.
//!
//! Keystrokes and pastes land in the `tui-textarea` editors; afterwards the
//! edited text is copied into the session's input collector (single-record
//! fields) or used as the file search query (path fields).

use ratatui::crossterm::event::KeyEvent;

use super::{App, AppMode, SingleField};

/// Normalizes pasted text.
///
/// Line endings become `\n` and control characters other than newlines are
/// dropped. When `multiline` is false, newlines are replaced by spaces.
#[must_use]
pub fn normalize_paste(text: &str, multiline: bool) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    normalized
        .chars()
        .filter_map(|c| match c {
            '\n' if multiline => Some('\n'),
            '\n' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

impl App {
    /// Handles pasted text from bracketed paste mode.
    ///
    /// The text goes to the focused editor of the active mode. Only the body
    /// accepts newlines. Ignored while the settings panel is open.
    pub fn handle_paste(&mut self, text: &str) {
        if self.mode != AppMode::Main || text.is_empty() {
            return;
        }

        match self.active_slot() {
            None => {
                let multiline = self.editor.focus == SingleField::Body;
                let filtered = normalize_paste(text, multiline);
                self.editor.focused_single_mut().insert_str(&filtered);
                self.sync_single_input();
            }
            Some(slot) => {
                let filtered = normalize_paste(text.trim(), false);
                self.editor.path_mut(slot).insert_str(&filtered);
                self.refresh_path_search();
            }
        }
    }

    /// Sends a key to the focused single-record editor.
    pub(crate) fn edit_single(&mut self, key: KeyEvent) {
        self.editor.focused_single_mut().input(key);
        self.sync_single_input();
    }

    /// Inserts a newline in the body editor.
    pub(crate) fn insert_body_newline(&mut self) {
        self.editor.body.insert_newline();
        self.sync_single_input();
    }

    /// Sends a key to the active path editor and refreshes suggestions.
    pub(crate) fn edit_path(&mut self, key: KeyEvent) {
        let Some(slot) = self.active_slot() else {
            return;
        };
        if self.editor.path_mut(slot).input(key) {
            self.refresh_path_search();
        }
    }

    /// Copies the single-record editors into the session input.
    pub(crate) fn sync_single_input(&mut self) {
        let title = self.editor.title.lines().join(" ");
        let body = self.editor.body.lines().join("\n");
        let inputs = self.session.inputs_mut();
        inputs.set_title(title);
        inputs.set_body(body);
    }

    /// Searches for the text of the active path editor.
    pub(crate) fn refresh_path_search(&mut self) {
        let query = self.current_path_query();
        self.perform_file_search(&query);
    }
}
