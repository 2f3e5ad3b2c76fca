//! Main screen rendering.
//!
//! Header with mode tabs, the input panel of the active mode, the status
//! line, the result panel, the footer, and the file suggestion popup.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use tui_textarea::TextArea;

use crate::app::{App, SingleField};
use crate::core::{FileSlot, Mode};
use crate::file_search::DATA_EXTENSIONS;
use crate::tui::widgets::{FileSuggestionPopup, ResultsWidget, StatusIndicatorWidget};

impl App {
    /// Renders the main screen from the layout cached by `update_layout()`.
    pub(crate) fn render_main(&self, frame: &mut Frame) {
        let layout = self.layout.main;
        let view = self.session.view();

        self.render_header(frame, layout.header);
        let path_area = self.render_input(frame, layout.input);

        let status = StatusIndicatorWidget::new(&view, self.notice.as_deref(), &self.theme);
        frame.render_widget(status, layout.status);

        let results = ResultsWidget::new(&view, self.results_scroll.offset, &self.theme);
        frame.render_widget(results, layout.results);

        self.render_footer(frame, layout.footer);

        if let Some(area) = path_area
            && self.should_show_file_popup()
        {
            self.render_file_popup(frame, area);
        }
    }

    /// Renders the application name, one tab per mode and the service address.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let active = self.session.active_mode();
        let mut spans = vec![Span::styled(" textclf ", self.theme.header_style())];

        for mode in Mode::all() {
            let pending = if self.session.is_pending(*mode) { "*" } else { "" };
            let label = format!(" F{} {}{pending} ", mode.hotkey(), mode.name());
            let style = if *mode == active {
                self.theme.active_tab_style()
            } else {
                self.theme.muted_style()
            };
            spans.push(Span::styled(label, style));
        }

        spans.push(Span::styled(" │ ", self.theme.muted_style()));
        spans.push(Span::styled(
            self.settings.effective_server_url().to_string(),
            self.theme.muted_style(),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Renders the editors of the active mode.
    ///
    /// Returns the path editor area in file modes (for popup placement).
    fn render_input(&self, frame: &mut Frame, area: Rect) -> Option<Rect> {
        match FileSlot::for_mode(self.session.active_mode()) {
            None => {
                self.render_single_input(frame, area);
                None
            }
            Some(slot) => Some(self.render_file_input(frame, area, slot)),
        }
    }

    fn render_single_input(&self, frame: &mut Frame, area: Rect) {
        let [title_area, body_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

        let focus = self.editor.focus;
        self.render_editor(
            frame,
            title_area,
            &self.editor.title,
            " Title ",
            focus == SingleField::Title,
        );
        self.render_editor(
            frame,
            body_area,
            &self.editor.body,
            " Description ",
            focus == SingleField::Body,
        );
    }

    fn render_file_input(&self, frame: &mut Frame, area: Rect, slot: FileSlot) -> Rect {
        let [path_area, selected_area, hint_area, _] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        let title = match slot {
            FileSlot::Batch => " File to classify ",
            FileSlot::Retrain => " Labeled training file ",
        };
        self.render_editor(frame, path_area, self.editor.path(slot), title, true);

        let selected = match self.session.inputs().file(slot) {
            Some(file) => Line::from(vec![
                Span::styled(" Selected: ", self.theme.muted_style()),
                Span::styled(file.file_name(), self.theme.success_style()),
                Span::styled(
                    format!("  ({})", file.path().display()),
                    self.theme.muted_style(),
                ),
            ]),
            None => Line::from(Span::styled(" No file selected", self.theme.muted_style())),
        };
        frame.render_widget(Paragraph::new(selected), selected_area);

        let extensions = DATA_EXTENSIONS
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(" ");
        let hint = Line::from(Span::styled(
            format!(" Delimited text ({extensions}), fields separated by ';'"),
            self.theme.muted_style(),
        ));
        frame.render_widget(Paragraph::new(hint), hint_area);

        path_area
    }

    /// Draws a clone of `editor` inside a titled border.
    fn render_editor(
        &self,
        frame: &mut Frame,
        area: Rect,
        editor: &TextArea<'static>,
        title: &str,
        focused: bool,
    ) {
        let border_style = if focused {
            self.theme.highlight_style()
        } else {
            self.theme.border_style()
        };
        let block = Block::bordered()
            .title(title.to_string())
            .title_style(self.theme.header_style())
            .border_style(border_style);

        let mut textarea = editor.clone();
        textarea.set_block(block);
        textarea.set_style(self.theme.normal_style());
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_style(self.theme.placeholder_style());
        if !focused {
            textarea.set_cursor_style(Style::default());
        }
        frame.render_widget(&textarea, area);
    }

    /// Renders the footer with key hints (single line).
    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints: &[(&str, &str)] = if self.should_show_file_popup() {
            &[("↑/↓", "Navigate"), ("Tab/Enter", "Select"), ("Esc", "Dismiss")]
        } else if self.session.errors().is_set() {
            &[("Esc", "Dismiss error"), ("F1-F3", "Mode"), ("Ctrl+C", "Quit")]
        } else if self.active_slot().is_some() {
            &[
                ("Enter", "Use path"),
                ("Ctrl+U", "Clear"),
                ("Ctrl+D", "Submit"),
                ("F1-F3", "Mode"),
                ("Ctrl+S", "Settings"),
                ("Ctrl+C", "Quit"),
            ]
        } else {
            &[
                ("Tab", "Field"),
                ("Enter", "Next/Submit"),
                ("F1-F3", "Mode"),
                ("Ctrl+S", "Settings"),
                ("Ctrl+C", "Quit"),
            ]
        };

        let mut spans = Vec::with_capacity(hints.len() * 2);
        for (key, action) in hints {
            spans.push(Span::styled(format!(" [{key}] "), self.theme.highlight_style()));
            spans.push(Span::styled(*action, self.theme.muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    // =========================================================================
    // File Suggestion Popup Rendering
    // =========================================================================

    /// Calculates where the popup goes: below the anchor row if there is
    /// room, otherwise above, kept on screen horizontally.
    fn calculate_popup_position(
        anchor_x: u16,
        anchor_y: u16,
        popup_width: u16,
        popup_height: u16,
        screen: Rect,
    ) -> Rect {
        let below_space = screen.height.saturating_sub(anchor_y + 1);
        let above_space = anchor_y;

        let y = if below_space >= popup_height {
            anchor_y + 1
        } else if above_space >= popup_height {
            anchor_y.saturating_sub(popup_height)
        } else if below_space >= above_space {
            anchor_y + 1
        } else {
            anchor_y.saturating_sub(popup_height.min(above_space))
        };

        let x = if anchor_x + popup_width <= screen.width {
            anchor_x
        } else {
            screen.width.saturating_sub(popup_width)
        };

        let actual_height = popup_height.min(screen.height.saturating_sub(y));
        Rect::new(x, y, popup_width, actual_height)
    }

    /// Renders the file suggestion popup under the path editor.
    fn render_file_popup(&self, frame: &mut Frame, path_area: Rect) {
        let query = self.current_path_query();
        let popup = FileSuggestionPopup::new(&self.editor.file_popup_state, &query, &self.theme);

        let (popup_width, popup_height) = popup.preferred_size();
        if popup_height == 0 {
            return;
        }

        // Anchor on the bottom border of the path editor.
        let anchor_x = path_area.x + 1;
        let anchor_y = path_area.y + path_area.height.saturating_sub(1);
        let popup_area = Self::calculate_popup_position(
            anchor_x,
            anchor_y,
            popup_width,
            popup_height,
            frame.area(),
        )
        .intersection(frame.area());

        frame.render_widget(popup, popup_area);
    }
}
