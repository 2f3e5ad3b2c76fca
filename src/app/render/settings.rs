//! Settings panel rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, SettingsItem};

impl App {
    /// Renders the settings panel as a centered overlay.
    pub(crate) fn render_settings(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_width = 60u16.min(area.width);
        let popup_height = 14u16.min(area.height);
        let x = area.width.saturating_sub(popup_width) / 2;
        let y = area.height.saturating_sub(popup_height) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let items = SettingsItem::all();
        let mut content_lines = vec![
            Line::from(Span::styled("textclf Settings", self.theme.header_style())),
            Line::from(vec![
                Span::styled("Service: ", self.theme.muted_style()),
                Span::styled(
                    self.settings.effective_server_url().to_string(),
                    self.theme.normal_style(),
                ),
            ]),
            Line::from(""),
        ];

        for (i, item) in items.iter().enumerate() {
            let is_selected = i == self.settings.selected_index;
            let prefix = if is_selected { "› " } else { "  " };

            let value = match item {
                SettingsItem::RequestTimeout => self.settings.timeout_label(),
                SettingsItem::ResultsOnSwitch => self.settings.results_on_switch.name().to_string(),
            };

            let (label_style, value_style) = if is_selected {
                (self.theme.highlight_style(), self.theme.highlight_style())
            } else {
                (self.theme.normal_style(), self.theme.muted_style())
            };
            content_lines.push(Line::from(vec![
                Span::styled(prefix, label_style),
                Span::styled(format!("{:<20}", item.label()), label_style),
                Span::styled(format!("[{value}]"), value_style),
            ]));
        }

        // Description of the selected item
        content_lines.push(Line::from(""));
        if let Some(item) = items.get(self.settings.selected_index) {
            content_lines.push(Line::from(Span::styled(
                item.description(),
                self.theme.muted_style(),
            )));
        }
        content_lines.push(Line::from(""));

        content_lines.push(Line::from(vec![
            Span::styled("[↑/↓] ", self.theme.highlight_style()),
            Span::styled("Navigate  ", self.theme.muted_style()),
            Span::styled("[Enter] ", self.theme.highlight_style()),
            Span::styled("Change  ", self.theme.muted_style()),
            Span::styled("[Esc] ", self.theme.highlight_style()),
            Span::styled("Save & close", self.theme.muted_style()),
        ]));

        let block = Block::default()
            .title(" Settings ")
            .title_style(self.theme.header_style())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());

        let paragraph = Paragraph::new(content_lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Left);

        frame.render_widget(paragraph, popup_area);
    }
}
