//! Compact status indicator widget above the result panel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::core::View;
use crate::tui::Theme;

/// A compact 2-line status indicator.
///
/// Line 1 shows the error whenever one is set, otherwise what the active
/// mode is doing (request in flight, results, idle). Line 2 carries the
/// settings notice or a hint; with an error set it also names a request
/// still in flight.
pub struct StatusIndicatorWidget<'a> {
    view: &'a View,
    /// Warning not tied to a request (settings load/save failures).
    notice: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusIndicatorWidget<'a> {
    #[must_use]
    pub const fn new(view: &'a View, notice: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            view,
            notice,
            theme,
        }
    }

    fn icon(&self) -> &'static str {
        if self.view.error.is_some() {
            "✗"
        } else if self.view.pending {
            "▶"
        } else if self.view.has_results() {
            "✓"
        } else {
            "·"
        }
    }

    fn icon_style(&self) -> Style {
        if self.view.error.is_some() {
            self.theme.error_style()
        } else if self.view.pending {
            self.theme.highlight_style()
        } else if self.view.has_results() {
            self.theme.success_style()
        } else {
            self.theme.muted_style()
        }
    }

    /// Gets the primary status text for line 1.
    fn primary_status(&self) -> String {
        if let Some(error) = &self.view.error {
            return format!("{}: {}", error.kind.label(), error.text);
        }
        if self.view.pending {
            return self.pending_text();
        }
        match self.view.rows.len() {
            0 if self.view.metrics.is_some() => "Model retrained".to_string(),
            0 => "Waiting for input".to_string(),
            1 => "1 prediction".to_string(),
            n => format!("{n} predictions"),
        }
    }

    fn pending_text(&self) -> String {
        format!("{} in progress...", self.view.mode.action())
    }

    /// Gets the secondary status text for line 2.
    fn secondary_status(&self) -> String {
        if let Some(notice) = self.notice {
            return notice.to_string();
        }
        match (&self.view.error, self.view.pending) {
            (Some(_), true) => return format!("{} · Esc to dismiss", self.pending_text()),
            (Some(_), false) => return "Esc to dismiss".to_string(),
            (None, _) => {}
        }
        self.view.mode.description().to_string()
    }

    fn primary_style(&self) -> Style {
        if self.view.error.is_some() {
            self.theme.error_style()
        } else if self.view.pending || self.view.has_results() {
            self.theme.normal_style()
        } else {
            self.theme.muted_style()
        }
    }
}

impl Widget for StatusIndicatorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let first = Line::from(vec![
            Span::styled(format!(" {} ", self.icon()), self.icon_style()),
            Span::styled(self.primary_status(), self.primary_style()),
        ]);

        if area.height < 2 {
            Paragraph::new(first).render(area, buf);
            return;
        }

        let secondary_style = if self.notice.is_some() {
            self.theme.warning_style()
        } else {
            self.theme.muted_style()
        };
        let lines = vec![
            first,
            Line::from(vec![
                Span::raw("   "),
                Span::styled(self.secondary_status(), secondary_style),
            ]),
        ];

        Paragraph::new(lines).render(area, buf);
    }
}
