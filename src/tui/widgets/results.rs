//! Result panel: one table row per prediction, plus the evaluation
//! metrics after a retrain.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Widget},
};

use crate::core::{Mode, View, format_value};
use crate::tui::Theme;

/// Column widths of the prediction table.
const COLUMN_WIDTHS: [Constraint; 4] = [
    Constraint::Length(6),
    Constraint::Length(12),
    Constraint::Length(6),
    Constraint::Min(12),
];

/// Table rows that fit in a result panel whose inner area is
/// `inner_height` lines tall.
///
/// The column header always takes a line; the metrics line after a
/// retrain takes one more.
#[must_use]
pub fn visible_table_rows(inner_height: u16, has_metrics: bool) -> usize {
    let reserved = 1 + u16::from(has_metrics);
    usize::from(inner_height.saturating_sub(reserved))
}

/// Renders the result of the active mode.
///
/// `offset` is the index of the first visible row; it is clamped so the
/// last page stays full.
pub struct ResultsWidget<'a> {
    view: &'a View,
    offset: usize,
    theme: &'a Theme,
}

impl<'a> ResultsWidget<'a> {
    #[must_use]
    pub const fn new(view: &'a View, offset: usize, theme: &'a Theme) -> Self {
        Self {
            view,
            offset,
            theme,
        }
    }

    fn title(&self) -> String {
        let total = self.view.rows.len();
        if total == 0 {
            format!(" {} results ", self.view.mode.name())
        } else {
            format!(" {} results ({total}) ", self.view.mode.name())
        }
    }

    fn metrics_line(&self) -> Option<Line<'static>> {
        let metrics = self.view.metrics?;
        let mut spans = Vec::with_capacity(6);
        for (name, value) in [
            ("Precision", metrics.precision),
            ("Recall", metrics.recall),
            ("F1", metrics.f1),
        ] {
            spans.push(Span::styled(format!(" {name}: "), self.theme.muted_style()));
            spans.push(Span::styled(format_value(value), self.theme.success_style()));
        }
        Some(Line::from(spans))
    }

    fn render_table(&self, area: Rect, visible: usize, buf: &mut Buffer) {
        let max_offset = self.view.rows.len().saturating_sub(visible);
        let offset = self.offset.min(max_offset);

        let header = Row::new(vec!["#", "Prediction", "Code", "Probability"])
            .style(self.theme.header_style());

        let rows = self
            .view
            .rows
            .iter()
            .skip(offset)
            .take(visible)
            .map(|row| {
                Row::new(vec![
                    Line::from((row.index + 1).to_string()),
                    Line::from(Span::styled(row.label.name(), self.theme.highlight_style())),
                    Line::from(row.code.to_string()),
                    Line::from(row.probability_text()),
                ])
                .style(self.theme.normal_style())
            });

        Widget::render(Table::new(rows, COLUMN_WIDTHS).header(header), area, buf);
    }
}

impl Widget for ResultsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title())
            .title_style(self.theme.header_style())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        if !self.view.has_results() {
            let hint = match self.view.mode {
                Mode::Single => "No results yet. Enter a title and description, then submit.",
                Mode::Batch => "No results yet. Select a file to classify, then submit.",
                Mode::Retrain => "No results yet. Select a labeled file, then submit.",
            };
            Paragraph::new(Line::from(hint).style(self.theme.muted_style())).render(inner, buf);
            return;
        }

        let visible = visible_table_rows(inner.height, self.view.metrics.is_some());
        match self.metrics_line() {
            Some(metrics) => {
                let [metrics_area, table_area] =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
                Paragraph::new(metrics).render(metrics_area, buf);
                self.render_table(table_area, visible, buf);
            }
            None => self.render_table(inner, visible, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::results::Label;
    use crate::core::{Metrics, ResultRow};
    use anyhow::Result;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn view_with_rows(mode: Mode, count: usize) -> View {
        View {
            mode,
            error: None,
            rows: (0..count)
                .map(|index| ResultRow {
                    index,
                    code: i64::from(index % 2 == 1),
                    label: if index % 2 == 1 {
                        Label::Negative
                    } else {
                        Label::Positive
                    },
                    probability: 0.75,
                })
                .collect(),
            metrics: None,
            pending: false,
        }
    }

    fn render(view: &View, offset: usize, height: u16) -> Result<String> {
        let mut terminal = Terminal::new(TestBackend::new(60, height))?;
        let theme = Theme::default();
        terminal.draw(|f| {
            f.render_widget(ResultsWidget::new(view, offset, &theme), f.area());
        })?;

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..height {
            for x in 0..60 {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        Ok(text)
    }

    #[test]
    fn empty_view_shows_hint() -> Result<()> {
        let text = render(&view_with_rows(Mode::Batch, 0), 0, 6)?;
        assert!(text.contains("No results yet"));
        assert!(text.contains("Batch results"));
        Ok(())
    }

    #[test]
    fn rows_show_label_code_and_probability() -> Result<()> {
        let text = render(&view_with_rows(Mode::Batch, 2), 0, 8)?;
        assert!(text.contains("Prediction"));
        assert!(text.contains("True"));
        assert!(text.contains("False"));
        assert!(text.contains("0.75"));
        assert!(text.contains("(2)"));
        Ok(())
    }

    #[test]
    fn offset_skips_leading_rows() -> Result<()> {
        // 2 border lines + header leaves 3 visible rows
        let text = render(&view_with_rows(Mode::Batch, 10), 5, 6)?;
        let first_row = text.lines().nth(2).unwrap_or_default();
        assert!(first_row.trim_start_matches('│').trim_start().starts_with('6'));
        Ok(())
    }

    #[test]
    fn offset_is_clamped_to_last_page() -> Result<()> {
        let text = render(&view_with_rows(Mode::Batch, 4), 99, 6)?;
        let first_row = text.lines().nth(2).unwrap_or_default();
        assert!(first_row.trim_start_matches('│').trim_start().starts_with('2'));
        Ok(())
    }

    #[test]
    fn retrain_shows_metrics_line() -> Result<()> {
        let mut view = view_with_rows(Mode::Retrain, 1);
        view.metrics = Some(Metrics {
            precision: 0.91,
            recall: 0.88,
            f1: 0.895,
        });
        let text = render(&view, 0, 8)?;
        assert!(text.contains("Precision: 0.91"));
        assert!(text.contains("Recall: 0.88"));
        assert!(text.contains("F1: 0.895"));
        Ok(())
    }

    #[test]
    fn metrics_line_leaves_one_row_less() {
        assert_eq!(visible_table_rows(16, false), 15);
        assert_eq!(visible_table_rows(16, true), 14);
        assert_eq!(visible_table_rows(1, true), 0);
    }

    #[test]
    fn last_retrain_row_is_reachable_at_the_largest_offset() -> Result<()> {
        let mut view = view_with_rows(Mode::Retrain, 10);
        view.metrics = Some(Metrics {
            precision: 0.5,
            recall: 0.5,
            f1: 0.5,
        });
        // 10 lines: 2 borders leave 8 inner lines, 6 of them table rows.
        let visible = visible_table_rows(8, true);
        let text = render(&view, 10 - visible, 10)?;
        let last_row = text.lines().nth(8).unwrap_or_default();
        assert!(last_row.trim_start_matches('│').trim_start().starts_with("10"));
        Ok(())
    }
}
