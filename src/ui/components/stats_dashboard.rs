use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, Widget};

use crate::session::algorithm::Algorithm;
use crate::session::timer::format_time;
use crate::store::schema::TimingData;
use crate::ui::theme::Theme;

/// Per-case statistics table over the whole library.
pub struct StatsDashboard<'a> {
    pub algorithms: &'a [Algorithm],
    pub timing: &'a TimingData,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl StatsDashboard<'_> {
    fn rows(&self) -> Vec<Row<'_>> {
        let colors = &self.theme.colors;
        self.algorithms
            .iter()
            .enumerate()
            .map(|(i, alg)| {
                let record = self.timing.records.get(&alg.stats_key());
                let best = record
                    .and_then(|r| r.best_ms)
                    .map(format_time)
                    .unwrap_or_else(|| "-".to_string());
                let avg = record
                    .and_then(|r| r.rolling_average_ms())
                    .map(format_time)
                    .unwrap_or_else(|| "-".to_string());
                let attempts = record.map(|r| r.attempts()).unwrap_or(0);
                let rate = record
                    .filter(|r| r.attempts() > 0)
                    .map(|r| format!("{:.0}%", r.success_rate()))
                    .unwrap_or_else(|| "-".to_string());

                let style = if i == self.selected {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                Row::new(vec![
                    Cell::from(alg.name.clone()),
                    Cell::from(alg.category.clone()),
                    Cell::from(best),
                    Cell::from(avg),
                    Cell::from(attempts.to_string()),
                    Cell::from(rate),
                ])
                .style(style)
            })
            .collect()
    }
}

impl Widget for &StatsDashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" statistics ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.algorithms.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "library is empty",
                Style::default().fg(colors.move_neutral()),
            )))
            .render(inner, buf);
            return;
        }

        let header = Row::new(vec!["case", "group", "best", "ao5", "n", "ok"]).style(
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        );
        let widths = [
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Length(5),
        ];
        Table::new(self.rows(), widths)
            .header(header)
            .render(inner, buf);
    }
}
