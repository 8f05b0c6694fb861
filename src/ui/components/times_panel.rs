use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::timer::format_time;
use crate::store::schema::TimingRecord;
use crate::ui::theme::Theme;

/// Sidebar with the current algorithm's best, rolling average, success
/// rate, and most recent solves.
pub struct TimesPanel<'a> {
    pub record: Option<&'a TimingRecord>,
    pub theme: &'a Theme,
}

impl Widget for &TimesPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" times ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        match self.record {
            Some(record) => {
                let best = record
                    .best_ms
                    .map(format_time)
                    .unwrap_or_else(|| "-".to_string());
                let avg = record
                    .rolling_average_ms()
                    .map(format_time)
                    .unwrap_or_else(|| "-".to_string());
                lines.push(Line::from(vec![
                    Span::styled("best ", Style::default().fg(colors.move_neutral())),
                    Span::styled(
                        best,
                        Style::default()
                            .fg(colors.success())
                            .add_modifier(Modifier::BOLD),
                    ),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("ao5  ", Style::default().fg(colors.move_neutral())),
                    Span::styled(avg, Style::default().fg(colors.fg())),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("rate ", Style::default().fg(colors.move_neutral())),
                    Span::styled(
                        format!("{:.0}%", record.success_rate()),
                        Style::default().fg(colors.fg()),
                    ),
                ]));
                lines.push(Line::from(""));
                let visible = inner.height.saturating_sub(4) as usize;
                for ms in record.times_ms.iter().rev().take(visible) {
                    let style = if Some(*ms) == record.best_ms {
                        Style::default().fg(colors.success())
                    } else {
                        Style::default().fg(colors.fg())
                    };
                    lines.push(Line::from(Span::styled(format_time(*ms), style)));
                }
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "no times yet",
                    Style::default().fg(colors.move_neutral()),
                )));
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(panel: &TimesPanel) -> String {
        let area = Rect::new(0, 0, 24, 12);
        let mut buf = Buffer::empty(area);
        panel.render(area, &mut buf);
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn shows_summary_and_recent_times() {
        let mut record = TimingRecord::default();
        record.record_time(1500);
        record.record_time(900);
        let theme = Theme::default();
        let panel = TimesPanel {
            record: Some(&record),
            theme: &theme,
        };
        let text = render_to_string(&panel);
        assert!(text.contains("best 0.900"));
        assert!(text.contains("ao5  1.200"));
        assert!(text.contains("rate 100%"));
    }

    #[test]
    fn handles_missing_record() {
        let theme = Theme::default();
        let panel = TimesPanel {
            record: None,
            theme: &theme,
        };
        assert!(render_to_string(&panel).contains("no times yet"));
    }
}
