use std::collections::HashSet;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::algorithm::Algorithm;
use crate::ui::theme::Theme;

/// Library browser with per-algorithm practice checkboxes.
pub struct LibraryList<'a> {
    pub algorithms: &'a [Algorithm],
    pub selected_keys: &'a HashSet<String>,
    pub cursor: usize,
    pub theme: &'a Theme,
}

impl Widget for &LibraryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" library (space: select, enter: drill) ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.algorithms.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "library is empty - press a to add an algorithm",
                Style::default().fg(colors.move_neutral()),
            )))
            .render(inner, buf);
            return;
        }

        // Keep the cursor in view.
        let visible = inner.height as usize;
        let first = self.cursor.saturating_sub(visible.saturating_sub(1));

        let mut lines: Vec<Line> = Vec::new();
        let mut last_category: Option<&str> = None;
        for (i, alg) in self.algorithms.iter().enumerate().skip(first) {
            if lines.len() >= visible {
                break;
            }
            if last_category != Some(alg.category.as_str()) {
                last_category = Some(alg.category.as_str());
                lines.push(Line::from(Span::styled(
                    format!("{}:", alg.category),
                    Style::default()
                        .fg(colors.accent_dim())
                        .add_modifier(Modifier::BOLD),
                )));
                if lines.len() >= visible {
                    break;
                }
            }
            let checked = self.selected_keys.contains(&alg.stats_key());
            let checkbox = if checked { "[x]" } else { "[ ]" };
            let is_cursor = i == self.cursor;
            let marker = if is_cursor { ">" } else { " " };
            let style = if is_cursor {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else if checked {
                Style::default().fg(colors.fg())
            } else {
                Style::default().fg(colors.move_neutral())
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker} {checkbox} {:<16}", alg.name), style),
                Span::styled(alg.display.clone(), Style::default().fg(colors.move_neutral())),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
