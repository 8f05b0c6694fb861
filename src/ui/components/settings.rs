use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::config::Config;
use crate::ui::theme::Theme;

pub struct SettingsPanel<'a> {
    pub config: &'a Config,
    pub cursor: usize,
    pub theme: &'a Theme,
}

impl SettingsPanel<'_> {
    pub const TOGGLES: [&'static str; 4] = [
        "Randomize order",
        "Prioritize failed",
        "Prioritize slow",
        "Random AUF",
    ];

    fn value(&self, index: usize) -> bool {
        match index {
            0 => self.config.randomize_order,
            1 => self.config.prioritize_failed,
            2 => self.config.prioritize_slow,
            _ => self.config.random_auf,
        }
    }
}

impl Widget for &SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" settings (space: toggle, t: theme) ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, label) in SettingsPanel::TOGGLES.iter().enumerate() {
            let on = self.value(i);
            let marker = if i == self.cursor { ">" } else { " " };
            let state = if on { "[on] " } else { "[off]" };
            let style = if i == self.cursor {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(
                format!("{marker} {state} {label}"),
                style,
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("theme: {}", self.config.theme),
            Style::default().fg(colors.move_neutral()),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_toggle_states() {
        let mut config = Config::default();
        config.toggle_random_auf();
        let theme = Theme::default();
        let panel = SettingsPanel {
            config: &config,
            cursor: 3,
            theme: &theme,
        };
        let area = Rect::new(0, 0, 50, 10);
        let mut buf = Buffer::empty(area);
        (&panel).render(area, &mut buf);
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        assert!(text.contains("[on]  Random AUF"));
        assert!(text.contains("[off] Randomize order"));
    }
}
