use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::tracker::{DisplaySnapshot, MoveColor};
use crate::notation::token::MoveToken;
use crate::session::timer::{TimerState, format_time};
use crate::ui::theme::Theme;

/// The drill surface: algorithm name, the move sequence colored by the
/// tracker's classification, the timer, and an undo hint when the
/// solver has gone off track.
pub struct AlgDisplay<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub moves: &'a [MoveToken],
    pub snapshot: &'a DisplaySnapshot,
    pub timer_state: TimerState,
    pub elapsed_ms: u64,
    pub theme: &'a Theme,
}

impl AlgDisplay<'_> {
    fn move_spans(&self) -> Vec<Span<'_>> {
        let colors = &self.theme.colors;
        let mut spans = Vec::with_capacity(self.moves.len() * 2);
        for (i, token) in self.moves.iter().enumerate() {
            let color = match self.snapshot.colors.get(i) {
                Some(MoveColor::Correct) => colors.move_correct(),
                Some(MoveColor::Error) => colors.move_error(),
                Some(MoveColor::Pending) => colors.move_pending(),
                _ => colors.move_neutral(),
            };
            let mut style = Style::default().fg(color);
            if i as i32 == self.snapshot.current + 1 {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(token.to_string(), style));
            if i + 1 < self.moves.len() {
                spans.push(Span::raw(" "));
            }
        }
        spans
    }

    fn timer_line(&self) -> Line<'_> {
        let colors = &self.theme.colors;
        let (text, color) = match self.timer_state {
            TimerState::Idle => ("-".to_string(), colors.move_neutral()),
            TimerState::Ready => ("0.000".to_string(), colors.warning()),
            TimerState::Running => (format_time(self.elapsed_ms), colors.fg()),
            TimerState::Stopped => (format_time(self.elapsed_ms), colors.success()),
        };
        Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    }
}

impl Widget for &AlgDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} / {} ", self.category, self.name))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(self.timer_line())
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        Paragraph::new(Line::from(self.move_spans()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[1], buf);

        if let Some(hint) = &self.snapshot.fix_hint {
            let line = Line::from(vec![
                Span::styled("undo: ", Style::default().fg(colors.move_neutral())),
                Span::styled(
                    hint.as_str(),
                    Style::default()
                        .fg(colors.warning())
                        .add_modifier(Modifier::BOLD),
                ),
            ]);
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(layout[2], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::CubePattern;
    use crate::engine::tracker::MistakeTracker;
    use crate::notation::parse_alg;

    fn render_to_string(display: &AlgDisplay) -> String {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
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
    fn renders_moves_and_hint() {
        let moves = parse_alg("R U R'").unwrap();
        let mut tracker = MistakeTracker::new(CubePattern::solved(), moves.clone());
        tracker.feed(parse_alg("R").unwrap()[0]);
        tracker.feed(parse_alg("F").unwrap()[0]);
        let snapshot = tracker.classify(false);
        let theme = Theme::default();
        let display = AlgDisplay {
            name: "Sexy",
            category: "Basics",
            moves: &moves,
            snapshot: &snapshot,
            timer_state: TimerState::Running,
            elapsed_ms: 1234,
            theme: &theme,
        };
        let text = render_to_string(&display);
        assert!(text.contains("R U R'"));
        assert!(text.contains("undo: F'"));
        assert!(text.contains("1.234"));
        assert!(text.contains("Basics / Sexy"));
    }
}
