use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::game::GameState;

const SEPARATOR: &str = " │ ";

/// Renders the score line above the play area.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState) {
    frame.render_widget(
        Paragraph::new(info_line(
            state.score,
            state.snake.len(),
            usize::from(area.width),
        ))
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn info_line(score: u32, length: usize, available_width: usize) -> Line<'static> {
    let compact = info_width(score, length, false) > available_width;
    let score_label = if compact { "S" } else { "Score" };
    let length_label = if compact { "L" } else { "Length" };
    let value_style = Style::default().fg(Color::White);

    Line::from(vec![
        Span::raw(format!("{score_label}: ")),
        Span::styled(score.to_string(), value_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{length_label}: ")),
        Span::styled(length.to_string(), value_style),
    ])
}

fn info_width(score: u32, length: usize, compact: bool) -> usize {
    let score_label = if compact { "S" } else { "Score" };
    let length_label = if compact { "L" } else { "Length" };

    format!("{score_label}: {score}").width()
        + SEPARATOR.width()
        + format!("{length_label}: {length}").width()
}

#[cfg(test)]
mod tests {
    use super::{info_line, info_width};

    #[test]
    fn full_labels_when_they_fit() {
        let line = info_line(300, 7, 40);

        assert_eq!(line.to_string(), "Score: 300 │ Length: 7");
        assert_eq!(info_width(300, 7, false), 22);
    }

    #[test]
    fn compact_labels_when_narrow() {
        let line = info_line(1200, 12, 10);

        assert_eq!(line.to_string(), "S: 1200 │ L: 12");
    }
}
