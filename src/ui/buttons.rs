use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::input::Direction;

/// Rows taken by the on-screen direction pad.
pub const BUTTON_ROW_HEIGHT: u16 = 3;

const BUTTON_WIDTH: u16 = 7;

/// Screen rectangles of the four direction buttons from the last frame.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ButtonLayout {
    pub left: Rect,
    pub up: Rect,
    pub down: Rect,
    pub right: Rect,
}

impl ButtonLayout {
    /// Returns the direction of the button under a terminal cell, if any.
    #[must_use]
    pub fn hit(&self, column: u16, row: u16) -> Option<Direction> {
        let point = Position::new(column, row);
        [
            (self.left, Direction::Left),
            (self.up, Direction::Up),
            (self.down, Direction::Down),
            (self.right, Direction::Right),
        ]
        .into_iter()
        .find(|(rect, _)| rect.contains(point))
        .map(|(_, direction)| direction)
    }
}

/// Draws the direction pad centered in `area`.
pub fn render_buttons(frame: &mut Frame<'_>, area: Rect) -> ButtonLayout {
    let [left, up, down, right] = Layout::horizontal([Constraint::Length(BUTTON_WIDTH); 4])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

    let style = Style::default().fg(Color::Gray);
    for (rect, glyph) in [(left, "◀"), (up, "▲"), (down, "▼"), (right, "▶")] {
        frame.render_widget(
            Paragraph::new(glyph)
                .alignment(Alignment::Center)
                .style(style)
                .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray))),
            rect,
        );
    }

    ButtonLayout {
        left,
        up,
        down,
        right,
    }
}
