use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;

use crate::config::{Palette, PlayArea};
use crate::controller::Controller;
use crate::game::{GameState, GameStatus};
use crate::ui::buttons::{BUTTON_ROW_HEIGHT, ButtonLayout, render_buttons};
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_start_menu};

/// Terminal columns used for one grid cell, so cells come out roughly square.
pub const CELL_COLUMNS: u16 = 2;

const CELL_FILL: &str = "  ";

/// Drawing target addressed in pixel units.
///
/// Filling rectangles is the only primitive the game needs.
pub trait Surface {
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);
}

/// Paints background, snake (head first, in its own color) and food.
pub fn draw_scene<S: Surface + ?Sized>(surface: &mut S, state: &GameState, palette: &Palette) {
    let area = state.area();
    surface.fill_rect(0, 0, area.width, area.height, palette.map);

    for (index, segment) in state.snake.segments().enumerate() {
        let color = if index == 0 {
            palette.snake_head
        } else {
            palette.snake_body
        };
        surface.fill_rect(segment.x, segment.y, area.alpha, area.alpha, color);
    }

    let food = state.food.position;
    surface.fill_rect(food.x, food.y, area.alpha, area.alpha, palette.food);
}

/// [`Surface`] over a ratatui buffer region, one grid cell per
/// [`CELL_COLUMNS`] x 1 terminal cells. Anything outside `inner` is clipped.
pub struct TerminalCanvas<'a> {
    buffer: &'a mut Buffer,
    inner: Rect,
    alpha: i32,
}

impl<'a> TerminalCanvas<'a> {
    #[must_use]
    pub fn new(buffer: &'a mut Buffer, inner: Rect, alpha: i32) -> Self {
        Self {
            buffer,
            inner,
            alpha,
        }
    }

    fn cell_origin(&self, column: i32, row: i32) -> Option<(u16, u16)> {
        let column = u16::try_from(column).ok()?;
        let row = u16::try_from(row).ok()?;

        let x = self
            .inner
            .x
            .checked_add(column.checked_mul(CELL_COLUMNS)?)?;
        let y = self.inner.y.checked_add(row)?;
        if x.saturating_add(CELL_COLUMNS) > self.inner.right() || y >= self.inner.bottom() {
            return None;
        }

        Some((x, y))
    }
}

impl Surface for TerminalCanvas<'_> {
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        if width <= 0 || height <= 0 {
            return;
        }

        let style = Style::new().bg(color);
        let first_column = x.div_euclid(self.alpha);
        let last_column = (x + width - 1).div_euclid(self.alpha);
        let first_row = y.div_euclid(self.alpha);
        let last_row = (y + height - 1).div_euclid(self.alpha);

        for row in first_row..=last_row {
            for column in first_column..=last_column {
                if let Some((cell_x, cell_y)) = self.cell_origin(column, row) {
                    self.buffer.set_string(cell_x, cell_y, CELL_FILL, style);
                }
            }
        }
    }
}

/// Renders the full game frame and returns where the direction buttons landed.
pub fn render(frame: &mut Frame<'_>, controller: &Controller, palette: &Palette) -> ButtonLayout {
    let state = controller.state();
    let [hud_area, play_area, button_area] = frame_layout(frame.area(), state.area());

    render_hud(frame, hud_area, state);

    let block = Block::bordered().border_style(Style::new().fg(Color::DarkGray));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    let mut canvas = TerminalCanvas::new(frame.buffer_mut(), inner, state.area().alpha);
    draw_scene(&mut canvas, state, palette);

    let buttons = render_buttons(frame, button_area);

    match controller.status() {
        GameStatus::Idle => render_start_menu(frame, play_area),
        GameStatus::Stopped => {
            if let Some(notice) = controller.notice() {
                render_game_over_menu(frame, play_area, notice, state.score, state.stop_reason);
            }
        }
        GameStatus::Running => {}
    }

    buttons
}

fn frame_layout(area: Rect, play: PlayArea) -> [Rect; 3] {
    let play_width = u16::try_from(play.columns())
        .unwrap_or(u16::MAX)
        .saturating_mul(CELL_COLUMNS)
        .saturating_add(2);
    let play_height = u16::try_from(play.rows())
        .unwrap_or(u16::MAX)
        .saturating_add(2);

    let [hud_row, play_row, button_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(play_height),
        Constraint::Length(BUTTON_ROW_HEIGHT),
    ])
    .flex(Flex::Center)
    .areas(area);

    let [hud_area] = Layout::horizontal([Constraint::Length(play_width)])
        .flex(Flex::Center)
        .areas(hud_row);
    let [play_area] = Layout::horizontal([Constraint::Length(play_width)])
        .flex(Flex::Center)
        .areas(play_row);

    [hud_area, play_area, button_row]
}
