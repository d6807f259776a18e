//! Input line. The block title shows when the local typing flag is set.

use huddle_app::App;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    widgets::{Block, Borders, Paragraph},
};

use crate::InputState;

/// Columns taken by the left border and the `> ` prompt.
const PROMPT: u16 = 3;

pub fn render(frame: &mut Frame, app: &App, input: &InputState, area: Rect) {
    let mut block = Block::default().borders(Borders::ALL);
    if app.view().typing {
        block = block.title(" typing ");
    }

    frame.render_widget(Paragraph::new(format!("> {}", input.buffer())).block(block), area);
    frame.set_cursor_position(cursor(input.cursor(), area));
}

/// Cursor cell for a character offset, clamped inside the right border.
fn cursor(offset: usize, area: Rect) -> Position {
    let last_column = area.right().saturating_sub(2);
    let column = u16::try_from(offset)
        .unwrap_or(u16::MAX)
        .saturating_add(area.x + PROMPT)
        .min(last_column);
    Position::new(column, area.y + 1)
}
