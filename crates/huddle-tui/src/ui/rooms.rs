//! Rooms sidebar: joined rooms in session order, the viewed one marked.

use huddle_app::App;
use huddle_core::Room;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List},
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let viewed = app.route().room_id();
    let lines = app.rooms().iter().map(|room| room_line(room, viewed == Some(room.hash.as_str())));

    let list = List::new(lines).block(Block::default().borders(Borders::ALL).title(" Rooms "));
    frame.render_widget(list, area);
}

fn room_line(room: &Room, viewed: bool) -> Line<'_> {
    if viewed {
        let highlight = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        Line::from(vec![Span::raw(">"), Span::styled(room.name.as_str(), highlight)])
    } else {
        Line::from(vec![Span::raw(" "), Span::raw(room.name.as_str())])
    }
}
