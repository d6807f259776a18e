//! Status bar: connection, user, viewed room with its online users, and the
//! last status message.

use huddle_app::{App, ConnectionState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" "), connection(app.connection_state())];

    let user = app.user().map_or("anonymous", |u| u.name.as_str());
    spans.push(Span::raw(format!(" | {user}")));

    if let Some(hash) = app.route().room_id() {
        let online = &app.view().online_users;
        let room = if online.is_empty() {
            format!(" | #{hash}")
        } else {
            let names: Vec<&str> = online.iter().map(|u| u.name.as_str()).collect();
            format!(" | #{hash} | Online: {}", names.join(", "))
        };
        spans.push(Span::styled(room, Style::default().fg(Color::Gray)));
    }

    if let Some(message) = app.status_message() {
        spans.push(Span::raw(format!(" | {message}")));
    }

    let bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(bar, area);
}

fn connection(state: ConnectionState) -> Span<'static> {
    match state {
        ConnectionState::Disconnected => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    }
}
