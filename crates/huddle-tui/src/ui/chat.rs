//! Chat area
//!
//! Displays the viewed room: join banner, messages, and who is typing.

use huddle_app::{App, Route};
use huddle_core::Message;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (title, mut items) = match app.route() {
        Route::Landing => {
            (" huddle ".to_string(), vec![hint("Open a room with /join <hash> or /create")])
        },
        Route::Login => {
            (" Login ".to_string(), vec![hint("Set a name with /user <name> to continue")])
        },
        Route::Room(_) => {
            let room = app.active_room();
            let messages = room.messages.iter().map(message_line).map(ListItem::new).collect();
            (format!(" {} ", room.name), messages)
        },
    };

    let view = app.view();
    if let Some(typing) = typing_line(&view.typing_users) {
        items.push(ListItem::new(Line::from(Span::styled(
            typing,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))));
    }

    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let mut header = Vec::new();
    if let Some(alert) = &view.alert {
        header.push(ListItem::new(Line::from(Span::styled(
            format!("{} joined the room (Esc to dismiss)", alert.user_name),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ))));
    }

    // Newest lines win; the banner stays pinned on top.
    let skip = items.len().saturating_sub(visible_height.saturating_sub(header.len()));
    let visible: Vec<ListItem> = header.into_iter().chain(items.into_iter().skip(skip)).collect();

    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(List::new(visible).block(block), area);
}

fn hint(text: &'static str) -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))))
}

fn message_line(message: &Message) -> Line<'static> {
    let author_style = if message.is_my_message == Some(true) {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };

    Line::from(vec![
        Span::styled(clock(message.date), Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(format!("<{}>", message.author), author_style),
        Span::raw(" "),
        Span::raw(message.text.clone()),
    ])
}

/// `HH:MM` in UTC.
fn clock(date_millis: u64) -> String {
    let minutes = date_millis / 60_000;
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}

fn typing_line(users: &[String]) -> Option<String> {
    match users {
        [] => None,
        [one] => Some(format!("{one} is typing...")),
        many => Some(format!("{} are typing...", many.join(", "))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_utc() {
        // 2023-11-14T22:13:20Z
        assert_eq!(clock(1_700_000_000_000), "22:13");
    }

    #[test]
    fn typing_line_grammar() {
        assert_eq!(typing_line(&[]), None);
        assert_eq!(typing_line(&["Bo".into()]).as_deref(), Some("Bo is typing..."));
        assert_eq!(
            typing_line(&["Bo".into(), "Cy".into()]).as_deref(),
            Some("Bo, Cy are typing...")
        );
    }
}
