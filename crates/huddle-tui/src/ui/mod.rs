//! Screen layout.
//!
//! ```text
//! ┌ Rooms ─┐┌ room name ──────────┐
//! │>R1     ││12:00 <Bo> hi        │
//! │ R2     ││Bo is typing...      │
//! └────────┘└─────────────────────┘
//! ┌───────────────────────────────┐
//! │> input                        │
//! └───────────────────────────────┘
//!  status bar
//! ```
//!
//! Every function here draws from `App` state only; nothing is cached
//! between frames.

mod chat;
mod input;
mod rooms;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use crate::{App, InputState};

const SIDEBAR_WIDTH: u16 = 20;
const INPUT_HEIGHT: u16 = 3;

/// Regions of one frame.
struct Areas {
    rooms: Rect,
    chat: Rect,
    input: Rect,
    status: Rect,
}

impl Areas {
    fn split(screen: Rect) -> Self {
        let [body, input, status] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(screen);
        let [rooms, chat] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                .areas(body);
        Self { rooms, chat, input, status }
    }
}

/// Draw the room list, the active room, the input line and the status bar.
pub fn render(frame: &mut Frame, app: &App, input_state: &InputState) {
    let areas = Areas::split(frame.area());

    rooms::render(frame, app, areas.rooms);
    chat::render(frame, app, areas.chat);
    input::render(frame, app, input_state, areas.input);
    status::render(frame, app, areas.status);
}
