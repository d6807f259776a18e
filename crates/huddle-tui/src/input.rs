//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and handles
//! character-level key events. Command parsing happens here on Enter. Every
//! edit of the buffer while a room is open counts as a keystroke for the
//! typing indicator.

use huddle_app::{App, AppAction, KeyInput};

use crate::commands::{self, Command};

/// Input state for the TUI.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }

    /// Handle a key input event.
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
                self.edited(app)
            },
            KeyInput::Backspace => {
                if self.cursor == 0 {
                    return vec![];
                }
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                self.edited(app)
            },
            KeyInput::Delete => {
                if self.cursor >= self.char_count() {
                    return vec![];
                }
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                self.edited(app)
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.cursor = self.char_count();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Tab => app.cycle_room(),
            KeyInput::Esc => {
                if app.view().alert.is_some() {
                    app.dismiss_alert()
                } else {
                    app.quit()
                }
            },
        }
    }

    /// Buffer changed. Slash commands are not chat text and do not count as
    /// typing.
    fn edited(&self, app: &App) -> Vec<AppAction> {
        let mut actions = if self.buffer.starts_with('/') { vec![] } else { app.typing() };
        actions.push(AppAction::Render);
        actions
    }

    /// Handle Enter key - parse command and call App API.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if text.is_empty() {
            return vec![];
        }

        match commands::parse(&text) {
            Command::SetUser { name, icon } => {
                let icon = icon
                    .or_else(|| app.user().map(|u| u.icon.clone()))
                    .unwrap_or_default();
                app.set_user(&name, &icon)
            },
            Command::CreateRoom => app.create_room(),
            Command::JoinRoom { hash } => app.open_room(&hash),
            Command::Leave => app.leave_room(),
            Command::Quit => app.quit(),
            Command::Message { text } => app.send_message(&text),
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: {input}"));
                vec![AppAction::Render]
            },
            Command::InvalidArgs { command, error } => {
                app.set_status(format!("/{command}: {error}"));
                vec![AppAction::Render]
            },
        }
    }
}
