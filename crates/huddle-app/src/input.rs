//! Keys the application understands, independent of the terminal library.

/// A key press as seen by the input line.
///
/// Front-ends translate their own key events into this type so the same
/// editing logic runs in the terminal and in simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Submit the input line as a message or command.
    Enter,
    /// Delete the character before the cursor.
    Backspace,
    /// Delete the character under the cursor.
    Delete,
    /// Switch to the next joined room.
    Tab,
    /// Dismiss the join alert, or quit when none is shown.
    Esc,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Cursor to start of line.
    Home,
    /// Cursor to end of line.
    End,
}
