//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two sources:
//! - Terminal and clock (Resize, Tick) and connection lifecycle.
//! - Validated inbound transport events translated by [`crate::Bridge`].

use huddle_core::{NewMessage, RoomHash, User};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Connection in progress.
    Connecting,

    /// Connected to the transport.
    Connected,

    /// Transport connection lost.
    Disconnected,

    /// A room was announced (`room`).
    RoomCreated {
        /// Display name.
        name: String,
        /// Room hash.
        hash: RoomHash,
    },

    /// Someone joined a room (`user_join_room`).
    UserJoinedRoom {
        /// Joining user.
        user: User,
        /// Joined room.
        hash: RoomHash,
    },

    /// Message from a peer (`message`).
    MessageReceived {
        /// Target room.
        hash: RoomHash,
        /// Message fields.
        message: NewMessage,
    },

    /// Online users of a room (`users_in_room`).
    UsersInRoom {
        /// Reported room.
        hash: RoomHash,
        /// Users currently online.
        users: Vec<User>,
    },

    /// A peer started typing (`typing_on`).
    TypingStarted {
        /// Room being typed in.
        hash: RoomHash,
        /// Name of the typing user.
        user: String,
    },

    /// A peer stopped typing (`typing_off`).
    TypingStopped {
        /// Room being typed in.
        hash: RoomHash,
        /// Name of the typing user.
        user: String,
    },

    /// Our own message went out and should be appended optimistically.
    MessageSent {
        /// Target room.
        hash: RoomHash,
        /// Message text.
        text: String,
        /// Wall-clock send time in milliseconds.
        date: u64,
        /// Sender icon.
        icon: String,
    },

    /// The local typing burst started or ended.
    LocalTypingChanged {
        /// Whether the local user is typing.
        typing: bool,
    },

    /// Error occurred.
    Error {
        /// Error description.
        message: String,
    },
}
