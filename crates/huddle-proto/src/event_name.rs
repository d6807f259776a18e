//! Event names carried on the real-time channel.
//!
//! The transport identifies each message by a string name. [`EventName`] is
//! the closed set of names this client knows about; anything else is rejected
//! at decode time.

use std::fmt;

/// Which way an event travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Client to server.
    Outbound,
    /// Server to client.
    Inbound,
}

impl Direction {
    /// Lowercase label for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outbound => "outbound",
            Self::Inbound => "inbound",
        }
    }
}

/// Named events on the real-time channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventName {
    // Outbound
    /// Ask the server to create a room for a user.
    CreateRoom,
    /// Ask the server for a room the client does not know yet.
    GetRoom,
    /// Announce that a user entered a room.
    JoinRoom,
    /// Ask for the current online users of a room.
    GetUsersInRoom,
    /// Post a message to a room.
    SendMessage,
    /// Leave a room.
    LeaveRoom,
    /// Local user started typing.
    StartTyping,
    /// Local user stopped typing.
    StopTyping,

    // Inbound
    /// A room was created (broadcast).
    Room,
    /// A user joined a room.
    UserJoinRoom,
    /// A message was posted by someone else.
    Message,
    /// Online-user snapshot for a room.
    UsersInRoom,
    /// A remote user started typing.
    TypingOn,
    /// A remote user stopped typing.
    TypingOff,
}

impl EventName {
    /// Names the client emits.
    pub const OUTBOUND: [Self; 8] = [
        Self::CreateRoom,
        Self::GetRoom,
        Self::JoinRoom,
        Self::GetUsersInRoom,
        Self::SendMessage,
        Self::LeaveRoom,
        Self::StartTyping,
        Self::StopTyping,
    ];

    /// Names the client subscribes to.
    pub const INBOUND: [Self; 6] = [
        Self::Room,
        Self::UserJoinRoom,
        Self::Message,
        Self::UsersInRoom,
        Self::TypingOn,
        Self::TypingOff,
    ];

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateRoom => "create_room",
            Self::GetRoom => "get_room",
            Self::JoinRoom => "join_room",
            Self::GetUsersInRoom => "get_users_in_room",
            Self::SendMessage => "send_message",
            Self::LeaveRoom => "leave_room",
            Self::StartTyping => "start_typing",
            Self::StopTyping => "stop_typing",
            Self::Room => "room",
            Self::UserJoinRoom => "user_join_room",
            Self::Message => "message",
            Self::UsersInRoom => "users_in_room",
            Self::TypingOn => "typing_on",
            Self::TypingOff => "typing_off",
        }
    }

    /// Parse a wire name. `None` for names outside the vocabulary.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::OUTBOUND.into_iter().chain(Self::INBOUND).find(|event| event.as_str() == name)
    }

    /// Direction this event travels.
    pub const fn direction(self) -> Direction {
        match self {
            Self::CreateRoom
            | Self::GetRoom
            | Self::JoinRoom
            | Self::GetUsersInRoom
            | Self::SendMessage
            | Self::LeaveRoom
            | Self::StartTyping
            | Self::StopTyping => Direction::Outbound,
            Self::Room
            | Self::UserJoinRoom
            | Self::Message
            | Self::UsersInRoom
            | Self::TypingOn
            | Self::TypingOff => Direction::Inbound,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
