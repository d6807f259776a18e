//! Domain model: users, rooms and messages.
//!
//! Serde field names match the persisted session format so snapshots can be
//! written to and read from tab-scoped storage unchanged.

use serde::{Deserialize, Serialize};

/// Room join key. Unique per room by convention; not enforced.
pub type RoomHash = String;

/// The local participant. Exactly one per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Avatar image reference.
    pub icon: String,
}

impl User {
    /// Create a user.
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self { name: name.into(), icon: icon.into() }
    }
}

/// A joined room and its message thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Display name.
    pub name: String,
    /// Join key.
    pub hash: RoomHash,
    /// Messages in arrival order. Append-only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

impl Room {
    /// Create a room with no messages.
    pub fn new(name: impl Into<String>, hash: impl Into<RoomHash>) -> Self {
        Self { name: name.into(), hash: hash.into(), messages: Vec::new() }
    }
}

/// Where a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageOrigin {
    /// Sent from this client and appended optimistically.
    Local,
    /// Delivered by the transport.
    Remote,
}

/// A message in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author display name.
    pub author: String,
    /// Message text.
    pub text: String,
    /// Unix milliseconds.
    pub date: u64,
    /// Author avatar reference.
    pub icon: String,
    /// `Some(true)` for locally sent messages, absent for received ones.
    #[serde(rename = "isMyMessage", default, skip_serializing_if = "Option::is_none")]
    pub is_my_message: Option<bool>,
}

impl Message {
    /// Origin of this message as recorded by the store.
    pub fn origin(&self) -> MessageOrigin {
        if self.is_my_message == Some(true) { MessageOrigin::Local } else { MessageOrigin::Remote }
    }
}

/// Message fields shared by sent and received appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Author display name.
    pub author: String,
    /// Message text.
    pub text: String,
    /// Unix milliseconds.
    pub date: u64,
    /// Author avatar reference.
    pub icon: String,
}

impl NewMessage {
    /// Stamp the message with its origin.
    pub fn into_message(self, origin: MessageOrigin) -> Message {
        let is_my_message = match origin {
            MessageOrigin::Local => Some(true),
            MessageOrigin::Remote => None,
        };
        Message {
            author: self.author,
            text: self.text,
            date: self.date,
            icon: self.icon,
            is_my_message,
        }
    }
}
