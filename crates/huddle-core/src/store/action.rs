//! Store actions.

use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::ActionError,
    model::{MessageOrigin, NewMessage, Room, RoomHash, User},
};

/// Discrete state transitions understood by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Replace the current user wholesale.
    SetUser(User),

    /// Append a room with no messages.
    AddRoom {
        /// Display name.
        name: String,
        /// Join key.
        hash: RoomHash,
    },

    /// Replace the rooms list wholesale (used when leaving a room).
    ReplaceRooms(Vec<Room>),

    /// Append a message to the room whose hash is `room_id`.
    ///
    /// Sent and received messages share this transition; `origin` decides
    /// whether the stored message is flagged as our own.
    AppendMessage {
        /// Target room hash.
        room_id: RoomHash,
        /// Message fields.
        message: NewMessage,
        /// Local (optimistic) or remote.
        origin: MessageOrigin,
    },

    /// Record the last-visited room.
    SetPrevUrl {
        /// Room hash.
        id: RoomHash,
    },
}

#[derive(Deserialize)]
struct AddRoomPayload {
    name: String,
    hash: RoomHash,
}

#[derive(Deserialize)]
struct AppendPayload {
    #[serde(rename = "roomId")]
    room_id: RoomHash,
    author: String,
    text: String,
    date: u64,
    icon: String,
}

#[derive(Deserialize)]
struct PrevUrlPayload {
    id: RoomHash,
}

impl StoreAction {
    /// Kind strings accepted by [`StoreAction::from_raw`].
    pub const KINDS: [&'static str; 6] = [
        "SetUser",
        "AddRoom",
        "ReplaceRooms",
        "AppendSentMessage",
        "AppendReceivedMessage",
        "SetPrevUrl",
    ];

    /// Optimistic append of a message this client just sent.
    pub fn append_sent(room_id: impl Into<RoomHash>, message: NewMessage) -> Self {
        Self::AppendMessage { room_id: room_id.into(), message, origin: MessageOrigin::Local }
    }

    /// Append of a message delivered by the transport.
    pub fn append_received(room_id: impl Into<RoomHash>, message: NewMessage) -> Self {
        Self::AppendMessage { room_id: room_id.into(), message, origin: MessageOrigin::Remote }
    }

    /// Kind string of this action.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SetUser(_) => "SetUser",
            Self::AddRoom { .. } => "AddRoom",
            Self::ReplaceRooms(_) => "ReplaceRooms",
            Self::AppendMessage { origin: MessageOrigin::Local, .. } => "AppendSentMessage",
            Self::AppendMessage { origin: MessageOrigin::Remote, .. } => "AppendReceivedMessage",
            Self::SetPrevUrl { .. } => "SetPrevUrl",
        }
    }

    /// Decode an action from `{kind, payload}` form.
    ///
    /// Returns `Ok(None)` for kinds outside [`StoreAction::KINDS`].
    ///
    /// # Errors
    ///
    /// [`ActionError::MalformedPayload`] if the kind is known but the payload
    /// does not have the expected shape.
    pub fn from_raw(kind: &str, payload: serde_json::Value) -> Result<Option<Self>, ActionError> {
        let action = match kind {
            "SetUser" => Self::SetUser(parse("SetUser", payload)?),
            "AddRoom" => {
                let AddRoomPayload { name, hash } = parse("AddRoom", payload)?;
                Self::AddRoom { name, hash }
            },
            "ReplaceRooms" => Self::ReplaceRooms(parse("ReplaceRooms", payload)?),
            "AppendSentMessage" => {
                let (room_id, message) = parse_append("AppendSentMessage", payload)?;
                Self::append_sent(room_id, message)
            },
            "AppendReceivedMessage" => {
                let (room_id, message) = parse_append("AppendReceivedMessage", payload)?;
                Self::append_received(room_id, message)
            },
            "SetPrevUrl" => {
                let PrevUrlPayload { id } = parse("SetPrevUrl", payload)?;
                Self::SetPrevUrl { id }
            },
            _ => return Ok(None),
        };
        Ok(Some(action))
    }
}

fn parse<T: DeserializeOwned>(
    kind: &'static str,
    payload: serde_json::Value,
) -> Result<T, ActionError> {
    serde_json::from_value(payload).map_err(|source| ActionError::MalformedPayload { kind, source })
}

fn parse_append(
    kind: &'static str,
    payload: serde_json::Value,
) -> Result<(RoomHash, NewMessage), ActionError> {
    let AppendPayload { room_id, author, text, date, icon } = parse(kind, payload)?;
    Ok((room_id, NewMessage { author, text, date, icon }))
}
