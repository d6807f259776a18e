//! CBOR-encoded event payloads.
//!
//! The event name lives in the [`Envelope`]; payloads serialize only the inner
//! struct (no variant tag). [`Outbound`] covers what the client emits and
//! [`Inbound`] covers what it subscribes to.
//!
//! # Invariants
//!
//! Each variant maps to exactly one [`EventName`] (enforced by match
//! exhaustiveness). An inbound payload is only returned from
//! [`Inbound::from_envelope`] after it passed [`Validate`].

pub mod chat;
pub mod room;
pub mod typing;

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Direction, Envelope, EventName,
    errors::{ProtocolError, Result},
};

/// Longest message text accepted from the transport, in bytes.
pub const MAX_TEXT_LEN: usize = 4096;

/// Shape check applied to decoded inbound payloads.
pub trait Validate {
    /// Returns an error if the payload is structurally valid CBOR but not
    /// usable (empty identifiers, oversized text).
    fn validate(&self) -> Result<()>;
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProtocolError::invalid(field, "must not be empty"));
    }
    Ok(())
}

/// Events the client emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// `create_room`
    CreateRoom(room::CreateRoom),
    /// `get_room`
    GetRoom(room::GetRoom),
    /// `join_room`
    JoinRoom(room::JoinRoom),
    /// `get_users_in_room`
    GetUsersInRoom(room::GetUsersInRoom),
    /// `send_message`
    SendMessage(chat::SendMessage),
    /// `leave_room`
    LeaveRoom(room::LeaveRoom),
    /// `start_typing`
    StartTyping(typing::TypingSignal),
    /// `stop_typing`
    StopTyping(typing::TypingSignal),
}

impl Outbound {
    /// Event name for this payload.
    #[must_use]
    pub const fn name(&self) -> EventName {
        match self {
            Self::CreateRoom(_) => EventName::CreateRoom,
            Self::GetRoom(_) => EventName::GetRoom,
            Self::JoinRoom(_) => EventName::JoinRoom,
            Self::GetUsersInRoom(_) => EventName::GetUsersInRoom,
            Self::SendMessage(_) => EventName::SendMessage,
            Self::LeaveRoom(_) => EventName::LeaveRoom,
            Self::StartTyping(_) => EventName::StartTyping,
            Self::StopTyping(_) => EventName::StopTyping,
        }
    }

    /// Encode the payload and wrap it in an envelope.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::CborEncode` if serialization fails
    pub fn into_envelope(self) -> Result<Envelope> {
        let name = self.name();
        let payload = match &self {
            Self::CreateRoom(inner) => encode(inner),
            Self::GetRoom(inner) => encode(inner),
            Self::JoinRoom(inner) => encode(inner),
            Self::GetUsersInRoom(inner) => encode(inner),
            Self::SendMessage(inner) => encode(inner),
            Self::LeaveRoom(inner) => encode(inner),
            Self::StartTyping(inner) | Self::StopTyping(inner) => encode(inner),
        }?;
        Ok(Envelope::new(name, payload))
    }

    /// Decode an outbound envelope. Used by peers that receive client events.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::WrongDirection` for inbound names
    /// - `ProtocolError::CborDecode` if the payload has the wrong shape
    pub fn from_envelope(envelope: &Envelope) -> Result<Self> {
        let bytes = &envelope.payload[..];
        let payload = match envelope.name {
            EventName::CreateRoom => Self::CreateRoom(decode(bytes)?),
            EventName::GetRoom => Self::GetRoom(decode(bytes)?),
            EventName::JoinRoom => Self::JoinRoom(decode(bytes)?),
            EventName::GetUsersInRoom => Self::GetUsersInRoom(decode(bytes)?),
            EventName::SendMessage => Self::SendMessage(decode(bytes)?),
            EventName::LeaveRoom => Self::LeaveRoom(decode(bytes)?),
            EventName::StartTyping => Self::StartTyping(decode(bytes)?),
            EventName::StopTyping => Self::StopTyping(decode(bytes)?),
            other => return Err(wrong_direction(other, Direction::Outbound)),
        };
        Ok(payload)
    }
}

/// Events the client subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// `room`
    Room(room::RoomInfo),
    /// `user_join_room`
    UserJoinRoom(room::UserJoinedRoom),
    /// `message`
    Message(chat::ChatMessage),
    /// `users_in_room`
    UsersInRoom(room::UsersInRoom),
    /// `typing_on`
    TypingOn(typing::TypingNotice),
    /// `typing_off`
    TypingOff(typing::TypingNotice),
}

impl Inbound {
    /// Event name for this payload.
    #[must_use]
    pub const fn name(&self) -> EventName {
        match self {
            Self::Room(_) => EventName::Room,
            Self::UserJoinRoom(_) => EventName::UserJoinRoom,
            Self::Message(_) => EventName::Message,
            Self::UsersInRoom(_) => EventName::UsersInRoom,
            Self::TypingOn(_) => EventName::TypingOn,
            Self::TypingOff(_) => EventName::TypingOff,
        }
    }

    /// Encode the payload and wrap it in an envelope. Used by peers and
    /// simulation to produce server events.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::CborEncode` if serialization fails
    pub fn into_envelope(self) -> Result<Envelope> {
        let name = self.name();
        let payload = match &self {
            Self::Room(inner) => encode(inner),
            Self::UserJoinRoom(inner) => encode(inner),
            Self::Message(inner) => encode(inner),
            Self::UsersInRoom(inner) => encode(inner),
            Self::TypingOn(inner) | Self::TypingOff(inner) => encode(inner),
        }?;
        Ok(Envelope::new(name, payload))
    }

    /// Decode and validate an inbound envelope.
    ///
    /// # Security
    ///
    /// Inbound events are not trusted: the payload must deserialize into the
    /// exact struct for its name and then pass [`Validate`]. Nothing partially
    /// decoded is ever returned.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::WrongDirection` for outbound names
    /// - `ProtocolError::CborDecode` if the payload has the wrong shape
    /// - `ProtocolError::Invalid` if validation fails
    pub fn from_envelope(envelope: &Envelope) -> Result<Self> {
        let bytes = &envelope.payload[..];
        let payload = match envelope.name {
            EventName::Room => Self::Room(decode_valid(bytes)?),
            EventName::UserJoinRoom => Self::UserJoinRoom(decode_valid(bytes)?),
            EventName::Message => Self::Message(decode_valid(bytes)?),
            EventName::UsersInRoom => Self::UsersInRoom(decode_valid(bytes)?),
            EventName::TypingOn => Self::TypingOn(decode_valid(bytes)?),
            EventName::TypingOff => Self::TypingOff(decode_valid(bytes)?),
            other => return Err(wrong_direction(other, Direction::Inbound)),
        };
        Ok(payload)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf)
        .map_err(|e| ProtocolError::CborEncode(e.to_string()))?;
    Ok(buf)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.len() > Envelope::MAX_PAYLOAD_SIZE {
        return Err(ProtocolError::PayloadTooLarge {
            size: bytes.len(),
            max: Envelope::MAX_PAYLOAD_SIZE,
        });
    }
    ciborium::de::from_reader(bytes).map_err(|e| ProtocolError::CborDecode(e.to_string()))
}

fn decode_valid<T: DeserializeOwned + Validate>(bytes: &[u8]) -> Result<T> {
    let value: T = decode(bytes)?;
    value.validate()?;
    Ok(value)
}

fn wrong_direction(name: EventName, expected: Direction) -> ProtocolError {
    ProtocolError::WrongDirection { name: name.as_str(), expected: expected.as_str() }
}

#[cfg(test)]
mod tests {
    use super::{
        chat::ChatMessage,
        room::{RoomInfo, UserProfile},
        typing::TypingNotice,
        *,
    };

    fn user(name: &str) -> UserProfile {
        UserProfile { name: name.into(), icon: "icon.png".into() }
    }

    #[test]
    fn inbound_message_round_trip() {
        let inbound = Inbound::Message(ChatMessage {
            room_id: "h1".into(),
            author: "Ann".into(),
            text: "hello".into(),
            date: 1_000,
            icon: "a.png".into(),
        });

        let envelope = inbound.clone().into_envelope().unwrap();
        assert_eq!(envelope.name, EventName::Message);
        assert_eq!(Inbound::from_envelope(&envelope).unwrap(), inbound);
    }

    #[test]
    fn inbound_rejects_empty_hash() {
        let envelope = Inbound::TypingOn(TypingNotice { user: user("Bo"), hash: String::new() })
            .into_envelope()
            .unwrap();

        assert_eq!(
            Inbound::from_envelope(&envelope),
            Err(ProtocolError::invalid("hash", "must not be empty"))
        );
    }

    #[test]
    fn inbound_rejects_wrong_shape() {
        // A `room` payload delivered under the `message` name.
        let room = Inbound::Room(RoomInfo { name: "R".into(), hash: "h".into() })
            .into_envelope()
            .unwrap();
        let mislabeled = Envelope::new(EventName::Message, room.payload);

        assert!(matches!(Inbound::from_envelope(&mislabeled), Err(ProtocolError::CborDecode(_))));
    }

    #[test]
    fn inbound_rejects_outbound_name() {
        let envelope = Outbound::LeaveRoom(room::LeaveRoom { hash: "h".into() })
            .into_envelope()
            .unwrap();

        assert!(matches!(
            Inbound::from_envelope(&envelope),
            Err(ProtocolError::WrongDirection { name: "leave_room", .. })
        ));
    }

    #[test]
    fn send_message_uses_room_id_field_name() {
        let envelope = Outbound::SendMessage(chat::SendMessage {
            message: "hi".into(),
            room_id: "h1".into(),
        })
        .into_envelope()
        .unwrap();

        let value: ciborium::Value = ciborium::de::from_reader(&envelope.payload[..]).unwrap();
        let keys: Vec<String> = value
            .as_map()
            .unwrap()
            .iter()
            .filter_map(|(k, _)| k.as_text().map(str::to_owned))
            .collect();
        assert!(keys.contains(&"roomId".to_string()));
        assert!(keys.contains(&"message".to_string()));
    }

    #[test]
    fn oversized_text_rejected() {
        let envelope = Inbound::Message(ChatMessage {
            room_id: "h1".into(),
            author: "Ann".into(),
            text: "x".repeat(MAX_TEXT_LEN + 1),
            date: 0,
            icon: String::new(),
        })
        .into_envelope()
        .unwrap();

        assert!(matches!(
            Inbound::from_envelope(&envelope),
            Err(ProtocolError::Invalid { field: "text", .. })
        ));
    }
}
