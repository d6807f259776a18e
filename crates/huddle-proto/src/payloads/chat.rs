//! Chat message payload types.

use serde::{Deserialize, Serialize};

use super::{MAX_TEXT_LEN, Validate, require_non_empty};
use crate::errors::{ProtocolError, Result};

/// `send_message`: post text to a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    /// Message text.
    pub message: String,
    /// Target room hash.
    #[serde(rename = "roomId")]
    pub room_id: String,
}

/// `message`: a message posted by another participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Room hash the message belongs to.
    #[serde(rename = "roomId")]
    pub room_id: String,
    /// Author display name.
    pub author: String,
    /// Message text.
    pub text: String,
    /// Unix milliseconds.
    pub date: u64,
    /// Author avatar reference.
    pub icon: String,
}

impl Validate for ChatMessage {
    fn validate(&self) -> Result<()> {
        require_non_empty("roomId", &self.room_id)?;
        require_non_empty("author", &self.author)?;
        if self.text.len() > MAX_TEXT_LEN {
            return Err(ProtocolError::invalid("text", "exceeds maximum length"));
        }
        Ok(())
    }
}
