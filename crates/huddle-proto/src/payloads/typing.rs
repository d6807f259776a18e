//! Typing indicator payload types.

use serde::{Deserialize, Serialize};

use super::{Validate, require_non_empty};
use crate::{errors::Result, payloads::room::UserProfile};

/// `start_typing` / `stop_typing`: local user typing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingSignal {
    /// Typing user.
    pub user: UserProfile,
    /// Room the user is typing in.
    #[serde(rename = "roomId")]
    pub room_id: String,
}

/// `typing_on` / `typing_off`: remote user typing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingNotice {
    /// Typing user.
    pub user: UserProfile,
    /// Room hash.
    pub hash: String,
}

impl Validate for TypingNotice {
    fn validate(&self) -> Result<()> {
        self.user.validate()?;
        require_non_empty("hash", &self.hash)
    }
}
