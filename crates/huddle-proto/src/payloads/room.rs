//! Room and presence payload types.

use serde::{Deserialize, Serialize};

use super::{Validate, require_non_empty};
use crate::errors::Result;

/// Public identity of a chat participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Avatar image reference.
    pub icon: String,
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<()> {
        require_non_empty("user.name", &self.name)
    }
}

/// Reference to a room by its join key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRef {
    /// Room hash.
    pub hash: String,
}

impl Validate for RoomRef {
    fn validate(&self) -> Result<()> {
        require_non_empty("room.hash", &self.hash)
    }
}

/// `create_room`: ask the server to create a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoom {
    /// Creator.
    pub user: UserProfile,
}

/// `get_room`: ask for a room that is not in the local list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRoom {
    /// Room hash.
    pub hash: String,
}

/// `join_room`: announce the user entered a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoom {
    /// Joining user.
    pub user: UserProfile,
    /// Target room.
    pub room: RoomRef,
}

/// `get_users_in_room`: ask for the online users of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUsersInRoom {
    /// Room hash.
    pub id: String,
}

/// `leave_room`: leave a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRoom {
    /// Room hash.
    pub hash: String,
}

/// `room`: a room exists (broadcast after creation or reply to `get_room`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Display name.
    pub name: String,
    /// Room hash.
    pub hash: String,
}

impl Validate for RoomInfo {
    fn validate(&self) -> Result<()> {
        require_non_empty("room.name", &self.name)?;
        require_non_empty("room.hash", &self.hash)
    }
}

/// `user_join_room`: someone entered a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserJoinedRoom {
    /// Joining user.
    pub user: UserProfile,
    /// Room entered.
    pub room: RoomRef,
}

impl Validate for UserJoinedRoom {
    fn validate(&self) -> Result<()> {
        self.user.validate()?;
        self.room.validate()
    }
}

/// `users_in_room`: online-user snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersInRoom {
    /// Room hash.
    pub hash: String,
    /// Users currently online in the room.
    pub users: Vec<UserProfile>,
}

impl Validate for UsersInRoom {
    fn validate(&self) -> Result<()> {
        require_non_empty("hash", &self.hash)?;
        self.users.iter().try_for_each(Validate::validate)
    }
}
