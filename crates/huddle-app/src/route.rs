//! Client routes.

use std::fmt;

use huddle_core::RoomHash;

/// Where the client is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Landing view: room list, nothing open.
    #[default]
    Landing,
    /// Asking the user to identify before continuing.
    Login,
    /// Viewing the room with this hash.
    Room(RoomHash),
}

impl Route {
    /// Room identifier carried by this route, if any.
    pub fn room_id(&self) -> Option<&str> {
        match self {
            Self::Room(hash) => Some(hash),
            Self::Landing | Self::Login => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Landing => f.write_str("/"),
            Self::Login => f.write_str("/login"),
            Self::Room(hash) => write!(f, "/room/{hash}"),
        }
    }
}
