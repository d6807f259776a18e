//! Application side-effects and intents.
//!
//! [`AppAction`] values are instructions produced by the [`crate::App`] state
//! machine. Protocol actions are turned into named events by
//! [`crate::Bridge`]; the rest are executed by the runtime's driver.

use huddle_core::{RoomHash, User};

use crate::Route;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Replace the active route.
    Navigate {
        /// New route.
        route: Route,
    },

    /// Write user and rooms back to session storage.
    Persist,

    /// Register inbound event handlers.
    Subscribe,

    /// Drop inbound event handlers.
    Unsubscribe,

    /// Ask the server to create a room (`create_room`).
    CreateRoom {
        /// Creating user.
        user: User,
    },

    /// Ask the server for a room we do not know yet (`get_room`).
    RequestRoom {
        /// Room hash.
        hash: RoomHash,
    },

    /// Announce that we joined a room (`join_room`).
    JoinRoom {
        /// Joining user.
        user: User,
        /// Room hash.
        hash: RoomHash,
    },

    /// Ask for the online users of a room (`get_users_in_room`).
    RequestUsersInRoom {
        /// Room hash.
        hash: RoomHash,
    },

    /// Send a chat message (`send_message`).
    SendMessage {
        /// Room hash.
        hash: RoomHash,
        /// Message text. Never empty.
        text: String,
        /// Sender icon, used for the optimistic local copy.
        icon: String,
    },

    /// Leave a room (`leave_room`).
    LeaveRoom {
        /// Room hash.
        hash: RoomHash,
    },

    /// A keystroke in the message input. Drives the typing debounce.
    Keystroke {
        /// Typing user.
        user: User,
        /// Room being typed in.
        hash: RoomHash,
    },
}
