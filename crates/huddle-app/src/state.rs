//! Observable view state types.
//!
//! Everything here is ephemeral: it lives as long as the room view and is
//! never written to session storage. Durable data (user, rooms, messages)
//! lives in the [`huddle_core::Store`].

use huddle_core::{Message, User};

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected to the transport.
    #[default]
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Connected.
    Connected,
}

/// Banner announcing that someone entered the viewed room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinAlert {
    /// Name of the user who joined.
    pub user_name: String,
}

/// Per-view transient state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Visible join banner. `None` when hidden.
    pub alert: Option<JoinAlert>,
    /// Users online in the viewed room, as last reported.
    pub online_users: Vec<User>,
    /// Whether the local user is in a typing burst.
    pub typing: bool,
    /// Names of remote users typing in the viewed room.
    pub typing_users: Vec<String>,
}

impl ViewState {
    /// Reset everything tied to the viewed room. The local typing flag is
    /// owned by the bridge's debounce and survives.
    pub fn clear_room(&mut self) {
        self.alert = None;
        self.online_users.clear();
        self.typing_users.clear();
    }

    /// Add a typing user once.
    pub fn add_typing_user(&mut self, name: String) {
        if !self.typing_users.contains(&name) {
            self.typing_users.push(name);
        }
    }

    /// Remove a typing user by identity (name).
    pub fn remove_typing_user(&mut self, name: &str) {
        self.typing_users.retain(|n| n != name);
    }
}

/// The room being displayed, resolved against the store on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveRoom<'a> {
    /// Room name, or a placeholder if the room is not known locally.
    pub name: &'a str,
    /// Messages, or empty if the room is not known locally.
    pub messages: &'a [Message],
    /// Whether the room was found in the store.
    pub known: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_users_are_unique() {
        let mut view = ViewState::default();
        view.add_typing_user("Bo".into());
        view.add_typing_user("Bo".into());
        view.add_typing_user("Cy".into());

        assert_eq!(view.typing_users, vec!["Bo".to_string(), "Cy".to_string()]);

        view.remove_typing_user("Bo");
        assert_eq!(view.typing_users, vec!["Cy".to_string()]);
    }

    #[test]
    fn clear_room_keeps_local_typing_flag() {
        let mut view = ViewState {
            alert: Some(JoinAlert { user_name: "Bo".into() }),
            online_users: vec![User::new("Bo", "b.png")],
            typing: true,
            typing_users: vec!["Bo".into()],
        };

        view.clear_room();

        assert!(view.alert.is_none());
        assert!(view.online_users.is_empty());
        assert!(view.typing_users.is_empty());
        assert!(view.typing);
    }
}
