//! Room view state machine.
//!
//! This module defines the [`App`] state machine, which manages the room view
//! completely decoupled from I/O and transport mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! user intents, and produces [`crate::AppAction`] instructions for the
//! runtime to execute.
//!
//! # Responsibilities
//!
//! - Owns the session [`Store`] and dispatches actions into it.
//! - Tracks the current route and the view's ephemeral state (join alert,
//!   online users, typing indicators).
//! - Tracks high-level connection state for UI feedback and resyncs the
//!   viewed room after reconnecting.

use std::sync::Arc;

use huddle_core::{NewMessage, Room, SessionSnapshot, Store, StoreAction, User};

use crate::{ActiveRoom, AppAction, AppEvent, ConnectionState, JoinAlert, Route, ViewState};

/// Author label of messages sent from this client.
pub const SELF_AUTHOR: &str = "Me";

/// Name shown when the routed room is not in the rooms list.
pub const PLACEHOLDER_ROOM_NAME: &str = "room";

/// Room view state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Durable session state.
    store: Store,
    /// Ephemeral per-view state.
    view: ViewState,
    /// Current route.
    route: Route,
    /// Connection state.
    connection: ConnectionState,
    /// Whether inbound handlers are registered.
    mounted: bool,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create an App seeded with `snapshot`, starting at `route`.
    pub fn new(snapshot: SessionSnapshot, route: Route) -> Self {
        Self {
            store: Store::new(snapshot),
            view: ViewState::default(),
            route,
            connection: ConnectionState::Disconnected,
            mounted: false,
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Connecting => {
                self.connection = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::Connected => {
                self.connection = ConnectionState::Connected;
                self.status_message = None;
                let mut actions = self.resync();
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::Disconnected => {
                self.connection = ConnectionState::Disconnected;
                self.status_message = Some("Connection lost, retrying".into());
                vec![AppAction::Render]
            },
            AppEvent::RoomCreated { name, hash } => {
                let mut actions = self.dispatch(StoreAction::AddRoom { name, hash });
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::UserJoinedRoom { user, hash } => {
                if !self.is_current(&hash) {
                    return vec![];
                }
                self.view.alert = Some(JoinAlert { user_name: user.name });
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived { hash, message } => {
                let mut actions = self.dispatch(StoreAction::append_received(hash, message));
                if !actions.is_empty() {
                    actions.push(AppAction::Render);
                }
                actions
            },
            AppEvent::UsersInRoom { hash, users } => {
                if !self.is_current(&hash) {
                    return vec![];
                }
                self.view.online_users = users;
                vec![AppAction::Render]
            },
            AppEvent::TypingStarted { hash, user } => {
                if !self.is_current(&hash) {
                    return vec![];
                }
                self.view.add_typing_user(user);
                vec![AppAction::Render]
            },
            AppEvent::TypingStopped { hash, user } => {
                if !self.is_current(&hash) {
                    return vec![];
                }
                self.view.remove_typing_user(&user);
                vec![AppAction::Render]
            },
            AppEvent::MessageSent { hash, text, date, icon } => {
                let message = NewMessage { author: SELF_AUTHOR.to_string(), text, date, icon };
                let mut actions = self.dispatch(StoreAction::append_sent(hash, message));
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::LocalTypingChanged { typing } => {
                self.view.typing = typing;
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Register inbound handlers. Does nothing if already mounted.
    pub fn mount(&mut self) -> Vec<AppAction> {
        if self.mounted {
            return vec![];
        }
        self.mounted = true;
        vec![AppAction::Subscribe]
    }

    /// Drop inbound handlers and forget ephemeral view state.
    pub fn unmount(&mut self) -> Vec<AppAction> {
        if !self.mounted {
            return vec![];
        }
        self.mounted = false;
        self.view = ViewState::default();
        vec![AppAction::Unsubscribe]
    }

    /// Set the local user.
    ///
    /// If a room visit was interrupted to ask for a name, it resumes here.
    pub fn set_user(&mut self, name: &str, icon: &str) -> Vec<AppAction> {
        let name = name.trim();
        if name.is_empty() {
            self.status_message = Some("Name must not be empty".into());
            return vec![AppAction::Render];
        }

        let mut actions = self.dispatch(StoreAction::SetUser(User::new(name, icon)));
        if self.route == Route::Login {
            match self.snapshot().prev_url().map(str::to_owned) {
                Some(hash) => actions.extend(self.open_room(&hash)),
                None => actions.extend(self.navigate(Route::Landing)),
            }
        } else {
            actions.push(AppAction::Render);
        }
        actions
    }

    /// Ask the server for a new room owned by the local user.
    pub fn create_room(&mut self) -> Vec<AppAction> {
        let Some(user) = self.user().cloned() else {
            self.status_message = Some("Set a name first: /user <name>".into());
            return vec![AppAction::Render];
        };
        self.status_message = Some("Creating room...".into());
        vec![AppAction::CreateRoom { user }, AppAction::Render]
    }

    /// View a room by its hash.
    ///
    /// Unknown rooms are requested first. Joining is announced and the online
    /// user list requested. Without a user the visit is recorded and the
    /// route switches to login.
    pub fn open_room(&mut self, hash: &str) -> Vec<AppAction> {
        let hash = hash.trim();
        if hash.is_empty() {
            return vec![];
        }

        let mut actions = Vec::new();
        // Recorded on every visit; not persisted.
        self.store.dispatch(StoreAction::SetPrevUrl { id: hash.to_string() });

        if self.user().is_none() {
            self.status_message = Some("Set a name first: /user <name>".into());
            actions.extend(self.navigate(Route::Login));
            return actions;
        }

        if self.route.room_id() != Some(hash) {
            self.view.clear_room();
        }
        self.route = Route::Room(hash.to_string());
        actions.extend(self.room_requests());
        actions.push(AppAction::Navigate { route: self.route.clone() });
        actions.push(AppAction::Render);
        actions
    }

    /// Send `text` to the viewed room. Empty text is dropped.
    pub fn send_message(&mut self, text: &str) -> Vec<AppAction> {
        if text.is_empty() {
            return vec![];
        }
        let (Some(user), Some(hash)) = (self.user(), self.route.room_id()) else {
            self.status_message = Some("No room open".into());
            return vec![AppAction::Render];
        };

        vec![
            AppAction::SendMessage {
                hash: hash.to_string(),
                text: text.to_string(),
                icon: user.icon.clone(),
            },
            AppAction::Render,
        ]
    }

    /// Leave the viewed room and return to the landing route.
    pub fn leave_room(&mut self) -> Vec<AppAction> {
        let Some(hash) = self.route.room_id().map(str::to_owned) else {
            self.status_message = Some("No room open".into());
            return vec![AppAction::Render];
        };

        let remaining = self.snapshot().rooms_without(&hash);
        let mut actions = vec![AppAction::LeaveRoom { hash }];
        actions.extend(self.dispatch(StoreAction::ReplaceRooms(remaining)));
        self.view.clear_room();
        actions.extend(self.navigate(Route::Landing));
        actions
    }

    /// A keystroke in the message input of the viewed room.
    pub fn typing(&self) -> Vec<AppAction> {
        match (self.user(), self.route.room_id()) {
            (Some(user), Some(hash)) => {
                vec![AppAction::Keystroke { user: user.clone(), hash: hash.to_string() }]
            },
            _ => vec![],
        }
    }

    /// Open the room after the viewed one, wrapping around.
    pub fn cycle_room(&mut self) -> Vec<AppAction> {
        let rooms = self.snapshot().rooms();
        if rooms.is_empty() {
            return vec![];
        }

        let next = self
            .route
            .room_id()
            .and_then(|hash| self.snapshot().room_index(hash))
            .map_or(0, |idx| (idx + 1) % rooms.len());

        let hash = rooms[next].hash.clone();
        self.open_room(&hash)
    }

    /// Hide the join banner.
    pub fn dismiss_alert(&mut self) -> Vec<AppAction> {
        if self.view.alert.take().is_some() { vec![AppAction::Render] } else { vec![] }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Quit the application.
    pub fn quit(&mut self) -> Vec<AppAction> {
        let mut actions = self.unmount();
        actions.push(AppAction::Quit);
        actions
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> &Arc<SessionSnapshot> {
        self.store.state()
    }

    /// Joined rooms.
    pub fn rooms(&self) -> &[Room] {
        self.snapshot().rooms()
    }

    /// Local user. `None` until a name is set.
    pub fn user(&self) -> Option<&User> {
        self.snapshot().user()
    }

    /// Current route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The routed room, looked up fresh against the rooms list.
    pub fn active_room(&self) -> ActiveRoom<'_> {
        match self.route.room_id().and_then(|hash| self.snapshot().room(hash)) {
            Some(room) => ActiveRoom { name: &room.name, messages: &room.messages, known: true },
            None => ActiveRoom { name: PLACEHOLDER_ROOM_NAME, messages: &[], known: false },
        }
    }

    /// Ephemeral view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Whether inbound handlers are registered.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    fn is_current(&self, hash: &str) -> bool {
        self.route.room_id() == Some(hash)
    }

    fn dispatch(&mut self, action: StoreAction) -> Vec<AppAction> {
        if self.store.dispatch(action) { vec![AppAction::Persist] } else { vec![] }
    }

    fn navigate(&mut self, route: Route) -> Vec<AppAction> {
        self.route = route.clone();
        vec![AppAction::Navigate { route }, AppAction::Render]
    }

    /// Requests that (re)attach us to the routed room.
    fn room_requests(&self) -> Vec<AppAction> {
        let (Some(user), Some(hash)) = (self.user(), self.route.room_id()) else {
            return vec![];
        };

        let mut actions = Vec::with_capacity(3);
        if !self.snapshot().contains_room(hash) {
            actions.push(AppAction::RequestRoom { hash: hash.to_string() });
        }
        actions.push(AppAction::JoinRoom { user: user.clone(), hash: hash.to_string() });
        actions.push(AppAction::RequestUsersInRoom { hash: hash.to_string() });
        actions
    }

    fn resync(&mut self) -> Vec<AppAction> {
        if self.user().is_none()
            && let Some(hash) = self.route.room_id().map(str::to_owned)
        {
            return self.open_room(&hash);
        }
        self.room_requests()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> NewMessage {
        NewMessage { author: "Bo".into(), text: text.into(), date: 5, icon: "b.png".into() }
    }

    fn app_in_room() -> App {
        let snapshot =
            SessionSnapshot::new(
                Some(User::new("Ann", "a.png")),
                vec![Room::new("R1", "h1")],
                None,
            );
        App::new(snapshot, Route::Room("h1".into()))
    }

    #[test]
    fn room_created_adds_room_and_persists() {
        let mut app = App::new(SessionSnapshot::default(), Route::Landing);
        let actions = app.handle(AppEvent::RoomCreated { name: "R2".into(), hash: "h2".into() });

        assert_eq!(actions, vec![AppAction::Persist, AppAction::Render]);
        assert_eq!(app.rooms(), &[Room::new("R2", "h2")]);
    }

    #[test]
    fn repeated_room_event_appends_again() {
        let mut app = App::new(SessionSnapshot::default(), Route::Landing);
        let _ = app.handle(AppEvent::RoomCreated { name: "R2".into(), hash: "h2".into() });
        let _ = app.handle(AppEvent::RoomCreated { name: "R2".into(), hash: "h2".into() });

        assert_eq!(app.rooms().len(), 2);
        // Lookups still resolve to the first copy.
        assert_eq!(app.snapshot().room_index("h2"), Some(0));
    }

    #[test]
    fn join_alert_only_for_current_room() {
        let mut app = app_in_room();

        let actions = app.handle(AppEvent::UserJoinedRoom {
            user: User::new("Bo", "b.png"),
            hash: "other".into(),
        });
        assert!(actions.is_empty());
        assert!(app.view().alert.is_none());

        let _ = app
            .handle(AppEvent::UserJoinedRoom { user: User::new("Bo", "b.png"), hash: "h1".into() });
        assert_eq!(app.view().alert, Some(JoinAlert { user_name: "Bo".into() }));

        assert_eq!(app.dismiss_alert(), vec![AppAction::Render]);
        assert!(app.view().alert.is_none());
    }

    #[test]
    fn received_message_for_unknown_room_is_ignored() {
        let mut app = app_in_room();
        let before = Arc::clone(app.snapshot());

        let actions =
            app.handle(AppEvent::MessageReceived { hash: "nope".into(), message: message("x") });

        assert!(actions.is_empty());
        assert!(Arc::ptr_eq(&before, app.snapshot()));
    }

    #[test]
    fn typing_users_tracked_for_current_room() {
        let mut app = app_in_room();

        let _ = app.handle(AppEvent::TypingStarted { hash: "h1".into(), user: "Bo".into() });
        let _ = app.handle(AppEvent::TypingStarted { hash: "h1".into(), user: "Bo".into() });
        let _ = app.handle(AppEvent::TypingStarted { hash: "h2".into(), user: "Cy".into() });
        assert_eq!(app.view().typing_users, vec!["Bo".to_string()]);

        let _ = app.handle(AppEvent::TypingStopped { hash: "h1".into(), user: "Bo".into() });
        assert!(app.view().typing_users.is_empty());
    }

    #[test]
    fn users_in_room_replaces_list() {
        let mut app = app_in_room();
        let _ = app.handle(AppEvent::UsersInRoom {
            hash: "h1".into(),
            users: vec![User::new("Bo", "b"), User::new("Cy", "c")],
        });
        let _ = app
            .handle(AppEvent::UsersInRoom { hash: "h1".into(), users: vec![User::new("Cy", "c")] });

        assert_eq!(app.view().online_users, vec![User::new("Cy", "c")]);
    }

    #[test]
    fn open_unknown_room_requests_it_first() {
        let mut app = app_in_room();
        let actions = app.open_room("h9");

        assert_eq!(actions, vec![
            AppAction::RequestRoom { hash: "h9".into() },
            AppAction::JoinRoom { user: User::new("Ann", "a.png"), hash: "h9".into() },
            AppAction::RequestUsersInRoom { hash: "h9".into() },
            AppAction::Navigate { route: Route::Room("h9".into()) },
            AppAction::Render,
        ]);
        assert_eq!(app.snapshot().prev_url(), Some("h9"));
    }

    #[test]
    fn open_known_room_skips_request() {
        let mut app = App::new(
            SessionSnapshot::new(Some(User::new("Ann", "a")), vec![Room::new("R1", "h1")], None),
            Route::Landing,
        );
        let actions = app.open_room("h1");

        assert!(matches!(actions.as_slice(), [
            AppAction::JoinRoom { .. },
            AppAction::RequestUsersInRoom { .. },
            AppAction::Navigate { .. },
            AppAction::Render
        ]));
    }

    #[test]
    fn open_room_without_user_redirects_to_login() {
        let mut app = App::new(SessionSnapshot::default(), Route::Landing);
        let actions = app.open_room("h1");

        assert_eq!(actions, vec![AppAction::Navigate { route: Route::Login }, AppAction::Render]);
        assert_eq!(app.snapshot().prev_url(), Some("h1"));

        let actions = app.set_user("Ann", "a.png");
        assert_eq!(app.route(), &Route::Room("h1".into()));
        assert!(actions.contains(&AppAction::JoinRoom {
            user: User::new("Ann", "a.png"),
            hash: "h1".into()
        }));
    }

    #[test]
    fn send_empty_message_is_dropped() {
        let mut app = app_in_room();
        assert!(app.send_message("").is_empty());
    }

    #[test]
    fn message_sent_appends_locally_with_self_author() {
        let mut app = app_in_room();
        let actions = app.send_message("hi");
        assert_eq!(actions[0], AppAction::SendMessage {
            hash: "h1".into(),
            text: "hi".into(),
            icon: "a.png".into()
        });

        let _ = app.handle(AppEvent::MessageSent {
            hash: "h1".into(),
            text: "hi".into(),
            date: 1000,
            icon: "a.png".into(),
        });

        let room = app.active_room();
        assert_eq!(room.messages.len(), 1);
        assert_eq!(room.messages[0].author, SELF_AUTHOR);
        assert_eq!(room.messages[0].is_my_message, Some(true));
    }

    #[test]
    fn leave_room_drops_room_and_goes_home() {
        let mut app = app_in_room();
        let actions = app.leave_room();

        assert_eq!(actions, vec![
            AppAction::LeaveRoom { hash: "h1".into() },
            AppAction::Persist,
            AppAction::Navigate { route: Route::Landing },
            AppAction::Render,
        ]);
        assert!(app.rooms().is_empty());
        assert_eq!(app.route(), &Route::Landing);
    }

    #[test]
    fn active_room_falls_back_to_placeholder() {
        let app = App::new(SessionSnapshot::default(), Route::Room("ghost".into()));
        let room = app.active_room();

        assert_eq!(room.name, PLACEHOLDER_ROOM_NAME);
        assert!(room.messages.is_empty());
        assert!(!room.known);
    }

    #[test]
    fn mount_is_idempotent() {
        let mut app = app_in_room();
        assert_eq!(app.mount(), vec![AppAction::Subscribe]);
        assert!(app.mount().is_empty());
        assert_eq!(app.unmount(), vec![AppAction::Unsubscribe]);
        assert!(app.unmount().is_empty());
    }

    #[test]
    fn reconnect_resyncs_current_room() {
        let mut app = app_in_room();
        let _ = app.handle(AppEvent::Disconnected);
        assert_eq!(app.connection_state(), ConnectionState::Disconnected);

        let actions = app.handle(AppEvent::Connected);
        assert_eq!(actions, vec![
            AppAction::JoinRoom { user: User::new("Ann", "a.png"), hash: "h1".into() },
            AppAction::RequestUsersInRoom { hash: "h1".into() },
            AppAction::Render,
        ]);
    }

    #[test]
    fn cycle_room_wraps_around() {
        let snapshot = SessionSnapshot::new(
            Some(User::new("Ann", "a")),
            vec![Room::new("R1", "h1"), Room::new("R2", "h2")],
            None,
        );
        let mut app = App::new(snapshot, Route::Room("h2".into()));

        let _ = app.cycle_room();
        assert_eq!(app.route(), &Route::Room("h1".into()));
        let _ = app.cycle_room();
        assert_eq!(app.route(), &Route::Room("h2".into()));
    }
}
