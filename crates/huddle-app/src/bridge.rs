//! Protocol-to-Application translation layer.
//!
//! The [`Bridge`] adapts the named-event transport to the room view
//! lifecycle.
//!
//! # Responsibilities
//!
//! - Converts protocol [`crate::AppAction`]s into outbound
//!   [`huddle_proto::Envelope`]s, accumulated until the driver sends them in
//!   the next I/O cycle.
//! - Validates inbound envelopes and converts them into [`crate::AppEvent`]s.
//!   Nothing reaches the App unless its shape check passed and a handler is
//!   mounted for its name.
//! - Owns the typing debounce, driven generically by the environment's
//!   instant type so simulation can use virtual time.

use std::time::Duration;

use huddle_core::{Environment, NewMessage, RoomHash, User};
use huddle_proto::{
    Envelope, Inbound, Outbound,
    payloads::{
        chat::SendMessage,
        room::{CreateRoom, GetRoom, GetUsersInRoom, JoinRoom, LeaveRoom, RoomRef, UserProfile},
        typing::TypingSignal,
    },
};

use crate::{
    AppAction, AppEvent, DEFAULT_TYPING_WINDOW, Keystroke, Subscriptions, TypingDebounce,
};

/// Bridge between the App and the transport.
///
/// Generic over Environment to support both production and simulation.
/// The Instant type is determined by the Environment's associated type.
pub struct Bridge<E: Environment> {
    env: E,
    outgoing: Vec<Envelope>,
    typing: TypingDebounce<E::Instant>,
    /// Who is typing where, while a burst is active.
    typing_target: Option<(User, RoomHash)>,
    subscriptions: Subscriptions,
}

impl<E: Environment> Bridge<E> {
    /// Create a bridge with the default typing window.
    pub fn new(env: E) -> Self {
        Self::with_typing_window(env, DEFAULT_TYPING_WINDOW)
    }

    /// Create a bridge with a custom typing window.
    pub fn with_typing_window(env: E, window: Duration) -> Self {
        Self {
            env,
            outgoing: Vec::new(),
            typing: TypingDebounce::new(window),
            typing_target: None,
            subscriptions: Subscriptions::new(),
        }
    }

    /// Inbound handler set.
    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    /// Whether a local typing burst is active.
    pub fn is_typing(&self) -> bool {
        self.typing.is_active()
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        match action {
            AppAction::Subscribe => {
                let added = self.subscriptions.mount();
                tracing::info!(handlers = added, "room view mounted");
                vec![]
            },
            AppAction::Unsubscribe => {
                let removed = self.subscriptions.unmount();
                tracing::info!(handlers = removed, "room view unmounted");
                vec![]
            },
            AppAction::CreateRoom { user } => {
                self.send(Outbound::CreateRoom(CreateRoom { user: profile(&user) }))
            },
            AppAction::RequestRoom { hash } => self.send(Outbound::GetRoom(GetRoom { hash })),
            AppAction::JoinRoom { user, hash } => self.send(Outbound::JoinRoom(JoinRoom {
                user: profile(&user),
                room: RoomRef { hash },
            })),
            AppAction::RequestUsersInRoom { hash } => {
                self.send(Outbound::GetUsersInRoom(GetUsersInRoom { id: hash }))
            },
            AppAction::SendMessage { hash, text, icon } => {
                let mut events = self.send(Outbound::SendMessage(SendMessage {
                    message: text.clone(),
                    room_id: hash.clone(),
                }));
                if events.is_empty() {
                    let date = self.env.wall_clock_millis();
                    events.push(AppEvent::MessageSent { hash, text, date, icon });
                }
                events
            },
            AppAction::LeaveRoom { hash } => {
                let mut events = Vec::new();
                if self.typing_target.as_ref().is_some_and(|(_, target)| *target == hash) {
                    events.extend(self.stop_typing());
                }
                events.extend(self.send(Outbound::LeaveRoom(LeaveRoom { hash })));
                events
            },
            AppAction::Keystroke { user, hash } => self.keystroke(user, hash),
            AppAction::Render
            | AppAction::Quit
            | AppAction::Navigate { .. }
            | AppAction::Persist => vec![],
        }
    }

    /// Handle an envelope from the transport.
    pub fn handle_envelope(&mut self, envelope: &Envelope) -> Vec<AppEvent> {
        if !self.subscriptions.accepts(envelope.name) {
            tracing::debug!(event = %envelope.name, "no handler mounted, dropping");
            return vec![];
        }

        match Inbound::from_envelope(envelope) {
            Ok(inbound) => vec![translate(inbound)],
            Err(e) => {
                tracing::warn!(event = %envelope.name, error = %e, "rejected inbound event");
                vec![]
            },
        }
    }

    /// Process a time tick. Ends the typing burst once its window elapsed.
    pub fn handle_tick(&mut self, now: E::Instant) -> Vec<AppEvent> {
        if !self.typing.poll(now) {
            return vec![];
        }
        match self.typing_target.take() {
            Some((user, hash)) => {
                let mut events = self.send(Outbound::StopTyping(signal(&user, hash)));
                events.push(AppEvent::LocalTypingChanged { typing: false });
                events
            },
            None => vec![AppEvent::LocalTypingChanged { typing: false }],
        }
    }

    /// Take pending outgoing envelopes.
    pub fn take_outgoing(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.outgoing)
    }

    fn keystroke(&mut self, user: User, hash: RoomHash) -> Vec<AppEvent> {
        let mut events = Vec::new();

        // Typing moved to another room: close the old burst first.
        if self.typing_target.as_ref().is_some_and(|(_, target)| *target != hash) {
            events.extend(self.stop_typing());
        }

        let outcome = self.typing.keystroke(self.env.now());
        if outcome == Keystroke::Restarted
            && let Some((previous, target)) = self.typing_target.take()
        {
            // The old burst went idle before any tick saw it.
            events.extend(self.send(Outbound::StopTyping(signal(&previous, target))));
        }
        if outcome.starts() {
            events.extend(self.send(Outbound::StartTyping(signal(&user, hash.clone()))));
            events.push(AppEvent::LocalTypingChanged { typing: true });
        }
        self.typing_target = Some((user, hash));
        events
    }

    /// End the current burst immediately.
    fn stop_typing(&mut self) -> Vec<AppEvent> {
        self.typing.cancel();
        let Some((user, hash)) = self.typing_target.take() else {
            return vec![];
        };
        let mut events = self.send(Outbound::StopTyping(signal(&user, hash)));
        events.push(AppEvent::LocalTypingChanged { typing: false });
        events
    }

    /// Queue an outbound event. Returns an error event if it cannot be
    /// encoded.
    fn send(&mut self, outbound: Outbound) -> Vec<AppEvent> {
        let name = outbound.name();
        match outbound.into_envelope() {
            Ok(envelope) => {
                self.outgoing.push(envelope);
                vec![]
            },
            Err(e) => {
                tracing::error!(event = %name, error = %e, "failed to encode outbound event");
                vec![AppEvent::Error { message: format!("{name}: {e}") }]
            },
        }
    }
}

fn profile(user: &User) -> UserProfile {
    UserProfile { name: user.name.clone(), icon: user.icon.clone() }
}

fn signal(user: &User, room_id: RoomHash) -> TypingSignal {
    TypingSignal { user: profile(user), room_id }
}

fn user(profile: UserProfile) -> User {
    User::new(profile.name, profile.icon)
}

fn translate(inbound: Inbound) -> AppEvent {
    match inbound {
        Inbound::Room(room) => AppEvent::RoomCreated { name: room.name, hash: room.hash },
        Inbound::UserJoinRoom(joined) => {
            AppEvent::UserJoinedRoom { user: user(joined.user), hash: joined.room.hash }
        },
        Inbound::Message(message) => AppEvent::MessageReceived {
            hash: message.room_id,
            message: NewMessage {
                author: message.author,
                text: message.text,
                date: message.date,
                icon: message.icon,
            },
        },
        Inbound::UsersInRoom(online) => AppEvent::UsersInRoom {
            hash: online.hash,
            users: online.users.into_iter().map(user).collect(),
        },
        Inbound::TypingOn(notice) => {
            AppEvent::TypingStarted { hash: notice.hash, user: notice.user.name }
        },
        Inbound::TypingOff(notice) => {
            AppEvent::TypingStopped { hash: notice.hash, user: notice.user.name }
        },
    }
}
