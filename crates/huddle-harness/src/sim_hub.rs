//! Scripted chat hub.
//!
//! `SimHub` plays the server side of the named-event transport as a pure
//! state machine: it takes one outbound client envelope and returns the
//! inbound envelopes to deliver, each addressed to a client. Room hashes come
//! from a seeded RNG so runs are reproducible.
//!
//! Routing rules:
//! - `create_room` and `get_room` reply to the requester with `room`.
//! - `join_room` adds the user to the room, tells the other members with
//!   `user_join_room` and refreshes everyone's `users_in_room`.
//! - `send_message`, `start_typing` and `stop_typing` fan out to the other
//!   members. The sender already appended its own message.
//! - `leave_room` and disconnects refresh `users_in_room` for whoever
//!   remains.
//! - Requests naming unknown rooms or non-members are dropped.

use std::collections::{BTreeMap, BTreeSet};

use huddle_proto::{
    Envelope, Inbound, Outbound,
    payloads::{
        chat::ChatMessage,
        room::{RoomInfo, RoomRef, UserJoinedRoom, UserProfile, UsersInRoom},
        typing::TypingNotice,
    },
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Hub-assigned connection identifier.
pub type ClientId = u64;

/// An envelope addressed to one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Recipient.
    pub to: ClientId,
    /// Inbound envelope.
    pub envelope: Envelope,
}

#[derive(Debug, Clone)]
struct HubRoom {
    name: String,
    members: BTreeMap<ClientId, UserProfile>,
}

/// Deterministic in-memory chat hub.
#[derive(Debug, Clone)]
pub struct SimHub {
    rng: ChaCha8Rng,
    rooms: BTreeMap<String, HubRoom>,
    clients: BTreeSet<ClientId>,
    next_client: ClientId,
}

impl SimHub {
    /// Create a hub whose room hashes derive from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            rooms: BTreeMap::new(),
            clients: BTreeSet::new(),
            next_client: 1,
        }
    }

    /// Accept a connection.
    pub fn connect(&mut self) -> ClientId {
        let id = self.next_client;
        self.next_client += 1;
        self.clients.insert(id);
        tracing::debug!(client = id, "hub: client connected");
        id
    }

    /// Drop a connection and remove it from every room.
    pub fn disconnect(&mut self, client: ClientId) -> Vec<Delivery> {
        if !self.clients.remove(&client) {
            return vec![];
        }
        tracing::debug!(client, "hub: client disconnected");

        let left: Vec<String> = self
            .rooms
            .iter_mut()
            .filter_map(|(hash, room)| room.members.remove(&client).map(|_| hash.clone()))
            .collect();

        left.iter().flat_map(|hash| self.users_in_room_to_members(hash)).collect()
    }

    /// Whether `client` is connected.
    pub fn is_connected(&self, client: ClientId) -> bool {
        self.clients.contains(&client)
    }

    /// Hashes of every room, in order.
    pub fn room_hashes(&self) -> Vec<String> {
        self.rooms.keys().cloned().collect()
    }

    /// Name of a room.
    pub fn room_name(&self, hash: &str) -> Option<&str> {
        self.rooms.get(hash).map(|room| room.name.as_str())
    }

    /// Users currently in a room.
    pub fn members(&self, hash: &str) -> Vec<UserProfile> {
        self.rooms
            .get(hash)
            .map(|room| room.members.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Create a room directly, bypassing a client request.
    pub fn open_room(&mut self, name: impl Into<String>) -> String {
        let hash = self.fresh_hash();
        self.rooms.insert(hash.clone(), HubRoom { name: name.into(), members: BTreeMap::new() });
        hash
    }

    /// Handle an envelope sent by `from` at `now_millis`.
    pub fn handle(
        &mut self,
        from: ClientId,
        envelope: &Envelope,
        now_millis: u64,
    ) -> Vec<Delivery> {
        if !self.clients.contains(&from) {
            tracing::warn!(client = from, "hub: envelope from unknown client");
            return vec![];
        }

        let outbound = match Outbound::from_envelope(envelope) {
            Ok(outbound) => outbound,
            Err(e) => {
                tracing::warn!(client = from, event = %envelope.name, error = %e, "hub: rejected");
                return vec![];
            },
        };

        match outbound {
            Outbound::CreateRoom(request) => {
                let name = format!("{}'s room", request.user.name);
                let hash = self.open_room(name.clone());
                Self::reply(from, Inbound::Room(RoomInfo { name, hash }))
            },
            Outbound::GetRoom(request) => match self.rooms.get(&request.hash) {
                Some(room) => Self::reply(
                    from,
                    Inbound::Room(RoomInfo { name: room.name.clone(), hash: request.hash }),
                ),
                None => {
                    tracing::debug!(hash = %request.hash, "hub: get_room for unknown room");
                    vec![]
                },
            },
            Outbound::JoinRoom(request) => {
                let hash = request.room.hash;
                let Some(room) = self.rooms.get_mut(&hash) else {
                    tracing::debug!(%hash, "hub: join_room for unknown room");
                    return vec![];
                };
                room.members.insert(from, request.user.clone());

                let joined = Inbound::UserJoinRoom(UserJoinedRoom {
                    user: request.user,
                    room: RoomRef { hash: hash.clone() },
                });
                let mut deliveries = self.to_others(&hash, from, &joined);
                deliveries.extend(self.users_in_room_to_members(&hash));
                deliveries
            },
            Outbound::GetUsersInRoom(request) => {
                let users = self.members(&request.id);
                Self::reply(from, Inbound::UsersInRoom(UsersInRoom { hash: request.id, users }))
            },
            Outbound::SendMessage(request) => {
                let Some(author) = self.member(&request.room_id, from) else {
                    return vec![];
                };
                let message = Inbound::Message(ChatMessage {
                    room_id: request.room_id.clone(),
                    author: author.name.clone(),
                    text: request.message,
                    date: now_millis,
                    icon: author.icon.clone(),
                });
                self.to_others(&request.room_id, from, &message)
            },
            Outbound::LeaveRoom(request) => {
                let removed = self
                    .rooms
                    .get_mut(&request.hash)
                    .and_then(|room| room.members.remove(&from))
                    .is_some();
                if removed { self.users_in_room_to_members(&request.hash) } else { vec![] }
            },
            Outbound::StartTyping(signal) => {
                if self.member(&signal.room_id, from).is_none() {
                    return vec![];
                }
                let notice = Inbound::TypingOn(TypingNotice {
                    user: signal.user,
                    hash: signal.room_id.clone(),
                });
                self.to_others(&signal.room_id, from, &notice)
            },
            Outbound::StopTyping(signal) => {
                if self.member(&signal.room_id, from).is_none() {
                    return vec![];
                }
                let notice = Inbound::TypingOff(TypingNotice {
                    user: signal.user,
                    hash: signal.room_id.clone(),
                });
                self.to_others(&signal.room_id, from, &notice)
            },
        }
    }

    fn member(&self, hash: &str, client: ClientId) -> Option<&UserProfile> {
        self.rooms.get(hash).and_then(|room| room.members.get(&client))
    }

    fn fresh_hash(&mut self) -> String {
        loop {
            let hash = format!("{:08x}", self.rng.next_u32());
            if !self.rooms.contains_key(&hash) {
                return hash;
            }
        }
    }

    fn reply(to: ClientId, inbound: Inbound) -> Vec<Delivery> {
        encode(&inbound).map(|envelope| vec![Delivery { to, envelope }]).unwrap_or_default()
    }

    fn to_others(&self, hash: &str, from: ClientId, inbound: &Inbound) -> Vec<Delivery> {
        let Some(envelope) = encode(inbound) else {
            return vec![];
        };
        self.rooms
            .get(hash)
            .into_iter()
            .flat_map(|room| room.members.keys())
            .filter(|&&id| id != from)
            .map(|&to| Delivery { to, envelope: envelope.clone() })
            .collect()
    }

    fn users_in_room_to_members(&self, hash: &str) -> Vec<Delivery> {
        let update =
            Inbound::UsersInRoom(UsersInRoom { hash: hash.to_string(), users: self.members(hash) });
        let Some(envelope) = encode(&update) else {
            return vec![];
        };
        self.rooms
            .get(hash)
            .into_iter()
            .flat_map(|room| room.members.keys())
            .map(|&to| Delivery { to, envelope: envelope.clone() })
            .collect()
    }
}

fn encode(inbound: &Inbound) -> Option<Envelope> {
    match inbound.clone().into_envelope() {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            tracing::error!(event = %inbound.name(), error = %e, "hub: failed to encode");
            None
        },
    }
}
