//! Shared network around a [`SimHub`].
//!
//! Several [`crate::SimDriver`]s attach to one `SimNetwork`; each connection
//! gets its own inbox. Sending runs the hub synchronously and routes every
//! delivery into the recipient's inbox, so a test observes the whole
//! exchange deterministically.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use huddle_proto::Envelope;

use crate::sim_hub::{ClientId, Delivery, SimHub};

#[derive(Debug)]
struct NetworkState {
    hub: SimHub,
    inboxes: HashMap<ClientId, VecDeque<Envelope>>,
}

/// Cloneable handle to a simulated hub and its inboxes.
#[derive(Debug, Clone)]
pub struct SimNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl SimNetwork {
    /// Create a network around a hub seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self::from_hub(SimHub::new(seed))
    }

    /// Create a network around an existing hub.
    pub fn from_hub(hub: SimHub) -> Self {
        Self { state: Arc::new(Mutex::new(NetworkState { hub, inboxes: HashMap::new() })) }
    }

    fn lock(&self) -> MutexGuard<'_, NetworkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a connection.
    pub fn connect(&self) -> ClientId {
        let mut state = self.lock();
        let id = state.hub.connect();
        state.inboxes.insert(id, VecDeque::new());
        id
    }

    /// Close a connection. Undelivered envelopes are discarded.
    pub fn disconnect(&self, client: ClientId) {
        let mut state = self.lock();
        state.inboxes.remove(&client);
        let deliveries = state.hub.disconnect(client);
        route(&mut state, deliveries);
    }

    /// Whether `client` is connected.
    pub fn is_connected(&self, client: ClientId) -> bool {
        self.lock().hub.is_connected(client)
    }

    /// Deliver an envelope from `from` to the hub.
    pub fn send(&self, from: ClientId, envelope: &Envelope, now_millis: u64) {
        let mut state = self.lock();
        let deliveries = state.hub.handle(from, envelope, now_millis);
        route(&mut state, deliveries);
    }

    /// Next envelope waiting for `client`.
    pub fn recv(&self, client: ClientId) -> Option<Envelope> {
        self.lock().inboxes.get_mut(&client).and_then(VecDeque::pop_front)
    }

    /// Number of envelopes waiting for `client`.
    pub fn pending(&self, client: ClientId) -> usize {
        self.lock().inboxes.get(&client).map_or(0, VecDeque::len)
    }

    /// Inspect or script the hub.
    pub fn with_hub<R>(&self, f: impl FnOnce(&mut SimHub) -> R) -> R {
        f(&mut self.lock().hub)
    }
}

fn route(state: &mut NetworkState, deliveries: Vec<Delivery>) {
    for Delivery { to, envelope } in deliveries {
        match state.inboxes.get_mut(&to) {
            Some(inbox) => inbox.push_back(envelope),
            None => tracing::debug!(client = to, "network: recipient gone, dropping"),
        }
    }
}

#[cfg(test)]
mod tests {
    use huddle_proto::{
        EventName, Outbound,
        payloads::room::{GetUsersInRoom, JoinRoom, RoomRef, UserProfile},
    };

    use super::*;

    #[test]
    fn deliveries_land_in_inboxes() {
        let network = SimNetwork::new(3);
        let hash = network.with_hub(|hub| hub.open_room("lobby"));
        let ann = network.connect();

        let join = Outbound::JoinRoom(JoinRoom {
            user: UserProfile { name: "Ann".into(), icon: String::new() },
            room: RoomRef { hash: hash.clone() },
        });
        network.send(ann, &join.into_envelope().unwrap(), 0);

        assert_eq!(network.pending(ann), 1);
        assert_eq!(network.recv(ann).map(|e| e.name), Some(EventName::UsersInRoom));
        assert!(network.recv(ann).is_none());
    }

    #[test]
    fn disconnected_client_has_no_inbox() {
        let network = SimNetwork::new(3);
        let ann = network.connect();
        network.disconnect(ann);

        let request = Outbound::GetUsersInRoom(GetUsersInRoom { id: "x".into() });
        network.send(ann, &request.into_envelope().unwrap(), 0);

        assert!(!network.is_connected(ann));
        assert_eq!(network.pending(ann), 0);
    }
}
