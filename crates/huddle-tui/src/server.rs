//! In-process chat hub.
//!
//! Runs a [`SimHub`] behind tokio channels so the terminal client has a peer
//! without any network. Each connection is a task that decodes wire frames,
//! feeds them to the shared hub and routes every delivery to the recipient's
//! channel. Frames travel encoded, so the envelope codec is exercised the
//! same way a socket transport would exercise it.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use huddle_core::Environment;
use huddle_harness::{ClientId, Delivery, SimHub};
use huddle_proto::Envelope;
use tokio::sync::mpsc;

use crate::SystemEnv;

/// Frames queued from a client before the session task applies backpressure.
const CLIENT_QUEUE: usize = 32;

#[derive(Debug)]
struct HubState {
    hub: SimHub,
    outlets: HashMap<ClientId, mpsc::UnboundedSender<Vec<u8>>>,
}

impl HubState {
    fn route(&mut self, deliveries: Vec<Delivery>) {
        for Delivery { to, envelope } in deliveries {
            let Some(outlet) = self.outlets.get(&to) else {
                tracing::debug!(client = to, "hub: recipient gone");
                continue;
            };
            match envelope.to_bytes() {
                Ok(frame) => {
                    if outlet.send(frame).is_err() {
                        tracing::debug!(client = to, "hub: recipient channel closed");
                    }
                },
                Err(e) => tracing::warn!(client = to, error = %e, "hub: cannot encode delivery"),
            }
        }
    }
}

/// Shared hub. Cloning yields another handle to the same rooms.
#[derive(Debug, Clone)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
    env: SystemEnv,
}

/// Client end of one hub connection.
///
/// Dropping the handle closes the connection; the hub then refreshes the
/// member lists of the rooms it was in.
#[derive(Debug)]
pub struct ServerHandle {
    /// Encoded outbound envelopes.
    pub to_hub: mpsc::Sender<Vec<u8>>,
    /// Encoded inbound envelopes.
    pub from_hub: mpsc::UnboundedReceiver<Vec<u8>>,
    /// Hub-assigned connection id.
    pub client_id: ClientId,
}

impl LocalHub {
    /// Create a hub whose room hashes derive from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState {
                hub: SimHub::new(seed),
                outlets: HashMap::new(),
            })),
            env: SystemEnv::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a room nobody has joined yet and return its hash.
    pub fn open_room(&self, name: &str) -> String {
        self.lock().hub.open_room(name)
    }

    /// Open a connection served by a new tokio task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(&self) -> ServerHandle {
        let (client_tx, mut hub_rx) = mpsc::channel::<Vec<u8>>(CLIENT_QUEUE);
        let (hub_tx, client_rx) = mpsc::unbounded_channel::<Vec<u8>>();

        let client_id = {
            let mut state = self.lock();
            let id = state.hub.connect();
            state.outlets.insert(id, hub_tx);
            id
        };
        tracing::info!(client = client_id, "hub: connection opened");

        let hub = self.clone();
        tokio::spawn(async move {
            while let Some(frame) = hub_rx.recv().await {
                hub.receive(client_id, &frame);
            }
            hub.close(client_id);
        });

        ServerHandle { to_hub: client_tx, from_hub: client_rx, client_id }
    }

    fn receive(&self, from: ClientId, frame: &[u8]) {
        let envelope = match Envelope::decode(frame) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(client = from, error = %e, "hub: dropping malformed frame");
                return;
            },
        };
        let now = self.env.wall_clock_millis();
        let mut state = self.lock();
        let deliveries = state.hub.handle(from, &envelope, now);
        state.route(deliveries);
    }

    fn close(&self, client: ClientId) {
        let mut state = self.lock();
        state.outlets.remove(&client);
        let deliveries = state.hub.disconnect(client);
        state.route(deliveries);
        tracing::info!(client, "hub: connection closed");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use huddle_proto::{
        EventName, Inbound, Outbound,
        payloads::room::{CreateRoom, UserProfile},
    };

    use super::*;

    #[tokio::test]
    async fn create_room_reply_arrives_encoded() {
        let hub = LocalHub::new(3);
        let mut handle = hub.connect();

        let request = Outbound::CreateRoom(CreateRoom {
            user: UserProfile { name: "Ann".into(), icon: "a.png".into() },
        })
        .into_envelope()
        .unwrap();
        handle.to_hub.send(request.to_bytes().unwrap()).await.unwrap();

        let frame = tokio::time::timeout(Duration::from_secs(1), handle.from_hub.recv())
            .await
            .unwrap()
            .unwrap();
        let reply = Envelope::decode(&frame).unwrap();
        assert_eq!(reply.name, EventName::Room);
        let Inbound::Room(room) = Inbound::from_envelope(&reply).unwrap() else {
            panic!("expected room");
        };
        assert_eq!(room.name, "Ann's room");
    }

    #[tokio::test]
    async fn malformed_frame_keeps_connection() {
        let hub = LocalHub::new(3);
        let hash = hub.open_room("lobby");
        let mut handle = hub.connect();

        handle.to_hub.send(vec![0xff, 0x00]).await.unwrap();
        let request = Outbound::GetRoom(huddle_proto::payloads::room::GetRoom { hash })
            .into_envelope()
            .unwrap();
        handle.to_hub.send(request.to_bytes().unwrap()).await.unwrap();

        let frame = tokio::time::timeout(Duration::from_secs(1), handle.from_hub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(Envelope::decode(&frame).unwrap().name, EventName::Room);
    }
}
