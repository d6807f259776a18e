//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the system at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use huddle_app::App;
use huddle_core::MessageOrigin;

/// Snapshot of the entire system state.
///
/// Contains observable state from one or more clients for invariant checking.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-client state snapshots.
    pub clients: Vec<ClientSnapshot>,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no clients).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot with a single client.
    pub fn single(client: ClientSnapshot) -> Self {
        Self { clients: vec![client] }
    }

    /// Create a snapshot from multiple clients.
    pub fn from_clients(clients: Vec<ClientSnapshot>) -> Self {
        Self { clients }
    }
}

/// Snapshot of a single client's observable state.
#[derive(Debug, Clone, Default)]
pub struct ClientSnapshot {
    /// Client identifier.
    pub id: u64,
    /// Room hash of the current route. `None` off the room view.
    pub route_room: Option<String>,
    /// Joined rooms in order.
    pub rooms: Vec<RoomSnapshot>,
    /// Index the store resolves for each room hash, in room order.
    pub resolved_index: Vec<Option<usize>>,
    /// Names of remote users shown as typing.
    pub typing_users: Vec<String>,
    /// Number of users shown online.
    pub online_users: usize,
    /// Whether the join banner is visible.
    pub has_alert: bool,
}

impl ClientSnapshot {
    /// Create an empty client snapshot.
    pub fn new(id: u64) -> Self {
        Self { id, ..Default::default() }
    }

    /// Capture what `app` exposes.
    pub fn from_app(id: u64, app: &App) -> Self {
        let snapshot = app.snapshot();
        let rooms: Vec<RoomSnapshot> = snapshot
            .rooms()
            .iter()
            .map(|room| RoomSnapshot {
                hash: room.hash.clone(),
                message_count: room.messages.len(),
                local_authors: room
                    .messages
                    .iter()
                    .filter(|m| m.origin() == MessageOrigin::Local)
                    .map(|m| m.author.clone())
                    .collect(),
            })
            .collect();
        let resolved_index = rooms.iter().map(|room| snapshot.room_index(&room.hash)).collect();
        let view = app.view();

        Self {
            id,
            route_room: app.route().room_id().map(str::to_owned),
            rooms,
            resolved_index,
            typing_users: view.typing_users.clone(),
            online_users: view.online_users.len(),
            has_alert: view.alert.is_some(),
        }
    }

    /// Add a room to the snapshot.
    #[must_use]
    pub fn with_room(mut self, room: RoomSnapshot, resolved: Option<usize>) -> Self {
        self.rooms.push(room);
        self.resolved_index.push(resolved);
        self
    }
}

/// Snapshot of a room's observable state.
#[derive(Debug, Clone, Default)]
pub struct RoomSnapshot {
    /// Room hash.
    pub hash: String,
    /// Number of messages.
    pub message_count: usize,
    /// Authors of locally sent messages.
    pub local_authors: Vec<String>,
}

impl RoomSnapshot {
    /// Create a room snapshot with no messages.
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into(), ..Default::default() }
    }
}
