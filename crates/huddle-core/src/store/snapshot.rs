//! The durable session state.

use std::collections::HashMap;

use crate::model::{Room, RoomHash, User};

/// Complete durable client state: user, joined rooms, last-visited room.
///
/// # Invariants
///
/// - `index` maps every room hash to the position of the FIRST room carrying
///   it, matching a linear find-first scan when hashes collide.
/// - `index` is rebuilt whenever `rooms` changes shape; appends do not move
///   rooms and leave it valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub(super) user: Option<User>,
    pub(super) rooms: Vec<Room>,
    pub(super) prev_url: Option<RoomHash>,
    index: HashMap<RoomHash, usize>,
}

impl SessionSnapshot {
    /// Build a snapshot.
    pub fn new(user: Option<User>, rooms: Vec<Room>, prev_url: Option<RoomHash>) -> Self {
        let mut snapshot = Self { user, rooms, prev_url, index: HashMap::new() };
        snapshot.rebuild_index();
        snapshot
    }

    /// Current user. `None` before the user has identified.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Joined rooms in join order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Last-visited room. `None` if nothing was recorded this session.
    pub fn prev_url(&self) -> Option<&str> {
        self.prev_url.as_deref()
    }

    /// Position of the room with `hash`.
    pub fn room_index(&self, hash: &str) -> Option<usize> {
        self.index.get(hash).copied()
    }

    /// Room with `hash`.
    pub fn room(&self, hash: &str) -> Option<&Room> {
        self.room_index(hash).and_then(|i| self.rooms.get(i))
    }

    /// Whether a room with `hash` is joined.
    pub fn contains_room(&self, hash: &str) -> bool {
        self.index.contains_key(hash)
    }

    /// Copy of the rooms list with every room carrying `hash` removed.
    pub fn rooms_without(&self, hash: &str) -> Vec<Room> {
        self.rooms.iter().filter(|r| r.hash != hash).cloned().collect()
    }

    pub(super) fn push_room(&mut self, room: Room) {
        self.index.entry(room.hash.clone()).or_insert(self.rooms.len());
        self.rooms.push(room);
    }

    pub(super) fn replace_rooms(&mut self, rooms: Vec<Room>) {
        self.rooms = rooms;
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, room) in self.rooms.iter().enumerate() {
            self.index.entry(room.hash.clone()).or_insert(i);
        }
    }
}
