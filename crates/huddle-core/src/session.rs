//! Seeding the session snapshot from tab-scoped storage.
//!
//! Persisted state lives in a key-value store under two keys, `"user"` and
//! `"rooms"`, each holding a JSON document. Startup reads both once through
//! [`PersistedSession::read`] and hands the blob to [`initial_snapshot`];
//! there is no implicit global read. The last-visited room is never
//! persisted and always starts absent.

use std::collections::HashMap;

use crate::{
    error::SessionError,
    model::{Room, User},
    store::SessionSnapshot,
};

/// Storage key holding the serialized [`User`].
pub const USER_KEY: &str = "user";
/// Storage key holding the serialized rooms list.
pub const ROOMS_KEY: &str = "rooms";

/// Key-value storage scoped to one client session.
pub trait SessionStorage {
    /// Value under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the backend rejects the write.
    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError>;
}

/// In-memory storage. Lives as long as the value does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Raw persisted values read at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    /// JSON document under `"user"`.
    pub user: Option<String>,
    /// JSON document under `"rooms"`.
    pub rooms: Option<String>,
}

impl PersistedSession {
    /// Read both keys from storage.
    pub fn read(storage: &impl SessionStorage) -> Self {
        Self { user: storage.get(USER_KEY), rooms: storage.get(ROOMS_KEY) }
    }

    /// Decode strictly.
    ///
    /// A JSON `null` counts as absent, like a missing key.
    ///
    /// # Errors
    ///
    /// [`SessionError::Corrupt`] if either value is not valid JSON of the
    /// expected shape.
    pub fn decode(&self) -> Result<SessionSnapshot, SessionError> {
        let user = self.decode_user()?;
        let rooms = self.decode_rooms()?;
        Ok(SessionSnapshot::new(user, rooms, None))
    }

    fn decode_user(&self) -> Result<Option<User>, SessionError> {
        self.user
            .as_deref()
            .map(|raw| serde_json::from_str::<Option<User>>(raw))
            .transpose()
            .map(Option::flatten)
            .map_err(|source| SessionError::Corrupt { key: USER_KEY, source })
    }

    fn decode_rooms(&self) -> Result<Vec<Room>, SessionError> {
        self.rooms
            .as_deref()
            .map(|raw| serde_json::from_str::<Option<Vec<Room>>>(raw))
            .transpose()
            .map(|rooms| rooms.flatten().unwrap_or_default())
            .map_err(|source| SessionError::Corrupt { key: ROOMS_KEY, source })
    }
}

/// Build the first snapshot of a session.
///
/// `None` (nothing persisted) yields an empty snapshot. A corrupt value is
/// logged and treated as absent; the other key is still used.
pub fn initial_snapshot(persisted: Option<&PersistedSession>) -> SessionSnapshot {
    let Some(persisted) = persisted else {
        return SessionSnapshot::default();
    };

    let user = persisted.decode_user().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "discarding persisted user");
        None
    });
    let rooms = persisted.decode_rooms().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "discarding persisted rooms");
        Vec::new()
    });

    SessionSnapshot::new(user, rooms, None)
}

/// Write the user and rooms of `snapshot` back to storage.
///
/// # Errors
///
/// [`SessionError::Serialize`] if encoding fails, or the storage error if a
/// write is rejected.
pub fn persist_snapshot(
    snapshot: &SessionSnapshot,
    storage: &mut impl SessionStorage,
) -> Result<(), SessionError> {
    let user = serde_json::to_string(&snapshot.user())
        .map_err(|source| SessionError::Serialize { key: USER_KEY, source })?;
    let rooms = serde_json::to_string(snapshot.rooms())
        .map_err(|source| SessionError::Serialize { key: ROOMS_KEY, source })?;

    storage.set(USER_KEY, user)?;
    storage.set(ROOMS_KEY, rooms)
}
