//! Error types for session seeding and raw action decoding.
//!
//! Reducer transitions themselves are infallible: an append to an unknown room
//! is a defined no-op, not an error.

use thiserror::Error;

/// Errors reading or writing persisted session data.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A stored value is not valid JSON of the expected shape.
    #[error("corrupt session value under key {key:?}: {source}")]
    Corrupt {
        /// Storage key.
        key: &'static str,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Serializing state for write-back failed.
    #[error("failed to serialize session value {key:?}: {source}")]
    Serialize {
        /// Storage key.
        key: &'static str,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The storage backend rejected a write.
    #[error("session storage write failed: {0}")]
    Storage(String),
}

/// Errors decoding a raw `{kind, payload}` action.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The action kind is known but its payload does not match.
    #[error("malformed payload for action {kind}: {source}")]
    MalformedPayload {
        /// Action kind.
        kind: &'static str,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}
