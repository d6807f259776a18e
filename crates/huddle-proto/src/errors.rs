//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding envelopes and payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Input ended before the envelope was complete.
    #[error("envelope truncated: need {expected} bytes, have {actual}")]
    Truncated {
        /// Bytes required to continue decoding.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// Event name is not part of the vocabulary.
    #[error("unknown event name: {0:?}")]
    UnknownEvent(String),

    /// Event name is known but not valid for the direction it arrived on.
    #[error("event {name} is not an {expected} event")]
    WrongDirection {
        /// Event name that was received.
        name: &'static str,
        /// Direction the decoder expected.
        expected: &'static str,
    },

    /// Payload exceeds [`crate::Envelope::MAX_PAYLOAD_SIZE`].
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Event name does not fit in the one-byte length prefix.
    #[error("event name too long: {0} bytes")]
    NameTooLong(usize),

    /// CBOR serialization failed.
    #[error("CBOR encode failed: {0}")]
    CborEncode(String),

    /// CBOR deserialization failed (payload does not have the expected shape).
    #[error("CBOR decode failed: {0}")]
    CborDecode(String),

    /// Payload decoded but failed validation.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl ProtocolError {
    /// Shorthand for a validation failure.
    pub fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}
