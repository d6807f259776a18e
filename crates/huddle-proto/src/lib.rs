//! Real-time event vocabulary for the huddle chat client.
//!
//! The transport is a bidirectional named-event channel. Every message on it
//! is an [`Envelope`]: an [`EventName`] plus a CBOR-encoded payload. The
//! typed views over those payloads are [`Outbound`] (client to server) and
//! [`Inbound`] (server to client).
//!
//! Inbound payloads are shape-checked on decode. Nothing that fails the check
//! is handed to the application layer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod envelope;
pub mod errors;
pub mod event_name;
pub mod payloads;

pub use envelope::Envelope;
pub use errors::{ProtocolError, Result};
pub use event_name::{Direction, EventName};
pub use payloads::{Inbound, Outbound, Validate};
