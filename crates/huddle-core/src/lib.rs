//! Core client state for the huddle chat client.
//!
//! Holds the durable session state (current user, joined rooms with their
//! messages, last-visited room) and the reducer that moves it forward.
//!
//! # Components
//!
//! - [`model`]: users, rooms and messages
//! - [`store`]: [`SessionSnapshot`], [`StoreAction`], [`reduce`] and [`Store`]
//! - [`session`]: seeding the first snapshot from tab-scoped storage and
//!   writing it back
//! - [`env`]: time abstraction so the same code runs under simulation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod env;
pub mod error;
pub mod model;
pub mod session;
pub mod store;

pub use env::Environment;
pub use error::{ActionError, SessionError};
pub use model::{Message, MessageOrigin, NewMessage, Room, RoomHash, User};
pub use session::{
    MemoryStorage, PersistedSession, SessionStorage, initial_snapshot, persist_snapshot,
};
pub use store::{SessionSnapshot, Store, StoreAction, reduce};
