//! Deterministic simulation harness for the huddle chat client.
//!
//! Virtual-clock [`SimEnv`], a scripted [`SimHub`] standing in for the chat
//! server, a [`SimNetwork`] that routes hub output to per-client inboxes, and
//! a [`SimDriver`] so the production [`huddle_app::Runtime`] runs unchanged
//! under test.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the room view
//! invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_env;
pub mod sim_hub;
pub mod sim_network;

pub use invariants::{
    ClientSnapshot, Invariant, InvariantRegistry, InvariantResult, OwnMessagesFlagged,
    RoomIndexConsistent, RoomSnapshot, SystemSnapshot, TypingUsersUnique, ViewScopedToRoute,
    Violation,
};
pub use sim_driver::{SimDriver, SimDriverError, SimInput};
pub use sim_env::{SIM_EPOCH_MILLIS, SimEnv, SimInstant};
pub use sim_hub::{ClientId, Delivery, SimHub};
pub use sim_network::SimNetwork;
