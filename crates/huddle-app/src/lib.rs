//! Application layer for huddle
//!
//! Pure state machines and a generic runtime for the room view, enabling
//! deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`App`]: room view state machine (inbound events, user intents, routes)
//! - [`Bridge`]: protocol bridge (translates App actions to named events and
//!   named events back to App events)
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
mod input;
mod route;
mod runtime;
mod state;
mod subscription;
mod typing;

pub use action::AppAction;
pub use app::{App, PLACEHOLDER_ROOM_NAME, SELF_AUTHOR};
pub use bridge::Bridge;
pub use driver::Driver;
pub use event::AppEvent;
pub use input::KeyInput;
pub use route::Route;
pub use runtime::{RECONNECT_INTERVAL, Runtime};
pub use state::{ActiveRoom, ConnectionState, JoinAlert, ViewState};
pub use subscription::Subscriptions;
pub use typing::{DEFAULT_TYPING_WINDOW, Keystroke, TypingDebounce};
