//! Terminal UI for huddle
//!
//! A thin shell over [`huddle_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`huddle_app::Runtime`].
//!
//! This crate handles terminal rendering, key editing, the file-backed
//! session store and the in-process hub used as transport.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod server;
pub mod storage;
pub mod system_env;
pub mod terminal;
pub mod ui;

pub use huddle_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Route, Runtime};
pub use input::InputState;
pub use server::{LocalHub, ServerHandle};
pub use storage::FileStorage;
pub use system_env::SystemEnv;
pub use terminal::{TerminalDriver, TerminalError};
