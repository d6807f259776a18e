//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: room view state machine
//! - [`Bridge`]: protocol bridge to the transport
//! - [`Driver`]: platform-specific I/O
//!
//! # Reconnect
//!
//! When the driver reports the transport as gone, the App is told once and a
//! new connection is attempted at most every [`RECONNECT_INTERVAL`]. A
//! successful reconnect makes the App rejoin the viewed room. Outbound events
//! produced while disconnected are dropped.

use std::time::Duration;

use huddle_core::Environment;

use crate::{App, AppAction, AppEvent, Bridge, Driver};

/// Minimum delay between connection attempts.
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(1);

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing time
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    app: App,
    bridge: Bridge<E>,
    connected: bool,
    last_connect_attempt: Option<D::Instant>,
    /// Intents issued before the loop started, run by [`Runtime::start`].
    startup: Vec<AppAction>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
{
    /// Create a runtime from its parts.
    pub fn new(driver: D, app: App, bridge: Bridge<E>) -> Self {
        Self {
            driver,
            app,
            bridge,
            connected: false,
            last_connect_attempt: None,
            startup: Vec::new(),
        }
    }

    /// Queue actions an App intent returned before the runtime existed, such
    /// as a user given on the command line. They run after mounting.
    #[must_use]
    pub fn with_startup_actions(mut self, actions: Vec<AppAction>) -> Self {
        self.startup.extend(actions);
        self
    }

    /// Run the main event loop until the App quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        if !self.start().await? {
            while !self.step().await? {}
        }

        self.driver.stop();
        Ok(())
    }

    /// Render, mount the room view, run queued startup actions and connect.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn start(&mut self) -> Result<bool, D::Error> {
        self.driver.render(&self.app)?;
        let mut actions = self.app.mount();
        actions.append(&mut self.startup);
        if self.process_actions(actions).await? {
            return Ok(true);
        }
        self.connect().await
    }

    /// Process one cycle of the event loop:
    /// 1. Polls for input from the driver
    /// 2. Receives one envelope, or handles a lost connection
    /// 3. Ticks the bridge (typing debounce)
    /// 4. Sends outgoing envelopes through the driver
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let actions = self.driver.poll_event(&mut self.app).await?;
        if !actions.is_empty() && self.process_actions(actions).await? {
            return Ok(true);
        }

        if self.driver.is_connected() {
            if let Some(envelope) = self.driver.recv_envelope().await {
                let events = self.bridge.handle_envelope(&envelope);
                if self.process_bridge_events(events).await? {
                    return Ok(true);
                }
            }
        } else if self.handle_disconnect().await? {
            return Ok(true);
        }

        let now = self.driver.now();
        let events = self.bridge.handle_tick(now);
        self.send_outgoing().await?;
        self.process_bridge_events(events).await
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Navigate { route } => self.driver.navigate(&route)?,
                    AppAction::Persist => self.driver.persist(self.app.snapshot())?,

                    // Protocol operations go through the bridge
                    AppAction::Subscribe
                    | AppAction::Unsubscribe
                    | AppAction::CreateRoom { .. }
                    | AppAction::RequestRoom { .. }
                    | AppAction::JoinRoom { .. }
                    | AppAction::RequestUsersInRoom { .. }
                    | AppAction::SendMessage { .. }
                    | AppAction::LeaveRoom { .. }
                    | AppAction::Keystroke { .. } => {
                        let events = self.bridge.process_app_action(action);
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                        self.send_outgoing().await?;
                    },
                }
            }
        }
        Ok(false)
    }

    /// Process events from Bridge back to App.
    async fn process_bridge_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Report a lost connection once, then retry on the reconnect interval.
    async fn handle_disconnect(&mut self) -> Result<bool, D::Error> {
        if self.connected {
            self.connected = false;
            tracing::warn!("transport connection lost");
            let actions = self.app.handle(AppEvent::Disconnected);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        let now = self.driver.now();
        if self.last_connect_attempt.is_some_and(|last| now - last < RECONNECT_INTERVAL) {
            return Ok(false);
        }
        self.connect().await
    }

    /// Attempt to connect. A failure is reported to the App, not returned.
    async fn connect(&mut self) -> Result<bool, D::Error> {
        self.last_connect_attempt = Some(self.driver.now());
        let actions = self.app.handle(AppEvent::Connecting);
        if self.process_actions(actions).await? {
            return Ok(true);
        }

        let event = match self.driver.connect().await {
            Ok(()) => {
                self.connected = true;
                tracing::info!("connected");
                AppEvent::Connected
            },
            Err(e) => {
                tracing::warn!(error = %e, "connect failed");
                AppEvent::Disconnected
            },
        };
        let actions = self.app.handle(event);
        self.process_actions(actions).await
    }

    /// Send all pending outgoing envelopes.
    async fn send_outgoing(&mut self) -> Result<(), D::Error> {
        let envelopes = self.bridge.take_outgoing();
        if envelopes.is_empty() {
            return Ok(());
        }
        if !self.driver.is_connected() {
            tracing::debug!(dropped = envelopes.len(), "not connected, dropping outbound events");
            return Ok(());
        }
        for envelope in envelopes {
            self.driver.send_envelope(envelope).await?;
        }
        Ok(())
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Get a reference to the bridge
    pub fn bridge(&self) -> &Bridge<E> {
        &self.bridge
    }
}
