//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use huddle_core::SessionSnapshot;
use huddle_proto::Envelope;

use crate::{App, AppAction, Route};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. The same
/// orchestration code runs in the terminal client and in simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, an in-process hub as transport,
///   a JSON file as session storage
/// - **Simulation**: scripted hub and virtual clock in `huddle-harness`
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Poll for user input and turn it into App intents.
    ///
    /// Returns an empty list when no input is ready.
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Send an envelope over the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the send fails for a reason other than a closed
    /// connection.
    fn send_envelope(
        &mut self,
        envelope: Envelope,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Next received envelope, or `None` if nothing is pending.
    fn recv_envelope(&mut self) -> impl Future<Output = Option<Envelope>> + Send;

    /// Establish the transport connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established. The runtime
    /// treats this as transient and retries.
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Check if the transport is connected.
    fn is_connected(&self) -> bool;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Replace the active route.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform router rejects the route.
    fn navigate(&mut self, route: &Route) -> Result<(), Self::Error>;

    /// Write the user and rooms of `snapshot` to session storage.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    fn persist(&mut self, snapshot: &SessionSnapshot) -> Result<(), Self::Error>;

    /// Stop the connection and clean up resources.
    fn stop(&mut self);
}
