//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`huddle_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Input is scripted as [`SimInput`]s. The transport is either a local queue
//! fed by [`SimDriver::inject_envelope`] or a shared [`SimNetwork`].

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use huddle_app::{App, AppAction, AppEvent, Driver, Route};
use huddle_core::{
    Environment, MemoryStorage, PersistedSession, SessionSnapshot, persist_snapshot,
};
use huddle_proto::Envelope;

use crate::{
    SimEnv,
    invariants::{ClientSnapshot, InvariantRegistry, SystemSnapshot},
    sim_env::SimInstant,
    sim_hub::ClientId,
    sim_network::SimNetwork,
};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Scripted user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimInput {
    /// Feed an event straight to the App.
    Event(AppEvent),
    /// `App::set_user`.
    SetUser {
        /// Display name.
        name: String,
        /// Avatar reference.
        icon: String,
    },
    /// `App::create_room`.
    CreateRoom,
    /// `App::open_room`.
    OpenRoom(String),
    /// `App::send_message`.
    Send(String),
    /// `App::leave_room`.
    Leave,
    /// `App::typing`.
    Keystroke,
    /// `App::cycle_room`.
    CycleRoom,
    /// `App::dismiss_alert`.
    DismissAlert,
    /// `App::quit`.
    Quit,
}

impl SimInput {
    /// Apply the input to `app`.
    pub fn apply(self, app: &mut App) -> Vec<AppAction> {
        match self {
            Self::Event(event) => app.handle(event),
            Self::SetUser { name, icon } => app.set_user(&name, &icon),
            Self::CreateRoom => app.create_room(),
            Self::OpenRoom(hash) => app.open_room(&hash),
            Self::Send(text) => app.send_message(&text),
            Self::Leave => app.leave_room(),
            Self::Keystroke => app.typing(),
            Self::CycleRoom => app.cycle_room(),
            Self::DismissAlert => app.dismiss_alert(),
            Self::Quit => app.quit(),
        }
    }
}

/// Shared state for input injection.
///
/// This allows injection from outside async contexts.
#[derive(Debug, Default)]
struct SharedState {
    pending_inputs: VecDeque<SimInput>,
    incoming: VecDeque<Envelope>,
    outgoing: Vec<Envelope>,
    connected: bool,
    refuse_connects: u32,
    client_id: Option<ClientId>,
    navigations: Vec<Route>,
    storage: MemoryStorage,
    persist_count: usize,
    render_count: usize,
}

/// Simulation driver for deterministic testing.
pub struct SimDriver {
    env: SimEnv,
    state: Arc<Mutex<SharedState>>,
    network: Option<SimNetwork>,
    invariants: Option<InvariantRegistry>,
}

impl SimDriver {
    /// Create a driver with a local envelope queue.
    pub fn new(env: SimEnv) -> Self {
        Self { env, state: Arc::default(), network: None, invariants: None }
    }

    /// Create a driver connected through a shared network.
    pub fn attached(env: SimEnv, network: SimNetwork) -> Self {
        Self { network: Some(network), ..Self::new(env) }
    }

    /// Enable invariant checking after every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue scripted input.
    pub fn inject(&self, input: SimInput) {
        self.lock().pending_inputs.push_back(input);
    }

    /// Queue an inbound envelope (local queue only).
    pub fn inject_envelope(&self, envelope: Envelope) {
        self.lock().incoming.push_back(envelope);
    }

    /// Refuse the next `count` connection attempts.
    pub fn refuse_connects(&self, count: u32) {
        self.lock().refuse_connects = count;
    }

    /// Simulate losing the transport.
    pub fn drop_connection(&self) {
        let mut state = self.lock();
        state.connected = false;
        if let (Some(network), Some(id)) = (&self.network, state.client_id.take()) {
            network.disconnect(id);
        }
    }

    /// Take all captured outgoing envelopes.
    pub fn take_outgoing(&self) -> Vec<Envelope> {
        std::mem::take(&mut self.lock().outgoing)
    }

    /// Routes navigated to, in order.
    pub fn navigations(&self) -> Vec<Route> {
        self.lock().navigations.clone()
    }

    /// Session values as last persisted.
    pub fn stored_session(&self) -> PersistedSession {
        PersistedSession::read(&self.lock().storage)
    }

    /// Number of persist calls.
    pub fn persist_count(&self) -> usize {
        self.lock().persist_count
    }

    /// Number of renders.
    pub fn render_count(&self) -> usize {
        self.lock().render_count
    }

    /// Hub connection id, while connected through a network.
    pub fn client_id(&self) -> Option<ClientId> {
        self.lock().client_id
    }

    /// Check if there is scripted input or a queued envelope left.
    pub fn has_pending(&self) -> bool {
        let state = self.lock();
        let inbox = match (&self.network, state.client_id) {
            (Some(network), Some(id)) => network.pending(id),
            _ => state.incoming.len(),
        };
        !state.pending_inputs.is_empty() || inbox > 0
    }

    /// Check invariants against App state.
    pub fn check_invariants(&self, app: &App, context: &str) {
        if let Some(ref registry) = self.invariants {
            let id = self.client_id().unwrap_or(0);
            let snapshot = SystemSnapshot::single(ClientSnapshot::from_app(id, app));
            registry.assert_all(&snapshot, context);
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        let input = self.lock().pending_inputs.pop_front();
        Ok(input.map(|input| input.apply(app)).unwrap_or_default())
    }

    async fn send_envelope(&mut self, envelope: Envelope) -> Result<(), Self::Error> {
        let client_id = {
            let mut state = self.lock();
            state.outgoing.push(envelope.clone());
            state.client_id
        };
        if let (Some(network), Some(id)) = (&self.network, client_id) {
            network.send(id, &envelope, self.env.wall_clock_millis());
        }
        Ok(())
    }

    async fn recv_envelope(&mut self) -> Option<Envelope> {
        let mut state = self.lock();
        match (&self.network, state.client_id) {
            (Some(network), Some(id)) => network.recv(id),
            _ => state.incoming.pop_front(),
        }
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.refuse_connects > 0 {
            state.refuse_connects -= 1;
            return Err(SimDriverError("connection refused".into()));
        }
        state.connected = true;
        if let Some(network) = &self.network {
            state.client_id = Some(network.connect());
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        let state = self.lock();
        match (&self.network, state.client_id) {
            (Some(network), Some(id)) => state.connected && network.is_connected(id),
            (Some(_), None) => false,
            (None, _) => state.connected,
        }
    }

    fn now(&self) -> Self::Instant {
        self.env.now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.lock().render_count += 1;
        self.check_invariants(app, "after render");
        Ok(())
    }

    fn navigate(&mut self, route: &Route) -> Result<(), Self::Error> {
        self.lock().navigations.push(route.clone());
        Ok(())
    }

    fn persist(&mut self, snapshot: &SessionSnapshot) -> Result<(), Self::Error> {
        let mut state = self.lock();
        state.persist_count += 1;
        persist_snapshot(snapshot, &mut state.storage).map_err(|e| SimDriverError(e.to_string()))
    }

    fn stop(&mut self) {
        self.drop_connection();
    }
}
