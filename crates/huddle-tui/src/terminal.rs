//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The transport is a connection
//! to the in-process [`LocalHub`]; session values go to a [`FileStorage`].

use std::{
    collections::VecDeque,
    io::{self, Stdout, stdout},
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use huddle_app::{App, AppAction, AppEvent, Driver, KeyInput, Route};
use huddle_core::{Environment, SessionError, SessionSnapshot, persist_snapshot};
use huddle_proto::{Envelope, ProtocolError};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc::error::TryRecvError;

use crate::{
    FileStorage, InputState, SystemEnv,
    server::{LocalHub, ServerHandle},
    ui,
};

/// Longest wait for terminal input before the loop ticks.
const TICK: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Outbound envelope could not be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Session storage write failed.
    #[error("session storage error: {0}")]
    Session(#[from] SessionError),
}

/// What woke the input poll.
enum Wake {
    Terminal(Option<io::Result<Event>>),
    Frame(Option<Vec<u8>>),
    Tick,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the input state for text editing. Inbound frames that arrive while
/// waiting for keys are decoded into a local inbox and handed out by
/// [`Driver::recv_envelope`].
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    hub: LocalHub,
    connection: Option<ServerHandle>,
    inbox: VecDeque<Envelope>,
    storage: FileStorage,
    input_state: InputState,
    env: SystemEnv,
}

impl TerminalDriver {
    /// Take over the terminal.
    pub fn new(hub: LocalHub, storage: FileStorage) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            hub,
            connection: None,
            inbox: VecDeque::new(),
            storage,
            input_state: InputState::new(),
            env: SystemEnv::new(),
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    fn accept_frame(&mut self, frame: &[u8]) {
        match Envelope::decode(frame) {
            Ok(envelope) => self.inbox.push_back(envelope),
            Err(e) => tracing::warn!(error = %e, "dropping undecodable frame"),
        }
    }

    fn lose_connection(&mut self) {
        if self.connection.take().is_some() {
            tracing::warn!("hub connection closed");
        }
    }
}

async fn next_frame(connection: &mut Option<ServerHandle>) -> Option<Vec<u8>> {
    match connection {
        Some(handle) => handle.from_hub.recv().await,
        None => std::future::pending().await,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        let wake = tokio::select! {
            biased;

            event = self.event_stream.next() => Wake::Terminal(event),
            frame = next_frame(&mut self.connection) => Wake::Frame(frame),
            () = tokio::time::sleep(TICK) => Wake::Tick,
        };

        match wake {
            Wake::Terminal(Some(Ok(Event::Key(key_event))))
                if key_event.kind == KeyEventKind::Press =>
            {
                Ok(Self::convert_key(key_event.code)
                    .map(|key| self.input_state.handle_key(key, app))
                    .unwrap_or_default())
            },
            Wake::Terminal(Some(Ok(Event::Resize(cols, rows)))) => {
                Ok(app.handle(AppEvent::Resize(cols, rows)))
            },
            Wake::Terminal(Some(Err(e))) => Err(TerminalError::Io(e)),
            Wake::Terminal(_) => Ok(vec![]),
            Wake::Frame(Some(frame)) => {
                self.accept_frame(&frame);
                Ok(vec![])
            },
            Wake::Frame(None) => {
                self.lose_connection();
                Ok(vec![])
            },
            Wake::Tick => Ok(app.handle(AppEvent::Tick)),
        }
    }

    async fn send_envelope(&mut self, envelope: Envelope) -> Result<(), Self::Error> {
        let frame = envelope.to_bytes()?;
        let closed = match &self.connection {
            Some(handle) => handle.to_hub.send(frame).await.is_err(),
            None => false,
        };
        if closed {
            self.lose_connection();
        }
        Ok(())
    }

    async fn recv_envelope(&mut self) -> Option<Envelope> {
        if let Some(envelope) = self.inbox.pop_front() {
            return Some(envelope);
        }
        let received = self.connection.as_mut()?.from_hub.try_recv();
        match received {
            Ok(frame) => {
                self.accept_frame(&frame);
                self.inbox.pop_front()
            },
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.lose_connection();
                None
            },
        }
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        if self.connection.is_none() {
            self.connection = Some(self.hub.connect());
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn now(&self) -> Self::Instant {
        self.env.now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.input_state);
        })?;
        Ok(())
    }

    fn navigate(&mut self, route: &Route) -> Result<(), Self::Error> {
        tracing::debug!(%route, "navigate");
        Ok(())
    }

    fn persist(&mut self, snapshot: &SessionSnapshot) -> Result<(), Self::Error> {
        persist_snapshot(snapshot, &mut self.storage)?;
        Ok(())
    }

    fn stop(&mut self) {
        self.inbox.clear();
        self.connection = None;
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
