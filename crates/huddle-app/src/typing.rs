//! Trailing-edge debounce for the local typing indicator.
//!
//! The first keystroke of a burst reports [`Keystroke::Started`] so the
//! caller emits "typing started". Every keystroke pushes the deadline out;
//! [`TypingDebounce::poll`] reports the end of the burst exactly once, after a
//! full window without keystrokes. Earlier deadlines are superseded, never
//! fired.
//!
//! The deadline is also checked on each keystroke: one arriving after a full
//! idle window that no `poll` observed yet ends the old burst and opens a new
//! one ([`Keystroke::Restarted`]).
//!
//! Generic over the instant type so simulation can drive it with virtual time.

use std::{ops::Sub, time::Duration};

/// Default idle window before "typing stopped" is emitted.
pub const DEFAULT_TYPING_WINDOW: Duration = Duration::from_millis(1500);

/// What a keystroke did to the burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// First keystroke after idle.
    Started,
    /// Inside the running burst.
    Continued,
    /// The previous burst had already gone idle; it ended and this keystroke
    /// started a new one.
    Restarted,
}

impl Keystroke {
    /// Whether "typing started" must be emitted.
    pub fn starts(self) -> bool {
        matches!(self, Self::Started | Self::Restarted)
    }
}

/// Debounce state machine.
#[derive(Debug, Clone)]
pub struct TypingDebounce<I> {
    window: Duration,
    last_keystroke: Option<I>,
}

impl<I> TypingDebounce<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create a debounce with the given idle window.
    pub fn new(window: Duration) -> Self {
        Self { window, last_keystroke: None }
    }

    /// Idle window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a burst is in progress.
    pub fn is_active(&self) -> bool {
        self.last_keystroke.is_some()
    }

    /// Record a keystroke.
    pub fn keystroke(&mut self, now: I) -> Keystroke {
        let outcome = match self.last_keystroke {
            None => Keystroke::Started,
            Some(last) if self.expired(last, now) => Keystroke::Restarted,
            Some(_) => Keystroke::Continued,
        };
        // Never move the deadline backwards.
        self.last_keystroke = Some(match (outcome, self.last_keystroke) {
            (Keystroke::Continued, Some(last)) => last.max(now),
            _ => now,
        });
        outcome
    }

    /// Returns `true` exactly once when a burst has been idle for the window.
    pub fn poll(&mut self, now: I) -> bool {
        match self.last_keystroke {
            Some(last) if self.expired(last, now) => {
                self.last_keystroke = None;
                true
            },
            _ => false,
        }
    }

    fn expired(&self, last: I, now: I) -> bool {
        now >= last && now - last >= self.window
    }

    /// Abandon the current burst. Returns `true` if one was active.
    pub fn cancel(&mut self) -> bool {
        self.last_keystroke.take().is_some()
    }
}

impl<I> Default for TypingDebounce<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_WINDOW)
    }
}
