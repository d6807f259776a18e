//! Centralized session store.
//!
//! The store holds the current [`SessionSnapshot`] behind an [`Arc`]. Every
//! [`StoreAction`] produces a new snapshot through [`reduce`]; the previous
//! snapshot is never mutated. Transitions that change nothing hand back the
//! same `Arc`, so callers detect no-ops with [`Arc::ptr_eq`].

mod action;
mod reducer;
mod snapshot;

use std::sync::Arc;

pub use action::StoreAction;
pub use reducer::{reduce, reduce_raw};
pub use snapshot::SessionSnapshot;

use crate::error::ActionError;

/// Owner of the current session snapshot.
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: Arc<SessionSnapshot>,
}

impl Store {
    /// Create a store seeded with an initial snapshot.
    pub fn new(initial: SessionSnapshot) -> Self {
        Self { state: Arc::new(initial) }
    }

    /// Current snapshot.
    pub fn state(&self) -> &Arc<SessionSnapshot> {
        &self.state
    }

    /// Apply an action. Returns `true` if the snapshot changed.
    pub fn dispatch(&mut self, action: StoreAction) -> bool {
        let kind = action.kind();
        let next = reduce(&self.state, action);
        let changed = !Arc::ptr_eq(&next, &self.state);
        tracing::trace!(kind, changed, "store dispatch");
        self.state = next;
        changed
    }

    /// Apply an action given as `{kind, payload}`.
    ///
    /// Unrecognized kinds leave the snapshot untouched and return `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MalformedPayload`] if the kind is known but the
    /// payload does not match; the snapshot is left untouched.
    pub fn dispatch_raw(
        &mut self,
        kind: &str,
        payload: serde_json::Value,
    ) -> Result<bool, ActionError> {
        let next = reduce_raw(&self.state, kind, payload)?;
        let changed = !Arc::ptr_eq(&next, &self.state);
        self.state = next;
        Ok(changed)
    }
}
