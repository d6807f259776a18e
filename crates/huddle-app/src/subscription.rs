//! Inbound handler lifecycle.
//!
//! Handlers exist only while the room view is mounted. Mounting is idempotent,
//! so remounting never stacks a second set of handlers, and events that
//! arrive after unmount are dropped instead of mutating state.

use std::collections::HashSet;

use huddle_proto::EventName;

/// Set of inbound event names with a live handler.
#[derive(Debug, Clone, Default)]
pub struct Subscriptions {
    active: HashSet<EventName>,
}

impl Subscriptions {
    /// Create with no handlers registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every inbound event.
    ///
    /// Returns the number of newly registered handlers; zero when already
    /// mounted.
    pub fn mount(&mut self) -> usize {
        EventName::INBOUND.iter().filter(|name| self.active.insert(**name)).count()
    }

    /// Drop every handler. Returns the number removed.
    pub fn unmount(&mut self) -> usize {
        let removed = self.active.len();
        self.active.clear();
        removed
    }

    /// Whether an inbound event with this name has a handler.
    pub fn accepts(&self, name: EventName) -> bool {
        self.active.contains(&name)
    }

    /// Number of live handlers.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remount_does_not_duplicate() {
        let mut subs = Subscriptions::new();

        assert_eq!(subs.mount(), EventName::INBOUND.len());
        assert_eq!(subs.mount(), 0);
        assert_eq!(subs.len(), EventName::INBOUND.len());
    }

    #[test]
    fn unmounted_rejects_everything() {
        let mut subs = Subscriptions::new();
        subs.mount();
        assert!(subs.accepts(EventName::Message));

        assert_eq!(subs.unmount(), EventName::INBOUND.len());
        assert!(subs.is_empty());
        assert!(!subs.accepts(EventName::Message));
    }

    #[test]
    fn outbound_names_never_accepted() {
        let mut subs = Subscriptions::new();
        subs.mount();

        for name in EventName::OUTBOUND {
            assert!(!subs.accepts(name));
        }
    }
}
