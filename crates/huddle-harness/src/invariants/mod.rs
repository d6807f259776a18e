//! Properties of the room view that hold after every simulated step.
//!
//! A check never looks at `App` directly. [`ClientSnapshot::from_app`]
//! copies out the observable state (rooms, resolved hash index, typing users,
//! online count, alert) and each [`Invariant`] judges a [`SystemSnapshot`]
//! of one or more clients.
//!
//! ```ignore
//! let snapshot = SystemSnapshot::single(ClientSnapshot::from_app(0, &app));
//! InvariantRegistry::standard().assert_all(&snapshot, "after join");
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{OwnMessagesFlagged, RoomIndexConsistent, TypingUsersUnique, ViewScopedToRoute};
pub use snapshot::{ClientSnapshot, RoomSnapshot, SystemSnapshot};

/// Outcome of one check.
pub type InvariantResult = Result<(), Violation>;

/// A broken invariant.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Which invariant.
    pub invariant: &'static str,
    /// Offending client and values.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of a [`SystemSnapshot`].
pub trait Invariant: Send + Sync {
    /// Stable name used in [`Violation::invariant`].
    fn name(&self) -> &'static str;

    /// Judge the snapshot.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Ordered set of invariants run together.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// No invariants.
    pub fn new() -> Self {
        Self::default()
    }

    /// [`RoomIndexConsistent`], [`TypingUsersUnique`], [`OwnMessagesFlagged`]
    /// and [`ViewScopedToRoute`].
    pub fn standard() -> Self {
        Self::new()
            .with(RoomIndexConsistent)
            .with(TypingUsersUnique)
            .with(OwnMessagesFlagged)
            .with(ViewScopedToRoute)
    }

    /// Append an invariant.
    #[must_use]
    pub fn with(mut self, invariant: impl Invariant + 'static) -> Self {
        self.invariants.push(Box::new(invariant));
        self
    }

    /// Run every invariant.
    ///
    /// # Errors
    ///
    /// All violations, in registration order.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> =
            self.invariants.iter().filter_map(|invariant| invariant.check(state).err()).collect();
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Run every invariant and fail the test on the first report.
    ///
    /// # Panics
    ///
    /// Lists every violation together with `context`.
    #[allow(clippy::panic, reason = "test assertion helper")]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };
        let report: Vec<String> = violations.iter().map(ToString::to_string).collect();
        panic!("invariant violated {context}:\n  {}", report.join("\n  "));
    }

    /// Number of invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails;

    impl Invariant for AlwaysFails {
        fn name(&self) -> &'static str {
            "always_fails"
        }

        fn check(&self, _: &SystemSnapshot) -> InvariantResult {
            Err(Violation { invariant: self.name(), message: "no".into() })
        }
    }

    #[test]
    fn standard_registry() {
        assert_eq!(InvariantRegistry::standard().len(), 4);
        assert!(InvariantRegistry::new().is_empty());
    }

    #[test]
    fn empty_system_passes() {
        assert!(InvariantRegistry::standard().check_all(&SystemSnapshot::empty()).is_ok());
    }

    #[test]
    fn violations_are_collected_in_order() {
        let registry = InvariantRegistry::standard().with(AlwaysFails);

        let violations = registry.check_all(&SystemSnapshot::empty()).unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), "always_fails: no");
    }

    #[test]
    #[should_panic(expected = "invariant violated after step 3")]
    fn assert_all_reports_context() {
        let registry = InvariantRegistry::new().with(AlwaysFails);
        registry.assert_all(&SystemSnapshot::empty(), "after step 3");
    }
}
