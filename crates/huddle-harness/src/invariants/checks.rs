//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use huddle_app::SELF_AUTHOR;

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// The hash index must agree with a find-first scan of the rooms list.
///
/// Every room's hash must resolve to the position of the first room carrying
/// that hash. A stale index would route messages into the wrong room.
pub struct RoomIndexConsistent;

impl Invariant for RoomIndexConsistent {
    fn name(&self) -> &'static str {
        "room_index_consistent"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            for (room, resolved) in client.rooms.iter().zip(&client.resolved_index) {
                let first = client.rooms.iter().position(|r| r.hash == room.hash);
                if *resolved != first {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "client {}: hash {} resolves to {:?}, first occurrence is {:?}",
                            client.id, room.hash, resolved, first
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A remote user is listed as typing at most once.
pub struct TypingUsersUnique;

impl Invariant for TypingUsersUnique {
    fn name(&self) -> &'static str {
        "typing_users_unique"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let mut seen = HashSet::new();
            if let Some(dup) = client.typing_users.iter().find(|name| !seen.insert(*name)) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("client {}: {dup} listed as typing twice", client.id),
                });
            }
        }
        Ok(())
    }
}

/// Messages flagged as our own carry the self author label.
///
/// Only the optimistic append marks a message local, and it always uses
/// [`SELF_AUTHOR`]. Anything else means a received message was mislabeled.
pub struct OwnMessagesFlagged;

impl Invariant for OwnMessagesFlagged {
    fn name(&self) -> &'static str {
        "own_messages_flagged"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            for room in &client.rooms {
                if let Some(author) = room.local_authors.iter().find(|a| *a != SELF_AUTHOR) {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "client {} room {}: local message authored by {author}",
                            client.id, room.hash
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Ephemeral room state exists only while a room is routed.
pub struct ViewScopedToRoute;

impl Invariant for ViewScopedToRoute {
    fn name(&self) -> &'static str {
        "view_scoped_to_route"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let leaked =
                !client.typing_users.is_empty() || client.online_users > 0 || client.has_alert;
            if client.route_room.is_none() && leaked {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("client {}: room view state outside a room route", client.id),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::{ClientSnapshot, RoomSnapshot};

    #[test]
    fn stale_index_detected() {
        let client = ClientSnapshot::new(1)
            .with_room(RoomSnapshot::new("h1"), Some(0))
            .with_room(RoomSnapshot::new("h2"), Some(0));

        let result = RoomIndexConsistent.check(&SystemSnapshot::single(client));
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_hash_resolving_to_first_is_fine() {
        let client = ClientSnapshot::new(1)
            .with_room(RoomSnapshot::new("h1"), Some(0))
            .with_room(RoomSnapshot::new("h1"), Some(0));

        assert!(RoomIndexConsistent.check(&SystemSnapshot::single(client)).is_ok());
    }

    #[test]
    fn duplicate_typing_user_detected() {
        let mut client = ClientSnapshot::new(1);
        client.route_room = Some("h1".into());
        client.typing_users = vec!["Bo".into(), "Bo".into()];

        let violation = TypingUsersUnique.check(&SystemSnapshot::single(client)).unwrap_err();
        assert_eq!(violation.invariant, "typing_users_unique");
    }

    #[test]
    fn mislabeled_local_message_detected() {
        let mut room = RoomSnapshot::new("h1");
        room.local_authors = vec!["Bo".into()];
        let client = ClientSnapshot::new(1).with_room(room, Some(0));

        assert!(OwnMessagesFlagged.check(&SystemSnapshot::single(client)).is_err());
    }

    #[test]
    fn alert_on_landing_detected() {
        let mut client = ClientSnapshot::new(1);
        client.has_alert = true;

        assert!(ViewScopedToRoute.check(&SystemSnapshot::single(client)).is_err());
    }
}
