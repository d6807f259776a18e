//! Pure state transitions.

use std::sync::Arc;

use super::{SessionSnapshot, StoreAction};
use crate::{error::ActionError, model::Room};

/// Produce the snapshot that follows `state` after `action`.
///
/// Never mutates `state`. Returns `Arc::clone(state)` when the action changes
/// nothing, in particular when an append targets a room that is not joined.
pub fn reduce(state: &Arc<SessionSnapshot>, action: StoreAction) -> Arc<SessionSnapshot> {
    match action {
        StoreAction::SetUser(user) => {
            let mut next = SessionSnapshot::clone(state);
            next.user = Some(user);
            Arc::new(next)
        },
        StoreAction::AddRoom { name, hash } => {
            let mut next = SessionSnapshot::clone(state);
            next.push_room(Room::new(name, hash));
            Arc::new(next)
        },
        StoreAction::ReplaceRooms(rooms) => {
            let mut next = SessionSnapshot::clone(state);
            next.replace_rooms(rooms);
            Arc::new(next)
        },
        StoreAction::AppendMessage { room_id, message, origin } => {
            let Some(index) = state.room_index(&room_id) else {
                tracing::debug!(%room_id, ?origin, "append to unknown room ignored");
                return Arc::clone(state);
            };

            let mut next = SessionSnapshot::clone(state);
            if let Some(room) = next.rooms.get_mut(index) {
                room.messages.push(message.into_message(origin));
            }
            Arc::new(next)
        },
        StoreAction::SetPrevUrl { id } => {
            let mut next = SessionSnapshot::clone(state);
            next.prev_url = Some(id);
            Arc::new(next)
        },
    }
}

/// Apply an action given as `{kind, payload}`.
///
/// An unrecognized kind returns `Arc::clone(state)`.
///
/// # Errors
///
/// [`ActionError::MalformedPayload`] if the kind is known but the payload does
/// not have the expected shape.
pub fn reduce_raw(
    state: &Arc<SessionSnapshot>,
    kind: &str,
    payload: serde_json::Value,
) -> Result<Arc<SessionSnapshot>, ActionError> {
    match StoreAction::from_raw(kind, payload)? {
        Some(action) => Ok(reduce(state, action)),
        None => {
            tracing::debug!(kind, "unrecognized action kind");
            Ok(Arc::clone(state))
        },
    }
}
