//! Property-based tests for the session store.
//!
//! Tests verify that reducer properties hold under arbitrary action sequences,
//! then walk the reference scenario end to end.

use std::sync::Arc;

use huddle_core::{
    Message, NewMessage, Room, SessionSnapshot, Store, StoreAction, User, reduce,
    store::reduce_raw,
};
use proptest::prelude::*;

fn new_message(author: &str, text: &str, date: u64, icon: &str) -> NewMessage {
    NewMessage { author: author.into(), text: text.into(), date, icon: icon.into() }
}

/// Generate (name, hash) pairs for `AddRoom`.
fn add_room_strategy() -> impl Strategy<Value = (String, String)> {
    ("[A-Za-z ]{1,10}", "[a-f0-9]{1,8}")
}

/// Generate arbitrary store actions over a small hash space so appends hit
/// both known and unknown rooms.
fn action_strategy() -> impl Strategy<Value = StoreAction> {
    let hash = "h[0-3]";
    prop_oneof![
        2 => ("[a-z]{1,5}", hash).prop_map(|(name, hash)| StoreAction::AddRoom { name, hash }),
        3 => (hash, "[a-z ]{0,10}", any::<u64>(), any::<bool>()).prop_map(|(h, text, date, local)| {
            let message = new_message("A", &text, date, "i");
            if local {
                StoreAction::append_sent(h, message)
            } else {
                StoreAction::append_received(h, message)
            }
        }),
        1 => ("[a-z]{1,5}", "[a-z]{1,5}").prop_map(|(n, i)| StoreAction::SetUser(User::new(n, i))),
        1 => hash.prop_map(|id| StoreAction::SetPrevUrl { id }),
    ]
}

proptest! {
    #[test]
    fn prop_add_room_count_and_hashes(rooms in prop::collection::vec(add_room_strategy(), 0..20)) {
        let mut store = Store::default();
        for (name, hash) in &rooms {
            store.dispatch(StoreAction::AddRoom { name: name.clone(), hash: hash.clone() });
        }

        let state = store.state();
        prop_assert_eq!(state.rooms().len(), rooms.len());
        for (room, (name, hash)) in state.rooms().iter().zip(&rooms) {
            prop_assert_eq!(&room.hash, hash);
            prop_assert_eq!(&room.name, name);
            prop_assert!(room.messages.is_empty());
        }
    }

    #[test]
    fn prop_append_to_unknown_room_is_noop(
        actions in prop::collection::vec(action_strategy(), 0..30),
        text in "[a-z]{0,8}",
        local in any::<bool>(),
    ) {
        let mut state = Arc::new(SessionSnapshot::default());
        for action in actions {
            state = reduce(&state, action);
        }

        // "zz" is outside the generated hash space.
        let message = new_message("A", &text, 0, "i");
        let action = if local {
            StoreAction::append_sent("zz", message)
        } else {
            StoreAction::append_received("zz", message)
        };
        let next = reduce(&state, action);

        prop_assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn prop_message_count_matches_known_appends(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let mut store = Store::default();
        let mut expected = 0usize;

        for action in actions {
            if let StoreAction::AppendMessage { room_id, .. } = &action
                && store.state().contains_room(room_id)
            {
                expected += 1;
            }
            store.dispatch(action);
        }

        let total: usize = store.state().rooms().iter().map(|r| r.messages.len()).sum();
        prop_assert_eq!(total, expected);
    }

    #[test]
    fn prop_set_user_replaces_atomically(
        first in ("[a-z]{1,5}", "[a-z]{1,5}"),
        second in ("[a-z]{1,5}", "[a-z]{1,5}"),
    ) {
        let mut store = Store::default();
        store.dispatch(StoreAction::SetUser(User::new(first.0, first.1)));
        store.dispatch(StoreAction::SetUser(User::new(second.0.clone(), second.1.clone())));

        prop_assert_eq!(store.state().user(), Some(&User::new(second.0, second.1)));
    }
}

#[test]
fn sent_then_received_preserves_order() {
    let mut store = Store::new(SessionSnapshot::new(None, vec![Room::new("R1", "h1")], None));

    store.dispatch(StoreAction::append_sent("h1", new_message("A", "first", 1, "i1")));
    store.dispatch(StoreAction::append_received("h1", new_message("B", "second", 2, "i2")));

    let texts: Vec<_> =
        store.state().rooms()[0].messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["first", "second"]);
    assert_eq!(store.state().rooms()[0].messages[0].is_my_message, Some(true));
    assert_eq!(store.state().rooms()[0].messages[1].is_my_message, None);
}

#[test]
fn set_user_does_not_leak_old_icon() {
    let mut store = Store::default();
    store.dispatch(StoreAction::SetUser(User::new("A", "old.png")));
    store.dispatch(StoreAction::SetUser(User::new("A", "new.png")));

    assert_eq!(store.state().user().map(|u| u.icon.as_str()), Some("new.png"));
}

#[test]
fn unknown_kind_returns_identical_state() {
    let state = Arc::new(SessionSnapshot::new(None, vec![Room::new("R1", "h1")], None));
    let next = reduce_raw(&state, "ArchiveRoom", serde_json::json!({"hash": "h1"})).unwrap();

    assert!(Arc::ptr_eq(&state, &next));
}

#[test]
fn malformed_raw_action_leaves_store_untouched() {
    let mut store = Store::default();
    let before = Arc::clone(store.state());

    assert!(store.dispatch_raw("AddRoom", serde_json::json!({"hash": 7})).is_err());
    assert!(Arc::ptr_eq(&before, store.state()));
}

#[test]
fn reference_scenario() {
    let mut store = Store::new(SessionSnapshot::default());
    assert!(store.state().user().is_none());
    assert!(store.state().rooms().is_empty());
    assert!(store.state().prev_url().is_none());

    store.dispatch(StoreAction::SetUser(User::new("A", "i1")));
    assert_eq!(store.state().user(), Some(&User::new("A", "i1")));

    store.dispatch(StoreAction::AddRoom { name: "R1".into(), hash: "h1".into() });
    assert_eq!(store.state().rooms(), &[Room::new("R1", "h1")]);

    let changed = store
        .dispatch_raw(
            "AppendSentMessage",
            serde_json::json!({
                "roomId": "h1",
                "author": "A",
                "text": "hi",
                "date": 1000,
                "icon": "i1",
                "isMyMessage": true
            }),
        )
        .unwrap();
    assert!(changed);
    assert_eq!(store.state().rooms()[0].messages, vec![Message {
        author: "A".into(),
        text: "hi".into(),
        date: 1000,
        icon: "i1".into(),
        is_my_message: Some(true),
    }]);
}
