//! Fuzz target for the session reducer
//!
//! Drives a store with a mix of typed actions and raw `{kind, payload}`
//! actions whose payload is arbitrary JSON.
//!
//! # Invariants
//!
//! - Room hashes stay unique
//! - A rejected or unrecognized raw action leaves the snapshot untouched
//! - Appends to an unknown room never change the snapshot
//! - Message count only grows through appends to a known room

#![no_main]

use std::{collections::HashSet, sync::Arc};

use arbitrary::Arbitrary;
use huddle_core::{NewMessage, Room, SessionSnapshot, Store, StoreAction, User};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzAction {
    SetUser { name: String },
    AddRoom { name: String, hash: u8 },
    LeaveRoom { hash: u8 },
    Append { hash: u8, text: String, date: u64, local: bool },
    SetPrevUrl { hash: u8 },
    Raw { kind: u8, payload: String },
}

fn hash(n: u8) -> String {
    format!("h{}", n % 4)
}

fn message_count(snapshot: &SessionSnapshot) -> usize {
    snapshot.rooms().iter().map(|room| room.messages.len()).sum()
}

fn apply(store: &mut Store, action: FuzzAction) {
    let before = Arc::clone(store.state());

    match action {
        FuzzAction::SetUser { name } => {
            store.dispatch(StoreAction::SetUser(User::new(name, "icon.png")));
        },
        FuzzAction::AddRoom { name, hash: n } => {
            // Callers only add rooms they do not know yet.
            if !before.contains_room(&hash(n)) {
                store.dispatch(StoreAction::AddRoom { name, hash: hash(n) });
            }
        },
        FuzzAction::LeaveRoom { hash: n } => {
            store.dispatch(StoreAction::ReplaceRooms(before.rooms_without(&hash(n))));
        },
        FuzzAction::Append { hash: n, text, date, local } => {
            let room_id = hash(n);
            let known = before.contains_room(&room_id);
            let message = NewMessage { author: "Bo".into(), text, date, icon: String::new() };
            let action = if local {
                StoreAction::append_sent(room_id, message)
            } else {
                StoreAction::append_received(room_id, message)
            };
            let changed = store.dispatch(action);

            assert_eq!(changed, known);
            let expected = message_count(&before) + usize::from(known);
            assert_eq!(message_count(store.state()), expected);
        },
        FuzzAction::SetPrevUrl { hash: n } => {
            store.dispatch(StoreAction::SetPrevUrl { id: hash(n) });
        },
        FuzzAction::Raw { kind, payload } => {
            let kinds = StoreAction::KINDS;
            let kind = kinds.get(usize::from(kind)).copied().unwrap_or("Unknown");
            let Ok(payload) = serde_json::from_str::<serde_json::Value>(&payload) else {
                return;
            };
            // Raw rooms lists may repeat hashes; only typed actions are checked
            // for uniqueness.
            if kind == "ReplaceRooms" || kind == "AddRoom" {
                return;
            }
            match store.dispatch_raw(kind, payload) {
                Ok(true) => {},
                Ok(false) | Err(_) => assert!(Arc::ptr_eq(&before, store.state())),
            }
        },
    }

    let hashes: HashSet<&str> = store.state().rooms().iter().map(|r| r.hash.as_str()).collect();
    assert_eq!(hashes.len(), store.state().rooms().len(), "duplicate room hash");
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let mut store = Store::new(SessionSnapshot::new(None, vec![Room::new("Lobby", "h0")], None));
    for action in actions {
        apply(&mut store, action);
    }
});
