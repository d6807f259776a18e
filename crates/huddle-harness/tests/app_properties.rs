//! Property-based tests for the App state machine.
//!
//! Tests verify that invariants hold under arbitrary interleavings of user
//! intents, inbound events and clock ticks.

use std::{sync::Arc, time::Duration};

use huddle_app::{App, AppAction, AppEvent, Bridge, Route};
use huddle_core::{Environment, NewMessage, SessionSnapshot, User};
use huddle_harness::{ClientSnapshot, InvariantRegistry, SimEnv, SimInput, SystemSnapshot};
use huddle_proto::EventName;
use proptest::prelude::*;

/// Small hash space so events hit the routed room often.
fn hash() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["h0".to_string(), "h1".to_string(), "h2".to_string()])
}

fn name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Bo".to_string(), "Cy".to_string(), "Di".to_string()])
}

fn inbound_event() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        2 => (hash(), "[A-Z][a-z]{0,5}")
            .prop_map(|(hash, name)| AppEvent::RoomCreated { name, hash }),
        1 => (hash(), name())
            .prop_map(|(hash, n)| AppEvent::UserJoinedRoom { user: User::new(n, "i"), hash }),
        3 => (hash(), name(), "[a-z ]{0,12}", any::<u32>()).prop_map(|(hash, author, text, date)| {
            AppEvent::MessageReceived {
                hash,
                message: NewMessage { author, text, date: u64::from(date), icon: "i".into() },
            }
        }),
        1 => (hash(), prop::collection::vec(name(), 0..4)).prop_map(|(hash, names)| {
            let users = names.into_iter().map(|n| User::new(n, "i")).collect();
            AppEvent::UsersInRoom { hash, users }
        }),
        2 => (hash(), name()).prop_map(|(hash, user)| AppEvent::TypingStarted { hash, user }),
        2 => (hash(), name()).prop_map(|(hash, user)| AppEvent::TypingStopped { hash, user }),
        1 => Just(AppEvent::Disconnected),
        1 => Just(AppEvent::Connected),
    ]
}

#[derive(Debug, Clone)]
enum Step {
    Input(SimInput),
    Advance(u64),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => inbound_event().prop_map(|e| Step::Input(SimInput::Event(e))),
        1 => Just(Step::Input(SimInput::SetUser { name: "Ann".into(), icon: "a.png".into() })),
        2 => hash().prop_map(|h| Step::Input(SimInput::OpenRoom(h))),
        2 => "[a-z]{0,6}".prop_map(|t| Step::Input(SimInput::Send(t))),
        1 => Just(Step::Input(SimInput::Leave)),
        3 => Just(Step::Input(SimInput::Keystroke)),
        1 => Just(Step::Input(SimInput::CycleRoom)),
        1 => Just(Step::Input(SimInput::DismissAlert)),
        2 => (0u64..2000).prop_map(Step::Advance),
    ]
}

/// Run actions through the bridge the way the runtime does, returning the
/// names of every envelope produced.
fn process(app: &mut App, bridge: &mut Bridge<SimEnv>, actions: Vec<AppAction>) -> Vec<EventName> {
    let mut pending = actions;
    while !pending.is_empty() {
        for action in std::mem::take(&mut pending) {
            match action {
                AppAction::Render
                | AppAction::Quit
                | AppAction::Navigate { .. }
                | AppAction::Persist => {},
                other => {
                    for event in bridge.process_app_action(other) {
                        pending.extend(app.handle(event));
                    }
                },
            }
        }
    }
    bridge.take_outgoing().iter().map(|e| e.name).collect()
}

fn check(app: &App, registry: &InvariantRegistry, context: &str) {
    registry.assert_all(&SystemSnapshot::single(ClientSnapshot::from_app(0, app)), context);
}

proptest! {
    #[test]
    fn prop_app_invariants_hold(steps in prop::collection::vec(step_strategy(), 0..60)) {
        let env = SimEnv::new();
        let mut app = App::new(SessionSnapshot::default(), Route::Landing);
        let mut bridge = Bridge::new(env.clone());
        let registry = InvariantRegistry::standard();

        let actions = app.mount();
        let _ = process(&mut app, &mut bridge, actions);

        for (i, step) in steps.into_iter().enumerate() {
            match step {
                Step::Input(input) => {
                    let actions = input.apply(&mut app);
                    let _ = process(&mut app, &mut bridge, actions);
                },
                Step::Advance(ms) => env.advance(Duration::from_millis(ms)),
            }
            for event in bridge.handle_tick(env.now()) {
                let actions = app.handle(event);
                let _ = process(&mut app, &mut bridge, actions);
            }
            check(&app, &registry, &format!("after step {i}"));
        }
    }

    #[test]
    fn prop_typing_start_and_stop_alternate(
        steps in prop::collection::vec(prop_oneof![
            3 => Just(None),
            2 => (0u64..3000).prop_map(Some),
        ], 0..60)
    ) {
        let env = SimEnv::new();
        let snapshot = SessionSnapshot::new(Some(User::new("Ann", "a")), vec![], None);
        let mut app = App::new(snapshot, Route::Room("h1".into()));
        let mut bridge = Bridge::new(env.clone());
        let mut wire = Vec::new();

        for step in steps {
            match step {
                None => {
                    let actions = app.typing();
                    wire.extend(process(&mut app, &mut bridge, actions));
                },
                Some(ms) => env.advance(Duration::from_millis(ms)),
            }
            for event in bridge.handle_tick(env.now()) {
                let actions = app.handle(event);
                wire.extend(process(&mut app, &mut bridge, actions));
            }
            prop_assert_eq!(app.view().typing, bridge.is_typing());
        }

        // Starts and stops strictly alternate, beginning with a start.
        for (i, name) in wire.iter().enumerate() {
            let expected = if i % 2 == 0 { EventName::StartTyping } else { EventName::StopTyping };
            prop_assert_eq!(*name, expected);
        }
    }

    #[test]
    fn prop_unknown_room_messages_never_change_state(
        text in "[a-z]{0,10}",
        date in any::<u32>(),
    ) {
        let mut app = App::new(SessionSnapshot::default(), Route::Landing);
        let before = Arc::clone(app.snapshot());

        let actions = app.handle(AppEvent::MessageReceived {
            hash: "missing".into(),
            message: NewMessage {
                author: "Bo".into(),
                text,
                date: u64::from(date),
                icon: "i".into(),
            },
        });

        prop_assert!(actions.is_empty());
        prop_assert!(Arc::ptr_eq(&before, app.snapshot()));
    }
}
