//! End-to-end tests running the production Runtime over the simulation
//! driver.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - Store and view state of every client
//! - Envelopes that went over the wire
//! - Routes and persisted session values

use std::time::Duration;

use huddle_app::{App, Bridge, ConnectionState, Route, Runtime, SELF_AUTHOR};
use huddle_core::{Room, SessionSnapshot, User};
use huddle_harness::{InvariantRegistry, SimDriver, SimEnv, SimInput, SimNetwork};
use huddle_proto::EventName;

type SimRuntime = Runtime<SimDriver, SimEnv>;

fn runtime(env: &SimEnv, driver: SimDriver, snapshot: SessionSnapshot, route: Route) -> SimRuntime {
    let driver = driver.with_invariants(InvariantRegistry::standard());
    Runtime::new(driver, App::new(snapshot, route), Bridge::new(env.clone()))
}

fn user_snapshot(name: &str) -> SessionSnapshot {
    SessionSnapshot::new(Some(User::new(name, format!("{name}.png"))), vec![], None)
}

async fn pump(rt: &mut SimRuntime, steps: usize) {
    for _ in 0..steps {
        assert!(!rt.step().await.unwrap(), "runtime quit unexpectedly");
    }
}

fn names(driver: &SimDriver) -> Vec<EventName> {
    driver.take_outgoing().iter().map(|e| e.name).collect()
}

#[tokio::test]
async fn two_clients_chat_in_a_room() {
    let env = SimEnv::new();
    let network = SimNetwork::new(42);
    let hash = network.with_hub(|hub| hub.open_room("lobby"));

    let mut ann = runtime(
        &env,
        SimDriver::attached(env.clone(), network.clone()),
        user_snapshot("Ann"),
        Route::Landing,
    );
    let mut bo = runtime(
        &env,
        SimDriver::attached(env.clone(), network.clone()),
        user_snapshot("Bo"),
        Route::Landing,
    );
    assert!(!ann.start().await.unwrap());
    assert!(!bo.start().await.unwrap());

    ann.driver().inject(SimInput::OpenRoom(hash.clone()));
    pump(&mut ann, 5).await;
    assert_eq!(ann.app().active_room().name, "lobby");

    bo.driver().inject(SimInput::OpenRoom(hash.clone()));
    pump(&mut bo, 5).await;
    pump(&mut ann, 5).await;

    let alert = ann.app().view().alert.clone().map(|a| a.user_name);
    assert_eq!(alert.as_deref(), Some("Bo"));
    assert_eq!(ann.app().view().online_users.len(), 2);

    ann.driver().inject(SimInput::Send("hello".into()));
    pump(&mut ann, 2).await;
    pump(&mut bo, 5).await;

    let ann_messages = ann.app().active_room().messages;
    assert_eq!(ann_messages.len(), 1);
    assert_eq!(ann_messages[0].author, SELF_AUTHOR);
    assert_eq!(ann_messages[0].is_my_message, Some(true));

    let bo_messages = bo.app().active_room().messages;
    assert_eq!(bo_messages.len(), 1);
    assert_eq!(bo_messages[0].author, "Ann");
    assert_eq!(bo_messages[0].text, "hello");
    assert_eq!(bo_messages[0].is_my_message, None);

    // Typing indicator travels and clears after the idle window.
    bo.driver().inject(SimInput::Keystroke);
    pump(&mut bo, 1).await;
    pump(&mut ann, 3).await;
    assert_eq!(ann.app().view().typing_users, vec!["Bo".to_string()]);

    env.advance(Duration::from_millis(1600));
    pump(&mut bo, 1).await;
    pump(&mut ann, 3).await;
    assert!(ann.app().view().typing_users.is_empty());
    assert!(!bo.app().view().typing);
}

#[tokio::test]
async fn create_room_adds_and_persists() {
    let env = SimEnv::new();
    let network = SimNetwork::new(9);
    let mut ann = runtime(
        &env,
        SimDriver::attached(env.clone(), network.clone()),
        user_snapshot("Ann"),
        Route::Landing,
    );
    assert!(!ann.start().await.unwrap());

    ann.driver().inject(SimInput::CreateRoom);
    pump(&mut ann, 3).await;

    assert_eq!(ann.app().rooms().len(), 1);
    assert_eq!(ann.app().rooms()[0].name, "Ann's room");
    let stored = ann.driver().stored_session().decode().unwrap();
    assert_eq!(stored.rooms(), ann.app().rooms());
    assert_eq!(network.with_hub(|hub| hub.room_hashes()), vec![ann.app().rooms()[0].hash.clone()]);
}

#[tokio::test]
async fn typing_debounce_emits_one_start_and_one_stop() {
    let env = SimEnv::new();
    let snapshot = SessionSnapshot::new(
        Some(User::new("Ann", "a.png")),
        vec![Room::new("R1", "h1")],
        None,
    );
    let mut rt = runtime(&env, SimDriver::new(env.clone()), snapshot, Route::Room("h1".into()));
    assert!(!rt.start().await.unwrap());
    let _ = rt.driver().take_outgoing();

    rt.driver().inject(SimInput::Keystroke);
    pump(&mut rt, 1).await;
    for _ in 0..3 {
        env.advance(Duration::from_millis(400));
        rt.driver().inject(SimInput::Keystroke);
        pump(&mut rt, 1).await;
    }
    assert!(rt.app().view().typing);

    env.advance(Duration::from_millis(1500));
    pump(&mut rt, 2).await;

    assert_eq!(names(rt.driver()), vec![EventName::StartTyping, EventName::StopTyping]);
    assert!(!rt.app().view().typing);
}

#[tokio::test]
async fn reconnect_is_rate_limited_and_resyncs() {
    let env = SimEnv::new();
    let snapshot = SessionSnapshot::new(
        Some(User::new("Ann", "a.png")),
        vec![Room::new("R1", "h1")],
        None,
    );
    let mut rt = runtime(&env, SimDriver::new(env.clone()), snapshot, Route::Room("h1".into()));
    assert!(!rt.start().await.unwrap());
    assert_eq!(names(rt.driver()), vec![EventName::JoinRoom, EventName::GetUsersInRoom]);

    rt.driver().drop_connection();
    rt.driver().refuse_connects(1);
    pump(&mut rt, 3).await;
    assert_eq!(rt.app().connection_state(), ConnectionState::Disconnected);

    // First retry is refused.
    env.advance(Duration::from_secs(1));
    pump(&mut rt, 1).await;
    assert_eq!(rt.app().connection_state(), ConnectionState::Disconnected);

    // Nothing is attempted inside the interval.
    env.advance(Duration::from_millis(500));
    pump(&mut rt, 1).await;
    assert!(!rt.driver().has_pending());
    assert_eq!(rt.app().connection_state(), ConnectionState::Disconnected);

    env.advance(Duration::from_millis(500));
    pump(&mut rt, 1).await;
    assert_eq!(rt.app().connection_state(), ConnectionState::Connected);
    assert_eq!(names(rt.driver()), vec![EventName::JoinRoom, EventName::GetUsersInRoom]);
}

#[tokio::test]
async fn messages_sent_while_disconnected_are_not_delivered() {
    let env = SimEnv::new();
    let snapshot = SessionSnapshot::new(
        Some(User::new("Ann", "a.png")),
        vec![Room::new("R1", "h1")],
        None,
    );
    let mut rt = runtime(&env, SimDriver::new(env.clone()), snapshot, Route::Room("h1".into()));
    assert!(!rt.start().await.unwrap());
    let _ = rt.driver().take_outgoing();

    rt.driver().drop_connection();
    rt.driver().refuse_connects(u32::MAX);
    rt.driver().inject(SimInput::Send("offline".into()));
    pump(&mut rt, 2).await;

    assert!(rt.driver().take_outgoing().is_empty());
    assert_eq!(rt.app().active_room().messages.len(), 1);
}

#[tokio::test]
async fn login_redirect_resumes_room() {
    let env = SimEnv::new();
    let network = SimNetwork::new(5);
    let hash = network.with_hub(|hub| hub.open_room("lobby"));
    let mut rt = runtime(
        &env,
        SimDriver::attached(env.clone(), network),
        SessionSnapshot::default(),
        Route::Room(hash.clone()),
    );
    assert!(!rt.start().await.unwrap());
    assert_eq!(rt.app().route(), &Route::Login);

    rt.driver().inject(SimInput::SetUser { name: "Ann".into(), icon: "a.png".into() });
    pump(&mut rt, 4).await;

    assert_eq!(rt.app().route(), &Route::Room(hash.clone()));
    assert_eq!(rt.app().active_room().name, "lobby");
    assert_eq!(rt.driver().navigations(), vec![Route::Login, Route::Room(hash)]);
}

#[tokio::test]
async fn quit_unmounts_and_stops() {
    let env = SimEnv::new();
    let mut rt =
        runtime(&env, SimDriver::new(env.clone()), user_snapshot("Ann"), Route::Landing);
    rt.driver().inject(SimInput::Quit);

    rt.run().await.unwrap();

    assert!(rt.bridge().subscriptions().is_empty());
    assert!(!rt.app().is_mounted());
    assert!(!huddle_app::Driver::is_connected(rt.driver()));
}

#[tokio::test]
async fn startup_user_is_persisted_before_the_loop() {
    let env = SimEnv::new();
    let driver = SimDriver::new(env.clone()).with_invariants(InvariantRegistry::standard());
    let mut app = App::new(SessionSnapshot::default(), Route::Landing);
    let startup = app.set_user("Ann", "ann.png");

    let mut rt =
        Runtime::new(driver, app, Bridge::new(env.clone())).with_startup_actions(startup);
    assert!(!rt.start().await.unwrap());

    assert!(rt.driver().persist_count() >= 1);
    let stored = rt.driver().stored_session().decode().unwrap();
    assert_eq!(stored.user(), Some(&User::new("Ann", "ann.png")));
}
