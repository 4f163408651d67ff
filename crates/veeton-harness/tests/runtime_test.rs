//! End-to-end tests of the Runtime against the simulated driver and backend.
//!
//! Every test runs on a paused tokio clock: when the runtime is idle, time
//! jumps straight to the next pending timer, so the 30-minute room expiry
//! takes no wall-clock time.

use std::time::Duration;

use tokio::time::{Instant, timeout};
use veeton_app::{
    App, ChatPhase, ChatTimings, EXPIRED_ALERT, KeyInput, ROOM_JOINED, Route, Runtime,
};
use veeton_client::ApiError;
use veeton_harness::{InvariantRegistry, MemoryIdentityStore, MockApi, SimDriver};

type SimRuntime = Runtime<SimDriver, MockApi, MemoryIdentityStore>;

/// Upper bound on one step, far beyond any timer the app schedules.
const STEP_LIMIT: Duration = Duration::from_secs(2 * 60 * 60);

fn runtime(driver: &SimDriver, api: &MockApi, store: &MemoryIdentityStore) -> SimRuntime {
    Runtime::new(driver.clone(), api.clone(), store.clone(), ChatTimings::default())
}

fn checked_driver() -> SimDriver {
    SimDriver::new().with_invariants(InvariantRegistry::standard())
}

async fn step(runtime: &mut SimRuntime) {
    let quit = timeout(STEP_LIMIT, runtime.step())
        .await
        .expect("runtime stalled")
        .expect("driver error");
    assert!(!quit, "runtime quit unexpectedly");
}

/// Step until `done` holds for the app.
async fn step_until(runtime: &mut SimRuntime, done: impl Fn(&App) -> bool) {
    for _ in 0..200 {
        if done(runtime.app()) {
            return;
        }
        step(runtime).await;
    }
    panic!("condition not reached within 200 steps");
}

/// Step until every injected input has been processed.
async fn drain_input(runtime: &mut SimRuntime, driver: &SimDriver) {
    while driver.pending() > 0 {
        step(runtime).await;
    }
}

fn is_ready(app: &App) -> bool {
    app.chat().is_some_and(|chat| chat.phase() == ChatPhase::Ready)
}

#[tokio::test(start_paused = true)]
async fn room_expires_after_thirty_minutes() {
    let api = MockApi::new();
    let room_id = api.insert_room("Alice", vec![]);
    let driver = checked_driver();
    let mut runtime = runtime(&driver, &api, &MemoryIdentityStore::with_username("Alice"));

    runtime.start(Route::Chat(room_id)).unwrap();
    step_until(&mut runtime, is_ready).await;
    let entered = Instant::now();

    step_until(&mut runtime, |app| app.route() == Route::Home).await;

    assert!(entered.elapsed() >= Duration::from_secs(30 * 60));
    assert_eq!(runtime.app().alert(), Some(EXPIRED_ALERT));
    assert_eq!(runtime.pending_timers(), 0);
    assert_eq!(driver.last_frame().and_then(|f| f.alert).as_deref(), Some(EXPIRED_ALERT));
}

#[tokio::test(start_paused = true)]
async fn join_notice_lasts_three_seconds() {
    let api = MockApi::new();
    let room_id = api.insert_room("Alice", vec![]);
    let driver = checked_driver();
    let mut runtime = runtime(&driver, &api, &MemoryIdentityStore::new());
    let started = Instant::now();

    runtime.start(Route::Home).unwrap();
    driver.inject_text(room_id.as_str());
    driver.inject_key(KeyInput::Enter);
    step_until(&mut runtime, is_ready).await;
    assert_eq!(runtime.app().success(), Some(ROOM_JOINED));
    assert_eq!(api.call_count("join_room"), 1);

    step_until(&mut runtime, |app| app.success().is_none()).await;

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(30 * 60));
    assert_eq!(runtime.app().route(), Route::Chat(room_id));
}

#[tokio::test(start_paused = true)]
async fn confirmed_name_is_persisted_and_posted() {
    let api = MockApi::new();
    let room_id = api.insert_room("Alice", vec![]);
    let store = MemoryIdentityStore::new();
    let driver = checked_driver();
    let mut runtime = runtime(&driver, &api, &store);

    runtime.start(Route::Chat(room_id.clone())).unwrap();
    step_until(&mut runtime, is_ready).await;
    assert!(runtime.app().chat().is_some_and(|chat| chat.shows_naming_form()));

    driver.inject_text("Bob");
    driver.inject_key(KeyInput::Enter);
    step_until(&mut runtime, |app| app.chat().is_some_and(|chat| chat.is_confirmed())).await;
    assert_eq!(store.saves(), vec!["Bob".to_owned()]);

    driver.inject_text("hello");
    driver.inject_key(KeyInput::Enter);
    step_until(&mut runtime, |app| app.chat().is_some_and(|chat| chat.messages().len() == 1)).await;

    let stored = api.messages(&room_id);
    assert_eq!(stored.len(), 1);
    assert_eq!((stored[0].author(), stored[0].text.as_str()), ("Bob", "hello"));
    assert_eq!(driver.last_frame().map(|f| f.messages), Some(1));
}

#[tokio::test(start_paused = true)]
async fn leaving_drops_late_responses_and_timers() {
    let api = MockApi::new().with_latency(Duration::from_secs(1));
    let room_id = api.insert_room("Alice", vec![]);
    let driver = checked_driver();
    let mut runtime = runtime(&driver, &api, &MemoryIdentityStore::new());

    runtime.start(Route::Chat(room_id)).unwrap();
    driver.inject_key(KeyInput::Esc);
    step_until(&mut runtime, |app| app.route() == Route::Home).await;
    assert_eq!(runtime.pending_timers(), 0);

    // Both entry responses arrive for the torn-down view
    step(&mut runtime).await;
    step(&mut runtime).await;
    assert_eq!(runtime.app().route(), Route::Home);
    assert_eq!(api.call_count("get_messages"), 1);

    // No expiry is left to fire
    assert!(timeout(Duration::from_secs(31 * 60), runtime.step()).await.is_err());
    assert!(runtime.app().alert().is_none());
}

#[tokio::test(start_paused = true)]
async fn failed_room_load_redirects_home() {
    let api = MockApi::new();
    let room_id = api.insert_room("Alice", vec![]);
    api.fail_on("get_room_details", ApiError::Status { status: 404, body: "Room not found".into() });
    let driver = checked_driver();
    let mut runtime = runtime(&driver, &api, &MemoryIdentityStore::new());

    runtime.start(Route::Chat(room_id)).unwrap();
    step_until(&mut runtime, |app| app.route() == Route::Home).await;

    assert!(runtime.app().alert().is_none());
    assert_eq!(runtime.pending_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn copy_confirmation_expires_after_two_seconds() {
    let api = MockApi::new();
    let room_id = api.insert_room("Alice", vec![]);
    let driver = checked_driver();
    let mut runtime = runtime(&driver, &api, &MemoryIdentityStore::with_username("Alice"));

    runtime.start(Route::Chat(room_id.clone())).unwrap();
    step_until(&mut runtime, is_ready).await;

    driver.inject_text("/copy");
    driver.inject_key(KeyInput::Enter);
    step_until(&mut runtime, |app| app.chat().is_some_and(|chat| chat.copy_confirmed())).await;
    assert_eq!(driver.clipboard(), vec![room_id.to_string()]);
    let copied = Instant::now();

    step_until(&mut runtime, |app| app.chat().is_some_and(|chat| !chat.copy_confirmed())).await;
    assert!(copied.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn clipboard_failure_is_silent() {
    let api = MockApi::new();
    let room_id = api.insert_room("Alice", vec![]);
    let driver = checked_driver();
    driver.fail_clipboard();
    let mut runtime = runtime(&driver, &api, &MemoryIdentityStore::with_username("Alice"));

    runtime.start(Route::Chat(room_id)).unwrap();
    step_until(&mut runtime, is_ready).await;
    driver.inject_text("/copy");
    driver.inject_key(KeyInput::Enter);
    drain_input(&mut runtime, &driver).await;

    let chat = runtime.app().chat().expect("still in room");
    assert!(!chat.copy_confirmed());
    assert!(runtime.app().alert().is_none());
}

#[tokio::test(start_paused = true)]
async fn new_error_restarts_notice_timer() {
    let driver = checked_driver();
    let mut runtime = runtime(&driver, &MockApi::new(), &MemoryIdentityStore::new());
    runtime.start(Route::Home).unwrap();

    driver.inject_key(KeyInput::Enter);
    drain_input(&mut runtime, &driver).await;
    let first = Instant::now();
    assert!(runtime.app().home().is_some_and(|home| home.error().is_some()));

    tokio::time::sleep(Duration::from_secs(1)).await;
    driver.inject_key(KeyInput::Enter);
    drain_input(&mut runtime, &driver).await;

    step_until(&mut runtime, |app| app.home().is_some_and(|home| home.error().is_none())).await;
    assert!(first.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn second_send_is_ignored_while_posting() {
    let api = MockApi::new().with_latency(Duration::from_millis(500));
    let room_id = api.insert_room("Alice", vec![]);
    let driver = checked_driver();
    let mut runtime = runtime(&driver, &api, &MemoryIdentityStore::with_username("Alice"));

    runtime.start(Route::Chat(room_id.clone())).unwrap();
    step_until(&mut runtime, is_ready).await;

    driver.inject_text("hi");
    driver.inject_key(KeyInput::Enter);
    driver.inject_key(KeyInput::Enter);
    drain_input(&mut runtime, &driver).await;
    assert!(runtime.app().chat().is_some_and(|chat| chat.is_sending()));

    step_until(&mut runtime, |app| app.chat().is_some_and(|chat| !chat.is_sending())).await;
    assert_eq!(api.messages(&room_id).len(), 1);
    assert_eq!(api.call_count("post_message"), 1);
}

#[tokio::test(start_paused = true)]
async fn unreadable_store_starts_anonymous() {
    let store = MemoryIdentityStore::with_username("Alice");
    store.fail_load();

    let runtime = runtime(&SimDriver::new(), &MockApi::new(), &store);

    assert_eq!(runtime.app().session().display_name(), None);
}

#[tokio::test(start_paused = true)]
async fn run_stops_driver_on_quit() {
    let driver = SimDriver::new();
    driver.inject_key(KeyInput::Esc);

    runtime(&driver, &MockApi::new(), &MemoryIdentityStore::new()).run(Route::Home).await.unwrap();

    assert!(driver.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn run_ends_when_input_closes() {
    let driver = SimDriver::new();
    driver.close();

    let result = timeout(
        STEP_LIMIT,
        runtime(&driver, &MockApi::new(), &MemoryIdentityStore::new()).run(Route::Home),
    )
    .await;

    assert!(matches!(result, Ok(Ok(()))));
    assert!(driver.is_stopped());
}
