//! Property tests: the standard invariants hold for arbitrary key scripts.
//!
//! Each case runs the production Runtime against `SimDriver` and `MockApi`
//! on a paused tokio clock, plays the script once the room has loaded, and
//! steps until the input is exhausted. The driver checks every invariant
//! after each render, so any violating frame fails the case.

use proptest::prelude::*;
use veeton_app::{ChatPhase, ChatTimings, KeyInput, Route, Runtime};
use veeton_client::{Message, MessageId};
use veeton_harness::{InvariantRegistry, MemoryIdentityStore, MockApi, SimDriver};

fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        4 => prop::sample::select(vec!['a', 'B', '/', ' ', 'o', 'd', 't', 'y']).prop_map(KeyInput::Char),
        2 => Just(KeyInput::Enter),
        2 => Just(KeyInput::Tab),
        1 => Just(KeyInput::BackTab),
        1 => Just(KeyInput::Up),
        1 => Just(KeyInput::Down),
        1 => Just(KeyInput::Right),
        1 => Just(KeyInput::Backspace),
        1 => Just(KeyInput::Esc),
    ]
}

fn history(len: usize) -> Vec<Message> {
    (1..=len)
        .map(|i| Message {
            id: MessageId::from(i as u64),
            username: Some(if i % 2 == 0 { "Alice" } else { "Bob" }.into()),
            text: format!("message {i}"),
            timestamp: String::new(),
        })
        .collect()
}

/// Upper bound on runtime steps per case.
const MAX_STEPS: usize = 500;

/// Enter a room created by `Alice` with `stored` as the saved name, wait
/// until it is usable, then play `keys`.
fn run_script(stored: Option<&str>, messages: usize, keys: &[KeyInput]) {
    let api = MockApi::new();
    let room_id = api.insert_room("Alice", history(messages));
    let store = stored.map_or_else(MemoryIdentityStore::new, MemoryIdentityStore::with_username);
    let driver = SimDriver::new().with_invariants(InvariantRegistry::standard());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("test runtime");
    rt.block_on(async {
        let mut runtime = Runtime::new(driver.clone(), api, store, ChatTimings::default());
        runtime.start(Route::Chat(room_id)).expect("driver error");
        for _ in 0..MAX_STEPS {
            if runtime.app().chat().is_some_and(|chat| chat.phase() == ChatPhase::Ready) {
                break;
            }
            runtime.step().await.expect("driver error");
        }

        for key in keys {
            driver.inject_key(*key);
        }
        driver.close();
        for _ in 0..MAX_STEPS {
            if runtime.step().await.expect("driver error") {
                break;
            }
        }
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn visitor_scripts_keep_invariants(
        messages in 0usize..4,
        keys in prop::collection::vec(key_strategy(), 0..40),
    ) {
        run_script(None, messages, &keys);
    }

    #[test]
    fn creator_scripts_keep_invariants(
        messages in 0usize..4,
        keys in prop::collection::vec(key_strategy(), 0..40),
    ) {
        run_script(Some("Alice"), messages, &keys);
    }
}
