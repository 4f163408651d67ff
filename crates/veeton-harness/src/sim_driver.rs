//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`veeton_app::Runtime`] orchestration code runs in both production and
//! simulation.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::Notify;
use veeton_app::{App, AppEvent, Driver, KeyInput, Route};

use crate::invariants::{AppSnapshot, InvariantRegistry};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// What a single render showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Mounted route.
    pub route: Route,
    /// Blocking alert, if shown.
    pub alert: Option<String>,
    /// Success notice, if shown.
    pub success: Option<String>,
    /// Number of messages in the mounted room.
    pub messages: usize,
}

impl RenderedFrame {
    fn from_app(app: &App) -> Self {
        Self {
            route: app.route(),
            alert: app.alert().map(str::to_owned),
            success: app.success().map(str::to_owned),
            messages: app.chat().map_or(0, |chat| chat.messages().len()),
        }
    }
}

/// Shared state for event injection.
///
/// This allows injection from outside async contexts, and inspection after
/// the driver has been moved into a runtime.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    frames: Vec<RenderedFrame>,
    clipboard: Vec<String>,
    clipboard_fails: bool,
    closed: bool,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Clones share state, so a test keeps one clone to inject input and inspect
/// output while the runtime owns another.
///
/// When no event is queued, [`Driver::poll_event`] waits until one is
/// injected. Under a paused tokio clock this lets pending timers fire.
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    wakeup: Arc<Notify>,
    invariants: Option<Arc<InvariantRegistry>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
            wakeup: Arc::new(Notify::new()),
            invariants: None,
        }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().pending_events.push_back(event);
        self.wakeup.notify_one();
    }

    /// Inject a key press.
    pub fn inject_key(&self, key: KeyInput) {
        self.inject_event(AppEvent::Key(key));
    }

    /// Inject one key press per character of `text`.
    pub fn inject_text(&self, text: &str) {
        for c in text.chars() {
            self.inject_key(KeyInput::Char(c));
        }
    }

    /// Inject a tick event.
    pub fn inject_tick(&self) {
        self.inject_event(AppEvent::Tick);
    }

    /// Number of queued input events.
    pub fn pending(&self) -> usize {
        self.lock().pending_events.len()
    }

    /// Make every following clipboard write fail.
    pub fn fail_clipboard(&self) {
        self.lock().clipboard_fails = true;
    }

    /// End the input stream once the queue is drained.
    pub fn close(&self) {
        self.lock().closed = true;
        self.wakeup.notify_one();
    }

    /// Every frame rendered so far.
    pub fn frames(&self) -> Vec<RenderedFrame> {
        self.lock().frames.clone()
    }

    /// The most recent frame.
    pub fn last_frame(&self) -> Option<RenderedFrame> {
        self.lock().frames.last().cloned()
    }

    /// Texts written to the clipboard, oldest first.
    pub fn clipboard(&self) -> Vec<String> {
        self.lock().clipboard.clone()
    }

    /// Whether [`Driver::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_event(&self) -> Option<Result<Option<AppEvent>, SimDriverError>> {
        let mut state = self.lock();
        if let Some(event) = state.pending_events.pop_front() {
            Some(Ok(Some(event)))
        } else if state.closed {
            Some(Ok(None))
        } else {
            None
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        loop {
            if let Some(result) = self.next_event() {
                return result;
            }
            self.wakeup.notified().await;
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        if let Some(registry) = &self.invariants {
            registry.assert_all(&AppSnapshot::from_app(app), "after render");
        }
        self.lock().frames.push(RenderedFrame::from_app(app));
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.clipboard_fails {
            return Err(SimDriverError("clipboard unavailable".into()));
        }
        state.clipboard.push(text.to_owned());
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}
