//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`ChatApi`]: backend calls, each spawned as its own task
//! - [`Driver`]: Platform-specific I/O
//! - [`IdentityStore`]: display name persistence
//!
//! Completions of spawned work (responses, timer expiries) come back through
//! an internal inbox and are fed to the App as [`AppEvent`]s.

use std::{collections::HashMap, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};
use veeton_client::{ApiRequest, ChatApi};

use crate::{App, AppAction, AppEvent, ChatTimings, Driver, IdentityStore, Route, Session, TimerKey, ViewId};

/// Work completed off the event loop.
#[derive(Debug)]
enum Inbox {
    Event(AppEvent),
    Timer { timer: TimerKey, generation: u64 },
}

/// Generic runtime that orchestrates App, backend, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `A`: Backend client, cloned into every request task
/// - `S`: Display name store
pub struct Runtime<D, A, S>
where
    D: Driver,
    A: ChatApi + Clone + 'static,
    S: IdentityStore,
{
    driver: D,
    app: App,
    api: A,
    store: S,
    inbox_tx: mpsc::UnboundedSender<Inbox>,
    inbox_rx: mpsc::UnboundedReceiver<Inbox>,
    /// Pending timers with the generation that is allowed to fire.
    timers: HashMap<TimerKey, (u64, JoinHandle<()>)>,
    next_generation: u64,
}

impl<D, A, S> Runtime<D, A, S>
where
    D: Driver,
    A: ChatApi + Clone + 'static,
    S: IdentityStore,
{
    /// Create a new runtime, seeding the session from `store`.
    ///
    /// A store that fails to load is treated as empty.
    pub fn new(driver: D, api: A, store: S, timings: ChatTimings) -> Self {
        let stored = match store.load() {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load stored display name");
                None
            },
        };
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            driver,
            app: App::new(Session::new(stored), timings),
            api,
            store,
            inbox_tx,
            inbox_rx,
            timers: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Platform driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Platform driver, mutably.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Display name store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Run the main event loop from `route` until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self, route: Route) -> Result<(), D::Error> {
        let result = self.run_until_quit(route).await;
        for (_, (_, handle)) in self.timers.drain() {
            handle.abort();
        }
        self.driver.stop();
        result
    }

    async fn run_until_quit(&mut self, route: Route) -> Result<(), D::Error> {
        if self.start(route)? {
            return Ok(());
        }
        while !self.step().await? {}
        Ok(())
    }

    /// Show the first frame at `route`.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn start(&mut self, route: Route) -> Result<bool, D::Error> {
        tracing::info!(%route, "starting");
        let actions = self.app.start(route);
        self.process_actions(actions)
    }

    /// Wait for and process one input event or completion.
    ///
    /// Completions take priority over input. The driver's `poll_event` future
    /// may be dropped when a completion wins, so it must be cancel-safe.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let event = tokio::select! {
            biased;

            Some(message) = self.inbox_rx.recv() => match message {
                Inbox::Event(event) => event,
                Inbox::Timer { timer, generation } => match self.timers.get(&timer) {
                    Some((current, _)) if *current == generation => {
                        self.timers.remove(&timer);
                        AppEvent::TimerFired(timer)
                    },
                    _ => {
                        tracing::debug!(view = %timer.view, kind = ?timer.kind, "ignoring superseded timer");
                        return Ok(false);
                    },
                },
            },
            event = self.driver.poll_event() => match event? {
                Some(event) => event,
                None => {
                    tracing::info!("input closed");
                    return Ok(true);
                },
            },
        };

        let actions = self.app.handle(event);
        self.process_actions(actions)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Request { view, request } => self.spawn_request(view, request),
                    AppAction::ScheduleTimer { timer, after } => self.schedule_timer(timer, after),
                    AppAction::CancelTimers { view } => self.cancel_timers(view),
                    AppAction::CopyToClipboard { view, text } => {
                        let result = self.driver.copy_to_clipboard(&text).map_err(|e| e.to_string());
                        let new_actions = self.app.handle(AppEvent::ClipboardResult { view, result });
                        pending_actions.extend(new_actions);
                    },
                    AppAction::PersistUsername { username } => {
                        if let Err(e) = self.store.save(&username) {
                            tracing::warn!(error = %e, "failed to persist display name");
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    fn spawn_request(&self, view: ViewId, request: ApiRequest) {
        tracing::debug!(%view, request = request.name(), "dispatching request");
        let api = self.api.clone();
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let result = request.clone().execute(&api).await;
            if tx.send(Inbox::Event(AppEvent::ApiResult { view, request, result })).is_err() {
                tracing::debug!(%view, "runtime gone, dropping response");
            }
        });
    }

    fn schedule_timer(&mut self, timer: TimerKey, after: Duration) {
        self.next_generation += 1;
        let generation = self.next_generation;
        let tx = self.inbox_tx.clone();
        let key = timer.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(Inbox::Timer { timer: key, generation });
        });

        if let Some((_, previous)) = self.timers.insert(timer, (generation, handle)) {
            previous.abort();
        }
    }

    fn cancel_timers(&mut self, view: ViewId) {
        self.timers.retain(|timer, (_, handle)| {
            if timer.view == view {
                handle.abort();
                false
            } else {
                true
            }
        });
    }
}
