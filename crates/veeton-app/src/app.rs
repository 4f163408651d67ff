//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns the mounted view
//! and everything that has to survive navigation between views.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Mounts views on navigation and tears the previous one down.
//! - Drops responses and timers addressed to views that are gone.
//! - Holds the modal alert and the transient success notice.
//! - Keeps the session identity in sync with confirmed display names.

use crate::{
    AppAction, AppEvent, ChatTimings, ChatView, HomeView, KeyInput, Route, Session, TimerKey,
    TimerKind, ViewId, action::ViewAction,
};

/// The currently mounted view.
#[derive(Debug, Clone)]
pub enum View {
    /// Landing view with create and join forms.
    Home(HomeView),
    /// A chat room.
    Chat(ChatView),
}

impl View {
    /// Identifier of this view instance.
    pub fn id(&self) -> ViewId {
        match self {
            Self::Home(home) => home.id(),
            Self::Chat(chat) => chat.id(),
        }
    }

    /// Route this view is mounted at.
    pub fn route(&self) -> Route {
        match self {
            Self::Home(_) => Route::Home,
            Self::Chat(chat) => Route::Chat(chat.room_id().clone()),
        }
    }
}

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Mounted view.
    view: View,
    /// Last issued view identifier.
    last_view: ViewId,
    /// Locally remembered identity.
    session: Session,
    /// Timer durations handed to every view.
    timings: ChatTimings,
    /// Blocking alert. `None` if nothing is shown.
    alert: Option<String>,
    /// Transient success notice. `None` if no notice.
    success: Option<String>,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Whether the user asked to quit.
    should_quit: bool,
}

impl App {
    /// Create a new App showing the landing view.
    pub fn new(session: Session, timings: ChatTimings) -> Self {
        let first = ViewId(1);
        Self {
            view: View::Home(HomeView::new(first, timings)),
            last_view: first,
            session,
            timings,
            alert: None,
            success: None,
            terminal_size: (80, 24),
            should_quit: false,
        }
    }

    /// Actions for the first frame, opening `route` if it is not the landing view.
    pub fn start(&mut self, route: Route) -> Vec<AppAction> {
        match route {
            Route::Home => vec![AppAction::Render],
            route => self.apply(vec![ViewAction::Navigate(route)]),
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::ApiResult { view, request, result } => {
                if view != self.view.id() {
                    tracing::debug!(%view, request = request.name(), "dropping response for unmounted view");
                    return vec![];
                }
                let actions = match &mut self.view {
                    View::Home(home) => home.handle_response(&request, result),
                    View::Chat(chat) => chat.handle_response(&request, result),
                };
                self.apply(actions)
            },
            AppEvent::TimerFired(timer) => self.handle_timer(timer),
            AppEvent::ClipboardResult { view, result } => {
                let actions = match &mut self.view {
                    View::Chat(chat) if chat.id() == view => chat.handle_clipboard(result),
                    _ => {
                        tracing::debug!(%view, "dropping clipboard result for unmounted view");
                        return vec![];
                    },
                };
                self.apply(actions)
            },
        }
    }

    /// Mounted view.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Route of the mounted view.
    pub fn route(&self) -> Route {
        self.view.route()
    }

    /// Landing view, if mounted.
    pub fn home(&self) -> Option<&HomeView> {
        match &self.view {
            View::Home(home) => Some(home),
            View::Chat(_) => None,
        }
    }

    /// Chat view, if mounted.
    pub fn chat(&self) -> Option<&ChatView> {
        match &self.view {
            View::Chat(chat) => Some(chat),
            View::Home(_) => None,
        }
    }

    /// Session identity.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Blocking alert, if shown.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Success notice, if shown.
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        // Alerts are modal; the key only dismisses
        if self.alert.take().is_some() {
            return vec![AppAction::Render];
        }

        let actions = match &mut self.view {
            View::Home(home) => {
                if key == KeyInput::Esc && home.error().is_none() && self.success.is_some() {
                    vec![ViewAction::ClearSuccess, ViewAction::App(AppAction::Render)]
                } else {
                    home.handle_key(key)
                }
            },
            View::Chat(chat) => chat.handle_key(key),
        };
        self.apply(actions)
    }

    fn handle_timer(&mut self, timer: TimerKey) -> Vec<AppAction> {
        if timer.view == ViewId::APP {
            return match timer.kind {
                TimerKind::SuccessNotice => {
                    self.success = None;
                    vec![AppAction::Render]
                },
                kind => {
                    tracing::debug!(?kind, "unexpected app-level timer");
                    vec![]
                },
            };
        }

        if timer.view != self.view.id() {
            tracing::debug!(view = %timer.view, kind = ?timer.kind, "dropping timer for unmounted view");
            return vec![];
        }

        let actions = match &mut self.view {
            View::Home(home) => home.handle_timer(&timer.kind),
            View::Chat(chat) => chat.handle_timer(&timer.kind),
        };
        self.apply(actions)
    }

    /// Interpret view output. Renders are coalesced into one trailing render.
    fn apply(&mut self, actions: Vec<ViewAction>) -> Vec<AppAction> {
        let mut out = Vec::new();
        let mut render = false;
        let mut pending = actions;

        while !pending.is_empty() {
            for action in std::mem::take(&mut pending) {
                match action {
                    ViewAction::App(AppAction::Render) => render = true,
                    ViewAction::App(AppAction::Quit) => {
                        self.should_quit = true;
                        out.push(AppAction::Quit);
                    },
                    ViewAction::App(AppAction::PersistUsername { username }) => {
                        self.session.set_display_name(username.clone());
                        out.push(AppAction::PersistUsername { username });
                    },
                    ViewAction::App(action) => out.push(action),
                    ViewAction::Navigate(route) => {
                        out.push(AppAction::CancelTimers { view: self.view.id() });
                        pending.extend(self.mount(route));
                        render = true;
                    },
                    ViewAction::Alert(message) => {
                        self.alert = Some(message);
                        render = true;
                    },
                    ViewAction::Success(message) => {
                        self.success = Some(message);
                        out.push(AppAction::ScheduleTimer {
                            timer: TimerKey::new(ViewId::APP, TimerKind::SuccessNotice),
                            after: self.timings.success_notice,
                        });
                        render = true;
                    },
                    ViewAction::ClearSuccess => {
                        render |= self.success.take().is_some();
                    },
                }
            }
        }

        if render {
            out.push(AppAction::Render);
        }
        out
    }

    /// Replace the mounted view, returning the new view's entry actions.
    fn mount(&mut self, route: Route) -> Vec<ViewAction> {
        self.last_view = ViewId(self.last_view.0 + 1);
        let id = self.last_view;
        tracing::info!(%route, view = %id, "navigating");

        match route {
            Route::Home => {
                self.view = View::Home(HomeView::new(id, self.timings));
                vec![]
            },
            Route::Chat(room_id) => {
                let stored = self.session.display_name().map(str::to_owned);
                let chat = ChatView::new(id, room_id, stored, self.timings);
                let actions = chat.on_enter();
                self.view = View::Chat(chat);
                actions
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use veeton_client::{ApiError, ApiRequest, ApiResponse, RoomId};

    use super::*;

    const ROOM: &str = "0b7e1f0a-9c1d-4c6e-8f00-1a2b3c4d5e6f";

    fn app() -> App {
        App::new(Session::default(), ChatTimings::default())
    }

    #[test]
    fn starts_on_landing_view() {
        let mut app = app();
        assert_eq!(app.start(Route::Home), vec![AppAction::Render]);
        assert_eq!(app.route(), Route::Home);
    }

    #[test]
    fn opening_a_room_mounts_fresh_view() {
        let mut app = app();
        let actions = app.start(Route::Chat(RoomId::new(ROOM)));

        assert_eq!(actions[0], AppAction::CancelTimers { view: ViewId(1) });
        assert_eq!(app.view().id(), ViewId(2));
        assert_eq!(actions.last(), Some(&AppAction::Render));
        let requests = actions.iter().filter(|a| matches!(a, AppAction::Request { .. })).count();
        assert_eq!(requests, 2);
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut app = app();
        app.start(Route::Chat(RoomId::new(ROOM)));
        app.handle(AppEvent::Key(KeyInput::Esc));
        assert_eq!(app.route(), Route::Home);

        let actions = app.handle(AppEvent::ApiResult {
            view: ViewId(2),
            request: ApiRequest::GetMessages { room_id: RoomId::new(ROOM) },
            result: Err(ApiError::Transport("late".into())),
        });
        assert!(actions.is_empty());
        assert_eq!(app.route(), Route::Home);
    }

    #[test]
    fn stale_timer_is_dropped() {
        let mut app = app();
        app.start(Route::Chat(RoomId::new(ROOM)));
        app.handle(AppEvent::Key(KeyInput::Esc));

        let actions = app.handle(AppEvent::TimerFired(TimerKey::new(ViewId(2), TimerKind::RoomExpiry)));
        assert!(actions.is_empty());
        assert!(app.alert().is_none());
    }

    #[test]
    fn alert_swallows_next_key() {
        let mut app = app();
        app.start(Route::Chat(RoomId::new(ROOM)));
        app.handle(AppEvent::TimerFired(TimerKey::new(ViewId(2), TimerKind::RoomExpiry)));
        assert!(app.alert().is_some());
        assert_eq!(app.route(), Route::Home);

        assert_eq!(app.handle(AppEvent::Key(KeyInput::Esc)), vec![AppAction::Render]);
        assert!(app.alert().is_none());
        assert!(!app.should_quit());
    }

    #[test]
    fn success_notice_survives_navigation() {
        let mut app = app();
        let actions = app.handle(AppEvent::ApiResult {
            view: ViewId(1),
            request: ApiRequest::JoinRoom { room_id: RoomId::new(ROOM) },
            result: Ok(ApiResponse::RoomJoined { room_id: RoomId::new(ROOM) }),
        });

        assert_eq!(app.success(), Some(crate::ROOM_JOINED));
        assert!(actions.contains(&AppAction::ScheduleTimer {
            timer: TimerKey::new(ViewId::APP, TimerKind::SuccessNotice),
            after: ChatTimings::default().success_notice,
        }));
        assert_eq!(app.route(), Route::Chat(RoomId::new(ROOM)));

        app.handle(AppEvent::TimerFired(TimerKey::new(ViewId::APP, TimerKind::SuccessNotice)));
        assert!(app.success().is_none());
    }

    #[test]
    fn confirmed_name_updates_session() {
        let mut app = app();
        let out = app.apply(vec![ViewAction::App(AppAction::PersistUsername { username: "Bob".into() })]);

        assert_eq!(out, vec![AppAction::PersistUsername { username: "Bob".into() }]);
        assert_eq!(app.session().display_name(), Some("Bob"));
    }

    #[test]
    fn esc_on_landing_quits() {
        let mut app = app();
        assert_eq!(app.handle(AppEvent::Key(KeyInput::Esc)), vec![AppAction::Quit]);
        assert!(app.should_quit());
    }
}
