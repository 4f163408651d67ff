//! Room session state and chat view controller.
//!
//! A [`ChatView`] is mounted for one room. On entry it fetches the room and
//! its messages as two independent requests and arms the expiry timer. It
//! becomes [`ChatPhase::Ready`] once both responses are in; a failure of
//! either sends the user back to the landing view.
//!
//! The message list is only ever changed by the server's answer: a posted
//! message is appended as returned, a deleted one is removed after the
//! backend confirms. The list is never re-sorted or re-fetched.

use veeton_client::{ApiError, ApiRequest, ApiResponse, PostMessageRequest};
use veeton_proto::{MessageId, Room, RoomId};

use crate::{
    AppAction, ChatTimings, KeyInput, MessageView, Route, TextInput, TimerKey, TimerKind, ViewId,
    action::ViewAction,
};

/// Alert when the room's client-side lifetime elapses.
pub const EXPIRED_ALERT: &str = "This room has expired. You will be redirected to the homepage.";

/// Alert when confirming a blank display name.
pub const EMPTY_USERNAME_ALERT: &str = "Username can't be empty.";

/// Alert when sending a blank message.
pub const EMPTY_MESSAGE_ALERT: &str = "Message can't be empty.";

/// Alert when sending before the display name is confirmed.
pub const UNCONFIRMED_ALERT: &str = "Username must be set before sending a message.";

/// Alert when the backend refuses a delete.
pub const DELETE_FAILED_ALERT: &str = "Failed to delete message";

const COPY_COMMAND: &str = "/copy";
const LEAVE_COMMAND: &str = "/leave";

/// Lifecycle of a chat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    /// Waiting for room details and messages.
    Loading,
    /// Both loaded; the room is usable.
    Ready,
    /// The expiry timer fired.
    Expired,
    /// Loading failed; leaving for the landing view.
    Redirected,
}

/// Focusable regions of the chat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFocus {
    /// Display name form. Only reachable while unconfirmed.
    Username,
    /// Message composer.
    Composer,
    /// Message list, for selection and per-message actions.
    Messages,
}

/// State of one mounted chat room.
#[derive(Debug, Clone)]
pub struct ChatView {
    view: ViewId,
    room_id: RoomId,
    timings: ChatTimings,
    phase: ChatPhase,
    stored_name: Option<String>,
    room: Option<Room>,
    messages: Vec<MessageView>,
    messages_loaded: bool,
    username: TextInput,
    confirmed: bool,
    composer: TextInput,
    sending: bool,
    focus: ChatFocus,
    selected: Option<usize>,
    copy_confirmed: bool,
}

impl ChatView {
    /// View for `room_id`, with the naming form prefilled from `stored_name`.
    pub fn new(
        view: ViewId,
        room_id: RoomId,
        stored_name: Option<String>,
        timings: ChatTimings,
    ) -> Self {
        let username = stored_name.as_deref().map(TextInput::with_text).unwrap_or_default();
        Self {
            view,
            room_id,
            timings,
            phase: ChatPhase::Loading,
            stored_name,
            room: None,
            messages: Vec::new(),
            messages_loaded: false,
            username,
            confirmed: false,
            composer: TextInput::new(),
            sending: false,
            focus: ChatFocus::Composer,
            selected: None,
            copy_confirmed: false,
        }
    }

    /// Actions to run when the view is mounted.
    pub(crate) fn on_enter(&self) -> Vec<ViewAction> {
        tracing::info!(room_id = %self.room_id, view = %self.view, "entering room");
        let room_id = self.room_id.clone();
        vec![
            self.request(ApiRequest::GetRoomDetails { room_id: room_id.clone() }),
            self.request(ApiRequest::GetMessages { room_id }),
            ViewAction::App(AppAction::ScheduleTimer {
                timer: TimerKey::new(self.view, TimerKind::RoomExpiry),
                after: self.timings.room_expiry,
            }),
            ViewAction::App(AppAction::Render),
        ]
    }

    /// View instance identifier.
    pub fn id(&self) -> ViewId {
        self.view
    }

    /// Room this view is mounted for.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    /// Room details, once loaded.
    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    /// Messages in server order.
    pub fn messages(&self) -> &[MessageView] {
        &self.messages
    }

    /// Display name input.
    pub fn username_input(&self) -> &TextInput {
        &self.username
    }

    /// Message composer.
    pub fn composer(&self) -> &TextInput {
        &self.composer
    }

    /// Whether the display name is fixed for this view.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Whether the naming form should be shown.
    pub fn shows_naming_form(&self) -> bool {
        self.phase == ChatPhase::Ready && !self.confirmed
    }

    /// Whether a post is awaiting its response.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Focused region.
    pub fn focus(&self) -> ChatFocus {
        self.focus
    }

    /// Index of the selected message in [`Self::messages`].
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether the "Copied!" confirmation is visible.
    pub fn copy_confirmed(&self) -> bool {
        self.copy_confirmed
    }

    /// Whether `message` was written under the current display name.
    pub fn is_own(&self, message: &MessageView) -> bool {
        let name = self.username.text().trim();
        !name.is_empty() && message.message().is_authored_by(name)
    }

    /// Fix the display name for this view and persist it.
    pub(crate) fn confirm_username(&mut self) -> Vec<ViewAction> {
        if self.confirmed || self.phase != ChatPhase::Ready {
            return vec![];
        }

        let name = self.username.text().trim().to_owned();
        if name.is_empty() {
            return vec![ViewAction::Alert(EMPTY_USERNAME_ALERT.into())];
        }

        tracing::info!(room_id = %self.room_id, "display name confirmed");
        self.username = TextInput::with_text(name.clone());
        self.confirmed = true;
        self.focus = ChatFocus::Composer;
        vec![
            ViewAction::App(AppAction::PersistUsername { username: name }),
            ViewAction::App(AppAction::Render),
        ]
    }

    /// Post the composer text under the confirmed display name.
    pub(crate) fn send_message(&mut self) -> Vec<ViewAction> {
        if self.sending || self.phase != ChatPhase::Ready {
            return vec![];
        }

        let text = self.composer.text().trim();
        if text.is_empty() {
            return vec![ViewAction::Alert(EMPTY_MESSAGE_ALERT.into())];
        }
        if !self.confirmed {
            return vec![ViewAction::Alert(UNCONFIRMED_ALERT.into())];
        }

        let body = PostMessageRequest { text: text.to_owned(), username: self.username.text().to_owned() };
        self.sending = true;
        vec![
            self.request(ApiRequest::PostMessage { room_id: self.room_id.clone(), body }),
            ViewAction::App(AppAction::Render),
        ]
    }

    /// Ask the backend to delete `message_id`. The list changes on success only.
    pub(crate) fn delete_message(&mut self, message_id: &MessageId) -> Vec<ViewAction> {
        if self.phase != ChatPhase::Ready {
            return vec![];
        }

        if let Some(message) = self.messages.iter_mut().find(|m| m.id() == message_id) {
            message.close_options();
        }
        vec![
            self.request(ApiRequest::DeleteMessage {
                room_id: self.room_id.clone(),
                message_id: message_id.clone(),
            }),
            ViewAction::App(AppAction::Render),
        ]
    }

    /// Copy the room identifier to the clipboard.
    pub(crate) fn copy_room_id(&self) -> Vec<ViewAction> {
        vec![ViewAction::App(AppAction::CopyToClipboard {
            view: self.view,
            text: self.room_id.to_string(),
        })]
    }

    /// Show the timestamp of the message at `index` and arm its hide timer.
    pub(crate) fn reveal_timestamp(&mut self, index: usize) -> Vec<ViewAction> {
        let Some(message) = self.messages.get_mut(index) else {
            return vec![];
        };
        message.reveal_timestamp();
        vec![
            ViewAction::App(AppAction::ScheduleTimer {
                timer: TimerKey::new(self.view, TimerKind::TimestampReveal(message.id().clone())),
                after: self.timings.timestamp_reveal,
            }),
            ViewAction::App(AppAction::Render),
        ]
    }

    pub(crate) fn handle_key(&mut self, key: KeyInput) -> Vec<ViewAction> {
        // Only two stops, so both directions land on the same one
        if matches!(key, KeyInput::Tab | KeyInput::BackTab) {
            self.cycle_focus();
            return vec![ViewAction::App(AppAction::Render)];
        }

        match self.focus {
            ChatFocus::Username => self.handle_username_key(key),
            ChatFocus::Composer => self.handle_composer_key(key),
            ChatFocus::Messages => self.handle_messages_key(key),
        }
    }

    fn handle_username_key(&mut self, key: KeyInput) -> Vec<ViewAction> {
        match key {
            KeyInput::Enter => self.confirm_username(),
            KeyInput::Esc => leave(),
            other => {
                if !self.confirmed && self.username.edit(other) {
                    vec![ViewAction::App(AppAction::Render)]
                } else {
                    vec![]
                }
            },
        }
    }

    fn handle_composer_key(&mut self, key: KeyInput) -> Vec<ViewAction> {
        match key {
            KeyInput::Enter => self.handle_command().unwrap_or_else(|| self.send_message()),
            KeyInput::Esc => leave(),
            KeyInput::Up => {
                self.focus_messages();
                vec![ViewAction::App(AppAction::Render)]
            },
            // The composer stays locked until a display name is confirmed
            other => {
                if self.confirmed && self.composer.edit(other) {
                    vec![ViewAction::App(AppAction::Render)]
                } else {
                    vec![]
                }
            },
        }
    }

    /// Run the composer text as a command if it is exactly one.
    ///
    /// Anything else, including other text starting with `/`, is a message.
    fn handle_command(&mut self) -> Option<Vec<ViewAction>> {
        match self.composer.text().trim() {
            COPY_COMMAND => {
                self.composer.clear();
                Some(self.copy_room_id())
            },
            LEAVE_COMMAND => Some(leave()),
            _ => None,
        }
    }

    fn handle_messages_key(&mut self, key: KeyInput) -> Vec<ViewAction> {
        let Some(index) = self.selected else {
            self.focus = self.naming_or_composer();
            return vec![ViewAction::App(AppAction::Render)];
        };

        match key {
            KeyInput::Up => {
                self.selected = Some(index.saturating_sub(1));
                vec![ViewAction::App(AppAction::Render)]
            },
            KeyInput::Down => {
                if index + 1 < self.messages.len() {
                    self.selected = Some(index + 1);
                } else {
                    self.focus = self.naming_or_composer();
                }
                vec![ViewAction::App(AppAction::Render)]
            },
            KeyInput::Enter | KeyInput::Char('o') => {
                if let Some(message) = self.messages.get_mut(index) {
                    message.toggle_options();
                }
                vec![ViewAction::App(AppAction::Render)]
            },
            KeyInput::Right | KeyInput::Char('t') => self.reveal_timestamp(index),
            KeyInput::Char('d') => match self.messages.get(index) {
                Some(message) if message.options_open() => {
                    let id = message.id().clone();
                    self.delete_message(&id)
                },
                _ => vec![],
            },
            KeyInput::Char('y') => self.copy_room_id(),
            KeyInput::Esc => {
                self.focus = self.naming_or_composer();
                vec![ViewAction::App(AppAction::Render)]
            },
            _ => vec![],
        }
    }

    pub(crate) fn handle_response(
        &mut self,
        request: &ApiRequest,
        result: Result<ApiResponse, ApiError>,
    ) -> Vec<ViewAction> {
        match (request, result) {
            (ApiRequest::GetRoomDetails { .. }, Ok(ApiResponse::RoomDetails(room))) => {
                self.room = Some(room);
                self.try_ready()
            },
            (ApiRequest::GetMessages { .. }, Ok(ApiResponse::Messages(messages))) => {
                self.messages = messages.into_iter().map(MessageView::new).collect();
                self.messages_loaded = true;
                self.try_ready()
            },
            (ApiRequest::GetRoomDetails { .. } | ApiRequest::GetMessages { .. }, Err(err)) => {
                self.fail_load(request, &err)
            },
            (ApiRequest::PostMessage { .. }, Ok(ApiResponse::MessagePosted(message))) => {
                self.sending = false;
                self.messages.push(MessageView::new(message));
                self.composer.clear();
                vec![ViewAction::App(AppAction::Render)]
            },
            (ApiRequest::PostMessage { .. }, Err(err)) => {
                self.sending = false;
                tracing::warn!(room_id = %self.room_id, error = %err, "post message failed");
                vec![ViewAction::App(AppAction::Render)]
            },
            (ApiRequest::DeleteMessage { .. }, Ok(ApiResponse::MessageDeleted { message_id })) => {
                self.remove_message(&message_id);
                vec![ViewAction::App(AppAction::Render)]
            },
            (ApiRequest::DeleteMessage { message_id, .. }, Err(err)) => {
                tracing::warn!(room_id = %self.room_id, %message_id, error = %err, "delete message failed");
                vec![ViewAction::Alert(DELETE_FAILED_ALERT.into())]
            },
            (request, result) => {
                tracing::debug!(request = request.name(), ?result, "unexpected response on chat view");
                vec![]
            },
        }
    }

    pub(crate) fn handle_timer(&mut self, kind: &TimerKind) -> Vec<ViewAction> {
        match kind {
            TimerKind::RoomExpiry => {
                if matches!(self.phase, ChatPhase::Expired | ChatPhase::Redirected) {
                    return vec![];
                }
                tracing::info!(room_id = %self.room_id, "room expired");
                self.phase = ChatPhase::Expired;
                vec![ViewAction::Alert(EXPIRED_ALERT.into()), ViewAction::Navigate(Route::Home)]
            },
            TimerKind::CopyConfirmation => {
                self.copy_confirmed = false;
                vec![ViewAction::App(AppAction::Render)]
            },
            TimerKind::TimestampReveal(id) => {
                if let Some(message) = self.messages.iter_mut().find(|m| m.id() == id) {
                    message.hide_timestamp();
                }
                vec![ViewAction::App(AppAction::Render)]
            },
            TimerKind::ErrorNotice | TimerKind::SuccessNotice => vec![],
        }
    }

    pub(crate) fn handle_clipboard(&mut self, result: Result<(), String>) -> Vec<ViewAction> {
        match result {
            Ok(()) => {
                self.copy_confirmed = true;
                vec![
                    ViewAction::App(AppAction::ScheduleTimer {
                        timer: TimerKey::new(self.view, TimerKind::CopyConfirmation),
                        after: self.timings.copy_confirmation,
                    }),
                    ViewAction::App(AppAction::Render),
                ]
            },
            Err(err) => {
                tracing::warn!(room_id = %self.room_id, error = %err, "copy to clipboard failed");
                vec![]
            },
        }
    }

    fn try_ready(&mut self) -> Vec<ViewAction> {
        if self.phase != ChatPhase::Loading {
            return vec![];
        }
        let Some(room) = &self.room else {
            return vec![ViewAction::App(AppAction::Render)];
        };
        if !self.messages_loaded {
            return vec![ViewAction::App(AppAction::Render)];
        }

        self.confirmed = self.confirmed || self.stored_name.as_deref() == Some(room.creator.as_str());
        self.focus = if self.confirmed { ChatFocus::Composer } else { ChatFocus::Username };
        self.phase = ChatPhase::Ready;
        tracing::debug!(
            room_id = %self.room_id,
            messages = self.messages.len(),
            confirmed = self.confirmed,
            "room loaded"
        );
        vec![ViewAction::App(AppAction::Render)]
    }

    fn fail_load(&mut self, request: &ApiRequest, err: &ApiError) -> Vec<ViewAction> {
        if self.phase != ChatPhase::Loading {
            return vec![];
        }
        tracing::warn!(
            room_id = %self.room_id,
            request = request.name(),
            error = %err,
            "room load failed, redirecting"
        );
        self.phase = ChatPhase::Redirected;
        vec![ViewAction::Navigate(Route::Home)]
    }

    fn remove_message(&mut self, message_id: &MessageId) {
        let Some(pos) = self.messages.iter().position(|m| m.id() == message_id) else {
            tracing::debug!(%message_id, "deleted message already gone");
            return;
        };
        self.messages.remove(pos);

        self.selected = match self.selected {
            _ if self.messages.is_empty() => None,
            Some(index) => Some(index.min(self.messages.len() - 1)),
            None => None,
        };
        if self.selected.is_none() && self.focus == ChatFocus::Messages {
            self.focus = self.naming_or_composer();
        }
    }

    fn cycle_focus(&mut self) {
        match self.focus {
            ChatFocus::Username => self.focus_messages(),
            ChatFocus::Composer if !self.messages.is_empty() => self.focus_messages(),
            ChatFocus::Composer | ChatFocus::Messages => self.focus = self.naming_or_composer(),
        }
    }

    fn naming_or_composer(&self) -> ChatFocus {
        if self.shows_naming_form() { ChatFocus::Username } else { ChatFocus::Composer }
    }

    fn focus_messages(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        self.focus = ChatFocus::Messages;
        if self.selected.is_none() {
            self.selected = Some(self.messages.len() - 1);
        }
    }

    fn request(&self, request: ApiRequest) -> ViewAction {
        ViewAction::App(AppAction::Request { view: self.view, request })
    }
}

fn leave() -> Vec<ViewAction> {
    vec![ViewAction::Navigate(Route::Home)]
}
