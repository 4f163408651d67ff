//! Room creation and join view.
//!
//! Two independent forms share one error slot: *create* (creator name and
//! password) and *join* (room identifier). Both validate locally before any
//! request is built; a failed check sets a field-scoped error and nothing is
//! sent.
//!
//! Error notices clear themselves after [`ChatTimings::error_notice`]; the
//! success notice lives on the [`App`](crate::App) because it has to outlive
//! the navigation that follows a successful submission.

use veeton_client::{ApiError, ApiRequest, ApiResponse, CreateRoomRequest, Password};

use crate::{
    AppAction, ChatTimings, KeyInput, Route, TextInput, TimerKey, TimerKind, ViewId,
    action::ViewAction,
    validate::{self, Field, ValidationError},
};

/// Success notice after creating a room.
pub const ROOM_CREATED: &str = "Room created successfully!";

/// Success notice after joining a room.
pub const ROOM_JOINED: &str = "Room joined successfully!";

const CREATE_FAILED: &str = "Error creating room";
const JOIN_FAILED: &str = "Error joining room";

/// Focusable inputs, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeField {
    /// Join form: room identifier.
    RoomId,
    /// Create form: creator name.
    Creator,
    /// Create form: password.
    Password,
}

impl HomeField {
    fn next(self) -> Self {
        match self {
            Self::RoomId => Self::Creator,
            Self::Creator => Self::Password,
            Self::Password => Self::RoomId,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::RoomId => Self::Password,
            Self::Creator => Self::RoomId,
            Self::Password => Self::Creator,
        }
    }
}

/// Error notice attached to an input slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Slot the message is shown next to.
    pub field: Field,
    /// User-facing text.
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Submission {
    Create,
    Join,
}

/// Landing view state.
#[derive(Debug, Clone)]
pub struct HomeView {
    view: ViewId,
    timings: ChatTimings,
    room_id: TextInput,
    creator: TextInput,
    password: TextInput,
    focus: HomeField,
    error: Option<Notice>,
    in_flight: Option<Submission>,
}

impl HomeView {
    /// Empty forms, join input focused.
    pub fn new(view: ViewId, timings: ChatTimings) -> Self {
        Self {
            view,
            timings,
            room_id: TextInput::new(),
            creator: TextInput::new(),
            password: TextInput::new(),
            focus: HomeField::RoomId,
            error: None,
            in_flight: None,
        }
    }

    /// View instance identifier.
    pub fn id(&self) -> ViewId {
        self.view
    }

    /// Room identifier input.
    pub fn room_id_input(&self) -> &TextInput {
        &self.room_id
    }

    /// Creator name input.
    pub fn creator_input(&self) -> &TextInput {
        &self.creator
    }

    /// Password input. Render masked.
    pub fn password_input(&self) -> &TextInput {
        &self.password
    }

    /// Focused input.
    pub fn focus(&self) -> HomeField {
        self.focus
    }

    /// Current error notice, if any.
    pub fn error(&self) -> Option<&Notice> {
        self.error.as_ref()
    }

    /// Error text for `field`, if the current notice is attached to it.
    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.error.as_ref().filter(|n| n.field == field).map(|n| n.message.as_str())
    }

    /// Whether a create or join request is awaiting its response.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Move focus to `field`.
    pub fn set_focus(&mut self, field: HomeField) {
        self.focus = field;
    }

    /// Clear the error notice early.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Replace the contents of `field`.
    pub fn set_text(&mut self, field: HomeField, text: &str) {
        *self.input_mut(field) = TextInput::with_text(text);
    }

    /// Validate the create form and request a new room.
    pub(crate) fn create_room(&mut self) -> Vec<ViewAction> {
        if self.in_flight.is_some() {
            return vec![];
        }

        let validated = validate::validate_creator(self.creator.text())
            .and_then(|()| validate::validate_password(self.password.text()));
        if let Err(err) = validated {
            return self.reject(err);
        }

        self.in_flight = Some(Submission::Create);
        let request = ApiRequest::CreateRoom(CreateRoomRequest {
            creator: self.creator.text().to_owned(),
            password: Password::new(self.password.text()),
        });
        vec![ViewAction::App(AppAction::Request { view: self.view, request })]
    }

    /// Validate the room identifier and request to join it.
    pub(crate) fn join_room(&mut self) -> Vec<ViewAction> {
        if self.in_flight.is_some() {
            return vec![];
        }

        let room_id = match validate::validate_room_id(self.room_id.text()) {
            Ok(room_id) => room_id,
            Err(err) => return self.reject(err),
        };

        self.in_flight = Some(Submission::Join);
        let request = ApiRequest::JoinRoom { room_id };
        vec![ViewAction::App(AppAction::Request { view: self.view, request })]
    }

    pub(crate) fn handle_key(&mut self, key: KeyInput) -> Vec<ViewAction> {
        match key {
            KeyInput::Tab | KeyInput::Down => {
                self.focus = self.focus.next();
                vec![ViewAction::App(AppAction::Render)]
            },
            KeyInput::BackTab | KeyInput::Up => {
                self.focus = self.focus.prev();
                vec![ViewAction::App(AppAction::Render)]
            },
            KeyInput::Enter => match self.focus {
                HomeField::RoomId => self.join_room(),
                HomeField::Creator | HomeField::Password => self.create_room(),
            },
            KeyInput::Esc => {
                if self.error.take().is_some() {
                    vec![ViewAction::App(AppAction::Render)]
                } else {
                    vec![ViewAction::App(AppAction::Quit)]
                }
            },
            other => {
                if self.input_mut(self.focus).edit(other) {
                    vec![ViewAction::App(AppAction::Render)]
                } else {
                    vec![]
                }
            },
        }
    }

    pub(crate) fn handle_response(
        &mut self,
        request: &ApiRequest,
        result: Result<ApiResponse, ApiError>,
    ) -> Vec<ViewAction> {
        match (request, result) {
            (ApiRequest::CreateRoom(_), Ok(ApiResponse::RoomCreated(room))) => {
                self.in_flight = None;
                self.error = None;
                tracing::info!(room_id = %room.id, "room created");
                vec![ViewAction::Success(ROOM_CREATED.into()), ViewAction::Navigate(Route::Chat(room.id))]
            },
            (ApiRequest::JoinRoom { .. }, Ok(ApiResponse::RoomJoined { room_id })) => {
                self.in_flight = None;
                self.error = None;
                tracing::info!(%room_id, "room joined");
                vec![ViewAction::Success(ROOM_JOINED.into()), ViewAction::Navigate(Route::Chat(room_id))]
            },
            (ApiRequest::CreateRoom(_), Err(err)) => {
                self.in_flight = None;
                tracing::warn!(error = %err, "create room failed");
                self.set_error(Field::General, err.user_message(CREATE_FAILED))
            },
            (ApiRequest::JoinRoom { .. }, Err(err)) => {
                self.in_flight = None;
                tracing::warn!(error = %err, "join room failed");
                self.set_error(Field::General, err.user_message(JOIN_FAILED))
            },
            (request, result) => {
                tracing::debug!(request = request.name(), ?result, "unexpected response on home view");
                vec![]
            },
        }
    }

    pub(crate) fn handle_timer(&mut self, kind: &TimerKind) -> Vec<ViewAction> {
        match kind {
            TimerKind::ErrorNotice => {
                self.error = None;
                vec![ViewAction::App(AppAction::Render)]
            },
            _ => vec![],
        }
    }

    fn reject(&mut self, err: ValidationError) -> Vec<ViewAction> {
        tracing::debug!(%err, "form rejected locally");
        self.set_error(err.field, err.message.to_owned())
    }

    /// Show `message` in `field` and (re)start its expiry.
    fn set_error(&mut self, field: Field, message: String) -> Vec<ViewAction> {
        self.error = Some(Notice { field, message });
        vec![
            ViewAction::ClearSuccess,
            ViewAction::App(AppAction::ScheduleTimer {
                timer: TimerKey::new(self.view, TimerKind::ErrorNotice),
                after: self.timings.error_notice,
            }),
            ViewAction::App(AppAction::Render),
        ]
    }

    fn input_mut(&mut self, field: HomeField) -> &mut TextInput {
        match field {
            HomeField::RoomId => &mut self.room_id,
            HomeField::Creator => &mut self.creator,
            HomeField::Password => &mut self.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use veeton_client::{Room, RoomId};

    use super::*;

    const ROOM: &str = "0b7e1f0a-9c1d-4c6e-8f00-1a2b3c4d5e6f";

    fn home() -> HomeView {
        HomeView::new(ViewId(1), ChatTimings::default())
    }

    fn requests(actions: &[ViewAction]) -> Vec<&ApiRequest> {
        actions
            .iter()
            .filter_map(|a| match a {
                ViewAction::App(AppAction::Request { request, .. }) => Some(request),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn back_tab_reverses_focus() {
        let mut home = home();

        home.handle_key(KeyInput::BackTab);
        assert_eq!(home.focus(), HomeField::Password);
        home.handle_key(KeyInput::BackTab);
        assert_eq!(home.focus(), HomeField::Creator);
        home.handle_key(KeyInput::Tab);
        assert_eq!(home.focus(), HomeField::Password);
    }

    #[test]
    fn create_requires_creator() {
        let mut home = home();
        home.set_text(HomeField::Password, "Secret1!");

        let actions = home.create_room();

        assert!(requests(&actions).is_empty());
        assert_eq!(home.error_for(Field::Creator), Some(validate::CREATOR_REQUIRED));
    }

    #[test]
    fn weak_password_is_rejected_locally() {
        let mut home = home();
        home.set_text(HomeField::Creator, "Alice");
        home.set_text(HomeField::Password, "secret");

        let actions = home.create_room();

        assert!(requests(&actions).is_empty());
        assert_eq!(home.error_for(Field::Password), Some(validate::PASSWORD_RULE));
        assert!(actions.contains(&ViewAction::App(AppAction::ScheduleTimer {
            timer: TimerKey::new(ViewId(1), TimerKind::ErrorNotice),
            after: ChatTimings::default().error_notice,
        })));
    }

    #[test]
    fn valid_create_issues_one_request() {
        let mut home = home();
        home.set_text(HomeField::Creator, "Alice");
        home.set_text(HomeField::Password, "Secret1!");

        let actions = home.create_room();

        assert!(matches!(
            requests(&actions).as_slice(),
            [ApiRequest::CreateRoom(CreateRoomRequest { creator, .. })] if creator == "Alice"
        ));
        assert!(home.is_submitting());

        // Second submit while in flight is ignored
        assert!(home.create_room().is_empty());
    }

    #[test]
    fn malformed_room_id_is_rejected_locally() {
        let mut home = home();
        home.set_text(HomeField::RoomId, "not-a-uuid");

        let actions = home.join_room();

        assert!(requests(&actions).is_empty());
        assert_eq!(home.error_for(Field::RoomId), Some(validate::INVALID_ROOM_ID));
    }

    #[test]
    fn create_success_navigates_to_new_room() {
        let mut home = home();
        home.set_text(HomeField::Creator, "Alice");
        home.set_text(HomeField::Password, "Secret1!");
        let actions = home.create_room();
        let request = requests(&actions)[0].clone();

        let room = Room { id: RoomId::new(ROOM), creator: "Alice".into() };
        let actions = home.handle_response(&request, Ok(ApiResponse::RoomCreated(room)));

        assert_eq!(actions, vec![
            ViewAction::Success(ROOM_CREATED.into()),
            ViewAction::Navigate(Route::Chat(RoomId::new(ROOM))),
        ]);
        assert!(!home.is_submitting());
    }

    #[test]
    fn server_error_goes_to_general_slot() {
        let mut home = home();
        home.set_text(HomeField::RoomId, ROOM);
        let actions = home.join_room();
        let request = requests(&actions)[0].clone();

        let err = ApiError::Status { status: 404, body: "Room not found".into() };
        home.handle_response(&request, Err(err));

        assert_eq!(home.error_for(Field::General), Some("Room not found"));
        assert!(!home.is_submitting());
    }

    #[test]
    fn transport_error_uses_fallback_text() {
        let mut home = home();
        home.set_text(HomeField::Creator, "Alice");
        home.set_text(HomeField::Password, "Secret1!");
        let actions = home.create_room();
        let request = requests(&actions)[0].clone();

        home.handle_response(&request, Err(ApiError::Transport("refused".into())));

        assert_eq!(home.error_for(Field::General), Some(CREATE_FAILED));
    }

    #[test]
    fn error_notice_expires() {
        let mut home = home();
        home.join_room();
        assert!(home.error().is_some());

        home.handle_timer(&TimerKind::ErrorNotice);
        assert!(home.error().is_none());
    }

    #[test]
    fn typing_goes_to_focused_input() {
        let mut home = home();
        home.handle_key(KeyInput::Tab);
        home.handle_key(KeyInput::Char('A'));
        assert_eq!(home.creator_input().text(), "A");
        assert!(home.room_id_input().is_empty());
    }

    #[test]
    fn esc_dismisses_error_before_quitting() {
        let mut home = home();
        home.join_room();

        assert_eq!(home.handle_key(KeyInput::Esc), vec![ViewAction::App(AppAction::Render)]);
        assert_eq!(home.handle_key(KeyInput::Esc), vec![ViewAction::App(AppAction::Quit)]);
    }
}
