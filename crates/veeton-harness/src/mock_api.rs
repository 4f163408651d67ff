//! In-memory chat backend.
//!
//! `MockApi` implements [`ChatApi`] over a shared map of rooms so runtime
//! tests can exercise the full request path without a server. Every call is
//! recorded as the [`ApiRequest`] it corresponds to, and any operation can
//! be made to fail.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use veeton_client::{
    ApiError, ApiRequest, ChatApi, CreateRoomRequest, Message, MessageId, PostMessageRequest, Room,
    RoomId,
};

/// Timestamp stamped on every message the mock creates.
pub const MOCK_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

#[derive(Debug, Clone)]
struct MockRoom {
    creator: String,
    messages: Vec<Message>,
}

#[derive(Default)]
struct MockState {
    rooms: HashMap<RoomId, MockRoom>,
    calls: Vec<ApiRequest>,
    failures: HashMap<&'static str, ApiError>,
    next_room: u64,
    next_message: u64,
}

/// Scripted backend shared between a test and the runtime.
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
    latency: Option<Duration>,
}

impl MockApi {
    /// Empty backend answering immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency` of tokio time.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a room owned by `creator` holding `messages`.
    pub fn insert_room(&self, creator: &str, messages: Vec<Message>) -> RoomId {
        let mut state = self.lock();
        let room_id = next_room_id(&mut state);
        if let Some(max) = messages.iter().filter_map(|m| m.id.as_str().parse::<u64>().ok()).max() {
            state.next_message = state.next_message.max(max);
        }
        state.rooms.insert(room_id.clone(), MockRoom { creator: creator.to_owned(), messages });
        room_id
    }

    /// Fail every call of `operation` (see [`ApiRequest::name`]) with `error`.
    pub fn fail_on(&self, operation: &'static str, error: ApiError) {
        self.lock().failures.insert(operation, error);
    }

    /// Stop failing `operation`.
    pub fn recover(&self, operation: &'static str) {
        self.lock().failures.remove(operation);
    }

    /// Every call received, oldest first.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.lock().calls.clone()
    }

    /// Number of calls of `operation` received.
    pub fn call_count(&self, operation: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.name() == operation).count()
    }

    /// Messages currently stored for `room_id`.
    pub fn messages(&self, room_id: &RoomId) -> Vec<Message> {
        self.lock().rooms.get(room_id).map(|room| room.messages.clone()).unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Record `call` and return the injected failure for it, if any.
    fn record(&self, call: ApiRequest) -> Result<MutexGuard<'_, MockState>, ApiError> {
        let mut state = self.lock();
        let operation = call.name();
        tracing::debug!(operation, "mock call");
        state.calls.push(call);
        match state.failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(state),
        }
    }
}

fn next_room_id(state: &mut MockState) -> RoomId {
    state.next_room += 1;
    RoomId::new(format!("00000000-0000-4000-8000-{:012x}", state.next_room))
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status { status: 404, body: format!("{what} not found") }
}

impl ChatApi for MockApi {
    async fn create_room(&self, request: CreateRoomRequest) -> Result<Room, ApiError> {
        self.delay().await;
        let creator = request.creator.clone();
        let mut state = self.record(ApiRequest::CreateRoom(request))?;
        let id = next_room_id(&mut state);
        state.rooms.insert(id.clone(), MockRoom { creator: creator.clone(), messages: Vec::new() });
        Ok(Room { id, creator })
    }

    async fn join_room(&self, room_id: &RoomId) -> Result<(), ApiError> {
        self.delay().await;
        let state = self.record(ApiRequest::JoinRoom { room_id: room_id.clone() })?;
        if state.rooms.contains_key(room_id) { Ok(()) } else { Err(not_found("Room")) }
    }

    async fn get_room_details(&self, room_id: &RoomId) -> Result<Room, ApiError> {
        self.delay().await;
        let state = self.record(ApiRequest::GetRoomDetails { room_id: room_id.clone() })?;
        state
            .rooms
            .get(room_id)
            .map(|room| Room { id: room_id.clone(), creator: room.creator.clone() })
            .ok_or_else(|| not_found("Room"))
    }

    async fn get_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, ApiError> {
        self.delay().await;
        let state = self.record(ApiRequest::GetMessages { room_id: room_id.clone() })?;
        state.rooms.get(room_id).map(|room| room.messages.clone()).ok_or_else(|| not_found("Room"))
    }

    async fn post_message(
        &self,
        room_id: &RoomId,
        body: PostMessageRequest,
    ) -> Result<Message, ApiError> {
        self.delay().await;
        let mut state = self
            .record(ApiRequest::PostMessage { room_id: room_id.clone(), body: body.clone() })?;
        state.next_message += 1;
        let message = Message {
            id: MessageId::from(state.next_message),
            username: Some(body.username),
            text: body.text,
            timestamp: MOCK_TIMESTAMP.into(),
        };
        let room = state.rooms.get_mut(room_id).ok_or_else(|| not_found("Room"))?;
        room.messages.push(message.clone());
        Ok(message)
    }

    async fn delete_message(&self, room_id: &RoomId, message_id: &MessageId) -> Result<(), ApiError> {
        self.delay().await;
        let mut state = self.record(ApiRequest::DeleteMessage {
            room_id: room_id.clone(),
            message_id: message_id.clone(),
        })?;
        let room = state.rooms.get_mut(room_id).ok_or_else(|| not_found("Room"))?;
        let pos =
            room.messages.iter().position(|m| &m.id == message_id).ok_or_else(|| not_found("Message"))?;
        room.messages.remove(pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use veeton_client::Password;

    use super::*;

    #[tokio::test]
    async fn created_room_is_joinable() {
        let api = MockApi::new();
        let room = api
            .create_room(CreateRoomRequest { creator: "Alice".into(), password: Password::new("Secret1!") })
            .await
            .unwrap();

        api.join_room(&room.id).await.unwrap();
        assert_eq!(api.get_room_details(&room.id).await.unwrap().creator, "Alice");
        assert_eq!(api.call_count("join_room"), 1);
    }

    #[tokio::test]
    async fn unknown_room_is_not_found() {
        let api = MockApi::new();
        let err = api.join_room(&RoomId::new("missing")).await.unwrap_err();

        assert_eq!(err.server_message().as_deref(), Some("Room not found"));
    }

    #[tokio::test]
    async fn injected_failure_is_recorded_and_returned() {
        let api = MockApi::new();
        let room_id = api.insert_room("Alice", vec![]);
        api.fail_on("get_messages", ApiError::Transport("down".into()));

        assert!(api.get_messages(&room_id).await.is_err());
        assert_eq!(api.call_count("get_messages"), 1);

        api.recover("get_messages");
        assert!(api.get_messages(&room_id).await.is_ok());
    }

    #[tokio::test]
    async fn post_then_delete() {
        let api = MockApi::new();
        let room_id = api.insert_room("Alice", vec![]);
        let body = PostMessageRequest { text: "hello".into(), username: "Bob".into() };

        let message = api.post_message(&room_id, body).await.unwrap();
        assert_eq!(api.messages(&room_id).len(), 1);

        api.delete_message(&room_id, &message.id).await.unwrap();
        assert!(api.messages(&room_id).is_empty());
        assert!(api.delete_message(&room_id, &message.id).await.is_err());
    }
}
