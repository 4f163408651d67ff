//! The backend operations as a trait.

use std::future::Future;

use veeton_proto::{CreateRoomRequest, Message, MessageId, PostMessageRequest, Room, RoomId};

use crate::ApiError;

/// Operations exposed by the chat backend.
///
/// Implementations must not retry: a failed request resolves to an error and
/// recovery is left to the user.
///
/// # Implementations
///
/// - [`HttpApi`](crate::HttpApi): REST over HTTP
/// - `MockApi` (harness crate): scripted in-memory backend for tests
pub trait ChatApi: Send + Sync {
    /// `POST /rooms/`. Create a room owned by `request.creator`.
    fn create_room(
        &self,
        request: CreateRoomRequest,
    ) -> impl Future<Output = Result<Room, ApiError>> + Send;

    /// `POST /rooms/{roomId}/join/`.
    fn join_room(&self, room_id: &RoomId) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET /rooms/{roomId}/`.
    fn get_room_details(
        &self,
        room_id: &RoomId,
    ) -> impl Future<Output = Result<Room, ApiError>> + Send;

    /// `GET /rooms/{roomId}/messages/`. Messages in arrival order.
    fn get_messages(
        &self,
        room_id: &RoomId,
    ) -> impl Future<Output = Result<Vec<Message>, ApiError>> + Send;

    /// `POST /rooms/{roomId}/messages/`. Returns the stored message.
    fn post_message(
        &self,
        room_id: &RoomId,
        request: PostMessageRequest,
    ) -> impl Future<Output = Result<Message, ApiError>> + Send;

    /// `DELETE /rooms/{roomId}/messages/{messageId}/`.
    fn delete_message(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}
