//! Backend operations as data.
//!
//! The application state machines never perform I/O. They describe the call
//! they need as an [`ApiRequest`]; the runtime executes it against a
//! [`ChatApi`] and feeds the [`ApiResponse`] back in.

use veeton_proto::{CreateRoomRequest, Message, MessageId, PostMessageRequest, Room, RoomId};

use crate::{ApiError, ChatApi};

/// A single backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// Create a room.
    CreateRoom(CreateRoomRequest),

    /// Join an existing room.
    JoinRoom {
        /// Room to join.
        room_id: RoomId,
    },

    /// Fetch room metadata.
    GetRoomDetails {
        /// Room to fetch.
        room_id: RoomId,
    },

    /// Fetch the message list.
    GetMessages {
        /// Room to fetch.
        room_id: RoomId,
    },

    /// Post a message.
    PostMessage {
        /// Target room.
        room_id: RoomId,
        /// Message body and author.
        body: PostMessageRequest,
    },

    /// Delete a message.
    DeleteMessage {
        /// Room containing the message.
        room_id: RoomId,
        /// Message to delete.
        message_id: MessageId,
    },
}

/// Successful result of an [`ApiRequest`].
///
/// Variants without a server payload echo the identifiers they acted on so
/// the receiver does not need to remember what it asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// Room created.
    RoomCreated(Room),

    /// Room joined.
    RoomJoined {
        /// Joined room.
        room_id: RoomId,
    },

    /// Room metadata.
    RoomDetails(Room),

    /// Message list in arrival order.
    Messages(Vec<Message>),

    /// Message stored by the server.
    MessagePosted(Message),

    /// Message deleted.
    MessageDeleted {
        /// Deleted message.
        message_id: MessageId,
    },
}

impl ApiRequest {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoom(_) => "create_room",
            Self::JoinRoom { .. } => "join_room",
            Self::GetRoomDetails { .. } => "get_room_details",
            Self::GetMessages { .. } => "get_messages",
            Self::PostMessage { .. } => "post_message",
            Self::DeleteMessage { .. } => "delete_message",
        }
    }

    /// Perform this request against `api`.
    pub async fn execute<A: ChatApi>(self, api: &A) -> Result<ApiResponse, ApiError> {
        match self {
            Self::CreateRoom(body) => api.create_room(body).await.map(ApiResponse::RoomCreated),
            Self::JoinRoom { room_id } => {
                api.join_room(&room_id).await?;
                Ok(ApiResponse::RoomJoined { room_id })
            },
            Self::GetRoomDetails { room_id } => {
                api.get_room_details(&room_id).await.map(ApiResponse::RoomDetails)
            },
            Self::GetMessages { room_id } => {
                api.get_messages(&room_id).await.map(ApiResponse::Messages)
            },
            Self::PostMessage { room_id, body } => {
                api.post_message(&room_id, body).await.map(ApiResponse::MessagePosted)
            },
            Self::DeleteMessage { room_id, message_id } => {
                api.delete_message(&room_id, &message_id).await?;
                Ok(ApiResponse::MessageDeleted { message_id })
            },
        }
    }
}
