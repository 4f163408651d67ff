//! REST implementation of [`ChatApi`] over reqwest.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use veeton_proto::{CreateRoomRequest, Message, MessageId, PostMessageRequest, Room, RoomId};

use crate::{ApiError, ChatApi};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/chat";

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpApiConfig {
    /// API root, e.g. `https://example.com/api/chat`.
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for HttpApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: Some(Duration::from_secs(30)) }
    }
}

/// Chat backend reached over HTTP.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// Build a client from `config`.
    pub fn new(config: &HttpApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    /// API root requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/{segments...}/`. The backend requires the trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(error = %e, "request failed before a response arrived");
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %body, "server rejected request");
        Err(ApiError::Status { status: status.as_u16(), body })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let bytes = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ChatApi for HttpApi {
    async fn create_room(&self, request: CreateRoomRequest) -> Result<Room, ApiError> {
        let url = self.endpoint(&["rooms"])?;
        tracing::debug!(%url, creator = %request.creator, "POST create room");
        self.send_json(self.client.post(url).json(&request)).await
    }

    async fn join_room(&self, room_id: &RoomId) -> Result<(), ApiError> {
        let url = self.endpoint(&["rooms", room_id.as_str(), "join"])?;
        tracing::debug!(%url, "POST join room");
        self.send(self.client.post(url)).await.map(drop)
    }

    async fn get_room_details(&self, room_id: &RoomId) -> Result<Room, ApiError> {
        let url = self.endpoint(&["rooms", room_id.as_str()])?;
        tracing::debug!(%url, "GET room details");
        self.send_json(self.client.get(url)).await
    }

    async fn get_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, ApiError> {
        let url = self.endpoint(&["rooms", room_id.as_str(), "messages"])?;
        tracing::debug!(%url, "GET messages");
        self.send_json(self.client.get(url)).await
    }

    async fn post_message(
        &self,
        room_id: &RoomId,
        request: PostMessageRequest,
    ) -> Result<Message, ApiError> {
        let url = self.endpoint(&["rooms", room_id.as_str(), "messages"])?;
        tracing::debug!(%url, username = %request.username, "POST message");
        self.send_json(self.client.post(url).json(&request)).await
    }

    async fn delete_message(&self, room_id: &RoomId, message_id: &MessageId) -> Result<(), ApiError> {
        let url = self.endpoint(&["rooms", room_id.as_str(), "messages", message_id.as_str()])?;
        tracing::debug!(%url, "DELETE message");
        self.send(self.client.delete(url)).await.map(drop)
    }
}
