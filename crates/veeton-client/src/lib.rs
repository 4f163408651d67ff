//! Veeton API client
//!
//! Thin wrapper over the six REST operations of the chat backend. No
//! operation retries and nothing is cached; every failure is returned to the
//! caller unchanged.
//!
//! # Components
//!
//! - [`ChatApi`]: the operations, as a trait so state machines and tests can
//!   run against a fake backend
//! - [`ApiRequest`] / [`ApiResponse`]: the operations as data, produced by the
//!   application layer and executed by the runtime
//! - [`HttpApi`]: production implementation over reqwest

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod error;
mod http;
mod request;

pub use api::ChatApi;
pub use error::ApiError;
pub use http::{DEFAULT_BASE_URL, HttpApi, HttpApiConfig};
pub use request::{ApiRequest, ApiResponse};
pub use veeton_proto::{
    CreateRoomRequest, Message, MessageId, Password, PostMessageRequest, Room, RoomId,
};
