//! Routing surface.
//!
//! Two routes exist: the landing view at `/` and a chat view at
//! `/chat/{roomId}`.

use std::{fmt, str::FromStr};

use thiserror::Error;
use veeton_proto::RoomId;

/// A navigable location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing view: create or join a room.
    Home,
    /// Chat view for a room.
    Chat(RoomId),
}

/// Path that is neither `/` nor `/chat/{roomId}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route: {0}")]
pub struct RouteParseError(pub String);

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Chat(room_id) => write!(f, "/chat/{room_id}"),
        }
    }
}

impl FromStr for Route {
    type Err = RouteParseError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        if path.is_empty() || path == "/" {
            return Ok(Self::Home);
        }

        path.strip_prefix("/chat/")
            .map(|rest| rest.strip_suffix('/').unwrap_or(rest))
            .filter(|id| !id.is_empty() && !id.contains('/'))
            .map(|id| Self::Chat(RoomId::new(id)))
            .ok_or_else(|| RouteParseError(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_routes() {
        assert_eq!("/".parse(), Ok(Route::Home));
        assert_eq!("/chat/abc".parse(), Ok(Route::Chat(RoomId::new("abc"))));
        assert_eq!("/chat/abc/".parse(), Ok(Route::Chat(RoomId::new("abc"))));
    }

    #[test]
    fn rejects_unknown_paths() {
        assert!("/chat/".parse::<Route>().is_err());
        assert!("/chat/a/b".parse::<Route>().is_err());
        assert!("/rooms".parse::<Route>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        let route = Route::Chat(RoomId::new("0b7e1f0a-9c1d-4c6e-8f00-1a2b3c4d5e6f"));
        assert_eq!(route.to_string().parse(), Ok(route));
    }
}
