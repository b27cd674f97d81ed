//! Subscribe endpoint routing
//!
//! Maps `GET {prefix}{room_id}` to a room. Anything else is rejected before
//! the WebSocket upgrade completes.

use thiserror::Error;
use tokio_tungstenite::tungstenite::http::StatusCode;

use crate::registry::{InvalidRoomId, RoomId};

/// Why a request path did not resolve to a room
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Path does not address the subscribe endpoint
    #[error("no route for {0}")]
    NotFound(String),
    /// Room id is not a textual UUID
    #[error(transparent)]
    InvalidRoomId(#[from] InvalidRoomId),
}

impl RouteError {
    /// HTTP status to reject the upgrade with
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::NotFound(_) => StatusCode::NOT_FOUND,
            RouteError::InvalidRoomId(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Response body to reject the upgrade with
    pub fn body(&self) -> &'static str {
        match self {
            RouteError::NotFound(_) => "not found",
            RouteError::InvalidRoomId(_) => "invalid room id",
        }
    }
}

/// Resolve a request path (without query) to the requested room
pub fn parse_subscribe_path(prefix: &str, path: &str) -> Result<RoomId, RouteError> {
    let not_found = || RouteError::NotFound(path.to_string());

    let rest = path.strip_prefix(prefix).ok_or_else(not_found)?;
    let raw = rest.strip_suffix('/').unwrap_or(rest);

    if raw.is_empty() || raw.contains('/') {
        return Err(not_found());
    }

    Ok(RoomId::parse(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "/subscribe/";
    const ROOM: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[test]
    fn test_valid_path() {
        let room = parse_subscribe_path(PREFIX, &format!("/subscribe/{ROOM}")).unwrap();
        assert_eq!(room.as_str(), ROOM);
    }

    #[test]
    fn test_trailing_slash() {
        let room = parse_subscribe_path(PREFIX, &format!("/subscribe/{ROOM}/")).unwrap();
        assert_eq!(room.as_str(), ROOM);
    }

    #[test]
    fn test_invalid_room_id() {
        let err = parse_subscribe_path(PREFIX, "/subscribe/lobby").unwrap_err();
        assert!(matches!(err, RouteError::InvalidRoomId(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body(), "invalid room id");
    }

    #[test]
    fn test_other_paths_not_found() {
        let nested = format!("/subscribe/{ROOM}/messages");
        let paths: [&str; 5] = ["/", "/subscribe", "/subscribe/", "/api/rooms", &nested];

        for path in paths {
            let err = parse_subscribe_path(PREFIX, path).unwrap_err();
            assert_eq!(err.status(), StatusCode::NOT_FOUND, "path {path}");
        }
    }
}
