use std::fmt;

use crate::types::PlayerId;

/// Room membership failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    DuplicatePlayer(PlayerId),
    UnknownPlayer(PlayerId),
}

impl RoomError {
    pub fn code(&self) -> &'static str {
        match self {
            RoomError::DuplicatePlayer(_) => "duplicate_player",
            RoomError::UnknownPlayer(_) => "unknown_player",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RoomError::DuplicatePlayer(_) => "player is already in the room",
            RoomError::UnknownPlayer(_) => "player is not in the room",
        }
    }

    pub fn player(&self) -> &PlayerId {
        match self {
            RoomError::DuplicatePlayer(id) | RoomError::UnknownPlayer(id) => id,
        }
    }
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message(), self.player())
    }
}

impl std::error::Error for RoomError {}
