//! Error types for moves, sessions, transports and configuration

use std::path::PathBuf;

use crate::board::Pos;
use crate::rules::ForbiddenKind;

/// Why a move was refused. The board is never mutated when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("game is over")]
    GameOver,

    #[error("({row}, {col}) is off the board")]
    OutOfRange { row: usize, col: usize },

    #[error("cell {0} is already occupied")]
    Occupied(Pos),

    #[error("forbidden move for Black: {0}")]
    Forbidden(ForbiddenKind),

    #[error("not your turn")]
    NotYourTurn,

    #[error("online match has not started")]
    SessionNotActive,
}

/// Errors raised by room lifecycle requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("already in room {0}")]
    AlreadyInRoom(String),

    #[error("no room session")]
    NoSession,

    #[error("room not joined yet")]
    NotJoined,
}

/// Errors from the message channel to the relay.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("not connected to the relay")]
    Disconnected,

    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        assert_eq!(
            MoveError::Occupied(Pos::new(3, 4)).to_string(),
            "cell (3, 4) is already occupied"
        );
        assert_eq!(
            MoveError::OutOfRange { row: 15, col: 2 }.to_string(),
            "(15, 2) is off the board"
        );
        assert_eq!(
            MoveError::Forbidden(ForbiddenKind::Overline).to_string(),
            "forbidden move for Black: overline"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("relay.url must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: relay.url must not be empty"
        );
    }
}
