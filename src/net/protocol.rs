//! Protocol module - JSON messages exchanged with the relay
//!
//! Every message is one JSON object tagged by `"type"`, with camelCase
//! fields. Players travel as `1` (Black) and `2` (White). There are no
//! sequence numbers or acknowledgements.

use serde::{Deserialize, Serialize};

use crate::board::{MoveRecord, Player, Pos};
use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Message {
    // ============== Client -> Relay ==============
    #[serde(rename_all = "camelCase")]
    CreateRoom { room_id: String, role: Player },

    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String, role: Player },

    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_id: String, role: Player },

    // ============== Relay -> Client ==============
    #[serde(rename_all = "camelCase")]
    CreateRoomSuccess {
        #[serde(default)]
        room_id: String,
    },

    #[serde(rename_all = "camelCase")]
    JoinRoomSuccess {
        #[serde(default)]
        room_id: String,
    },

    PlayerJoined {},

    #[serde(rename_all = "camelCase")]
    GameStart {
        #[serde(default)]
        current_player: Player,
    },

    PlayerLeft {},

    Error { msg: String },

    // ============== Both directions ==============
    #[serde(rename_all = "camelCase")]
    PlayerReady {
        #[serde(default)]
        room_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<Player>,
    },

    #[serde(rename_all = "camelCase")]
    Move {
        #[serde(default)]
        room_id: String,
        row: usize,
        col: usize,
        player: Player,
    },

    #[serde(rename_all = "camelCase")]
    GameOver {
        #[serde(default)]
        room_id: String,
        /// `None` for a draw
        #[serde(default)]
        winner: Option<Player>,
        #[serde(default)]
        reason: String,
    },
}

impl Message {
    /// Wire name of the message, matching the `"type"` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Message::CreateRoom { .. } => "createRoom",
            Message::JoinRoom { .. } => "joinRoom",
            Message::LeaveRoom { .. } => "leaveRoom",
            Message::CreateRoomSuccess { .. } => "createRoomSuccess",
            Message::JoinRoomSuccess { .. } => "joinRoomSuccess",
            Message::PlayerJoined {} => "playerJoined",
            Message::GameStart { .. } => "gameStart",
            Message::PlayerLeft {} => "playerLeft",
            Message::Error { .. } => "error",
            Message::PlayerReady { .. } => "playerReady",
            Message::Move { .. } => "move",
            Message::GameOver { .. } => "gameOver",
        }
    }

    pub fn move_from(room_id: &str, record: MoveRecord) -> Self {
        Message::Move {
            room_id: room_id.to_string(),
            row: record.pos.row as usize,
            col: record.pos.col as usize,
            player: record.player,
        }
    }

    /// Decode the move record carried by a `move` message.
    ///
    /// `None` for other messages and for coordinates off the board.
    pub fn as_move(&self) -> Option<MoveRecord> {
        match *self {
            Message::Move {
                row, col, player, ..
            } => Pos::checked(row, col).map(|pos| MoveRecord::new(pos, player)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, TransportError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_room_wire_shape() {
        let msg = Message::CreateRoom {
            room_id: "ABC123".to_string(),
            role: Player::Black,
        };
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"type": "createRoom", "roomId": "ABC123", "role": 1}));
    }

    #[test]
    fn test_move_wire_shape() {
        let msg = Message::move_from("R1", MoveRecord::new(Pos::new(7, 11), Player::White));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({"type": "move", "roomId": "R1", "row": 7, "col": 11, "player": 2})
        );
        assert_eq!(
            msg.as_move(),
            Some(MoveRecord::new(Pos::new(7, 11), Player::White))
        );
    }

    #[test]
    fn test_decode_relay_messages() {
        let start = Message::from_json(r#"{"type":"gameStart","currentPlayer":1}"#).unwrap();
        assert_eq!(
            start,
            Message::GameStart {
                current_player: Player::Black
            }
        );

        let joined = Message::from_json(r#"{"type":"playerJoined","roomId":"X"}"#).unwrap();
        assert_eq!(joined, Message::PlayerJoined {});

        let ready = Message::from_json(r#"{"type":"playerReady"}"#).unwrap();
        assert_eq!(
            ready,
            Message::PlayerReady {
                room_id: String::new(),
                role: None
            }
        );

        let err = Message::from_json(r#"{"type":"error","msg":"room full"}"#).unwrap();
        assert_eq!(err.kind(), "error");
    }

    #[test]
    fn test_game_over_draw_has_null_winner() {
        let msg = Message::from_json(r#"{"type":"gameOver","winner":null,"reason":"draw"}"#).unwrap();
        assert!(matches!(msg, Message::GameOver { winner: None, .. }));
        let msg = Message::from_json(r#"{"type":"gameOver","winner":2,"reason":"five"}"#).unwrap();
        assert!(matches!(
            msg,
            Message::GameOver {
                winner: Some(Player::White),
                ..
            }
        ));
    }

    #[test]
    fn test_off_board_move_has_no_record() {
        let msg = Message::from_json(r#"{"type":"move","row":15,"col":0,"player":1}"#).unwrap();
        assert_eq!(msg.as_move(), None);
    }

    #[test]
    fn test_rejects_unknown_type_and_bad_player() {
        assert!(Message::from_json(r#"{"type":"chat","text":"hi"}"#).is_err());
        assert!(Message::from_json(r#"{"type":"move","row":1,"col":1,"player":3}"#).is_err());
        assert!(matches!(
            Message::from_json("not json"),
            Err(TransportError::Codec(_))
        ));
    }
}
