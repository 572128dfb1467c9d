//! Room session state machine
//!
//! Each peer runs its own copy and only learns about the other side through
//! relayed messages:
//!
//! `Connecting -> Joined(unready) -> Joined(ready) -> Active -> Terminal`
//!
//! The room creator is always Black and the joiner always White. A session
//! that receives `error` is discarded by its owner, which puts the peer back
//! to Idle.
//!
//! A match that ended in a win or a draw leaves both peers in the room: a new
//! game sends the session back to `Joined(unready)`, and a relayed `gameStart`
//! reactivates it directly. A disconnect or a departed peer is final.

use crate::board::{MoveRecord, Player};
use crate::error::SessionError;

use super::protocol::Message;

/// State of the channel to the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Closed,
}

/// Why an online match stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalReason {
    Win(Player),
    Draw,
    /// Transport closed or failed
    Disconnected,
    /// The other peer left the room
    PeerLeft,
}

/// Where the session is in the room lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No room
    #[default]
    Idle,
    /// Room requested, relay has not confirmed
    Connecting,
    /// In the room; `ready` once the local player pressed ready
    Joined { ready: bool },
    /// Match running; whose turn it is comes from the board
    Active,
    Terminal(TerminalReason),
}

/// What an inbound message meant for the match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Joined { room_id: String },
    PeerJoined,
    PeerReady,
    /// Both sides ready or relay said `gameStart`
    Started { first: Player },
    RemoteMove(MoveRecord),
    RemoteGameOver {
        winner: Option<Player>,
        reason: String,
    },
    PeerLeft,
    /// Relay rejected us; the text is for display only
    ProtocolError(String),
    /// Nothing to do
    Ignored,
}

/// One peer's view of a networked room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSession {
    room_id: String,
    local_role: Player,
    creator: bool,
    local_ready: bool,
    remote_ready: bool,
    peer_present: bool,
    connection: ConnectionState,
    phase: SessionPhase,
}

impl RoomSession {
    fn open(room_id: &str, creator: bool) -> Result<Self, SessionError> {
        let room_id = room_id.trim();
        if room_id.is_empty() {
            return Err(SessionError::EmptyRoomId);
        }
        Ok(Self {
            room_id: room_id.to_string(),
            local_role: if creator { Player::Black } else { Player::White },
            creator,
            local_ready: false,
            remote_ready: false,
            // The creator of a room is waiting; a joiner finds the creator there
            peer_present: !creator,
            connection: ConnectionState::Connecting,
            phase: SessionPhase::Connecting,
        })
    }

    /// Start a room as its creator (Black). Returns the session and the request to send.
    pub fn create(room_id: &str) -> Result<(Self, Message), SessionError> {
        let session = Self::open(room_id, true)?;
        let request = Message::CreateRoom {
            room_id: session.room_id.clone(),
            role: session.local_role,
        };
        Ok((session, request))
    }

    /// Join an existing room (White). Returns the session and the request to send.
    pub fn join(room_id: &str) -> Result<(Self, Message), SessionError> {
        let session = Self::open(room_id, false)?;
        let request = Message::JoinRoom {
            room_id: session.room_id.clone(),
            role: session.local_role,
        };
        Ok((session, request))
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn local_role(&self) -> Player {
        self.local_role
    }

    pub fn is_creator(&self) -> bool {
        self.creator
    }

    pub fn local_ready(&self) -> bool {
        self.local_ready
    }

    pub fn remote_ready(&self) -> bool {
        self.remote_ready
    }

    pub fn peer_present(&self) -> bool {
        self.peer_present
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SessionPhase::Terminal(_))
    }

    /// Terminal with no way back into a match in this room
    #[inline]
    pub fn is_final(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Terminal(TerminalReason::Disconnected | TerminalReason::PeerLeft)
        )
    }

    pub fn terminal_reason(&self) -> Option<TerminalReason> {
        match self.phase {
            SessionPhase::Terminal(reason) => Some(reason),
            _ => None,
        }
    }

    /// The local player may move now
    #[inline]
    pub fn is_my_turn(&self, to_move: Player) -> bool {
        self.is_active() && to_move == self.local_role
    }

    /// Transport reports the channel is open
    pub fn on_transport_opened(&mut self) {
        self.connection = ConnectionState::Connected;
    }

    /// Transport closed or failed. An unfinished match ends as disconnected.
    pub fn on_transport_closed(&mut self) {
        self.connection = ConnectionState::Closed;
        if !self.is_terminal() {
            self.set_phase(SessionPhase::Terminal(TerminalReason::Disconnected));
        }
    }

    /// Local player pressed ready. Returns the message announcing it.
    pub fn mark_ready(&mut self) -> Result<Message, SessionError> {
        if !matches!(self.phase, SessionPhase::Joined { .. }) {
            return Err(SessionError::NotJoined);
        }
        self.local_ready = true;
        self.set_phase(SessionPhase::Joined { ready: true });
        self.try_start();
        Ok(Message::PlayerReady {
            room_id: self.room_id.clone(),
            role: Some(self.local_role),
        })
    }

    /// Record the end of the match
    pub fn finish(&mut self, reason: TerminalReason) {
        if !self.is_terminal() {
            self.conclude(reason);
        }
    }

    /// Back to `Joined(unready)` after a won or drawn match, for a rematch.
    ///
    /// Returns false when the session is not in a decided match or the
    /// connection is gone.
    pub fn rematch(&mut self) -> bool {
        let decided = matches!(
            self.phase,
            SessionPhase::Terminal(TerminalReason::Win(_) | TerminalReason::Draw)
        );
        if !decided || self.connection == ConnectionState::Closed {
            return false;
        }
        self.local_ready = false;
        self.set_phase(SessionPhase::Joined { ready: false });
        true
    }

    /// Message announcing that the local player leaves the room
    pub fn leave_message(&self) -> Message {
        Message::LeaveRoom {
            room_id: self.room_id.clone(),
            role: self.local_role,
        }
    }

    /// Apply one inbound message to the session.
    pub fn handle(&mut self, message: &Message) -> SessionEvent {
        match message {
            Message::CreateRoomSuccess { room_id } | Message::JoinRoomSuccess { room_id } => {
                if self.phase != SessionPhase::Connecting {
                    return SessionEvent::Ignored;
                }
                self.connection = ConnectionState::Connected;
                self.set_phase(SessionPhase::Joined { ready: false });
                let room_id = if room_id.is_empty() {
                    self.room_id.clone()
                } else {
                    room_id.clone()
                };
                SessionEvent::Joined { room_id }
            }
            Message::PlayerJoined {} => {
                self.peer_present = true;
                SessionEvent::PeerJoined
            }
            Message::PlayerReady { .. } => {
                if self.is_final() || self.is_active() {
                    return SessionEvent::Ignored;
                }
                self.remote_ready = true;
                if self.try_start() {
                    SessionEvent::Started {
                        first: Player::Black,
                    }
                } else {
                    SessionEvent::PeerReady
                }
            }
            Message::GameStart { current_player } => {
                if self.is_final() || self.connection == ConnectionState::Closed {
                    return SessionEvent::Ignored;
                }
                self.local_ready = true;
                self.remote_ready = true;
                self.set_phase(SessionPhase::Active);
                SessionEvent::Started {
                    first: *current_player,
                }
            }
            Message::Move { .. } => match (self.phase, message.as_move()) {
                (SessionPhase::Joined { .. } | SessionPhase::Active, Some(record)) => {
                    SessionEvent::RemoteMove(record)
                }
                (phase, record) => {
                    tracing::warn!(?phase, ?record, "dropping relayed move");
                    SessionEvent::Ignored
                }
            },
            Message::GameOver { winner, reason, .. } => {
                if self.is_terminal() {
                    return SessionEvent::Ignored;
                }
                // Some clients put the last mover in `winner` even for a draw
                let winner = (*winner).filter(|_| !reports_draw(reason));
                let terminal = match winner {
                    Some(player) => TerminalReason::Win(player),
                    None => TerminalReason::Draw,
                };
                self.conclude(terminal);
                SessionEvent::RemoteGameOver {
                    winner,
                    reason: reason.clone(),
                }
            }
            Message::PlayerLeft {} => {
                self.peer_present = false;
                self.remote_ready = false;
                if !self.is_final() {
                    self.set_phase(SessionPhase::Terminal(TerminalReason::PeerLeft));
                }
                SessionEvent::PeerLeft
            }
            Message::Error { msg } => {
                tracing::warn!(room = %self.room_id, %msg, "relay reported an error");
                SessionEvent::ProtocolError(msg.clone())
            }
            Message::CreateRoom { .. } | Message::JoinRoom { .. } | Message::LeaveRoom { .. } => {
                tracing::debug!(kind = message.kind(), "ignoring client-side message");
                SessionEvent::Ignored
            }
        }
    }

    /// Enter Active once both sides are ready. Black moves first.
    fn try_start(&mut self) -> bool {
        if self.local_ready && self.remote_ready && matches!(self.phase, SessionPhase::Joined { .. }) {
            self.set_phase(SessionPhase::Active);
            return true;
        }
        false
    }

    /// Enter Terminal. Ready flags belong to the match that just ended.
    fn conclude(&mut self, reason: TerminalReason) {
        self.local_ready = false;
        self.remote_ready = false;
        self.set_phase(SessionPhase::Terminal(reason));
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            tracing::info!(room = %self.room_id, from = ?self.phase, to = ?phase, "session phase changed");
            self.phase = phase;
        }
    }
}

/// Check if a `gameOver` reason describes a draw
fn reports_draw(reason: &str) -> bool {
    reason.to_ascii_lowercase().contains("draw") || reason.contains("平局")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    fn joined_creator() -> RoomSession {
        let (mut session, _) = RoomSession::create("ABC123").unwrap();
        session.handle(&Message::CreateRoomSuccess {
            room_id: "ABC123".to_string(),
        });
        session
    }

    #[test]
    fn test_roles_fixed_by_creation() {
        let (creator, request) = RoomSession::create("ABC123").unwrap();
        assert_eq!(creator.local_role(), Player::Black);
        assert!(creator.is_creator());
        assert_eq!(
            request,
            Message::CreateRoom {
                room_id: "ABC123".to_string(),
                role: Player::Black
            }
        );

        let (joiner, request) = RoomSession::join(" ABC123 ").unwrap();
        assert_eq!(joiner.local_role(), Player::White);
        assert_eq!(joiner.room_id(), "ABC123");
        assert!(matches!(request, Message::JoinRoom { role: Player::White, .. }));
    }

    #[test]
    fn test_empty_room_id_rejected() {
        assert_eq!(RoomSession::join("   ").unwrap_err(), SessionError::EmptyRoomId);
    }

    #[test]
    fn test_ready_requires_joined() {
        let (mut session, _) = RoomSession::create("R").unwrap();
        assert_eq!(session.phase(), SessionPhase::Connecting);
        assert_eq!(session.mark_ready().unwrap_err(), SessionError::NotJoined);
    }

    #[test]
    fn test_both_ready_starts_match() {
        let mut session = joined_creator();
        assert_eq!(session.phase(), SessionPhase::Joined { ready: false });
        assert_eq!(session.connection(), ConnectionState::Connected);

        assert_eq!(session.handle(&Message::PlayerJoined {}), SessionEvent::PeerJoined);
        session.mark_ready().unwrap();
        assert_eq!(session.phase(), SessionPhase::Joined { ready: true });

        let event = session.handle(&Message::PlayerReady {
            room_id: "ABC123".to_string(),
            role: Some(Player::White),
        });
        assert_eq!(event, SessionEvent::Started { first: Player::Black });
        assert!(session.is_active());
        assert!(session.is_my_turn(Player::Black));
        assert!(!session.is_my_turn(Player::White));
    }

    #[test]
    fn test_peer_ready_first_then_local() {
        let mut session = joined_creator();
        let event = session.handle(&Message::PlayerReady {
            room_id: String::new(),
            role: None,
        });
        assert_eq!(event, SessionEvent::PeerReady);
        assert!(!session.is_active());
        session.mark_ready().unwrap();
        assert!(session.is_active());
    }

    #[test]
    fn test_game_start_from_relay() {
        let mut session = joined_creator();
        let event = session.handle(&Message::GameStart {
            current_player: Player::Black,
        });
        assert_eq!(event, SessionEvent::Started { first: Player::Black });
        assert!(session.is_active());
    }

    #[test]
    fn test_move_relayed_only_while_in_room() {
        let (mut session, _) = RoomSession::join("R").unwrap();
        let msg = Message::move_from("R", MoveRecord::new(Pos::new(7, 7), Player::Black));
        assert_eq!(session.handle(&msg), SessionEvent::Ignored);

        session.handle(&Message::JoinRoomSuccess { room_id: String::new() });
        assert_eq!(
            session.handle(&msg),
            SessionEvent::RemoteMove(MoveRecord::new(Pos::new(7, 7), Player::Black))
        );
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut session = joined_creator();
        session.handle(&Message::GameStart {
            current_player: Player::Black,
        });
        let event = session.handle(&Message::GameOver {
            room_id: String::new(),
            winner: Some(Player::White),
            reason: "five in a row".to_string(),
        });
        assert!(matches!(event, SessionEvent::RemoteGameOver { winner: Some(Player::White), .. }));
        assert_eq!(
            session.phase(),
            SessionPhase::Terminal(TerminalReason::Win(Player::White))
        );
        let late = Message::move_from("R", MoveRecord::new(Pos::new(0, 0), Player::White));
        assert_eq!(session.handle(&late), SessionEvent::Ignored);
    }

    #[test]
    fn test_transport_close_disconnects() {
        let mut session = joined_creator();
        session.handle(&Message::GameStart {
            current_player: Player::Black,
        });
        session.on_transport_closed();
        assert_eq!(session.connection(), ConnectionState::Closed);
        assert_eq!(
            session.phase(),
            SessionPhase::Terminal(TerminalReason::Disconnected)
        );
        assert!(!session.is_my_turn(Player::Black));
    }

    #[test]
    fn test_close_after_win_keeps_result() {
        let mut session = joined_creator();
        session.finish(TerminalReason::Win(Player::Black));
        session.on_transport_closed();
        assert_eq!(
            session.phase(),
            SessionPhase::Terminal(TerminalReason::Win(Player::Black))
        );
    }

    #[test]
    fn test_peer_left() {
        let mut session = joined_creator();
        session.handle(&Message::PlayerJoined {});
        assert_eq!(session.handle(&Message::PlayerLeft {}), SessionEvent::PeerLeft);
        assert!(!session.peer_present());
        assert_eq!(session.phase(), SessionPhase::Terminal(TerminalReason::PeerLeft));
    }

    #[test]
    fn test_error_surfaces_text() {
        let mut session = joined_creator();
        let event = session.handle(&Message::Error {
            msg: "room is full".to_string(),
        });
        assert_eq!(event, SessionEvent::ProtocolError("room is full".to_string()));
    }

    #[test]
    fn test_leave_message() {
        let session = joined_creator();
        assert_eq!(
            session.leave_message(),
            Message::LeaveRoom {
                room_id: "ABC123".to_string(),
                role: Player::Black
            }
        );
    }

    #[test]
    fn test_draw_reason_overrides_winner() {
        let mut session = joined_creator();
        session.handle(&Message::GameStart {
            current_player: Player::Black,
        });
        let event = session.handle(&Message::GameOver {
            room_id: String::new(),
            winner: Some(Player::White),
            reason: "平局！棋盘已满".to_string(),
        });
        assert!(matches!(event, SessionEvent::RemoteGameOver { winner: None, .. }));
        assert_eq!(session.terminal_reason(), Some(TerminalReason::Draw));
    }

    #[test]
    fn test_rematch_only_after_decided_match() {
        let mut session = joined_creator();
        session.handle(&Message::GameStart {
            current_player: Player::Black,
        });
        assert!(!session.rematch());

        session.finish(TerminalReason::Win(Player::Black));
        assert!(!session.local_ready() && !session.remote_ready());
        // Peer may announce ready before the local side starts over
        assert_eq!(
            session.handle(&Message::PlayerReady {
                room_id: String::new(),
                role: None
            }),
            SessionEvent::PeerReady
        );
        assert!(session.rematch());
        assert_eq!(session.phase(), SessionPhase::Joined { ready: false });
        session.mark_ready().unwrap();
        assert!(session.is_active());
    }

    #[test]
    fn test_disconnect_and_peer_left_are_final() {
        let mut session = joined_creator();
        session.handle(&Message::PlayerLeft {});
        assert!(session.is_final());
        assert!(!session.rematch());
        let event = session.handle(&Message::GameStart {
            current_player: Player::Black,
        });
        assert_eq!(event, SessionEvent::Ignored);

        let mut session = joined_creator();
        session.finish(TerminalReason::Draw);
        session.on_transport_closed();
        assert!(!session.rematch());
    }
}
