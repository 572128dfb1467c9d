//! Match controller
//!
//! [`GameState`] owns one match: the board, the rule configuration, the
//! scripted opponent and, in online mode, the room session. Every operation
//! takes `&mut self`, so a local move and a relayed move can never interleave
//! their board mutations.
//!
//! Messages for the relay are queued in an outbox and drained by the
//! networking layer with [`GameState::take_outbound`].

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::board::{Board, MoveRecord, Player, Pos};
use crate::config::GameConfig;
use crate::engine::AIEngine;
use crate::error::{MoveError, SessionError};
use crate::net::{Message, RoomSession, SessionEvent, SessionPhase, TerminalReason};
use crate::rules::{check_result, find_five_line_at_pos, forbidden_kind, ForbiddenKind, GameOutcome};

/// The scripted opponent always plays White
pub const AI_PLAYER: Player = Player::White;

/// Game mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Two players on one device
    #[default]
    #[serde(rename = "local")]
    Local,
    /// Human (Black) against the scripted opponent (White)
    #[serde(rename = "ai")]
    VsAi,
    /// Two peers through a relay
    #[serde(rename = "online")]
    Online,
}

/// Scripted opponent scheduling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiState {
    #[default]
    Idle,
    /// Move will be computed once `due` has passed
    Pending { due: Instant },
}

/// One match
pub struct GameState {
    board: Board,
    config: GameConfig,
    current_turn: Player,
    outcome: GameOutcome,
    session: Option<RoomSession>,
    outbox: Vec<Message>,
    engine: AIEngine,
    ai_state: AiState,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let engine = Self::build_engine(&config);
        Self {
            board: Board::new(),
            config,
            current_turn: Player::Black,
            outcome: GameOutcome::InProgress,
            session: None,
            outbox: Vec::new(),
            engine,
            ai_state: AiState::Idle,
        }
    }

    fn build_engine(config: &GameConfig) -> AIEngine {
        let engine = match config.ai.seed {
            Some(seed) => AIEngine::with_seed(config.ai.difficulty, seed),
            None => AIEngine::new(config.ai.difficulty),
        };
        engine.with_rules(config.rules)
    }

    /// Start a fresh board: Black to move, no result.
    ///
    /// A room session is kept; after a won or drawn match it goes back to
    /// waiting for both players to be ready.
    pub fn new_game(&mut self) {
        self.reset_board();
        if let Some(session) = self.session.as_mut() {
            if session.rematch() {
                tracing::info!(room = session.room_id(), "rematch in the same room");
            }
        }
        tracing::debug!(mode = ?self.config.mode, "new game");
    }

    fn reset_board(&mut self) {
        self.board = Board::new();
        self.current_turn = Player::Black;
        self.outcome = GameOutcome::InProgress;
        self.ai_state = AiState::Idle;
    }

    /// Replace mode, rules or opponent settings and start over.
    ///
    /// Leaving online mode drops the room session.
    pub fn reconfigure(&mut self, config: GameConfig) {
        if config.mode != GameMode::Online {
            self.session = None;
        }
        self.engine = Self::build_engine(&config);
        self.config = config;
        self.new_game();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    /// Result computed from this board.
    ///
    /// A match decided by the peer's `gameOver` alone, or cut short by the
    /// connection, still reads `InProgress` here; see [`Self::terminal_reason`].
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Why the match is over, whoever decided it
    pub fn terminal_reason(&self) -> Option<TerminalReason> {
        match self.outcome {
            GameOutcome::Win { player, .. } => Some(TerminalReason::Win(player)),
            GameOutcome::Draw => Some(TerminalReason::Draw),
            GameOutcome::InProgress => self.session.as_ref().and_then(RoomSession::terminal_reason),
        }
    }

    pub fn last_move(&self) -> Option<MoveRecord> {
        self.board.last_move()
    }

    pub fn session(&self) -> Option<&RoomSession> {
        self.session.as_ref()
    }

    pub fn session_phase(&self) -> SessionPhase {
        self.session.as_ref().map_or(SessionPhase::Idle, RoomSession::phase)
    }

    pub fn ai_state(&self) -> AiState {
        self.ai_state
    }

    /// No more moves are accepted
    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal() || self.session.as_ref().is_some_and(RoomSession::is_terminal)
    }

    /// Stones of the winning run, for highlighting
    pub fn winning_line(&self) -> Option<Vec<Pos>> {
        match self.outcome {
            GameOutcome::Win { .. } => find_five_line_at_pos(&self.board, self.last_move()?.pos),
            _ => None,
        }
    }

    /// Check if the local player may place a stone right now
    pub fn is_local_turn(&self) -> bool {
        if self.is_over() {
            return false;
        }
        match self.config.mode {
            GameMode::Local => true,
            GameMode::VsAi => self.current_turn != AI_PLAYER,
            GameMode::Online => self
                .session
                .as_ref()
                .is_some_and(|s| s.is_my_turn(self.current_turn)),
        }
    }

    pub fn is_ai_turn(&self) -> bool {
        self.config.mode == GameMode::VsAi && self.current_turn == AI_PLAYER && !self.is_over()
    }

    /// Check if the side to move has any cell it may play
    pub fn has_legal_move(&self) -> bool {
        self.board.empty_cells().any(|pos| self.forbidden_at(pos).is_none())
    }

    /// Restriction the side to move would violate at `pos`
    pub fn forbidden_at(&self, pos: Pos) -> Option<ForbiddenKind> {
        forbidden_kind(&self.board, pos, self.current_turn, &self.config.rules)
    }

    /// Place a stone for the side to move from caller coordinates
    pub fn place_at(&mut self, row: usize, col: usize) -> Result<GameOutcome, MoveError> {
        let pos = Pos::checked(row, col).ok_or(MoveError::OutOfRange { row, col })?;
        self.place(pos)
    }

    /// Place a stone for the side to move.
    ///
    /// Rejected moves leave the match untouched.
    pub fn place(&mut self, pos: Pos) -> Result<GameOutcome, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        match self.config.mode {
            GameMode::Local => {}
            GameMode::VsAi => {
                if self.current_turn == AI_PLAYER {
                    return Err(MoveError::NotYourTurn);
                }
            }
            GameMode::Online => {
                let session = self.session.as_ref().ok_or(MoveError::SessionNotActive)?;
                if !session.is_active() {
                    return Err(MoveError::SessionNotActive);
                }
                if !session.is_my_turn(self.current_turn) {
                    return Err(MoveError::NotYourTurn);
                }
            }
        }
        self.commit(pos)
    }

    /// Validate and apply a move for the side to move
    fn commit(&mut self, pos: Pos) -> Result<GameOutcome, MoveError> {
        let player = self.current_turn;
        if !self.board.is_empty(pos) {
            return Err(MoveError::Occupied(pos));
        }
        if let Some(kind) = forbidden_kind(&self.board, pos, player, &self.config.rules) {
            tracing::debug!(%pos, %kind, "forbidden point rejected");
            return Err(MoveError::Forbidden(kind));
        }

        self.board.place(pos, player)?;
        let record = MoveRecord::new(pos, player);
        let outcome = self.record_result(record);

        if let Some(session) = self.session.as_ref() {
            if self.config.mode == GameMode::Online {
                self.outbox.push(Message::move_from(session.room_id(), record));
                if outcome.is_terminal() {
                    let winner = outcome.winner();
                    self.outbox.push(Message::GameOver {
                        room_id: session.room_id().to_string(),
                        winner,
                        reason: describe(outcome),
                    });
                }
            }
        }
        Ok(outcome)
    }

    /// Compute the result after `record` was placed and advance the turn
    fn record_result(&mut self, record: MoveRecord) -> GameOutcome {
        let outcome = check_result(&self.board, record.pos);
        self.outcome = outcome;
        tracing::debug!(pos = %record.pos, player = %record.player, ?outcome, "stone placed");

        match outcome {
            GameOutcome::InProgress => self.current_turn = record.player.opponent(),
            GameOutcome::Win { player, .. } => {
                tracing::info!(winner = %player, moves = self.board.history().len(), "game won");
                if let Some(session) = self.session.as_mut() {
                    session.finish(TerminalReason::Win(player));
                }
            }
            GameOutcome::Draw => {
                tracing::info!("game drawn, board is full");
                if let Some(session) = self.session.as_mut() {
                    session.finish(TerminalReason::Draw);
                }
            }
        }
        outcome
    }

    /// Take back the most recent stone.
    ///
    /// No-op after the game ended, on an empty board, and always in online mode.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        if self.config.mode == GameMode::Online || self.is_over() {
            return None;
        }
        let record = self.board.undo_last()?;
        self.current_turn = record.player;
        self.ai_state = AiState::Idle;
        tracing::debug!(pos = %record.pos, player = %record.player, "move undone");
        Some(record)
    }

    /// Let the scripted opponent move now.
    ///
    /// Returns the cell played, or `None` when it is not the opponent's turn.
    pub fn ai_move(&mut self) -> Option<Pos> {
        self.ai_state = AiState::Idle;
        if !self.is_ai_turn() {
            return None;
        }
        let pos = self.engine.get_move(&self.board, AI_PLAYER)?;
        match self.commit(pos) {
            Ok(_) => Some(pos),
            Err(e) => {
                tracing::warn!(%pos, error = %e, "scripted opponent chose an illegal move");
                None
            }
        }
    }

    /// Schedule the opponent's move after the configured delay
    pub fn start_ai_thinking(&mut self) {
        if !self.is_ai_turn() || self.is_ai_thinking() {
            return;
        }
        self.ai_state = AiState::Pending {
            due: Instant::now() + self.config.ai.delay(),
        };
    }

    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Pending { .. })
    }

    /// Play the scheduled opponent move once its delay has passed
    pub fn check_ai_result(&mut self) -> Option<Pos> {
        match self.ai_state {
            AiState::Pending { due } if Instant::now() >= due => self.ai_move(),
            _ => None,
        }
    }

    // ============== Online ==============

    /// Create a room as Black
    pub fn create_room(&mut self, room_id: &str) -> Result<(), SessionError> {
        self.ensure_no_room()?;
        let (session, request) = RoomSession::create(room_id)?;
        self.enter_room(session, request);
        Ok(())
    }

    /// Join a room as White
    pub fn join_room(&mut self, room_id: &str) -> Result<(), SessionError> {
        self.ensure_no_room()?;
        let (session, request) = RoomSession::join(room_id)?;
        self.enter_room(session, request);
        Ok(())
    }

    fn ensure_no_room(&self) -> Result<(), SessionError> {
        match &self.session {
            Some(s) if !s.is_terminal() => Err(SessionError::AlreadyInRoom(s.room_id().to_string())),
            _ => Ok(()),
        }
    }

    fn enter_room(&mut self, session: RoomSession, request: Message) {
        tracing::info!(room = session.room_id(), role = %session.local_role(), "entering room");
        self.config.mode = GameMode::Online;
        self.reset_board();
        self.outbox.push(request);
        self.session = Some(session);
    }

    /// Announce that the local player is ready
    pub fn ready(&mut self) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoSession)?;
        let message = session.mark_ready()?;
        self.outbox.push(message);
        Ok(())
    }

    /// Leave the room and start over with a fresh board
    pub fn leave_room(&mut self) -> Result<(), SessionError> {
        let session = self.session.take().ok_or(SessionError::NoSession)?;
        tracing::info!(room = session.room_id(), "leaving room");
        self.outbox.push(session.leave_message());
        self.new_game();
        Ok(())
    }

    /// Apply one message received from the relay
    pub fn apply_session_message(&mut self, message: Message) -> SessionEvent {
        let Some(session) = self.session.as_mut() else {
            tracing::warn!(kind = message.kind(), "message without a room session");
            return SessionEvent::Ignored;
        };
        let was_decided = session.is_terminal();
        let event = session.handle(&message);

        match &event {
            SessionEvent::Started { first } => {
                if was_decided {
                    self.reset_board();
                }
                if self.board.history().is_empty() {
                    self.current_turn = *first;
                    self.outcome = GameOutcome::InProgress;
                }
                tracing::info!(first = %first, "online match started");
            }
            SessionEvent::RemoteMove(record) => {
                if let Err(e) = self.apply_remote_move(*record) {
                    tracing::warn!(pos = %record.pos, error = %e, "relayed move not applied");
                }
            }
            SessionEvent::RemoteGameOver { winner, reason } => {
                tracing::info!(?winner, %reason, "peer reported game over");
            }
            SessionEvent::ProtocolError(msg) => {
                tracing::warn!(%msg, "session reset after relay error");
                self.session = None;
            }
            SessionEvent::PeerLeft => tracing::info!("peer left the room"),
            SessionEvent::Joined { .. }
            | SessionEvent::PeerJoined
            | SessionEvent::PeerReady
            | SessionEvent::Ignored => {}
        }
        event
    }

    /// Apply a move made by the remote peer.
    ///
    /// Turn order and forbidden points are not re-checked; the peer is the
    /// authority for its own stone. The result is computed locally.
    pub fn apply_remote_move(&mut self, record: MoveRecord) -> Result<GameOutcome, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        self.board.place(record.pos, record.player)?;
        Ok(self.record_result(record))
    }

    pub fn on_transport_opened(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.on_transport_opened();
        }
    }

    /// Transport closed: the match is over as disconnected
    pub fn on_transport_closed(&mut self) {
        if let Some(session) = self.session.as_mut() {
            tracing::warn!(room = session.room_id(), "connection to relay closed");
            session.on_transport_closed();
        }
    }

    /// Transport failed; handled like a close
    pub fn on_transport_error(&mut self, error: &str) {
        tracing::warn!(%error, "transport error");
        self.on_transport_closed();
    }

    /// Drain messages waiting to be sent to the relay
    pub fn take_outbound(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

/// Human-readable reason carried by `gameOver`
fn describe(outcome: GameOutcome) -> String {
    match outcome {
        GameOutcome::Win { player, .. } => format!("{player} wins with five in a row"),
        GameOutcome::Draw => "draw, the board is full".to_string(),
        GameOutcome::InProgress => "in progress".to_string(),
    }
}
