//! Gomoku game engine with online play
//!
//! A five-in-a-row game state engine:
//! - Standard 15x15 board
//! - 5-in-a-row to win, full board is a draw
//! - Normal rules, or professional rules with forbidden points for Black
//! - Local two-player, against a scripted opponent, or online through a relay
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Game rules (win, draw, forbidden moves)
//! - [`eval`]: Single-ply cell scoring
//! - [`engine`]: Scripted opponent
//! - [`game`]: Match controller tying the above together
//! - [`net`]: Room session, wire protocol and transport for online play
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{GameConfig, GameMode, GameState, Player};
//!
//! let mut config = GameConfig::default();
//! config.mode = GameMode::VsAi;
//! let mut game = GameState::new(config);
//!
//! // Human plays Black, the opponent answers as White
//! game.place_at(7, 7).unwrap();
//! let reply = game.ai_move().unwrap();
//! println!("opponent plays at {reply}");
//! assert_eq!(game.current_turn(), Player::Black);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod net;
pub mod rules;

// Re-export commonly used types for convenience
pub use board::{Board, MoveRecord, Player, Pos, Stone, BOARD_SIZE};
pub use config::GameConfig;
pub use engine::{AIEngine, Difficulty, MoveResult, SearchType};
pub use error::{ConfigError, MoveError, SessionError, TransportError};
pub use game::{GameMode, GameState};
pub use rules::{ForbiddenKind, GameOutcome, RuleConfig, RuleVariant};
