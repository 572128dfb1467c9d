//! Scripted opponent
//!
//! The engine picks a move for whichever side it is asked about:
//!
//! 1. **Easy**: a uniformly random empty cell
//! 2. **Medium / Hard**: the highest [`score_cell`] over all empty cells, ties
//!    going to the first cell in row-major order
//!
//! This is a greedy single-ply evaluator. There is no look-ahead and no cache.
//!
//! # Example
//!
//! ```
//! use gomoku::{AIEngine, Board, Difficulty, Player, Pos};
//!
//! let mut engine = AIEngine::new(Difficulty::Medium);
//! let mut board = Board::new();
//! board.place(Pos::new(7, 7), Player::Black).unwrap();
//!
//! let result = engine.get_move_with_stats(&board, Player::White);
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! ```

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, Pos};
use crate::eval::score_cell;
use crate::rules::{is_forbidden_move, RuleConfig};

/// Opponent strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// How the move was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Uniform pick among empty cells
    Random,
    /// Maximum cell score
    Greedy,
}

/// Result of a move selection with statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Chosen cell, `None` when no empty cell is left
    pub best_move: Option<Pos>,
    /// Score of the chosen cell (0 for random picks)
    pub score: i32,
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of candidate cells considered
    pub nodes: u64,
}

/// Move selector used when no human opponent is present.
pub struct AIEngine {
    difficulty: Difficulty,
    /// Forbidden points are skipped for the side under restriction
    rules: RuleConfig,
    rng: StdRng,
}

impl AIEngine {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rules: RuleConfig::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Engine with a reproducible random stream
    #[must_use]
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rules: RuleConfig::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Get the chosen move for `player`, or `None` on a full board.
    #[must_use]
    pub fn get_move(&mut self, board: &Board, player: Player) -> Option<Pos> {
        self.get_move_with_stats(board, player).best_move
    }

    /// Get the chosen move with selection statistics.
    #[must_use]
    pub fn get_move_with_stats(&mut self, board: &Board, player: Player) -> MoveResult {
        let start = Instant::now();
        let candidates: Vec<Pos> = board
            .empty_cells()
            .filter(|&pos| !is_forbidden_move(board, pos, player, &self.rules))
            .collect();
        let nodes = candidates.len() as u64;

        let (best_move, score, search_type) = match self.difficulty {
            Difficulty::Easy => {
                let pick = (!candidates.is_empty())
                    .then(|| candidates[self.rng.random_range(0..candidates.len())]);
                (pick, 0, SearchType::Random)
            }
            Difficulty::Medium | Difficulty::Hard => {
                let (best, score) = Self::best_scoring(board, player, &candidates);
                (best, score, SearchType::Greedy)
            }
        };

        let result = MoveResult {
            best_move,
            score,
            search_type,
            time_ms: start.elapsed().as_millis() as u64,
            nodes,
        };
        tracing::debug!(
            ?player,
            difficulty = ?self.difficulty,
            best = ?result.best_move,
            score = result.score,
            nodes = result.nodes,
            "AI move selected"
        );
        result
    }

    /// Highest-scoring candidate; the first one wins a tie
    fn best_scoring(board: &Board, player: Player, candidates: &[Pos]) -> (Option<Pos>, i32) {
        let mut best = None;
        let mut max_score = -1;
        for &pos in candidates {
            let score = score_cell(board, pos, player);
            if score > max_score {
                max_score = score;
                best = Some(pos);
            }
        }
        (best, max_score.max(0))
    }
}
