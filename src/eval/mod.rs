//! Evaluation module for candidate moves
//!
//! Scores an empty cell by the runs it would create for the mover and the
//! runs it would deny the opponent. There is no look-ahead.

pub mod heuristic;
pub mod patterns;

pub use heuristic::{line_shape, score_cell, LineShape};
pub use patterns::{defense_score, offense_score, PatternScore};
