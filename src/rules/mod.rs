//! Game rules for Gomoku
//!
//! This module implements the rule set:
//! - Win conditions (5 or more in a row) and draw on a full board
//! - Forbidden moves for Black under the professional variant

pub mod forbidden;
pub mod win;

// Re-exports for convenient access
pub use forbidden::{
    count_fours, count_open_threes, forbidden_kind, is_forbidden_move, is_overline,
    ForbiddenKind, RuleConfig, RuleVariant,
};
pub use win::{
    check_result, count_direction, find_five_line_at_pos, five_direction_at, run_length,
    Direction, GameOutcome,
};
